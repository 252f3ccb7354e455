use crate::prelude::*;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

/// A transaction the user must send before migrating.
#[derive(Debug, Clone)]
pub struct ApprovalCall {
    /// The token or position manager to call.
    pub target: Address,
    /// A user-facing description of the approval.
    pub title: String,
    pub parameters: MethodParameters,
}

impl From<ApprovalCall> for ContractCall {
    #[inline]
    fn from(call: ApprovalCall) -> Self {
        Self {
            to: call.target,
            parameters: call.parameters,
        }
    }
}

/// Whether a token allowance must be raised to spend `amount`. The native asset needs no
/// approval.
#[inline]
pub fn token_approval_required(token: Address, allowance: U256, amount: U256) -> bool {
    token != NATIVE_TOKEN && allowance < amount
}

/// Whether a position NFT must be approved for `spender`.
#[inline]
pub fn nft_approval_required(approved: Address, spender: Address) -> bool {
    approved != spender
}

/// Produces the ERC-20 approval of `amount` of `token` for `spender`.
///
/// ## Arguments
///
/// * `token`: the token to approve, used for the address and the title
/// * `spender`: the account allowed to pull the token, usually the router
/// * `amount`: the allowance in base units
pub fn token_approval(token: &TokenMetadata, spender: Address, amount: U256) -> ApprovalCall {
    ApprovalCall {
        target: token.address,
        title: format!(
            "Approve {} of {} for spending",
            format_units(amount, token.decimals),
            token.symbol
        ),
        parameters: MethodParameters {
            calldata: IERC20::approveCall { spender, amount }.abi_encode().into(),
            value: U256::ZERO,
        },
    }
}

/// Produces the ERC-721 approval of position `token_id` held by `position_manager` for `spender`.
pub fn nft_approval(position_manager: Address, spender: Address, token_id: U256) -> ApprovalCall {
    ApprovalCall {
        target: position_manager,
        title: format!("Approve Position #{token_id} for migration"),
        parameters: MethodParameters {
            calldata: IERC721::approveCall {
                to: spender,
                tokenId: token_id,
            }
            .abi_encode()
            .into(),
            value: U256::ZERO,
        },
    }
}

/// The approval currently missing for a migration source, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalState {
    /// The allowance or operator has not been read yet.
    Unknown,
    Satisfied,
    Required,
}

impl ApprovalState {
    #[inline]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Reads whether `owner` must approve the router before migrating `source`.
pub async fn check_approval<C: ChainClient>(
    client: &C,
    source: &MigrationSource,
    owner: Address,
    router: Address,
) -> Result<ApprovalState, Error> {
    let required = match *source {
        MigrationSource::Token { address, amount } => {
            if address == NATIVE_TOKEN {
                return Ok(ApprovalState::Satisfied);
            }
            let allowance = client.read_allowance(address, owner, router).await?;
            token_approval_required(address, allowance, amount)
        }
        MigrationSource::Position {
            token_id,
            position_manager,
            ..
        } => {
            let approved = client.read_nft_approved(position_manager, token_id).await?;
            nft_approval_required(approved, router)
        }
    };
    Ok(if required {
        ApprovalState::Required
    } else {
        ApprovalState::Satisfied
    })
}
