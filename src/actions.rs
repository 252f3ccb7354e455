//! ## Bundle actions
//! Typed steps of a migration bundle as understood by the execution service.
//!
//! Every action is serialized as `{"protocol": ..., "action": ..., "args": {...}}`. An amount
//! argument is either a literal decimal string or a reference to the output of an earlier action in
//! the same sequence, `{"useOutputOfCallAt": k, "index": j}`. Actions inside a bridge callback
//! reference each other relative to the callback sequence.

use crate::prelude::*;
use alloy_primitives::{Address, ChainId, U256};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Serializes an integer as a decimal string.
fn serialize_decimal<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// An amount argument of a bundle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum AmountArg {
    /// A concrete amount in base units.
    Literal(#[serde(serialize_with = "serialize_decimal")] U256),
    /// The output of the action at index `action`, selecting output `index` of a multi-output
    /// action.
    Deferred {
        #[serde(rename = "useOutputOfCallAt")]
        action: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
}

impl AmountArg {
    /// References the single output of the action at `action`.
    #[inline]
    pub const fn output_of(action: usize) -> Self {
        Self::Deferred {
            action,
            index: None,
        }
    }

    /// References output `index` of the multi-output action at `action`.
    #[inline]
    pub const fn output_at(action: usize, index: usize) -> Self {
        Self::Deferred {
            action,
            index: Some(index),
        }
    }

    /// The referenced action and output index, if the amount is deferred.
    #[inline]
    pub const fn reference(&self) -> Option<(usize, Option<usize>)> {
        match *self {
            Self::Literal(_) => None,
            Self::Deferred { action, index } => Some((action, index)),
        }
    }
}

impl From<U256> for AmountArg {
    #[inline]
    fn from(amount: U256) -> Self {
        Self::Literal(amount)
    }
}

/// The protocol that executes an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "enso")]
    Enso,
    #[serde(rename = "uniswap-v3")]
    UniswapV3,
    #[serde(rename = "uniswap-v4")]
    UniswapV4,
    #[serde(rename = "stargate")]
    Stargate,
}

/// The kind of a bundle action, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Route,
    Redeem,
    Merge,
    Split,
    Slippage,
    Fee,
    Balance,
    Bridge,
    Deposit,
}

impl ActionKind {
    /// The action name used on the wire.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Redeem => "redeemclmm",
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Slippage => "slippage",
            Self::Fee => "ensofee",
            Self::Balance => "balance",
            Self::Bridge => "bridge",
            Self::Deposit => "depositclmm",
        }
    }

    /// The number of values the action outputs.
    #[inline]
    pub const fn outputs(&self) -> usize {
        match self {
            Self::Redeem | Self::Split => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ActionKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteArgs {
    pub token_in: Address,
    pub amount_in: AmountArg,
    pub token_out: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemArgs {
    /// The position manager holding the position.
    pub token_in: Address,
    #[serde(serialize_with = "serialize_decimal")]
    pub token_id: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub liquidity: u128,
    pub token_out: [Address; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeArgs {
    pub token_in: [Address; 2],
    pub token_out: Address,
    pub amount_in: [AmountArg; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitArgs {
    pub token_in: Address,
    pub token_out: [Address; 2],
    pub amount_in: AmountArg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageArgs {
    pub amount_out: AmountArg,
    pub bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeArgs {
    pub token: Address,
    pub amount: AmountArg,
    pub bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceArgs {
    pub token: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeArgs {
    /// The bridge pool on the source chain.
    pub primary_address: Address,
    pub destination_chain_id: ChainId,
    pub token_in: Address,
    pub amount_in: AmountArg,
    pub receiver: Address,
    /// Actions executed on the destination chain once the bridged funds arrive.
    pub callback: Vec<BundleAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositArgs {
    /// The position manager that mints the new position.
    pub token_out: Address,
    pub ticks: [i32; 2],
    pub token_in: [Address; 2],
    #[serde(serialize_with = "serialize_decimal")]
    pub pool_fee: u32,
    pub amount_in: [AmountArg; 2],
}

/// The arguments of a bundle action, tagged with the action name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "args")]
pub enum ActionArgs {
    #[serde(rename = "route")]
    Route(RouteArgs),
    #[serde(rename = "redeemclmm")]
    Redeem(RedeemArgs),
    #[serde(rename = "merge")]
    Merge(MergeArgs),
    #[serde(rename = "split")]
    Split(SplitArgs),
    #[serde(rename = "slippage")]
    Slippage(SlippageArgs),
    #[serde(rename = "ensofee")]
    Fee(FeeArgs),
    #[serde(rename = "balance")]
    Balance(BalanceArgs),
    #[serde(rename = "bridge")]
    Bridge(BridgeArgs),
    #[serde(rename = "depositclmm")]
    Deposit(DepositArgs),
}

impl ActionArgs {
    #[inline]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Route(_) => ActionKind::Route,
            Self::Redeem(_) => ActionKind::Redeem,
            Self::Merge(_) => ActionKind::Merge,
            Self::Split(_) => ActionKind::Split,
            Self::Slippage(_) => ActionKind::Slippage,
            Self::Fee(_) => ActionKind::Fee,
            Self::Balance(_) => ActionKind::Balance,
            Self::Bridge(_) => ActionKind::Bridge,
            Self::Deposit(_) => ActionKind::Deposit,
        }
    }

    /// The amount arguments of the action, in argument order.
    pub fn amounts(&self) -> Vec<AmountArg> {
        match self {
            Self::Route(args) => vec![args.amount_in],
            Self::Redeem(_) | Self::Balance(_) => vec![],
            Self::Merge(args) => args.amount_in.to_vec(),
            Self::Split(args) => vec![args.amount_in],
            Self::Slippage(args) => vec![args.amount_out],
            Self::Fee(args) => vec![args.amount],
            Self::Bridge(args) => vec![args.amount_in],
            Self::Deposit(args) => args.amount_in.to_vec(),
        }
    }
}

/// A single step of a migration bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleAction {
    pub protocol: Protocol,
    #[serde(flatten)]
    pub args: ActionArgs,
}

impl BundleAction {
    #[inline]
    pub const fn kind(&self) -> ActionKind {
        self.args.kind()
    }

    /// Swaps `amount_in` of `token_in` into `token_out` through the execution service's router.
    #[inline]
    pub fn route(token_in: Address, amount_in: AmountArg, token_out: Address) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Route(RouteArgs {
                token_in,
                amount_in,
                token_out,
            }),
        }
    }

    /// Burns all liquidity of a V3 position and collects both tokens.
    #[inline]
    pub fn redeem(
        position_manager: Address,
        token_id: U256,
        liquidity: u128,
        tokens: [Address; 2],
    ) -> Self {
        Self {
            protocol: Protocol::UniswapV3,
            args: ActionArgs::Redeem(RedeemArgs {
                token_in: position_manager,
                token_id,
                liquidity,
                token_out: tokens,
            }),
        }
    }

    /// Swaps two token amounts into a single token.
    #[inline]
    pub fn merge(tokens: [Address; 2], amounts: [AmountArg; 2], token_out: Address) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Merge(MergeArgs {
                token_in: tokens,
                token_out,
                amount_in: amounts,
            }),
        }
    }

    /// Splits an amount into the two tokens of a pool according to the pool's proportions.
    #[inline]
    pub fn split(token_in: Address, amount_in: AmountArg, tokens: [Address; 2]) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Split(SplitArgs {
                token_in,
                token_out: tokens,
                amount_in,
            }),
        }
    }

    /// Reverts the bundle if `amount_out` is below its quoted value by more than `bps`.
    #[inline]
    pub fn slippage(amount_out: AmountArg, bps: u16) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Slippage(SlippageArgs { amount_out, bps }),
        }
    }

    /// Takes the protocol fee of `bps` from `amount` and outputs the remainder.
    #[inline]
    pub fn fee(token: Address, amount: AmountArg, bps: u16) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Fee(FeeArgs { token, amount, bps }),
        }
    }

    /// Outputs the executing account's balance of `token`.
    #[inline]
    pub fn balance(token: Address) -> Self {
        Self {
            protocol: Protocol::Enso,
            args: ActionArgs::Balance(BalanceArgs { token }),
        }
    }

    /// Bridges `amount_in` of `token_in` and runs `callback` on the destination chain.
    #[inline]
    pub fn bridge(
        bridge_pool: Address,
        destination_chain_id: ChainId,
        token_in: Address,
        amount_in: AmountArg,
        receiver: Address,
        callback: Vec<BundleAction>,
    ) -> Self {
        Self {
            protocol: Protocol::Stargate,
            args: ActionArgs::Bridge(BridgeArgs {
                primary_address: bridge_pool,
                destination_chain_id,
                token_in,
                amount_in,
                receiver,
                callback,
            }),
        }
    }

    /// Mints a V4 position in the given range.
    #[inline]
    pub fn deposit(
        position_manager: Address,
        range: PriceRange,
        tokens: [Address; 2],
        pool_fee: u32,
        amounts: [AmountArg; 2],
    ) -> Self {
        Self {
            protocol: Protocol::UniswapV4,
            args: ActionArgs::Deposit(DepositArgs {
                token_out: position_manager,
                ticks: range.ticks(),
                token_in: tokens,
                pool_fee,
                amount_in: amounts,
            }),
        }
    }
}

/// Checks that every deferred amount in `actions` references an output of an earlier action.
///
/// Bridge callbacks are checked as sequences of their own.
pub fn validate_references(actions: &[BundleAction]) -> Result<(), Error> {
    for (position, action) in actions.iter().enumerate() {
        for (target, index) in action
            .args
            .amounts()
            .iter()
            .filter_map(AmountArg::reference)
        {
            if target >= position {
                return Err(Error::DanglingReference {
                    action: position,
                    target,
                });
            }
            let outputs = actions[target].kind().outputs();
            if let Some(index) = index {
                if index >= outputs {
                    return Err(Error::InvalidOutputIndex {
                        action: position,
                        target,
                        index,
                        outputs,
                    });
                }
            }
        }
        if let ActionArgs::Bridge(args) = &action.args {
            validate_references(&args.callback)?;
        }
    }
    Ok(())
}
