//! ## Alloy chain client
//! A [`ChainClient`] that reads and writes through an alloy provider.

use crate::prelude::*;
use alloy::{
    network::{Ethereum, Network, ReceiptResponse, TransactionBuilder},
    providers::Provider,
    sol,
};
use alloy_primitives::{Address, B256, U256};
use std::{marker::PhantomData, time::Duration};
use tracing::debug;

sol! {
    #[sol(rpc)]
    interface IERC20Reader {
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function balanceOf(address owner) external view returns (uint256 balance);
    }

    #[sol(rpc)]
    interface IERC721Reader {
        function getApproved(uint256 tokenId) external view returns (address operator);
    }
}

/// Interval between two receipt lookups while a transaction is pending.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A chain client for the connected wallet.
///
/// The provider must be able to sign for `from`, e.g. through a wallet filler.
#[derive(Clone, Debug)]
pub struct AlloyChainClient<P, N = Ethereum>
where
    N: Network,
    P: Provider<N>,
{
    pub provider: P,
    pub from: Address,
    pub receipt_poll_interval: Duration,
    _network: PhantomData<N>,
}

impl<P, N> AlloyChainClient<P, N>
where
    N: Network,
    P: Provider<N>,
{
    #[inline]
    pub const fn new(provider: P, from: Address) -> Self {
        Self {
            provider,
            from,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            _network: PhantomData,
        }
    }

    #[inline]
    pub const fn receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }
}

impl<P, N> ChainClient for AlloyChainClient<P, N>
where
    N: Network,
    P: Provider<N>,
{
    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256, Error> {
        if token == NATIVE_TOKEN || token == NULL_ADDRESS {
            return Ok(self.provider.get_balance(owner).await?);
        }
        let erc20 = IERC20Reader::new(token, &self.provider);
        Ok(erc20.balanceOf(owner).call().await?.balance)
    }

    async fn read_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, Error> {
        let erc20 = IERC20Reader::new(token, &self.provider);
        Ok(erc20.allowance(owner, spender).call().await?.remaining)
    }

    async fn read_nft_approved(
        &self,
        collection: Address,
        token_id: U256,
    ) -> Result<Address, Error> {
        let erc721 = IERC721Reader::new(collection, &self.provider);
        Ok(erc721.getApproved(token_id).call().await?.operator)
    }

    async fn write_contract(&self, call: ContractCall) -> Result<B256, Error> {
        let tx = N::TransactionRequest::default()
            .with_from(self.from)
            .with_to(call.to)
            .with_input(call.parameters.calldata)
            .with_value(call.parameters.value);
        let pending = self.provider.send_transaction(tx).await?;
        let hash = *pending.tx_hash();
        debug!(%hash, to = %call.to, "transaction sent");
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<bool, Error> {
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                let success = receipt.status();
                debug!(%hash, success, "transaction mined");
                return Ok(success);
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}
