//! ## Services
//! Interfaces of the external collaborators a migration session talks to, and the pure logic that
//! interprets their responses.
//!
//! Concrete HTTP and RPC implementations live in the `extensions` feature.

use crate::prelude::*;
use alloy_primitives::{Address, Bytes, ChainId, B256, U256};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// A contract call ready to be signed and sent by the wallet.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub parameters: MethodParameters,
}

/// Reads chain state and submits transactions on behalf of the connected wallet.
pub trait ChainClient {
    /// Returns the `owner`'s balance of `token`, or of the native asset for [`NATIVE_TOKEN`].
    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256, Error>;

    async fn read_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, Error>;

    /// Returns the operator approved for an NFT, the zero address if there is none.
    async fn read_nft_approved(&self, collection: Address, token_id: U256)
        -> Result<Address, Error>;

    /// Sends a transaction and returns its hash.
    async fn write_contract(&self, call: ContractCall) -> Result<B256, Error>;

    /// Waits until the transaction is mined and returns whether it succeeded.
    async fn wait_for_receipt(&self, hash: B256) -> Result<bool, Error>;
}

/// Discovers source positions and destination pools.
pub trait Indexer {
    /// Returns the V3 positions of `owner` that still hold liquidity.
    async fn positions(&self, chain_id: ChainId, owner: Address)
        -> Result<Vec<SourcePosition>, Error>;

    /// Returns the hookless V4 pools of a canonically ordered pair that hold liquidity.
    async fn pools(&self, chain_id: ChainId, pair: TokenPair) -> Result<Vec<IndexedPool>, Error>;
}

/// Token metadata as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub address: Address,
    pub chain_id: ChainId,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
}

/// Resolves token metadata and spot prices.
pub trait TokenService {
    /// Returns `None` if the service does not know the token.
    async fn token(&self, chain_id: ChainId, address: Address)
        -> Result<Option<TokenMetadata>, Error>;

    async fn price_usd(&self, chain_id: ChainId, address: Address) -> Result<Option<f64>, Error>;
}

/// Resolves a token through the service, falling back to a static token list when the service
/// does not know it or fails.
pub async fn resolve_token<S: TokenService>(
    service: &S,
    token_list: &[TokenMetadata],
    chain_id: ChainId,
    address: Address,
) -> Option<TokenMetadata> {
    match service.token(chain_id, address).await {
        Ok(Some(token)) => return Some(token),
        Ok(None) => debug!(chain_id, %address, "token unknown to service"),
        Err(err) => warn!(chain_id, %address, %err, "token lookup failed"),
    }
    token_list
        .iter()
        .find(|token| token.chain_id == chain_id && token.address == address)
        .cloned()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgePoolToken {
    pub address: Address,
    pub symbol: String,
}

/// A pool of the bridge network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgePool {
    pub address: Address,
    pub chain_key: String,
    pub token: BridgePoolToken,
}

/// Lists the bridge network's pools.
pub trait BridgeMetadataService {
    async fn bridge_pools(&self) -> Result<Vec<BridgePool>, Error>;
}

/// Finds the bridge pool of `asset` on a chain. Returns the pool address and the asset's address,
/// with a zero underlying address replaced by [`NATIVE_TOKEN`].
pub fn resolve_bridge_pool(
    pools: &[BridgePool],
    chain_id: ChainId,
    asset: TransportAsset,
) -> Option<(Address, Address)> {
    let chain_key = SupportedChain::try_from(chain_id).ok()?.bridge_chain_key();
    let pool = pools
        .iter()
        .find(|pool| pool.chain_key == chain_key && pool.token.symbol.contains(asset.symbol()))?;
    let token = if pool.token.address == NULL_ADDRESS {
        NATIVE_TOKEN
    } else {
        pool.token.address
    };
    Some((pool.address, token))
}

/// Resolves the bridge pools on both ends of a cross-chain migration.
pub fn resolve_bridge_route(
    pools: &[BridgePool],
    chain_id_in: ChainId,
    chain_id_out: ChainId,
) -> Option<BridgeRoute> {
    let asset = TransportAsset::for_route(chain_id_in, chain_id_out);
    let (source_pool, source_token) = resolve_bridge_pool(pools, chain_id_in, asset)?;
    let (_, destination_token) = resolve_bridge_pool(pools, chain_id_out, asset)?;
    Some(BridgeRoute {
        asset,
        source_pool,
        source_token,
        destination_token,
    })
}

/// A transaction built by the execution service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleTransaction {
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub value: U256,
}

impl From<BundleTransaction> for ContractCall {
    #[inline]
    fn from(tx: BundleTransaction) -> Self {
        Self {
            to: tx.to,
            parameters: MethodParameters {
                calldata: tx.data,
                value: tx.value,
            },
        }
    }
}

/// A priced bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuote {
    pub tx: BundleTransaction,
    #[serde(default)]
    pub amounts_out: HashMap<Address, U256>,
    #[serde(default)]
    pub gas: U256,
}

/// Prices bundles and turns them into transactions.
pub trait ExecutionService {
    /// Must only be called with a ready bundle.
    async fn bundle(
        &self,
        params: BundleParams,
        actions: &[BundleAction],
    ) -> Result<BundleQuote, Error>;
}

/// A cross-chain message as reported by the bridge scan service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeMessage {
    /// The status of the source transaction, e.g. `SUCCEEDED`.
    pub source_status: Option<String>,
    /// The status of the message, e.g. `INFLIGHT` or `DELIVERED`.
    pub status: Option<String>,
}

/// Looks up the cross-chain message sent by a source transaction.
pub trait BridgeStatusService {
    /// Returns `None` while the scan service has not indexed the transaction yet.
    async fn message(&self, hash: B256) -> Result<Option<BridgeMessage>, Error>;
}

/// Delivery progress of a cross-chain migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeStatus {
    /// The source transaction has not succeeded yet. `source_seen` is set once the scan service
    /// knows the transaction.
    Pending { source_seen: bool },
    Inflight,
    Confirming,
    Delivered,
    Failed,
}

impl Default for BridgeStatus {
    #[inline]
    fn default() -> Self {
        Self::Pending { source_seen: false }
    }
}

impl BridgeStatus {
    /// The number of steps until delivery.
    pub const STEPS: u8 = 4;

    /// Advances the status with a message from the scan service. Statuses never move backward and
    /// terminal statuses are final.
    pub fn next(self, message: Option<&BridgeMessage>) -> Self {
        if self.is_terminal() {
            return self;
        }
        let Some(message) = message else {
            return self;
        };
        let status = message.status.as_deref();
        let source_status = message.source_status.as_deref();
        let next = if status == Some("FAILED") || source_status == Some("FAILED") {
            Self::Failed
        } else if source_status.is_some_and(|status| status != "SUCCEEDED") {
            Self::Pending { source_seen: true }
        } else {
            match status {
                Some("DELIVERED") => Self::Delivered,
                Some("CONFIRMING") => Self::Confirming,
                Some("INFLIGHT") => Self::Inflight,
                _ => self,
            }
        };
        match (self.step(), next.step()) {
            (Some(current), Some(step)) if step < current => self,
            _ => next,
        }
    }

    /// The completed step out of [`BridgeStatus::STEPS`], `None` once failed.
    #[inline]
    pub const fn step(&self) -> Option<u8> {
        match self {
            Self::Pending { source_seen: false } => Some(0),
            Self::Pending { source_seen: true } => Some(1),
            Self::Inflight => Some(2),
            Self::Confirming => Some(3),
            Self::Delivered => Some(4),
            Self::Failed => None,
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Pending { source_seen: false } => "Waiting for source transaction completion",
            Self::Pending { source_seen: true } => "Waiting for funds to be sent on destination",
            Self::Inflight => "Waiting for funds to be delivered on destination",
            Self::Confirming => "Waiting for destination execution",
            Self::Delivered => "Bridging is complete",
            Self::Failed => "Bridging failed, check the transaction on the bridge explorer",
        }
    }

    /// A title such as `Pending (2/4)`.
    pub fn title(&self) -> String {
        match (self, self.step()) {
            (Self::Delivered, Some(step)) => format!("Success ({step}/{})", Self::STEPS),
            (_, Some(step)) => format!("Pending ({step}/{})", Self::STEPS),
            (_, None) => "Failed".to_string(),
        }
    }

    /// The notification shown for this status.
    pub fn notification(&self) -> Notification {
        let kind = match self {
            Self::Delivered => NotificationKind::Success,
            Self::Failed => NotificationKind::Error,
            _ => NotificationKind::Loading,
        };
        Notification::new(kind, self.title(), self.description())
    }
}

/// Polls the bridge scan service every `interval` until the message is delivered or failed,
/// reporting every status change to `on_update`.
///
/// Lookup failures are logged and retried on the next tick. A message that never reaches a
/// terminal status keeps the poller pending, so callers that need a bound should wrap it in
/// [`tokio::time::timeout`].
pub async fn track_bridge_status<S, F>(
    service: &S,
    hash: B256,
    interval: Duration,
    mut on_update: F,
) -> BridgeStatus
where
    S: BridgeStatusService,
    F: FnMut(BridgeStatus),
{
    let mut status = BridgeStatus::default();
    on_update(status);
    loop {
        match service.message(hash).await {
            Ok(message) => {
                let next = status.next(message.as_ref());
                if next != status {
                    debug!(%hash, ?next, "bridge status changed");
                    status = next;
                    on_update(status);
                }
            }
            Err(err) => warn!(%hash, %err, "bridge status lookup failed"),
        }
        if status.is_terminal() {
            return status;
        }
        tokio::time::sleep(interval).await;
    }
}

/// Keeps the wallet reads and the pool list of a session fresh.
///
/// The balance and approval of the current selection are read again every
/// `balance_poll_interval`, and the pool list is reloaded every `pool_refresh_interval`.
/// `queries` is asked for the current selection on every tick, so it follows the session as it
/// changes, and each resulting event is handed to `on_event`. The first reads are left to the
/// caller. Runs until dropped.
///
/// ## Arguments
///
/// * `chain`: The client serving balances and approvals
/// * `indexer`: The client serving pools
/// * `defaults`: The polling intervals, both non-zero as [`WidgetConfig::validate`] ensures
/// * `queries`: Produces the reads of the current selection, usually
///   [`MigrationSessionController::refresh_queries`]
/// * `on_event`: Receives the results, usually applied to the same session
pub async fn poll_session<C, I, Q, F>(
    chain: &C,
    indexer: &I,
    defaults: &SessionDefaults,
    mut queries: Q,
    mut on_event: F,
) where
    C: ChainClient,
    I: Indexer,
    Q: FnMut() -> RefreshQueries,
    F: FnMut(SessionEvent),
{
    let start = Instant::now();
    let mut wallet = interval_at(
        start + defaults.balance_poll_interval,
        defaults.balance_poll_interval,
    );
    let mut pools = interval_at(
        start + defaults.pool_refresh_interval,
        defaults.pool_refresh_interval,
    );
    wallet.set_missed_tick_behavior(MissedTickBehavior::Delay);
    pools.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = wallet.tick() => {
                let RefreshQueries { balance, approval, .. } = queries();
                if let Some(query) = balance {
                    on_event(query.run(chain).await);
                }
                if let Some(query) = approval {
                    on_event(query.run(chain).await);
                }
            }
            _ = pools.tick() => {
                if let Some(query) = queries().pools {
                    debug!(chain_id = query.chain_id, "refreshing pools");
                    on_event(query.run(indexer).await);
                }
            }
        }
    }
}
