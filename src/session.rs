//! ## Migration session
//! The state of one migration widget. User input and service results arrive as [`SessionEvent`]s
//! and are applied in order by [`MigrationSessionController::apply`], which never suspends.
//!
//! Service calls are described by query values that capture everything they need. An event loop
//! runs them concurrently with further input and feeds their results back as events. Results whose
//! inputs no longer match the session are ignored, so the most recent request wins.

use crate::prelude::*;
use alloy_primitives::{Address, ChainId, B256, U256};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Loading,
    Success,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    #[inline]
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An error notification carrying the underlying message.
    #[inline]
    pub fn error(title: impl Into<String>, err: &Error) -> Self {
        Self::new(NotificationKind::Error, title, err.to_string())
    }
}

/// What the user migrates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceMode {
    #[default]
    Token,
    Position,
}

/// How the destination range follows the selected pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeMode {
    /// Recomputed from the selector whenever the pool changes.
    Preset(RangeSelector),
    /// Set by hand, only realigned to a new tick spacing.
    Custom,
}

impl Default for RangeMode {
    #[inline]
    fn default() -> Self {
        Self::Preset(RangeSelector::FullRange)
    }
}

/// A bound of the displayed price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Approval,
    Migration,
}

/// Everything that can change a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    WalletConnected { chain_id: ChainId, owner: Address },
    WalletDisconnected,
    /// Metadata of a token the session may display or parse amounts of.
    TokenResolved(TokenMetadata),
    SourceModeChanged(SourceMode),
    SourceTokenSelected(Address),
    /// A typed amount of the source token.
    SourceAmountEntered(String),
    PositionSelected(SourcePosition),
    DestinationChainSelected(ChainId),
    /// A destination pair in the order the user picked it.
    DestinationTokensSelected(Address, Address),
    /// Selects the pool of a fee tier among the loaded pools.
    PoolSelected(u32),
    RangeSelected(RangeSelector),
    /// A typed display price for one bound of the range.
    PriceEntered { bound: Bound, input: String },
    /// Moves one bound of the displayed range by whole tick spacings.
    TickNudged { bound: Bound, steps: i32 },
    PriceDenominationToggled,
    SlippageChanged(u16),
    PositionsLoaded {
        chain_id: ChainId,
        owner: Address,
        positions: Vec<SourcePosition>,
    },
    PoolsLoaded {
        chain_id: ChainId,
        pair: TokenPair,
        pools: Vec<IndexedPool>,
    },
    BalanceLoaded {
        token: Address,
        owner: Address,
        balance: U256,
    },
    ApprovalLoaded {
        source: MigrationSource,
        owner: Address,
        state: ApprovalState,
    },
    BridgeRouteLoaded {
        chain_id_in: ChainId,
        chain_id_out: ChainId,
        route: Option<BridgeRoute>,
    },
    QuoteLoaded {
        generation: u64,
        request: MigrationRequest,
        quote: BundleQuote,
    },
    TransactionConfirmed {
        kind: TransactionKind,
        hash: B256,
        success: bool,
    },
    /// A service call failed.
    Failed(Notification),
}

/// The user-selected state of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The chain the wallet is connected to, where the source lives.
    pub chain_id: Option<ChainId>,
    pub owner: Option<Address>,
    pub source_mode: SourceMode,
    pub source_token: Option<Address>,
    /// The last valid typed amount.
    pub source_amount: Option<String>,
    pub source_position: Option<SourcePosition>,
    pub positions: Vec<SourcePosition>,
    pub destination_chain_id: ChainId,
    /// The destination tokens in the order the user picked them.
    pub destination_tokens: Option<[Address; 2]>,
    /// Pools of the current pair. `None` until loaded, empty if the pair has none.
    pub pools: Option<Vec<IndexedPool>>,
    pub selected_pool: Option<IndexedPool>,
    pub range: Option<PriceRange>,
    pub range_mode: RangeMode,
    /// Whether prices are shown in token1 per token0.
    pub prices_in_token0: bool,
    pub slippage_bps: u16,
    pub bridge_route: Option<BridgeRoute>,
    /// The hash of a cross-chain migration being delivered.
    pub bridge_hash: Option<B256>,
}

/// The range as shown next to the price inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    pub width_percent: f64,
    pub full_range: bool,
    /// Distance of the lower bound from the current price, e.g. `-5.00%`.
    pub lower_percent: String,
    pub upper_percent: String,
}

/// Drives a migration session.
#[derive(Debug)]
pub struct MigrationSessionController<E> {
    config: WidgetConfig,
    state: SessionState,
    execution: Arc<E>,
    generation: u64,
    tokens: HashMap<Address, TokenMetadata>,
    balances: HashMap<(Address, Address), U256>,
    approval: Option<(MigrationSource, Address, ApprovalState)>,
    quote: Option<(MigrationRequest, BundleQuote)>,
    notifications: Vec<Notification>,
}

impl<E: ExecutionService> MigrationSessionController<E> {
    /// Starts a session locked to the fixed values of `config`.
    ///
    /// ## Arguments
    ///
    /// * `config`: the embedding configuration, validated here
    /// * `execution`: the execution service client built with the configured API key
    pub fn new(config: WidgetConfig, execution: E) -> Result<Self, Error> {
        config.validate()?;
        let state = SessionState {
            destination_chain_id: config.destination_chain_id(),
            destination_tokens: config.out_tokens,
            range: config.ticks,
            range_mode: if config.ticks.is_some() {
                RangeMode::Custom
            } else {
                RangeMode::default()
            },
            prices_in_token0: true,
            slippage_bps: config.defaults.slippage_bps,
            ..Default::default()
        };
        Ok(Self {
            config,
            state,
            execution: Arc::new(execution),
            generation: 0,
            tokens: HashMap::new(),
            balances: HashMap::new(),
            approval: None,
            quote: None,
            notifications: Vec::new(),
        })
    }

    #[inline]
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[inline]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replaces the execution client, e.g. after the API key changed. Requests already in flight
    /// keep the client they started with and their results are discarded.
    pub fn replace_execution(&mut self, execution: E) {
        self.execution = Arc::new(execution);
        self.generation += 1;
        self.quote = None;
        debug!(generation = self.generation, "execution client replaced");
    }

    /// Returns and clears the pending notifications.
    #[inline]
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Applies an event to the session.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::WalletConnected { chain_id, owner } => {
                if self.state.chain_id != Some(chain_id) {
                    self.reset_source();
                    self.state.positions.clear();
                    self.state.bridge_route = None;
                }
                self.state.chain_id = Some(chain_id);
                self.state.owner = Some(owner);
            }
            SessionEvent::WalletDisconnected => {
                self.reset_source();
                self.state.positions.clear();
                self.state.chain_id = None;
                self.state.owner = None;
                self.state.bridge_route = None;
            }
            SessionEvent::TokenResolved(token) => {
                self.tokens.insert(token.address, token);
            }
            SessionEvent::SourceModeChanged(mode) => {
                if mode != self.state.source_mode {
                    self.reset_source();
                    self.state.source_mode = mode;
                }
            }
            SessionEvent::SourceTokenSelected(token) => {
                if self.state.source_mode != SourceMode::Token {
                    debug!(%token, "source token ignored in position mode");
                    return;
                }
                self.state.source_token = Some(token);
            }
            SessionEvent::SourceAmountEntered(input) => {
                let input = input.trim();
                if input.is_empty() {
                    self.state.source_amount = None;
                } else if parse_decimal(input).is_some_and(|amount| amount > 0.0) {
                    self.state.source_amount = Some(input.to_string());
                } else {
                    debug!(input, "invalid amount ignored");
                }
            }
            SessionEvent::PositionSelected(position) => {
                if self.state.source_mode != SourceMode::Position
                    || self.state.chain_id != Some(position.chain_id)
                {
                    debug!(token_id = %position.token_id, "position ignored");
                    return;
                }
                self.state.source_position = Some(position);
            }
            SessionEvent::DestinationChainSelected(chain_id) => {
                if self.config.out_chain_id.is_some() {
                    debug!(chain_id, "destination chain is locked");
                    return;
                }
                if chain_id != self.state.destination_chain_id {
                    self.state.destination_chain_id = chain_id;
                    self.state.bridge_route = None;
                    self.reset_pools();
                }
            }
            SessionEvent::DestinationTokensSelected(token_a, token_b) => {
                if self.config.out_tokens.is_some() {
                    debug!(%token_a, %token_b, "destination tokens are locked");
                    return;
                }
                if token_a == token_b {
                    debug!(%token_a, "identical destination tokens ignored");
                    return;
                }
                let previous = self.pair();
                self.state.destination_tokens = Some([token_a, token_b]);
                if self.pair().map(|pair| pair.tokens()) != previous.map(|pair| pair.tokens()) {
                    self.reset_pools();
                }
            }
            SessionEvent::PoolSelected(fee_tier) => {
                if self
                    .config
                    .pool_fee_grade
                    .is_some_and(|fee_grade| fee_grade != fee_tier)
                {
                    debug!(fee_tier, "pool fee grade is locked");
                    return;
                }
                let pool = self
                    .state
                    .pools
                    .as_deref()
                    .and_then(|pools| pool_for_fee(pools, fee_tier))
                    .cloned();
                match pool {
                    Some(pool) => self.select_pool(pool),
                    None => debug!(fee_tier, "no pool for fee tier"),
                }
            }
            SessionEvent::RangeSelected(selector) => {
                if self.config.ticks.is_some() {
                    debug!(?selector, "range is locked");
                    return;
                }
                self.state.range_mode = RangeMode::Preset(selector);
                self.apply_range_mode();
            }
            SessionEvent::PriceEntered { bound, input } => {
                if self.config.ticks.is_some() {
                    debug!(?bound, "range is locked");
                    return;
                }
                match self.range_from_price(bound, &input) {
                    Some(range) => {
                        self.state.range = Some(range);
                        self.state.range_mode = RangeMode::Custom;
                    }
                    None => debug!(?bound, %input, "invalid price ignored"),
                }
            }
            SessionEvent::TickNudged { bound, steps } => {
                if self.config.ticks.is_some() {
                    debug!(?bound, "range is locked");
                    return;
                }
                match self.nudged_range(bound, steps) {
                    Some(range) => {
                        self.state.range = Some(range);
                        self.state.range_mode = RangeMode::Custom;
                    }
                    None => debug!(?bound, steps, "nudge out of bounds ignored"),
                }
            }
            SessionEvent::PriceDenominationToggled => {
                self.state.prices_in_token0 = !self.state.prices_in_token0;
            }
            SessionEvent::SlippageChanged(slippage_bps) => {
                if slippage_bps > 10_000 {
                    debug!(slippage_bps, "invalid slippage ignored");
                    return;
                }
                self.state.slippage_bps = slippage_bps;
            }
            SessionEvent::PositionsLoaded {
                chain_id,
                owner,
                positions,
            } => {
                if self.state.chain_id != Some(chain_id) || self.state.owner != Some(owner) {
                    debug!(chain_id, %owner, "stale positions ignored");
                    return;
                }
                self.state.positions = positions
                    .into_iter()
                    .filter(SourcePosition::has_liquidity)
                    .collect();
            }
            SessionEvent::PoolsLoaded {
                chain_id,
                pair,
                pools,
            } => self.pools_loaded(chain_id, pair, pools),
            SessionEvent::BalanceLoaded {
                token,
                owner,
                balance,
            } => {
                self.balances.insert((token, owner), balance);
            }
            SessionEvent::ApprovalLoaded {
                source,
                owner,
                state,
            } => {
                if self.source().as_ref() != Some(&source) || self.state.owner != Some(owner) {
                    debug!(?source, "stale approval ignored");
                    return;
                }
                self.approval = Some((source, owner, state));
            }
            SessionEvent::BridgeRouteLoaded {
                chain_id_in,
                chain_id_out,
                route,
            } => {
                if self.state.chain_id != Some(chain_id_in)
                    || self.state.destination_chain_id != chain_id_out
                {
                    debug!(chain_id_in, chain_id_out, "stale bridge route ignored");
                    return;
                }
                if route.is_none() {
                    self.notify(Notification::new(
                        NotificationKind::Error,
                        "No bridge route",
                        format!("Cannot bridge from chain {chain_id_in} to chain {chain_id_out}"),
                    ));
                }
                self.state.bridge_route = route;
            }
            SessionEvent::QuoteLoaded {
                generation,
                request,
                quote,
            } => {
                if generation != self.generation || request != self.request() {
                    debug!(generation, "stale quote ignored");
                    return;
                }
                self.quote = Some((request, quote));
            }
            SessionEvent::TransactionConfirmed {
                kind,
                hash,
                success,
            } => self.transaction_confirmed(kind, hash, success),
            SessionEvent::Failed(notification) => self.notify(notification),
        }
    }

    /// The canonically ordered destination pair.
    #[inline]
    pub fn pair(&self) -> Option<TokenPair> {
        self.state
            .destination_tokens
            .map(|[token_a, token_b]| TokenPair::new(token_a, token_b))
    }

    /// The tick spacing of the selected pool, or of the locked fee grade.
    pub fn tick_spacing(&self) -> Option<i32> {
        match (&self.state.selected_pool, self.config.pool_fee_grade) {
            (Some(pool), _) => Some(pool.tick_spacing()),
            (None, Some(fee)) => Some(tick_spacing_for_fee(fee)),
            (None, None) => None,
        }
    }

    /// One pool per fee tier of the current pair.
    #[inline]
    pub fn fee_tiers(&self) -> Vec<&IndexedPool> {
        self.state
            .pools
            .as_deref()
            .map(pools_by_fee_tier)
            .unwrap_or_default()
    }

    /// Whether the pools of the current pair were loaded and none were found.
    #[inline]
    pub fn no_pools_found(&self) -> bool {
        self.state.pools.as_ref().is_some_and(Vec::is_empty)
    }

    #[inline]
    pub fn is_cross_chain(&self) -> bool {
        self.state
            .chain_id
            .is_some_and(|chain_id| chain_id != self.state.destination_chain_id)
    }

    /// Metadata of a resolved token.
    pub fn token(&self, address: Address) -> Option<&TokenMetadata> {
        self.tokens.get(&address)
    }

    fn decimals(&self, address: Address) -> Option<u8> {
        if address == NATIVE_TOKEN || address == NULL_ADDRESS {
            return Some(18);
        }
        self.tokens.get(&address).map(|token| token.decimals)
    }

    /// The source amount in base units, once the token's decimals are known.
    pub fn source_amount(&self) -> Option<U256> {
        let token = self.state.source_token?;
        let amount = self.state.source_amount.as_deref()?;
        parse_units(amount, self.decimals(token)?)
    }

    /// The migration source described by the current selection.
    pub fn source(&self) -> Option<MigrationSource> {
        match self.state.source_mode {
            SourceMode::Token => Some(MigrationSource::Token {
                address: self.state.source_token?,
                amount: self.source_amount()?,
            }),
            SourceMode::Position => self
                .state
                .source_position
                .as_ref()
                .and_then(|position| MigrationSource::from_position(position).ok()),
        }
    }

    /// The last balance read for the source token, if any.
    pub fn source_balance(&self) -> Option<U256> {
        let key = (self.state.source_token?, self.state.owner?);
        self.balances.get(&key).copied()
    }

    /// Whether the typed amount exceeds the last balance read.
    #[inline]
    pub fn exceeds_balance(&self) -> bool {
        matches!(
            (self.source_amount(), self.source_balance()),
            (Some(amount), Some(balance)) if amount > balance
        )
    }

    /// The builder request described by the current selection.
    pub fn request(&self) -> MigrationRequest {
        let tokens = self.pair().map(|pair| pair.tokens().map(execution_token));
        let chain_id_in = self.state.chain_id.unwrap_or_default();
        MigrationRequest {
            source: self.source(),
            target: MigrationTarget {
                chain_id_in,
                chain_id_out: Some(self.state.destination_chain_id),
                token0: tokens.map(|[token0, _]| token0),
                token1: tokens.map(|[_, token1]| token1),
                pool_fee: self.state.selected_pool.as_ref().map(|pool| pool.fee_tier),
                range: self.state.range,
                receiver: self.state.owner,
            },
            options: BundleOptions {
                slippage_bps: self.state.slippage_bps,
                fee_bps: self.config.defaults.fee_bps,
            },
            bridge: self.state.bridge_route.filter(|_| self.is_cross_chain()),
        }
    }

    /// Builds the bundle for the current selection.
    #[inline]
    pub fn bundle(&self) -> Result<BundleState, Error> {
        build_bundle(&self.request())
    }

    /// The approval state of the current source.
    pub fn approval_state(&self) -> ApprovalState {
        match (&self.approval, self.source()) {
            (Some((source, owner, state)), Some(current))
                if *source == current && self.state.owner == Some(*owner) =>
            {
                *state
            }
            _ => ApprovalState::Unknown,
        }
    }

    /// Whether the migration can be started: the approval is satisfied and the bundle is ready.
    pub fn migrate_enabled(&self) -> bool {
        self.approval_state().is_satisfied()
            && self.bundle().is_ok_and(|state| state.is_ready())
    }

    /// The quote of the current selection, if one was loaded.
    pub fn quote(&self) -> Option<&BundleQuote> {
        self.quote
            .as_ref()
            .filter(|(request, _)| *request == self.request())
            .map(|(_, quote)| quote)
    }

    /// The range as percentages of the selected pool's current price.
    pub fn range_summary(&self) -> Option<RangeSummary> {
        let range = self.state.range?;
        let tick_spacing = self.tick_spacing()?;
        let current_price = self
            .state
            .selected_pool
            .as_ref()
            .and_then(IndexedPool::current_price)?;
        Some(RangeSummary {
            width_percent: range.width_percent(),
            full_range: is_full_range_with_tolerance(
                range.tick_lower(),
                range.tick_upper(),
                tick_spacing,
                self.config.defaults.full_range_tolerance,
            ),
            lower_percent: formatted_price_percentage(
                tick_to_price(range.tick_lower()),
                current_price,
            ),
            upper_percent: formatted_price_percentage(
                tick_to_price(range.tick_upper()),
                current_price,
            ),
        })
    }

    /// The range bounds as human prices in the selected denomination, lowest first.
    pub fn display_prices(&self) -> Option<[f64; 2]> {
        let range = self.state.range?;
        let adjustment = self.decimals_adjustment()?;
        let prices_in_token0 = self.state.prices_in_token0;
        let [lower, upper] = range
            .ticks()
            .map(|tick| tick_to_display_price(tick, adjustment, prices_in_token0));
        Some(if prices_in_token0 {
            [lower, upper]
        } else {
            [upper, lower]
        })
    }

    fn decimals_adjustment(&self) -> Option<f64> {
        let pair = self.pair()?;
        Some(decimals_adjustment(
            self.decimals(pair.token0)?,
            self.decimals(pair.token1)?,
        ))
    }

    /// The pool lookup for the current pair.
    pub fn pools_query(&self) -> Option<PoolsQuery> {
        Some(PoolsQuery {
            chain_id: self.state.destination_chain_id,
            pair: self.pair()?,
        })
    }

    pub fn positions_query(&self) -> Option<PositionsQuery> {
        Some(PositionsQuery {
            chain_id: self.state.chain_id?,
            owner: self.state.owner?,
        })
    }

    pub fn balance_query(&self) -> Option<BalanceQuery> {
        Some(BalanceQuery {
            token: self.state.source_token?,
            owner: self.state.owner?,
        })
    }

    pub fn approval_query(&self) -> Option<ApprovalQuery> {
        Some(ApprovalQuery {
            source: self.source()?,
            owner: self.state.owner?,
            router: self.config.defaults.router,
        })
    }

    /// The reads of the current selection that go stale while the session is open.
    pub fn refresh_queries(&self) -> RefreshQueries {
        RefreshQueries {
            balance: self.balance_query(),
            approval: self.approval_query(),
            pools: self.pools_query(),
        }
    }

    /// The bridge pool lookup, only needed for cross-chain migrations.
    pub fn bridge_route_query(&self) -> Option<BridgeRouteQuery> {
        if !self.is_cross_chain() {
            return None;
        }
        Some(BridgeRouteQuery {
            chain_id_in: self.state.chain_id?,
            chain_id_out: self.state.destination_chain_id,
        })
    }

    /// The pricing request of the current bundle. `None` unless the bundle is ready, so the
    /// execution service is never asked to price a partial bundle.
    pub fn quote_query(&self) -> Option<QuoteQuery<E>> {
        let request = self.request();
        let bundle = match build_bundle(&request) {
            Ok(BundleState::Ready(bundle)) => bundle,
            Ok(BundleState::NotReady(reason)) => {
                debug!(?reason, "quote not requested");
                return None;
            }
            Err(err) => {
                warn!(%err, "malformed bundle declined");
                return None;
            }
        };
        Some(QuoteQuery {
            execution: Arc::clone(&self.execution),
            generation: self.generation,
            params: bundle.params(),
            actions: bundle.actions().to_vec(),
            request,
        })
    }

    /// The approval the user must send before migrating, if one is required.
    pub fn approval_call(&self) -> Option<ApprovalCall> {
        if self.approval_state() != ApprovalState::Required {
            return None;
        }
        let router = self.config.defaults.router;
        match self.source()? {
            MigrationSource::Token { address, amount } => {
                Some(token_approval(self.token(address)?, router, amount))
            }
            MigrationSource::Position {
                token_id,
                position_manager,
                ..
            } => Some(nft_approval(position_manager, router, token_id)),
        }
    }

    /// The migration transaction, once enabled and quoted.
    pub fn migration_call(&self) -> Option<ContractCall> {
        if !self.migrate_enabled() {
            return None;
        }
        self.quote().map(|quote| quote.tx.clone().into())
    }

    fn notify(&mut self, notification: Notification) {
        debug!(title = %notification.title, "notification");
        self.notifications.push(notification);
    }

    fn reset_source(&mut self) {
        self.state.source_token = None;
        self.state.source_amount = None;
        self.state.source_position = None;
    }

    fn reset_pools(&mut self) {
        self.state.pools = None;
        self.state.selected_pool = None;
        if self.config.ticks.is_none() {
            self.state.range = None;
        }
    }

    fn pools_loaded(&mut self, chain_id: ChainId, pair: TokenPair, pools: Vec<IndexedPool>) {
        if chain_id != self.state.destination_chain_id
            || self.pair().map(|pair| pair.tokens()) != Some(pair.tokens())
        {
            debug!(chain_id, ?pair, "stale pools ignored");
            return;
        }
        let pools: Vec<_> = pools
            .into_iter()
            .filter(|pool| pool.matches_pair(&pair))
            .collect();
        // A refresh keeps the selected fee tier without recomputing the range.
        let refreshed = self
            .state
            .selected_pool
            .as_ref()
            .map(|selected| pool_for_fee(&pools, selected.fee_tier).cloned());
        let locked = self
            .config
            .pool_fee_grade
            .map(|fee| pool_for_fee(&pools, fee).cloned());
        self.state.pools = Some(pools);
        match (refreshed, locked) {
            (Some(Some(pool)), _) => self.state.selected_pool = Some(pool),
            (Some(None), _) => {
                debug!("selected pool disappeared");
                self.reset_selected_pool();
            }
            (None, Some(Some(pool))) => self.select_pool(pool),
            (None, _) => {}
        }
    }

    fn reset_selected_pool(&mut self) {
        self.state.selected_pool = None;
        if self.config.ticks.is_none() {
            self.state.range = None;
        }
    }

    fn select_pool(&mut self, pool: IndexedPool) {
        let previous = self.state.selected_pool.replace(pool);
        if self.config.ticks.is_some() {
            return;
        }
        if previous.is_none() {
            self.state.range_mode = RangeMode::Preset(RangeSelector::FullRange);
        }
        self.apply_range_mode();
    }

    fn apply_range_mode(&mut self) {
        let Some(pool) = &self.state.selected_pool else {
            return;
        };
        let tick_spacing = pool.tick_spacing();
        match self.state.range_mode {
            RangeMode::Preset(selector) => {
                match compute_range(selector, pool.current_tick(), tick_spacing) {
                    Some(range) => self.state.range = Some(range),
                    None => debug!(?selector, pool = %pool.id, "range not computable"),
                }
            }
            RangeMode::Custom => {
                self.state.range = self.state.range.map(|range| range.realign(tick_spacing));
            }
        }
    }

    /// Whether a displayed bound maps to the lower tick. Inverted display prices swap the tick
    /// order.
    #[inline]
    fn is_lower_tick(&self, bound: Bound) -> bool {
        (bound == Bound::Lower) == self.state.prices_in_token0
    }

    fn range_from_price(&self, bound: Bound, input: &str) -> Option<PriceRange> {
        let range = self.state.range?;
        let tick_spacing = self.tick_spacing()?;
        let lower = self.is_lower_tick(bound);
        let tick = display_price_to_tick(
            input,
            self.decimals_adjustment()?,
            self.state.prices_in_token0,
            tick_spacing,
            !lower,
        )?;
        if lower {
            PriceRange::new(tick, range.tick_upper()).ok()
        } else {
            PriceRange::new(range.tick_lower(), tick).ok()
        }
    }

    fn nudged_range(&self, bound: Bound, steps: i32) -> Option<PriceRange> {
        let range = self.state.range?;
        let tick_spacing = self.tick_spacing()?;
        // Raising a displayed price lowers the tick when prices are inverted.
        let steps = if self.state.prices_in_token0 {
            steps
        } else {
            steps.checked_neg()?
        };
        if self.is_lower_tick(bound) {
            range.nudge_lower(steps, tick_spacing)
        } else {
            range.nudge_upper(steps, tick_spacing)
        }
    }

    fn transaction_confirmed(&mut self, kind: TransactionKind, hash: B256, success: bool) {
        if !success {
            self.notify(Notification::new(
                NotificationKind::Error,
                "Transaction reverted",
                format!("Transaction {hash} failed"),
            ));
            return;
        }
        match kind {
            TransactionKind::Approval => {
                if let (Some(source), Some(owner)) = (self.source(), self.state.owner) {
                    self.approval = Some((source, owner, ApprovalState::Satisfied));
                }
                self.notify(Notification::new(
                    NotificationKind::Success,
                    "Approval confirmed",
                    format!("Transaction {hash}"),
                ));
            }
            TransactionKind::Migration => {
                let cross_chain = self.is_cross_chain();
                if let Some(position) = self.state.source_position.take() {
                    self.state
                        .positions
                        .retain(|held| held.token_id != position.token_id);
                }
                self.state.source_amount = None;
                self.quote = None;
                self.approval = None;
                if cross_chain {
                    self.state.bridge_hash = Some(hash);
                    self.notify(BridgeStatus::default().notification());
                } else {
                    self.notify(Notification::new(
                        NotificationKind::Success,
                        "Migration complete",
                        format!("Transaction {hash}"),
                    ));
                }
            }
        }
    }
}

/// Maps the pool key's native placeholder back to the execution service's.
#[inline]
fn execution_token(token: Address) -> Address {
    if token == NULL_ADDRESS {
        NATIVE_TOKEN
    } else {
        token
    }
}

/// Queries re-run by [`poll_session`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshQueries {
    pub balance: Option<BalanceQuery>,
    pub approval: Option<ApprovalQuery>,
    pub pools: Option<PoolsQuery>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolsQuery {
    pub chain_id: ChainId,
    pub pair: TokenPair,
}

impl PoolsQuery {
    pub async fn run<I: Indexer>(self, indexer: &I) -> SessionEvent {
        match indexer.pools(self.chain_id, self.pair).await {
            Ok(pools) => SessionEvent::PoolsLoaded {
                chain_id: self.chain_id,
                pair: self.pair,
                pools,
            },
            Err(err) => {
                warn!(chain_id = self.chain_id, %err, "pool lookup failed");
                SessionEvent::Failed(Notification::error("Failed to load pools", &err))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionsQuery {
    pub chain_id: ChainId,
    pub owner: Address,
}

impl PositionsQuery {
    pub async fn run<I: Indexer>(self, indexer: &I) -> SessionEvent {
        match indexer.positions(self.chain_id, self.owner).await {
            Ok(positions) => SessionEvent::PositionsLoaded {
                chain_id: self.chain_id,
                owner: self.owner,
                positions,
            },
            Err(err) => {
                warn!(chain_id = self.chain_id, %err, "position lookup failed");
                SessionEvent::Failed(Notification::error("Failed to load positions", &err))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceQuery {
    pub token: Address,
    pub owner: Address,
}

impl BalanceQuery {
    pub async fn run<C: ChainClient>(self, client: &C) -> SessionEvent {
        match client.read_balance(self.token, self.owner).await {
            Ok(balance) => SessionEvent::BalanceLoaded {
                token: self.token,
                owner: self.owner,
                balance,
            },
            Err(err) => {
                warn!(token = %self.token, %err, "balance read failed");
                SessionEvent::Failed(Notification::error("Failed to read balance", &err))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalQuery {
    pub source: MigrationSource,
    pub owner: Address,
    pub router: Address,
}

impl ApprovalQuery {
    pub async fn run<C: ChainClient>(self, client: &C) -> SessionEvent {
        match check_approval(client, &self.source, self.owner, self.router).await {
            Ok(state) => SessionEvent::ApprovalLoaded {
                source: self.source,
                owner: self.owner,
                state,
            },
            Err(err) => {
                warn!(%err, "approval read failed");
                SessionEvent::Failed(Notification::error("Failed to read approval", &err))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BridgeRouteQuery {
    pub chain_id_in: ChainId,
    pub chain_id_out: ChainId,
}

impl BridgeRouteQuery {
    pub async fn run<B: BridgeMetadataService>(self, service: &B) -> SessionEvent {
        match service.bridge_pools().await {
            Ok(pools) => SessionEvent::BridgeRouteLoaded {
                chain_id_in: self.chain_id_in,
                chain_id_out: self.chain_id_out,
                route: resolve_bridge_route(&pools, self.chain_id_in, self.chain_id_out),
            },
            Err(err) => {
                warn!(%err, "bridge pool lookup failed");
                SessionEvent::Failed(Notification::error("Failed to load bridge pools", &err))
            }
        }
    }
}

/// A pricing request bound to the execution client it was created with.
#[derive(Debug)]
pub struct QuoteQuery<E> {
    execution: Arc<E>,
    generation: u64,
    pub params: BundleParams,
    pub actions: Vec<BundleAction>,
    pub request: MigrationRequest,
}

impl<E: ExecutionService> QuoteQuery<E> {
    pub async fn run(self) -> SessionEvent {
        match self.execution.bundle(self.params, &self.actions).await {
            Ok(quote) => SessionEvent::QuoteLoaded {
                generation: self.generation,
                request: self.request,
                quote,
            },
            Err(err) => {
                warn!(%err, "bundle pricing failed");
                SessionEvent::Failed(Notification::error("Failed to price migration", &err))
            }
        }
    }
}

/// Sends a transaction and waits for its receipt.
pub async fn send_transaction<C: ChainClient>(
    client: &C,
    call: ContractCall,
    kind: TransactionKind,
) -> SessionEvent {
    let title = match kind {
        TransactionKind::Approval => "Approval failed",
        TransactionKind::Migration => "Migration failed",
    };
    let hash = match client.write_contract(call).await {
        Ok(hash) => hash,
        Err(err) => {
            warn!(?kind, %err, "transaction rejected");
            return SessionEvent::Failed(Notification::error(title, &err));
        }
    };
    debug!(?kind, %hash, "transaction sent");
    match client.wait_for_receipt(hash).await {
        Ok(success) => SessionEvent::TransactionConfirmed {
            kind,
            hash,
            success,
        },
        Err(err) => {
            warn!(?kind, %hash, %err, "receipt unavailable");
            SessionEvent::Failed(Notification::error(title, &err))
        }
    }
}
