//! ## Migration bundle
//! Builds the ordered action list that moves a V3 position or a token balance into a V4 position,
//! bridging through a transport asset when the destination is on another chain.

use crate::prelude::*;
use alloy_primitives::{Address, ChainId, U256};
use derive_more::Deref;
use serde::Serialize;
use tracing::debug;

/// The input of a migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationSource {
    /// A token balance, with `amount` in the token's base units.
    Token { address: Address, amount: U256 },
    /// A V3 position whose entire liquidity is redeemed.
    Position {
        token_id: U256,
        liquidity: u128,
        token0: Address,
        token1: Address,
        position_manager: Address,
    },
}

impl MigrationSource {
    /// The source of migrating a whole indexed position.
    #[inline]
    pub fn from_position(position: &SourcePosition) -> Result<Self, Error> {
        Ok(Self::Position {
            token_id: position.token_id,
            liquidity: position.liquidity,
            token0: position.token0.address,
            token1: position.token1.address,
            position_manager: position.position_manager()?,
        })
    }
}

/// The destination of a migration. Unset fields keep the bundle from being ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationTarget {
    pub chain_id_in: ChainId,
    pub chain_id_out: Option<ChainId>,
    pub token0: Option<Address>,
    pub token1: Option<Address>,
    pub pool_fee: Option<u32>,
    pub range: Option<PriceRange>,
    pub receiver: Option<Address>,
}

/// Fee and slippage settings, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundleOptions {
    /// Bounds every guarded step independently.
    pub slippage_bps: u16,
    /// Taken by the protocol from the input before any split or bridge.
    pub fee_bps: u16,
}

impl Default for BundleOptions {
    #[inline]
    fn default() -> Self {
        Self {
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            fee_bps: DEFAULT_FEE_BPS,
        }
    }
}

/// The asset moved across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAsset {
    Eth,
    Usdc,
}

impl TransportAsset {
    /// Native ETH if both chains use ETH as their gas asset, USDC otherwise.
    #[inline]
    pub fn for_route(chain_id_in: ChainId, chain_id_out: ChainId) -> Self {
        if is_native_eth_chain(chain_id_in) && is_native_eth_chain(chain_id_out) {
            Self::Eth
        } else {
            Self::Usdc
        }
    }

    /// The symbol matched against bridge pool tokens.
    #[inline]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Usdc => "USDC",
        }
    }
}

/// The bridge pools resolved for a cross-chain migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BridgeRoute {
    pub asset: TransportAsset,
    /// The bridge pool on the source chain.
    pub source_pool: Address,
    /// The transport asset on the source chain.
    pub source_token: Address,
    /// The transport asset on the destination chain.
    pub destination_token: Address,
}

/// Everything needed to build a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationRequest {
    pub source: Option<MigrationSource>,
    pub target: MigrationTarget,
    pub options: BundleOptions,
    /// Required when the destination chain differs from the source chain.
    pub bridge: Option<BridgeRoute>,
}

/// Why a request cannot be priced yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotReadyReason {
    MissingSource,
    ZeroAmount,
    ZeroLiquidity,
    MissingDestinationChain,
    MissingReceiver,
    MissingTokens,
    MissingPoolFee,
    MissingRange,
    /// The destination chain has no V4 position manager.
    UnsupportedDestination(ChainId),
    /// A cross-chain request whose bridge pools are not resolved yet.
    MissingBridgeRoute,
}

/// The outcome of building a bundle. Not being ready is an expected state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleState {
    Ready(MigrationBundle),
    NotReady(NotReadyReason),
}

impl BundleState {
    #[inline]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[inline]
    pub const fn bundle(&self) -> Option<&MigrationBundle> {
        match self {
            Self::Ready(bundle) => Some(bundle),
            Self::NotReady(_) => None,
        }
    }
}

/// The parameters the execution service prices a bundle with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleParams {
    pub chain_id: ChainId,
    pub from_address: Address,
    pub spender: Address,
}

/// An ordered list of actions, ready to be priced by the execution service.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct MigrationBundle {
    #[deref]
    actions: Vec<BundleAction>,
    chain_id: ChainId,
    destination_chain_id: ChainId,
    receiver: Address,
}

impl MigrationBundle {
    #[inline]
    pub fn actions(&self) -> &[BundleAction] {
        &self.actions
    }

    /// The chain the bundle executes on.
    #[inline]
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[inline]
    pub const fn destination_chain_id(&self) -> ChainId {
        self.destination_chain_id
    }

    #[inline]
    pub const fn receiver(&self) -> Address {
        self.receiver
    }

    #[inline]
    pub const fn is_cross_chain(&self) -> bool {
        self.chain_id != self.destination_chain_id
    }

    /// The kinds of the top level actions, in order.
    #[inline]
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(BundleAction::kind).collect()
    }

    /// The actions executed on the destination chain after bridging.
    #[inline]
    pub fn callback(&self) -> Option<&[BundleAction]> {
        self.actions.iter().find_map(|action| match &action.args {
            ActionArgs::Bridge(args) => Some(args.callback.as_slice()),
            _ => None,
        })
    }

    /// The receiver executes the bundle and is also the spender.
    #[inline]
    pub const fn params(&self) -> BundleParams {
        BundleParams {
            chain_id: self.chain_id,
            from_address: self.receiver,
            spender: self.receiver,
        }
    }
}

/// The validated destination of a ready request.
struct Destination {
    chain_id: ChainId,
    tokens: [Address; 2],
    pool_fee: u32,
    range: PriceRange,
    receiver: Address,
    position_manager: Address,
}

fn check_ready(request: &MigrationRequest) -> Result<(&MigrationSource, Destination), NotReadyReason> {
    let source = request
        .source
        .as_ref()
        .ok_or(NotReadyReason::MissingSource)?;
    match source {
        MigrationSource::Token { amount, .. } if amount.is_zero() => {
            return Err(NotReadyReason::ZeroAmount)
        }
        MigrationSource::Position { liquidity: 0, .. } => return Err(NotReadyReason::ZeroLiquidity),
        _ => {}
    }
    let target = &request.target;
    let chain_id = target
        .chain_id_out
        .ok_or(NotReadyReason::MissingDestinationChain)?;
    let receiver = target.receiver.ok_or(NotReadyReason::MissingReceiver)?;
    let (Some(token0), Some(token1)) = (target.token0, target.token1) else {
        return Err(NotReadyReason::MissingTokens);
    };
    let pool_fee = target.pool_fee.ok_or(NotReadyReason::MissingPoolFee)?;
    let range = target.range.ok_or(NotReadyReason::MissingRange)?;
    let position_manager = v4_position_manager(chain_id)
        .map_err(|_| NotReadyReason::UnsupportedDestination(chain_id))?;
    Ok((
        source,
        Destination {
            chain_id,
            tokens: [token0, token1],
            pool_fee,
            range,
            receiver,
            position_manager,
        },
    ))
}

/// Appends the split, the slippage guards on both split outputs, the deposit and the slippage
/// guard on the deposit, funding the split with `amount_in` of `token_in`.
fn push_deposit(
    actions: &mut Vec<BundleAction>,
    token_in: Address,
    amount_in: AmountArg,
    destination: &Destination,
    slippage_bps: u16,
) {
    let split = actions.len();
    actions.push(BundleAction::split(
        token_in,
        amount_in,
        destination.tokens,
    ));
    let guard0 = actions.len();
    actions.push(BundleAction::slippage(
        AmountArg::output_at(split, 0),
        slippage_bps,
    ));
    let guard1 = actions.len();
    actions.push(BundleAction::slippage(
        AmountArg::output_at(split, 1),
        slippage_bps,
    ));
    let deposit = actions.len();
    actions.push(BundleAction::deposit(
        destination.position_manager,
        destination.range,
        destination.tokens,
        destination.pool_fee,
        [AmountArg::output_of(guard0), AmountArg::output_of(guard1)],
    ));
    actions.push(BundleAction::slippage(
        AmountArg::output_of(deposit),
        slippage_bps,
    ));
}

/// Appends the redeem of a position, the merge of both redeemed tokens into `token_out` and the
/// slippage guard on the merge. Returns the index of the guard.
fn push_redeem_and_merge(
    actions: &mut Vec<BundleAction>,
    source: &MigrationSource,
    token_out: Address,
    slippage_bps: u16,
) -> Option<usize> {
    let MigrationSource::Position {
        token_id,
        liquidity,
        token0,
        token1,
        position_manager,
    } = *source
    else {
        return None;
    };
    let redeem = actions.len();
    actions.push(BundleAction::redeem(
        position_manager,
        token_id,
        liquidity,
        [token0, token1],
    ));
    let merge = actions.len();
    actions.push(BundleAction::merge(
        [token0, token1],
        [
            AmountArg::output_at(redeem, 0),
            AmountArg::output_at(redeem, 1),
        ],
        token_out,
    ));
    let guard = actions.len();
    actions.push(BundleAction::slippage(
        AmountArg::output_of(merge),
        slippage_bps,
    ));
    Some(guard)
}

fn same_chain_actions(
    source: &MigrationSource,
    destination: &Destination,
    options: BundleOptions,
) -> Vec<BundleAction> {
    let mut actions = Vec::with_capacity(9);
    let (token_in, amount_in) = match *source {
        MigrationSource::Token { address, amount } => (address, AmountArg::Literal(amount)),
        MigrationSource::Position { .. } => {
            let token_in = destination.tokens[0];
            let guard =
                push_redeem_and_merge(&mut actions, source, token_in, options.slippage_bps);
            (token_in, guard.map_or(AmountArg::Literal(U256::ZERO), AmountArg::output_of))
        }
    };
    let fee = actions.len();
    actions.push(BundleAction::fee(token_in, amount_in, options.fee_bps));
    push_deposit(
        &mut actions,
        token_in,
        AmountArg::output_of(fee),
        destination,
        options.slippage_bps,
    );
    actions
}

fn cross_chain_actions(
    source: &MigrationSource,
    destination: &Destination,
    bridge: &BridgeRoute,
    options: BundleOptions,
) -> Vec<BundleAction> {
    let mut actions = Vec::with_capacity(6);
    let bridge_amount = match *source {
        MigrationSource::Position { .. } => push_redeem_and_merge(
            &mut actions,
            source,
            bridge.source_token,
            options.slippage_bps,
        )
        .map_or(AmountArg::Literal(U256::ZERO), AmountArg::output_of),
        MigrationSource::Token { address, amount } if address == bridge.source_token => {
            AmountArg::Literal(amount)
        }
        MigrationSource::Token { address, amount } => {
            let route = actions.len();
            actions.push(BundleAction::route(
                address,
                AmountArg::Literal(amount),
                bridge.source_token,
            ));
            AmountArg::output_of(route)
        }
    };
    actions.push(BundleAction::fee(
        bridge.source_token,
        bridge_amount,
        options.fee_bps,
    ));

    let mut callback = Vec::with_capacity(6);
    callback.push(BundleAction::balance(bridge.destination_token));
    push_deposit(
        &mut callback,
        bridge.destination_token,
        AmountArg::output_of(0),
        destination,
        options.slippage_bps,
    );

    actions.push(BundleAction::bridge(
        bridge.source_pool,
        destination.chain_id,
        bridge.source_token,
        bridge_amount,
        destination.receiver,
        callback,
    ));
    actions
}

/// Builds the migration bundle for a request.
///
/// Returns [`BundleState::NotReady`] while required inputs are missing, in which case the bundle
/// must not be sent for pricing. An `Err` means the built actions reference an output that does
/// not exist, which is a defect in this module and also fails a debug assertion.
///
/// ## Arguments
///
/// * `request`: the source, target, options and resolved bridge route of the migration
///
/// ## Examples
///
/// ```
/// use alloy_primitives::{address, U256};
/// use uniswap_v4_migrator::prelude::*;
///
/// const USDC: alloy_primitives::Address = address!("078d782b760474a361dda0af3839290b0ef57ad6");
/// const WETH: alloy_primitives::Address = address!("4200000000000000000000000000000000000006");
///
/// let request = MigrationRequest {
///     source: Some(MigrationSource::Token {
///         address: USDC,
///         amount: U256::from(1_000_000),
///     }),
///     target: MigrationTarget {
///         chain_id_in: 130,
///         chain_id_out: Some(130),
///         token0: Some(USDC),
///         token1: Some(WETH),
///         pool_fee: Some(3000),
///         range: Some(PriceRange::new(-60, 60).unwrap()),
///         receiver: Some(address!("0000000000000000000000000000000000000001")),
///     },
///     ..Default::default()
/// };
/// let BundleState::Ready(bundle) = build_bundle(&request).unwrap() else {
///     panic!("bundle should be ready");
/// };
/// assert_eq!(bundle.len(), 6);
/// ```
pub fn build_bundle(request: &MigrationRequest) -> Result<BundleState, Error> {
    let (source, destination) = match check_ready(request) {
        Ok(ready) => ready,
        Err(reason) => {
            debug!(?reason, "migration bundle not ready");
            return Ok(BundleState::NotReady(reason));
        }
    };
    let chain_id = request.target.chain_id_in;
    let actions = if chain_id == destination.chain_id {
        same_chain_actions(source, &destination, request.options)
    } else {
        let Some(bridge) = request.bridge.as_ref() else {
            debug!(
                chain_id,
                destination_chain_id = destination.chain_id,
                "bridge route not resolved"
            );
            return Ok(BundleState::NotReady(NotReadyReason::MissingBridgeRoute));
        };
        cross_chain_actions(source, &destination, bridge, request.options)
    };
    let validated = validate_references(&actions);
    debug_assert!(validated.is_ok(), "invalid migration bundle: {validated:?}");
    validated?;
    Ok(BundleState::Ready(MigrationBundle {
        actions,
        chain_id,
        destination_chain_id: destination.chain_id,
        receiver: destination.receiver,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use ActionKind::*;

    fn ready(request: &MigrationRequest) -> MigrationBundle {
        match build_bundle(request).unwrap() {
            BundleState::Ready(bundle) => bundle,
            BundleState::NotReady(reason) => panic!("not ready: {reason:?}"),
        }
    }

    fn not_ready(request: &MigrationRequest) -> NotReadyReason {
        match build_bundle(request).unwrap() {
            BundleState::Ready(_) => panic!("unexpectedly ready"),
            BundleState::NotReady(reason) => reason,
        }
    }

    fn references(actions: &[BundleAction]) -> Vec<Vec<(usize, Option<usize>)>> {
        actions
            .iter()
            .map(|action| {
                action
                    .args
                    .amounts()
                    .iter()
                    .filter_map(AmountArg::reference)
                    .collect()
            })
            .collect()
    }

    fn assert_backward(actions: &[BundleAction]) {
        for (position, refs) in references(actions).into_iter().enumerate() {
            for (target, _) in refs {
                assert!(target < position, "action {position} references {target}");
            }
        }
    }

    #[test]
    fn zero_amount_is_not_ready() {
        let request = token_request(UNICHAIN_USDC, "0", UNICHAIN);
        assert_eq!(not_ready(&request), NotReadyReason::ZeroAmount);
    }

    #[test]
    fn nonzero_amount_is_ready() {
        let request = token_request(UNICHAIN_USDC, "1000000", UNICHAIN);
        assert!(build_bundle(&request).unwrap().is_ready());
    }

    #[test]
    fn missing_fields_are_not_ready() {
        let complete = token_request(UNICHAIN_USDC, "1000000", UNICHAIN);

        let mut request = complete.clone();
        request.source = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingSource);

        let mut request = complete.clone();
        request.target.chain_id_out = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingDestinationChain);

        let mut request = complete.clone();
        request.target.receiver = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingReceiver);

        let mut request = complete.clone();
        request.target.token1 = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingTokens);

        let mut request = complete.clone();
        request.target.pool_fee = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingPoolFee);

        let mut request = complete.clone();
        request.target.range = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingRange);

        let mut request = complete;
        request.target.chain_id_in = 1;
        request.target.chain_id_out = Some(1);
        assert_eq!(not_ready(&request), NotReadyReason::UnsupportedDestination(1));
    }

    #[test]
    fn position_without_liquidity_is_not_ready() {
        let mut request = position_request(UNICHAIN);
        if let Some(MigrationSource::Position { liquidity, .. }) = request.source.as_mut() {
            *liquidity = 0;
        }
        assert_eq!(not_ready(&request), NotReadyReason::ZeroLiquidity);
    }

    #[test]
    fn same_chain_token_sequence() {
        let request = token_request(UNICHAIN_USDC, "1000000", UNICHAIN);
        let bundle = ready(&request);
        assert!(!bundle.is_cross_chain());
        assert_eq!(
            bundle.kinds(),
            vec![Fee, Split, Slippage, Slippage, Deposit, Slippage]
        );
        assert_eq!(
            references(&bundle),
            vec![
                vec![],
                vec![(0, None)],
                vec![(1, Some(0))],
                vec![(1, Some(1))],
                vec![(2, None), (3, None)],
                vec![(4, None)],
            ]
        );
        assert_backward(&bundle);

        let ActionArgs::Fee(fee) = &bundle[0].args else {
            panic!("expected fee");
        };
        assert_eq!(fee.amount, AmountArg::Literal(U256::from(1_000_000)));
        assert_eq!(fee.bps, DEFAULT_FEE_BPS);

        let ActionArgs::Deposit(deposit) = &bundle[4].args else {
            panic!("expected deposit");
        };
        assert_eq!(deposit.ticks, [-60, 60]);
        assert_eq!(deposit.pool_fee, 3000);
        assert_eq!(deposit.token_in, [UNICHAIN_USDC, UNICHAIN_WETH]);
        assert_eq!(
            deposit.token_out,
            SupportedChain::Unichain.v4_position_manager().unwrap()
        );
    }

    #[test]
    fn every_slippage_guard_uses_slippage_bps() {
        let mut request = token_request(UNICHAIN_USDC, "1000000", UNICHAIN);
        request.options.slippage_bps = 75;
        let bundle = ready(&request);
        for action in bundle.iter() {
            if let ActionArgs::Slippage(args) = &action.args {
                assert_eq!(args.bps, 75);
            }
        }
    }

    #[test]
    fn same_chain_position_sequence() {
        let bundle = ready(&position_request(UNICHAIN));
        assert_eq!(
            bundle.kinds(),
            vec![Redeem, Merge, Slippage, Fee, Split, Slippage, Slippage, Deposit, Slippage]
        );
        assert_backward(&bundle);
        let ActionArgs::Merge(merge) = &bundle[1].args else {
            panic!("expected merge");
        };
        assert_eq!(merge.token_out, UNICHAIN_USDC);
        assert_eq!(
            merge.amount_in,
            [AmountArg::output_at(0, 0), AmountArg::output_at(0, 1)]
        );
        let ActionArgs::Fee(fee) = &bundle[3].args else {
            panic!("expected fee");
        };
        assert_eq!(fee.amount, AmountArg::output_of(2));
    }

    #[test]
    fn cross_chain_without_bridge_route_is_not_ready() {
        let mut request = token_request(POLYGON_USDC, "1000000", POLYGON);
        request.bridge = None;
        assert_eq!(not_ready(&request), NotReadyReason::MissingBridgeRoute);
    }

    #[test]
    fn cross_chain_transport_asset_input_skips_conversion() {
        let request = token_request(POLYGON_USDC, "1000000", POLYGON);
        let bundle = ready(&request);
        assert!(bundle.is_cross_chain());
        assert_eq!(bundle.kinds(), vec![Fee, Bridge]);

        let ActionArgs::Bridge(bridge) = &bundle[1].args else {
            panic!("expected bridge");
        };
        assert_eq!(bridge.amount_in, AmountArg::Literal(U256::from(1_000_000)));
        assert_eq!(bridge.destination_chain_id, UNICHAIN);
        assert_eq!(bridge.primary_address, POLYGON_USDC_POOL);
        assert_eq!(bridge.receiver, RECEIVER);
    }

    #[test]
    fn cross_chain_token_is_routed_into_transport_asset() {
        let request = token_request(POLYGON_WETH, "1000000000000000000", POLYGON);
        let bundle = ready(&request);
        assert_eq!(bundle.kinds(), vec![Route, Fee, Bridge]);
        assert_eq!(
            references(&bundle),
            vec![vec![], vec![(0, None)], vec![(0, None)]]
        );
        let ActionArgs::Route(route) = &bundle[0].args else {
            panic!("expected route");
        };
        assert_eq!(route.token_out, POLYGON_USDC);
    }

    #[test]
    fn cross_chain_position_sequence() {
        let bundle = ready(&position_request(POLYGON));
        assert_eq!(bundle.kinds(), vec![Redeem, Merge, Slippage, Fee, Bridge]);
        assert_backward(&bundle);

        let ActionArgs::Bridge(bridge) = &bundle[4].args else {
            panic!("expected bridge");
        };
        assert_eq!(bridge.amount_in, AmountArg::output_of(2));
        let ActionArgs::Fee(fee) = &bundle[3].args else {
            panic!("expected fee");
        };
        assert_eq!(fee.amount, AmountArg::output_of(2));
        assert_eq!(fee.token, POLYGON_USDC);
    }

    #[test]
    fn callback_sequence() {
        let bundle = ready(&position_request(POLYGON));
        let callback = bundle.callback().unwrap();
        let kinds: Vec<_> = callback.iter().map(BundleAction::kind).collect();
        assert_eq!(
            kinds,
            vec![Balance, Split, Slippage, Slippage, Deposit, Slippage]
        );
        assert_eq!(
            references(callback),
            vec![
                vec![],
                vec![(0, None)],
                vec![(1, Some(0))],
                vec![(1, Some(1))],
                vec![(2, None), (3, None)],
                vec![(4, None)],
            ]
        );
        let ActionArgs::Balance(balance) = &callback[0].args else {
            panic!("expected balance");
        };
        assert_eq!(balance.token, UNICHAIN_USDC);
    }

    #[test]
    fn params_use_receiver() {
        let bundle = ready(&token_request(POLYGON_USDC, "1000000", POLYGON));
        assert_eq!(
            bundle.params(),
            BundleParams {
                chain_id: POLYGON,
                from_address: RECEIVER,
                spender: RECEIVER,
            }
        );
    }

    #[test]
    fn transport_asset_by_route() {
        assert_eq!(TransportAsset::for_route(42161, 130), TransportAsset::Eth);
        assert_eq!(TransportAsset::for_route(1, 8453), TransportAsset::Eth);
        assert_eq!(TransportAsset::for_route(137, 130), TransportAsset::Usdc);
        assert_eq!(TransportAsset::for_route(130, 56), TransportAsset::Usdc);
        assert_eq!(TransportAsset::Usdc.symbol(), "USDC");
    }

    #[test]
    fn serialized_bundle_shape() {
        let bundle = ready(&token_request(POLYGON_USDC, "1000000", POLYGON));
        let value = serde_json::to_value(bundle.actions()).unwrap();
        assert_eq!(value[0]["action"], "ensofee");
        assert_eq!(value[1]["protocol"], "stargate");
        assert_eq!(value[1]["action"], "bridge");
        assert_eq!(value[1]["args"]["amountIn"], "1000000");
        assert_eq!(value[1]["args"]["destinationChainId"], 130);
        assert_eq!(value[1]["args"]["callback"][0]["action"], "balance");
        assert_eq!(
            value[1]["args"]["callback"][1]["args"]["amountIn"]["useOutputOfCallAt"],
            0
        );
    }
}
