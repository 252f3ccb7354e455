use crate::prelude::*;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A token as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolToken {
    pub address: Address,
    pub symbol: String,
}

/// A destination pool as reported by the indexer.
///
/// Pools are read-only snapshots. A refresh produces a new list rather than updating pools in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPool {
    /// The pool id, a `bytes32` pool key hash for V4 pools.
    pub id: String,
    pub liquidity: u128,
    pub fee_tier: u32,
    /// The spacing reported by the indexer. Prefer [`IndexedPool::tick_spacing`], which derives
    /// the spacing from the fee tier.
    pub indexed_tick_spacing: i32,
    pub sqrt_price: U256,
    /// The current tick, absent for a pool that has not been initialized.
    pub tick: Option<i32>,
    #[serde(rename = "totalValueLockedUSD")]
    pub total_value_locked_usd: f64,
    pub token0: PoolToken,
    pub token1: PoolToken,
}

impl IndexedPool {
    #[inline]
    pub fn fee_amount(&self) -> Option<FeeAmount> {
        FeeAmount::try_from(self.fee_tier).ok()
    }

    /// The tick spacing of the pool's fee tier, [`DEFAULT_TICK_SPACING`] for an unknown tier.
    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        tick_spacing_for_fee(self.fee_tier)
    }

    #[inline]
    pub const fn current_tick(&self) -> Option<i32> {
        self.tick
    }

    /// The raw `token1/token0` price at the current tick.
    #[inline]
    pub fn current_price(&self) -> Option<f64> {
        self.tick.map(tick_to_price)
    }

    /// Whether the pool holds the given pair in either order.
    #[inline]
    pub fn matches_pair(&self, pair: &TokenPair) -> bool {
        let tokens = [self.token0.address, self.token1.address];
        tokens == pair.tokens() || tokens == [pair.token1, pair.token0]
    }

    /// The fee tier formatted as a percentage, e.g. `0.30%`.
    #[inline]
    pub fn fee_label(&self) -> String {
        format!("{:.2}%", f64::from(self.fee_tier) / 10_000.0)
    }
}

/// Returns the pool with the given fee tier, preferring the one with the highest TVL if the
/// indexer reports several.
pub fn pool_for_fee(pools: &[IndexedPool], fee_tier: u32) -> Option<&IndexedPool> {
    pools
        .iter()
        .filter(|pool| pool.fee_tier == fee_tier)
        .max_by(|a, b| a.total_value_locked_usd.total_cmp(&b.total_value_locked_usd))
}

/// Returns one pool per fee tier, ordered by ascending fee.
pub fn pools_by_fee_tier(pools: &[IndexedPool]) -> Vec<&IndexedPool> {
    let mut fee_tiers: Vec<u32> = pools.iter().map(|pool| pool.fee_tier).collect();
    fee_tiers.sort_unstable();
    fee_tiers.dedup();
    fee_tiers
        .into_iter()
        .filter_map(|fee_tier| pool_for_fee(pools, fee_tier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn spacing_from_fee_tier() {
        let pool = pool_with(3000, Some(-200_000), 10.0);
        assert_eq!(pool.fee_amount(), Some(FeeAmount::MEDIUM));
        assert_eq!(pool.tick_spacing(), 60);

        let pool = pool_with(2500, Some(0), 10.0);
        assert_eq!(pool.fee_amount(), None);
        assert_eq!(pool.tick_spacing(), DEFAULT_TICK_SPACING);
    }

    #[test]
    fn current_price_requires_tick() {
        assert_eq!(pool_with(500, None, 1.0).current_price(), None);
        assert_eq!(pool_with(500, Some(0), 1.0).current_price(), Some(1.0));
    }

    #[test]
    fn fee_label() {
        assert_eq!(pool_with(3000, None, 1.0).fee_label(), "0.30%");
        assert_eq!(pool_with(100, None, 1.0).fee_label(), "0.01%");
    }

    #[test]
    fn matches_pair_in_either_order() {
        let pool = pool_with(500, Some(0), 1.0);
        assert!(pool.matches_pair(&TokenPair::new(USDC, WETH)));
        assert!(pool.matches_pair(&TokenPair::new(WETH, USDC)));
        assert!(!pool.matches_pair(&TokenPair::new(WETH, DAI)));
    }

    #[test]
    fn one_pool_per_fee_tier() {
        let pools = vec![
            pool_with(3000, Some(0), 5.0),
            pool_with(500, Some(0), 2.0),
            pool_with(3000, Some(0), 50.0),
            pool_with(10000, Some(0), 1.5),
        ];
        let grouped = pools_by_fee_tier(&pools);
        let fees: Vec<_> = grouped.iter().map(|pool| pool.fee_tier).collect();
        assert_eq!(fees, vec![500, 3000, 10000]);
        assert_eq!(grouped[1].total_value_locked_usd, 50.0);
        assert!(pool_for_fee(&pools, 100).is_none());
    }
}
