use crate::prelude::*;
use alloy_primitives::{Address, ChainId, U256};
use serde::{Deserialize, Serialize};

/// An existing V3 liquidity position that can be migrated.
///
/// Positions are fetched read-only from the indexer and never mutated within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub token_id: U256,
    pub chain_id: ChainId,
    pub fee: u32,
    pub token0: PoolToken,
    pub token1: PoolToken,
    pub liquidity: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// The current tick of the position's pool, if the indexer knows it.
    pub pool_tick: Option<i32>,
}

impl SourcePosition {
    /// Whether the position still holds liquidity that can be redeemed.
    #[inline]
    pub const fn has_liquidity(&self) -> bool {
        self.liquidity > 0
    }

    /// Whether the pool's current tick lies within the position's range.
    #[inline]
    pub fn in_range(&self) -> Option<bool> {
        self.pool_tick
            .map(|tick| tick >= self.tick_lower && tick < self.tick_upper)
    }

    /// The V3 position manager holding the position NFT.
    #[inline]
    pub fn position_manager(&self) -> Result<Address, Error> {
        Ok(SupportedChain::try_from(self.chain_id)?.v3_position_manager())
    }

    /// A short label such as `USDC/WETH 0.05%`.
    #[inline]
    pub fn label(&self) -> String {
        format!(
            "{}/{} {:.2}%",
            self.token0.symbol,
            self.token1.symbol,
            f64::from(self.fee) / 10_000.0
        )
    }
}
