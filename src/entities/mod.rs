pub mod pool;
pub mod position;
pub mod range;

pub use pool::{pool_for_fee, pools_by_fee_tier, IndexedPool, PoolToken};
pub use position::SourcePosition;
pub use range::{compute_range, PriceRange, RangeSelector};
