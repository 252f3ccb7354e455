mod tick_math;
pub use tick_math::*;

mod price_tick_conversions;
pub use price_tick_conversions::*;

mod token_ordering;
pub use token_ordering::*;

mod units;
pub use units::*;

mod types;
pub use types::*;
