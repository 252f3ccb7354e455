use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// A concentrated liquidity range with `tick_lower < tick_upper`, both within
/// [`MIN_TICK`]..=[`MAX_TICK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 2]", into = "[i32; 2]")]
pub struct PriceRange {
    tick_lower: i32,
    tick_upper: i32,
}

impl PriceRange {
    /// Constructs a range, rejecting an empty or out of bounds one.
    #[inline]
    pub fn new(tick_lower: i32, tick_upper: i32) -> Result<Self, Error> {
        check_tick(tick_lower)?;
        check_tick(tick_upper)?;
        if tick_lower >= tick_upper {
            return Err(Error::InvalidRange(tick_lower, tick_upper));
        }
        Ok(Self {
            tick_lower,
            tick_upper,
        })
    }

    /// Constructs a range from two ticks rounded to `tick_spacing`, widening the upper tick by one
    /// spacing if rounding collapsed the range.
    pub fn from_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Self {
        let tick_lower = round_tick_within_bounds(tick_lower, tick_spacing, false);
        let mut tick_upper = round_tick_within_bounds(tick_upper, tick_spacing, true);
        if tick_lower >= tick_upper {
            tick_upper = tick_lower + tick_spacing;
        }
        if tick_upper > MAX_TICK {
            return Self {
                tick_lower: tick_lower - tick_spacing,
                tick_upper: tick_lower,
            };
        }
        Self {
            tick_lower,
            tick_upper,
        }
    }

    #[inline]
    pub const fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    #[inline]
    pub const fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    #[inline]
    pub const fn ticks(&self) -> [i32; 2] {
        [self.tick_lower, self.tick_upper]
    }

    /// Whether both bounds are multiples of `tick_spacing`.
    #[inline]
    pub const fn is_aligned(&self, tick_spacing: i32) -> bool {
        self.tick_lower % tick_spacing == 0 && self.tick_upper % tick_spacing == 0
    }

    #[inline]
    pub fn width_percent(&self) -> f64 {
        calculate_range_width(self.tick_lower, self.tick_upper)
    }

    #[inline]
    pub fn is_full_range(&self, tick_spacing: i32) -> bool {
        is_full_range(self.tick_lower, self.tick_upper, tick_spacing)
    }

    /// Rounds the range outward to a new tick spacing.
    #[inline]
    pub fn realign(&self, tick_spacing: i32) -> Self {
        Self::from_ticks(self.tick_lower, self.tick_upper, tick_spacing)
    }

    /// Moves the lower bound by `steps` tick spacings. Returns `None` if the result would leave
    /// the tick bounds or empty the range.
    #[inline]
    pub fn nudge_lower(&self, steps: i32, tick_spacing: i32) -> Option<Self> {
        let tick_lower = steps
            .checked_mul(tick_spacing)
            .and_then(|delta| self.tick_lower.checked_add(delta))?;
        Self::new(tick_lower, self.tick_upper).ok()
    }

    /// Moves the upper bound by `steps` tick spacings. Returns `None` if the result would leave
    /// the tick bounds or empty the range.
    #[inline]
    pub fn nudge_upper(&self, steps: i32, tick_spacing: i32) -> Option<Self> {
        let tick_upper = steps
            .checked_mul(tick_spacing)
            .and_then(|delta| self.tick_upper.checked_add(delta))?;
        Self::new(self.tick_lower, tick_upper).ok()
    }
}

impl TryFrom<[i32; 2]> for PriceRange {
    type Error = Error;

    #[inline]
    fn try_from([tick_lower, tick_upper]: [i32; 2]) -> Result<Self, Self::Error> {
        Self::new(tick_lower, tick_upper)
    }
}

impl From<PriceRange> for [i32; 2] {
    #[inline]
    fn from(range: PriceRange) -> Self {
        range.ticks()
    }
}

/// A relative range choice that is resolved against a pool's current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeSelector {
    /// One tick spacing on either side of the current tick.
    TightAroundCurrent,
    /// A band of the given percentage around the current price.
    PercentBand(f64),
    /// The widest range the pool's tick spacing allows, minus one spacing on either side.
    FullRange,
}

impl RangeSelector {
    /// The presets offered next to the price inputs.
    pub const PRESETS: [(&'static str, Self); 6] = [
        ("MIN", Self::TightAroundCurrent),
        ("1%", Self::PercentBand(1.0)),
        ("5%", Self::PercentBand(5.0)),
        ("10%", Self::PercentBand(10.0)),
        ("20%", Self::PercentBand(20.0)),
        ("FULL", Self::FullRange),
    ];
}

/// Resolves a range selector against the current tick of a pool.
///
/// ## Arguments
///
/// * `selector`: the relative range to resolve
/// * `current_tick`: the pool's current tick, `None` if no pool is selected or it is uninitialized
/// * `tick_spacing`: the spacing of the pool's fee tier
///
/// Returns `None` when there is no current tick or the selector is not a valid band, in which case
/// the caller keeps its previous range.
pub fn compute_range(
    selector: RangeSelector,
    current_tick: Option<i32>,
    tick_spacing: i32,
) -> Option<PriceRange> {
    let current_tick = current_tick?;
    if tick_spacing <= 0 {
        return None;
    }
    let range = match selector {
        RangeSelector::TightAroundCurrent => PriceRange::from_ticks(
            current_tick - tick_spacing,
            current_tick + tick_spacing,
            tick_spacing,
        ),
        RangeSelector::PercentBand(percent) => {
            if !percent.is_finite() || percent <= 0.0 {
                return None;
            }
            let current_price = tick_to_price(current_tick);
            let min_price = current_price * (1.0 - percent / 100.0);
            let max_price = current_price * (1.0 + percent / 100.0);
            let tick_lower = if min_price > 0.0 {
                price_to_tick(min_price, tick_spacing, false)
            } else {
                round_tick_within_bounds(MIN_TICK, tick_spacing, false)
            };
            let tick_upper = price_to_tick(max_price, tick_spacing, true);
            PriceRange::from_ticks(tick_lower, tick_upper, tick_spacing)
        }
        RangeSelector::FullRange => PriceRange {
            tick_lower: round_tick(MIN_TICK + tick_spacing, tick_spacing, false),
            tick_upper: round_tick(MAX_TICK - tick_spacing, tick_spacing, true),
        },
    };
    Some(range)
}
