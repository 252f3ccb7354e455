//! ## Tick Math
//! Integer tick bounds and rounding of ticks to a pool's tick spacing.

use crate::error::Error;
use num_integer::Integer;

/// The maximum tick of a Uniswap pool.
pub const MAX_TICK: i32 = 887272;
/// The minimum tick of a Uniswap pool.
pub const MIN_TICK: i32 = -MAX_TICK;

/// Returns the tick if it lies within [`MIN_TICK`] and [`MAX_TICK`].
#[inline]
pub fn check_tick(tick: i32) -> Result<i32, Error> {
    if tick < MIN_TICK || tick > MAX_TICK {
        Err(Error::InvalidTick(tick))
    } else {
        Ok(tick)
    }
}

/// Returns the tick spacing if it is strictly positive.
#[inline]
pub fn check_tick_spacing(tick_spacing: i32) -> Result<i32, Error> {
    if tick_spacing > 0 {
        Ok(tick_spacing)
    } else {
        Err(Error::InvalidTickSpacing(tick_spacing))
    }
}

/// Rounds a tick to a multiple of the tick spacing.
///
/// ## Arguments
///
/// * `tick`: the tick to round
/// * `tick_spacing`: the spacing of the pool
/// * `round_up`: rounds toward positive infinity if true, toward negative infinity otherwise
///
/// A tick that is already a multiple of `tick_spacing` is returned unchanged in both directions.
#[inline]
pub fn round_tick(tick: i32, tick_spacing: i32, round_up: bool) -> i32 {
    assert!(tick_spacing > 0, "TICK_SPACING");
    let (quotient, remainder) = tick.div_mod_floor(&tick_spacing);
    if round_up && remainder != 0 {
        (quotient + 1) * tick_spacing
    } else {
        quotient * tick_spacing
    }
}

/// Rounds a tick to the tick spacing, stepping back inside [`MIN_TICK`]..=[`MAX_TICK`] if the
/// rounding crossed a bound.
#[inline]
pub fn round_tick_within_bounds(tick: i32, tick_spacing: i32, round_up: bool) -> i32 {
    let rounded = round_tick(tick.clamp(MIN_TICK, MAX_TICK), tick_spacing, round_up);
    if rounded < MIN_TICK {
        rounded + tick_spacing
    } else if rounded > MAX_TICK {
        rounded - tick_spacing
    } else {
        rounded
    }
}

/// The lowest multiple of the tick spacing considered when detecting a full range.
#[inline]
pub fn min_possible_tick(tick_spacing: i32) -> i32 {
    round_tick(MIN_TICK, tick_spacing, false)
}

/// The highest multiple of the tick spacing considered when detecting a full range.
#[inline]
pub fn max_possible_tick(tick_spacing: i32) -> i32 {
    round_tick(MAX_TICK, tick_spacing, true)
}
