//! ## Price and tick conversions
//! Floating point conversions between [`i32`] ticks and raw `token1/token0` prices, plus the
//! percentage and range-width figures shown next to a price range.
//!
//! All prices here are raw pool prices (`1.0001^tick`), not adjusted for token decimals unless a
//! function says otherwise. Callers must round a tick to the pool's tick spacing before using it
//! as a position boundary.

use super::{
    parse_decimal, round_tick, round_tick_within_bounds, max_possible_tick, min_possible_tick,
    MAX_TICK, MIN_TICK,
};
use crate::constants::FULL_RANGE_TOLERANCE;

/// The price ratio between two adjacent ticks.
pub const TICK_BASE: f64 = 1.0001;

/// Raw ticks closer than this to an integer are treated as that integer before rounding, which
/// absorbs the error of `ln` and `powf` when a price was produced from an exact tick.
const TICK_SNAP_TOLERANCE: f64 = 1e-6;

/// Returns the raw price `1.0001^tick`.
#[inline]
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powf(f64::from(tick))
}

/// Converts a raw price to a tick that is a multiple of `tick_spacing`.
///
/// ## Arguments
///
/// * `price`: the raw `token1/token0` price
/// * `tick_spacing`: the spacing of the pool
/// * `round_up`: returns the smallest usable tick whose price is at least `price` if true, the
///   largest usable tick whose price is at most `price` otherwise
///
/// Returns 0 when `price` is not a positive number. A price that corresponds exactly to a multiple
/// of `tick_spacing` maps to that tick in both rounding directions.
pub fn price_to_tick(price: f64, tick_spacing: i32, round_up: bool) -> i32 {
    if price.is_nan() || price <= 0.0 {
        return 0;
    }
    let raw = price.ln() / TICK_BASE.ln();
    let nearest = raw.round();
    let raw = if (raw - nearest).abs() < TICK_SNAP_TOLERANCE {
        nearest
    } else {
        raw
    };
    let tick = if round_up { raw.ceil() } else { raw.floor() };
    let tick = tick.clamp(f64::from(MIN_TICK), f64::from(MAX_TICK)) as i32;
    round_tick_within_bounds(tick, tick_spacing, round_up)
}

/// Returns how far `price` is from `current_price`, in percent, or `None` without a usable
/// current price.
#[inline]
pub fn calculate_price_percentage(price: f64, current_price: f64) -> Option<f64> {
    if current_price == 0.0 || current_price.is_nan() {
        return None;
    }
    Some((price / current_price - 1.0) * 100.0)
}

/// Formats a percentage with an explicit sign and two decimals, clamped to `[-100, 1000]`.
pub fn format_price_percentage(percent: Option<f64>) -> String {
    let Some(percent) = percent else {
        return String::new();
    };
    let limited = percent.clamp(-100.0, 1000.0);
    let sign = if limited > 0.0 { "+" } else { "" };
    format!("{sign}{limited:.2}%")
}

/// The label shown next to a price input; empty when the price equals the current price.
pub fn formatted_price_percentage(price: f64, current_price: f64) -> String {
    match calculate_price_percentage(price, current_price) {
        Some(percent) if percent != 0.0 => format_price_percentage(Some(percent)),
        _ => String::new(),
    }
}

/// The width of a tick range in percent of its midpoint price.
///
/// Callers must pass `tick_lower <= tick_upper`; swapping the arguments negates the result.
#[inline]
pub fn calculate_range_width(tick_lower: i32, tick_upper: i32) -> f64 {
    let price_lower = tick_to_price(tick_lower);
    let price_upper = tick_to_price(tick_upper);
    (price_upper - price_lower) / ((price_lower + price_upper) / 2.0) * 100.0
}

/// Whether a range is close enough to the protocol bounds to be shown as a full range.
///
/// Uses a tolerance of [`FULL_RANGE_TOLERANCE`] tick spacings.
#[inline]
pub fn is_full_range(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> bool {
    is_full_range_with_tolerance(tick_lower, tick_upper, tick_spacing, FULL_RANGE_TOLERANCE)
}

/// Same as [`is_full_range`] with a custom tolerance, in tick spacings.
pub fn is_full_range_with_tolerance(
    tick_lower: i32,
    tick_upper: i32,
    tick_spacing: i32,
    tolerance: i32,
) -> bool {
    tick_lower <= min_possible_tick(tick_spacing) + tick_spacing * tolerance
        && tick_upper >= max_possible_tick(tick_spacing) - tick_spacing * tolerance
}

/// The factor that turns a raw price into a human price, `10^(decimals0 - decimals1)`.
#[inline]
pub fn decimals_adjustment(decimals0: u8, decimals1: u8) -> f64 {
    10f64.powi(i32::from(decimals0) - i32::from(decimals1))
}

/// Returns the human price of a tick, quoted in token1 per token0 if `prices_in_token0`, in
/// token0 per token1 otherwise.
#[inline]
pub fn tick_to_display_price(tick: i32, adjustment: f64, prices_in_token0: bool) -> f64 {
    let price = tick_to_price(tick) * adjustment;
    if prices_in_token0 {
        price
    } else {
        1.0 / price
    }
}

/// Parses a typed human price back into a usable tick.
///
/// Returns `None` for input that is not a positive decimal number, leaving the caller's previous
/// tick untouched.
pub fn display_price_to_tick(
    input: &str,
    adjustment: f64,
    prices_in_token0: bool,
    tick_spacing: i32,
    round_up: bool,
) -> Option<i32> {
    let price = parse_decimal(input)?;
    let price = if prices_in_token0 { price } else { 1.0 / price };
    let raw_price = price / adjustment;
    if !raw_price.is_finite() || raw_price <= 0.0 {
        return None;
    }
    Some(price_to_tick(raw_price, tick_spacing, round_up))
}

/// Rounds a tick range outward to a tick spacing.
#[inline]
pub fn widen_to_spacing(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> (i32, i32) {
    (
        round_tick(tick_lower, tick_spacing, false),
        round_tick(tick_upper, tick_spacing, true),
    )
}
