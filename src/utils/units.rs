//! ## Decimal input
//! Parsing of user-typed decimal strings into floating point prices and base-unit token amounts.

use alloy_primitives::U256;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches any number of digits optionally followed by '.' which is then followed by at least
/// one digit.
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d*\.?\d+$").unwrap());

/// Parses a non-negative decimal string such as `"10.23"` or `".5"`.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let value = value.trim();
    if !DECIMAL.is_match(value) {
        return None;
    }
    value.parse().ok()
}

/// Converts a decimal string into base units of a token with `decimals` decimals.
///
/// Fractional digits beyond `decimals` are truncated. Returns `None` for malformed input or an
/// amount that does not fit in a [`U256`].
///
/// ## Examples
///
/// ```
/// use alloy_primitives::U256;
/// use uniswap_v4_migrator::prelude::parse_units;
///
/// assert_eq!(parse_units("1.5", 6), Some(U256::from(1_500_000)));
/// assert_eq!(parse_units("1,5", 6), None);
/// ```
pub fn parse_units(value: &str, decimals: u8) -> Option<U256> {
    let value = value.trim();
    if !DECIMAL.is_match(value) {
        return None;
    }
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let fraction = &fraction[..fraction.len().min(decimals as usize)];
    let digits = format!(
        "{whole}{fraction}{:0<width$}",
        "",
        width = decimals as usize - fraction.len()
    );
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).ok()
}

/// Formats a base-unit amount as a decimal string without trailing zeros.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
