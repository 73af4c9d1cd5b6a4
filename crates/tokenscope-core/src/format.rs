//! Balance formatting.
//!
//! Raw balances are integers in the token's smallest unit. Formatting divides
//! by `10^decimals` with exact big-integer arithmetic and rounds half-up to
//! [`BALANCE_FRACTION_DIGITS`] places.

use alloy_primitives::U512;

use crate::config::{BALANCE_FRACTION_DIGITS, UNPARSEABLE_BALANCE};

/// Parse a raw balance given as hex (`0x…`) or decimal.
pub fn parse_raw_balance(raw: &str) -> Option<U512> {
    let raw = raw.trim();
    let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (raw, 10),
    };

    if digits.is_empty() {
        // "0x" is how some nodes encode zero
        return (radix == 16).then_some(U512::ZERO);
    }

    U512::from_str_radix(digits, radix).ok()
}

/// `10^exp`, or `None` if it does not fit.
fn pow10(exp: u32) -> Option<U512> {
    let ten = U512::from(10u64);
    (0..exp).try_fold(U512::from(1u64), |acc, _| acc.checked_mul(ten))
}

/// Format a raw balance for display, e.g. `("0x0f4240", 6)` -> `"1.0000"`.
///
/// Unparseable input renders as [`UNPARSEABLE_BALANCE`].
pub fn format_balance(raw: &str, decimals: u32) -> String {
    let Some(value) = parse_raw_balance(raw) else {
        return UNPARSEABLE_BALANCE.to_string();
    };

    let Some(precision) = pow10(BALANCE_FRACTION_DIGITS) else {
        return UNPARSEABLE_BALANCE.to_string();
    };

    // Anything divided by a power of ten too large for U512 rounds to zero.
    let scaled = match pow10(decimals) {
        Some(divisor) => value
            .checked_mul(precision)
            .map(|v| (v + divisor / U512::from(2u64)) / divisor),
        None => Some(U512::ZERO),
    };

    let Some(scaled) = scaled else {
        return UNPARSEABLE_BALANCE.to_string();
    };

    let whole = scaled / precision;
    let fraction = (scaled % precision).to_string();
    format!(
        "{}.{:0>width$}",
        whole,
        fraction,
        width = BALANCE_FRACTION_DIGITS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_balance() {
        assert_eq!(parse_raw_balance("0x0f4240"), Some(U512::from(1_000_000u64)));
        assert_eq!(parse_raw_balance("1000000"), Some(U512::from(1_000_000u64)));
        assert_eq!(parse_raw_balance("0x"), Some(U512::ZERO));
        assert_eq!(parse_raw_balance(""), None);
        assert_eq!(parse_raw_balance("0xzz"), None);
        assert_eq!(parse_raw_balance("-5"), None);
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance("0x0f4240", 6), "1.0000");
        assert_eq!(format_balance("1234567", 6), "1.2346");
        assert_eq!(format_balance("1500000000000000000", 18), "1.5000");
        assert_eq!(format_balance("0", 18), "0.0000");
        assert_eq!(format_balance("42", 0), "42.0000");
        assert_eq!(format_balance("1", 18), "0.0000");
        assert_eq!(format_balance("50000000000000", 18), "0.0001");
    }

    #[test]
    fn test_format_balance_large_values() {
        let max = format!("0x{}", "f".repeat(64));
        let formatted = format_balance(&max, 18);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457"));
        assert!(formatted.ends_with(".5840"));
        assert_eq!(format_balance("1", 400), "0.0000");
    }

    #[test]
    fn test_format_unparseable() {
        assert_eq!(format_balance("not a number", 18), "—");
    }
}
