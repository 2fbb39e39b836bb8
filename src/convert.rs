//! Price formatting in the active display currency
//!
//! USD follows en-US conventions (`$1,234.56`, two to six fraction digits).
//! VND follows vi-VN conventions (`2.400.000 ₫`, no fraction digits).

use crate::types::Currency;

const USD_MIN_FRACTION_DIGITS: usize = 2;
const USD_MAX_FRACTION_DIGITS: usize = 6;

/// Formats a USD price for display in `currency`
///
/// `rate` is the USD to `currency` multiplier and is ignored for the base
/// currency. Never fails; non-finite results render as `-`.
pub fn convert(price_usd: f64, currency: Currency, rate: f64) -> String {
    match currency {
        Currency::Usd => format_usd(price_usd),
        Currency::Vnd => format_vnd(price_usd * rate),
    }
}

fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", USD_MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < USD_MIN_FRACTION_DIGITS {
        frac.push('0');
    }

    let sign = if is_negative(value, &fixed) { "-" } else { "" };
    format!("{}${}.{}", sign, group_digits(int_part, ','), frac)
}

fn format_vnd(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.0}", value.abs());
    let sign = if is_negative(value, &fixed) { "-" } else { "" };
    format!("{}{}\u{a0}₫", sign, group_digits(&fixed, '.'))
}

/// Negative values that round to zero are shown without a sign
fn is_negative(value: f64, rounded: &str) -> bool {
    value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// Inserts `separator` every three digits from the right
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_base_formatting() {
        assert_eq!(convert(100.0, Currency::Usd, 24000.0), "$100.00");
        assert_eq!(convert(64123.5, Currency::Usd, 1.0), "$64,123.50");
        assert_eq!(convert(1234567.891, Currency::Usd, 1.0), "$1,234,567.891");
    }

    #[test]
    fn test_usd_keeps_up_to_six_fraction_digits() {
        assert_eq!(convert(0.00012345, Currency::Usd, 1.0), "$0.000123");
        assert_eq!(convert(0.1234567, Currency::Usd, 1.0), "$0.123457");

        let formatted = convert(100.0, Currency::Usd, 1.0);
        let fraction = formatted.split('.').nth(1).unwrap();
        assert!(fraction.len() >= 2 && fraction.len() <= 6);
    }

    #[test]
    fn test_usd_ignores_rate() {
        assert_eq!(
            convert(42.0, Currency::Usd, 24000.0),
            convert(42.0, Currency::Usd, 0.0)
        );
    }

    #[test]
    fn test_vnd_conversion() {
        assert_eq!(convert(100.0, Currency::Vnd, 24000.0), "2.400.000\u{a0}₫");
        assert_eq!(convert(0.5, Currency::Vnd, 25000.0), "12.500\u{a0}₫");
        assert_eq!(convert(0.00001, Currency::Vnd, 24000.0), "0\u{a0}₫");
    }

    #[test]
    fn test_vnd_has_no_fraction_digits() {
        let formatted = convert(1.23456, Currency::Vnd, 24000.0);
        assert_eq!(formatted, "29.629\u{a0}₫");
        assert!(!formatted.contains(','));
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(convert(-1500.0, Currency::Usd, 1.0), "-$1,500.00");
        assert_eq!(convert(-0.0000001, Currency::Usd, 1.0), "$0.00");
        assert_eq!(convert(f64::NAN, Currency::Usd, 1.0), "-");
        assert_eq!(convert(1.0, Currency::Vnd, f64::INFINITY), "-");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", ','), "1");
        assert_eq!(group_digits("123", ','), "123");
        assert_eq!(group_digits("1234", ','), "1,234");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
    }
}
