//! Quetzal amount parsing and display
//!
//! Amounts travel through the app as the raw strings found in the table
//! (`"Q 1,629.60"`). Arithmetic happens on integer cents so halving an odd
//! number of cents rounds predictably.

use num_format::{Locale, ToFormattedString};

pub const CURRENCY_SYMBOL: &str = "Q";

/// Parse a currency string into cents. Returns `None` when no digits are present.
pub fn parse_currency(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let negative = cleaned.starts_with('-');
    let cleaned = cleaned.trim_start_matches('-');
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned, ""),
    };
    // A second '.' means the input was not a single amount
    if frac.contains('.') || frac.contains('-') || whole.contains('-') {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut digits = frac.chars().map(|c| c.to_digit(10).map(i64::from));
    let tenths = digits.next().flatten().unwrap_or(0);
    let hundredths = digits.next().flatten().unwrap_or(0);
    let thousandths = digits.next().flatten().unwrap_or(0);

    let mut cents = whole.checked_mul(100)?.checked_add(tenths * 10 + hundredths)?;
    if thousandths >= 5 {
        cents = cents.checked_add(1)?;
    }
    Some(if negative { -cents } else { cents })
}

/// Half of an amount, rounded half away from zero to whole cents
pub fn halve(cents: i64) -> i64 {
    // Remainder carries the sign, so odd amounts move away from zero
    cents / 2 + cents % 2
}

/// Render cents as `Q 1,234.56`
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        CURRENCY_SYMBOL,
        (abs / 100).to_formatted_string(&Locale::en),
        abs % 100
    )
}

/// Display value after the 50% discount, or `None` if `text` is not an amount
pub fn discounted_display(text: &str) -> Option<String> {
    parse_currency(text).map(|cents| format_currency(halve(cents)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("Q 1,000.00"), Some(100_000));
        assert_eq!(parse_currency("Q 1,629.60"), Some(162_960));
        assert_eq!(parse_currency("Q150"), Some(15_000));
        assert_eq!(parse_currency("  Q 0.5 "), Some(50));
        assert_eq!(parse_currency("Q 304,252.00"), Some(30_425_200));
        assert_eq!(parse_currency("Q 1.005"), Some(101));
        assert_eq!(parse_currency("-Q 20.00"), Some(-2_000));
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("N/A"), None);
        assert_eq!(parse_currency("1.2.3"), None);
    }

    #[test]
    fn test_parse_currency_rejects_out_of_range_amounts() {
        assert_eq!(parse_currency("Q 92,233,720,368,547,758.07"), Some(i64::MAX));
        // Rounding the last cent up would overflow
        assert_eq!(parse_currency("Q 92,233,720,368,547,758.075"), None);
        assert_eq!(parse_currency("Q 92,233,720,368,547,759.00"), None);
        assert_eq!(parse_currency("Q 99999999999999999999"), None);
        assert_eq!(discounted_display("Q 92,233,720,368,547,758.075"), None);
    }

    #[test]
    fn test_halve_rounds_half_up() {
        assert_eq!(halve(100_000), 50_000);
        assert_eq!(halve(100_100), 50_050);
        assert_eq!(halve(1), 1);
        assert_eq!(halve(3), 2);
        assert_eq!(halve(-3), -2);
        assert_eq!(halve(0), 0);
    }

    #[test]
    fn test_halve_extremes() {
        assert_eq!(halve(i64::MAX), i64::MAX / 2 + 1);
        assert_eq!(halve(i64::MIN), i64::MIN / 2);
        assert_eq!(halve(-1), -1);
        assert_eq!(
            discounted_display("Q 92,233,720,368,547,758.07").as_deref(),
            Some("Q 46,116,860,184,273,879.04")
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(50_000), "Q 500.00");
        assert_eq!(format_currency(123_456_789), "Q 1,234,567.89");
        assert_eq!(format_currency(5), "Q 0.05");
        assert_eq!(format_currency(-150), "-Q 1.50");
    }

    #[test]
    fn test_discounted_display() {
        assert_eq!(discounted_display("Q 1,000.00").as_deref(), Some("Q 500.00"));
        assert_eq!(discounted_display("Q 1,001.00").as_deref(), Some("Q 500.50"));
        assert_eq!(discounted_display("Q 0.01").as_deref(), Some("Q 0.01"));
        assert_eq!(discounted_display("Q 3,258.41").as_deref(), Some("Q 1,629.21"));
        assert_eq!(discounted_display("—"), None);
    }
}
