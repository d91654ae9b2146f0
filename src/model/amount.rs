//! Numeric conventions for spreadsheet-derived monetary values.
//!
//! This module owns the two-decimal rounding rule used throughout the costing
//! cascade and the cleaning of numeric and percent cell text as it arrives
//! from a copy-paste out of a spreadsheet application.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rounds to 2 decimal places with ties going away from zero.
///
/// This reproduces a spreadsheet's cell-by-cell `ROUND(x, 2)`. The costing
/// cascade stores and feeds forward these rounded values; do not replace
/// a chain of `round2` calls with a single end-to-end rounding, the figures
/// will stop reconciling against the reference sheet.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a numeric cell as pasted from a spreadsheet.
///
/// Strips currency symbols, thousands separators, percent signs and
/// whitespace before parsing. A lone `-` is an empty cell. Trailing debris
/// after the number (e.g. `"12 users"`) is ignored the way a sheet coerces
/// text cells. Anything unparsable yields zero; the import is best-effort
/// and never raises.
pub fn parse_number(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Decimal::ZERO;
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();

    // Take the leading numeric run only.
    let mut end = 0;
    for (ix, c) in cleaned.char_indices() {
        let numeric = c.is_ascii_digit() || c == '.' || (ix == 0 && (c == '-' || c == '+'));
        if !numeric {
            break;
        }
        end = ix + c.len_utf8();
    }
    Decimal::from_str(&cleaned[..end]).unwrap_or(Decimal::ZERO)
}

/// Parses a percent cell into a fraction.
///
/// A literal `%` sign means the value is a whole-number percentage. Without
/// one, a value above 1 is assumed to be a whole-number percentage as well
/// (`"20"` means 20%), while `"0.2"` is taken as already fractional. A
/// genuinely fractional value slightly above 1 (a markup of 1.5 meaning
/// 150%) is misread by this heuristic; that is a known limitation of the
/// source data, not something we try to repair.
pub fn parse_percent(raw: &str) -> Decimal {
    let num = parse_number(raw);
    if raw.contains('%') || num > Decimal::ONE {
        num / Decimal::ONE_HUNDRED
    } else {
        num
    }
}

/// Formats a monetary value with a currency-code prefix, e.g. `AED 1,234.50`.
///
/// Only a 3-letter alphabetic code is treated as a currency code; anything
/// else falls back to the plain numeric rendering rather than failing.
pub fn format_currency(value: Decimal, code: &str) -> String {
    let number = format_num::format_num!(",.2", value.to_f64().unwrap_or_default());
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        format!("{} {}", code.to_uppercase(), number)
    } else {
        number
    }
}

/// Formats a fraction as a percentage with two decimals, e.g. `3.25%`.
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{:.2}%",
        (value * Decimal::ONE_HUNDRED).to_f64().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(dec("2.005")), dec("2.01"));
        assert_eq!(round2(dec("-2.005")), dec("-2.01"));
        assert_eq!(round2(dec("2.004")), dec("2.00"));
        assert_eq!(round2(dec("148.526548")), dec("148.53"));
    }

    #[test]
    fn test_round2_is_idempotent() {
        let once = round2(dec("150.7580"));
        assert_eq!(once, dec("150.76"));
        assert_eq!(round2(once), once);
    }

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("50.54"), dec("50.54"));
        assert_eq!(parse_number("  50.54  "), dec("50.54"));
        assert_eq!(parse_number("-4.50"), dec("-4.50"));
    }

    #[test]
    fn test_parse_number_currency_debris() {
        assert_eq!(parse_number("$1,234.56"), dec("1234.56"));
        assert_eq!(parse_number("1 234.56"), dec("1234.56"));
        assert_eq!(parse_number("20%"), dec("20"));
    }

    #[test]
    fn test_parse_number_empty_and_dash() {
        assert_eq!(parse_number(""), Decimal::ZERO);
        assert_eq!(parse_number("  "), Decimal::ZERO);
        assert_eq!(parse_number("-"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_number_trailing_text() {
        assert_eq!(parse_number("12 users"), dec("12"));
        assert_eq!(parse_number("garbage"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_percent_with_sign() {
        assert_eq!(parse_percent("20%"), dec("0.2"));
        assert_eq!(parse_percent("0.5%"), dec("0.005"));
    }

    #[test]
    fn test_parse_percent_whole_number_heuristic() {
        assert_eq!(parse_percent("20"), dec("0.2"));
        assert_eq!(parse_percent("1.5"), dec("0.015"));
    }

    #[test]
    fn test_parse_percent_already_fractional() {
        assert_eq!(parse_percent("0.2"), dec("0.2"));
        assert_eq!(parse_percent("1"), dec("1"));
        assert_eq!(parse_percent("0"), Decimal::ZERO);
    }

    #[test]
    fn test_format_currency_with_code() {
        assert_eq!(format_currency(dec("1234.5"), "AED"), "AED 1,234.50");
        assert_eq!(format_currency(dec("1234.5"), "usd"), "USD 1,234.50");
    }

    #[test]
    fn test_format_currency_fallback() {
        assert_eq!(format_currency(dec("1234.5"), ""), "1,234.50");
        assert_eq!(format_currency(dec("1234.5"), "DIRHAMS"), "1,234.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec("0.0325")), "3.25%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
    }
}
