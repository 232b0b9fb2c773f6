//! Numeric token extraction.
//!
//! Pulls decimal literals (`1.23`, `2,5`) out of free text or out of quoted
//! JSON-ish fragments and keeps the ones that look like odds.

use crate::odds::{OddsSet, OddsValue};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Unbounded integer part, `.` or `,` separator, 1-3 fractional digits.
static DECIMAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[.,]\d{1,3}").expect("decimal token pattern"));

/// Same token, but only when it is a whole double-quoted string literal.
static QUOTED_DECIMAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\d+[.,]\d{1,3})""#).expect("quoted decimal token pattern"));

/// All plausible odds found anywhere in `text`.
pub fn extract_numbers(text: &str) -> OddsSet {
    DECIMAL_TOKEN
        .find_iter(text)
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

/// Plausible odds that appear as quoted decimal literals, e.g. `"1.45"` inside
/// an inline `<script>` payload.
pub fn extract_from_script_like(html: &str) -> OddsSet {
    QUOTED_DECIMAL_TOKEN
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

fn parse_token(token: &str) -> Option<OddsValue> {
    let normalized = token.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(raw) => OddsValue::from_raw(raw),
        Err(e) => {
            trace!(token, error = %e, "skipping unparsable numeric token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers_plain_text() {
        let odds = extract_numbers("Odds: 1.23 2.34 3.50");
        assert_eq!(odds.values(), vec![3.5, 2.34, 1.23]);
    }

    #[test]
    fn test_extract_numbers_comma_separator() {
        let odds = extract_numbers("Home 2,5 Draw 3,10 Away 1,875");
        assert_eq!(odds.values(), vec![3.1, 2.5, 1.88]);
    }

    #[test]
    fn test_extract_numbers_rejects_out_of_range_and_integers() {
        let odds = extract_numbers("Season 2024, jackpot 10000.50, stake 0.50, line 1.00, odds 1.01");
        assert_eq!(odds.values(), vec![1.01]);
    }

    #[test]
    fn test_extract_numbers_keeps_percentages_in_range() {
        let odds = extract_numbers("win probability 45.5%");
        assert_eq!(odds.values(), vec![45.5]);
    }

    #[test]
    fn test_extract_numbers_long_fraction_is_truncated_by_pattern() {
        // Only the first three fractional digits belong to the token.
        let odds = extract_numbers("123.4567");
        assert_eq!(odds.values(), vec![123.46]);
    }

    #[test]
    fn test_extract_numbers_dedups_after_rounding() {
        let odds = extract_numbers("1.501 1.50 1,5");
        assert_eq!(odds.values(), vec![1.5]);
    }

    #[test]
    fn test_extract_numbers_half_hundredths() {
        assert_eq!(extract_numbers("1.125").values(), vec![1.12]);
        assert_eq!(extract_numbers("2.375").values(), vec![2.38]);
        assert_eq!(extract_numbers("2.675").values(), vec![2.67]);
        assert_eq!(extract_numbers("1,045").values(), vec![1.04]);
    }

    #[test]
    fn test_extract_numbers_skips_non_ascii_digits() {
        // Arabic-Indic digits match \d but do not parse as f64.
        let odds = extract_numbers("\u{0661}.\u{0662}\u{0663} 2.20");
        assert_eq!(odds.values(), vec![2.2]);
    }

    #[test]
    fn test_script_like_requires_quotes() {
        let html = r#"<script>var x = {"a": ["1.45", "2.50"], "b": 3.75, "c": "7.1x"};</script>"#;
        let odds = extract_from_script_like(html);
        assert_eq!(odds.values(), vec![2.5, 1.45]);
    }

    #[test]
    fn test_script_like_adjacent_literals() {
        let odds = extract_from_script_like(r#"["1.90","3.20"]"#);
        assert_eq!(odds.values(), vec![3.2, 1.9]);
    }

    #[test]
    fn test_script_like_applies_range_filter() {
        let odds = extract_from_script_like(r#"{"id": "12345.67", "odd": "1,05", "fee": "0.99"}"#);
        assert_eq!(odds.values(), vec![1.05]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_numbers("").is_empty());
        assert!(extract_from_script_like("").is_empty());
    }
}
