//! Best-effort recovery of structured data from raw engine output.
//!
//! Vision-model output is not guaranteed to be pure JSON even under a
//! strict prompt. This module layers three parsers in strict fallback
//! order, stopping at the first success:
//!
//! 1. the whole text as a JSON object;
//! 2. the first ```` ```json {...} ``` ```` fenced block;
//! 3. the span from the first `{` to the last `}`.
//!
//! Each layer is a pure `Option`-returning function; `sanitize` never
//! panics and never errors. An empty map means "no data extracted".

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

lazy_static! {
    // First {...} object inside a ```json fenced block, non-greedy
    // across lines.
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").unwrap();
}

/// Field name to numeric value, as recovered from one document.
pub type FieldValues = HashMap<String, f64>;

/// Recover a field/value mapping from raw engine output.
pub fn sanitize(raw: &str) -> FieldValues {
    parse_direct(raw)
        .or_else(|| parse_fenced(raw))
        .or_else(|| parse_brace_span(raw))
        .unwrap_or_default()
}

/// Layer 1: the entire text is a JSON object.
fn parse_direct(text: &str) -> Option<FieldValues> {
    serde_json::from_str(text).ok().and_then(coerce_object)
}

/// Layer 2: a markdown fenced block tagged `json`.
fn parse_fenced(text: &str) -> Option<FieldValues> {
    let caps = FENCED_JSON.captures(text)?;
    serde_json::from_str(caps.get(1)?.as_str())
        .ok()
        .and_then(coerce_object)
}

/// Layer 3: slice from the first `{` to the last `}` inclusive.
///
/// Tolerant of leading/trailing prose, but taken literally rather than
/// brace-matched: text with multiple disjoint objects or unbalanced
/// braces in prose will not parse, and falls through to the empty map.
fn parse_brace_span(text: &str) -> Option<FieldValues> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end])
        .ok()
        .and_then(coerce_object)
}

/// A layer succeeds only when the parsed value is a JSON object.
fn coerce_object(value: Value) -> Option<FieldValues> {
    match value {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(key, value)| {
                    let number = coerce_number(&value);
                    (key, number)
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Coerce one JSON value to a number; unparseable values default to 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse a numeric string, stripping currency symbols, thousands
/// separators, and whitespace the engine may have left in despite the
/// prompt.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, f64)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn direct_parse_is_idempotent_on_valid_json() {
        let expected = map(&[("Revenue", 1500.5), ("Expenses", 0.0)]);
        let json = serde_json::to_string(&expected).unwrap();
        assert_eq!(sanitize(&json), expected);
    }

    #[test]
    fn recovers_from_fenced_block_with_surrounding_prose() {
        let raw = "Sure, here is the extracted data:\n\
                   ```json\n{\"Invoice Amount\": 500, \"Tax Amount\": 50}\n```\n\
                   Let me know if you need anything else.";
        assert_eq!(
            sanitize(raw),
            map(&[("Invoice Amount", 500.0), ("Tax Amount", 50.0)])
        );
    }

    #[test]
    fn recovers_from_brace_span_with_prose() {
        let raw = "Sure! {\"Net Salary\": 42000} Thanks.";
        assert_eq!(sanitize(raw), map(&[("Net Salary", 42000.0)]));
    }

    #[test]
    fn no_braces_yields_empty_map() {
        assert!(sanitize("I could not read the document, sorry.").is_empty());
        assert!(sanitize("").is_empty());
    }

    #[test]
    fn unbalanced_prose_braces_yield_empty_map() {
        // Span heuristic is literal, not brace-matched; garbage spans
        // fall through to the empty map rather than erroring.
        assert!(sanitize("a { b } c { d").is_empty());
    }

    #[test]
    fn non_object_json_falls_through() {
        assert!(sanitize("[1, 2, 3]").is_empty());
        assert!(sanitize("42").is_empty());
    }

    #[test]
    fn coerces_string_amounts() {
        let raw = r#"{"Total Amount": "$1,234.56", "Discount Amount": "n/a"}"#;
        assert_eq!(
            sanitize(raw),
            map(&[("Total Amount", 1234.56), ("Discount Amount", 0.0)])
        );
    }

    #[test]
    fn coerces_non_numeric_values_to_zero() {
        let raw = r#"{"PF": null, "DA": true, "HRA": 1200}"#;
        assert_eq!(sanitize(raw), map(&[("PF", 0.0), ("DA", 0.0), ("HRA", 1200.0)]));
    }

    #[test]
    fn fenced_block_wins_over_brace_span() {
        // The prose braces around the fence would confuse the span
        // heuristic; the fenced layer runs first.
        let raw = "{note} ```json\n{\"Revenue\": 10}\n``` {aside}";
        assert_eq!(sanitize(raw), map(&[("Revenue", 10.0)]));
    }

    #[test]
    fn parse_amount_strips_currency_noise() {
        assert_eq!(parse_amount("\u{20b9}12,500"), Some(12500.0));
        assert_eq!(parse_amount(" 1 234.56 "), Some(1234.56));
        assert_eq!(parse_amount("-250"), Some(-250.0));
        assert_eq!(parse_amount("none"), None);
    }
}
