//! Lenient numeric conversion for chart cells
//!
//! Chart data arrives with thousands separators ("1,234"), percent signs
//! ("12.5%"), blanks and placeholder text. Conversion either yields a finite
//! number or `None`; callers drop the cell instead of failing.

use serde_json::Value;

/// Convert a raw cell value to a number.
///
/// JSON numbers pass through. Strings have commas removed and one trailing
/// percent sign stripped before parsing. Everything else (null, bools,
/// arrays, objects) and any non-finite result is not convertible.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// String form of [`parse_numeric`]
pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned).trim_end();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_numeric(&json!(42)), Some(42.0));
        assert_eq!(parse_numeric(&json!(-3.5)), Some(-3.5));
    }

    #[test]
    fn test_formatted_strings() {
        assert_eq!(parse_numeric(&json!("1,234,567")), Some(1_234_567.0));
        assert_eq!(parse_numeric(&json!("12.5%")), Some(12.5));
        assert_eq!(parse_numeric(&json!(" 7 ")), Some(7.0));
        assert_eq!(parse_numeric(&json!("-0.25")), Some(-0.25));
    }

    #[test]
    fn test_not_convertible() {
        assert_eq!(parse_numeric(&json!(null)), None);
        assert_eq!(parse_numeric(&json!("")), None);
        assert_eq!(parse_numeric(&json!("%")), None);
        assert_eq!(parse_numeric(&json!("n/a")), None);
        assert_eq!(parse_numeric(&json!(true)), None);
        assert_eq!(parse_numeric(&json!([1, 2])), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_numeric_str("NaN"), None);
        assert_eq!(parse_numeric_str("inf"), None);
        assert_eq!(parse_numeric_str("-infinity"), None);
    }
}
