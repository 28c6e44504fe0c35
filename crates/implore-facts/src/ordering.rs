//! Category ordering keys
//!
//! Category axes mix integers, floats, and labels such as "FY 2017" or
//! "2015/16". Ordering is best effort: a key is a year when one can be
//! found, otherwise a plain number, otherwise nothing. Callers treat a
//! missing key as "cannot order" and skip the comparison.

use implore_io::parse_numeric_str;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // Four-digit year not embedded in a longer digit run
    static ref YEAR_PATTERN: Regex = Regex::new(r"(?:^|\D)(1[5-9]\d{2}|2\d{3})(?:\D|$)").unwrap();
}

/// Extract a calendar year from a category value
pub fn extract_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            let x = n.as_f64()?;
            if x.fract() == 0.0 && (1500.0..3000.0).contains(&x) {
                Some(x as i64)
            } else {
                None
            }
        }
        Value::String(s) => YEAR_PATTERN
            .captures(s)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

/// Sortable key of a category value: year first, then any number
pub fn order_key(value: &Value) -> Option<f64> {
    if let Some(year) = extract_year(value) {
        return Some(year as f64);
    }
    match value {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// True when `earlier` is known to come strictly before `later`
pub fn strictly_before(earlier: &Value, later: &Value) -> bool {
    match (order_key(earlier), order_key(later)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}
