//! Canonical scalar coercion policies.
//!
//! Source data for back-office tables is heterogeneous and untyped: amounts
//! arrive as `"1,200.50"`, placeholders as `"-"`, dates in several regional
//! formats. Every consumer (search, range filters, sorting, export) goes
//! through the helpers here so the leniency policy is defined exactly once:
//!
//! - numbers: thousands separators stripped, anything unparsable coerces to 0;
//! - dates: unparsable values yield `None` and fail range filters silently.

use chrono::NaiveDate;
use serde_json::Value;

/// Date formats accepted by [`to_date`], tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Returns the display string for a scalar value.
///
/// Strings pass through unchanged, numbers and booleans use their JSON
/// rendering, null and missing values render as an empty string.
#[must_use]
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Coerces a scalar to a number for comparisons.
///
/// Thousands separators are stripped from strings before parsing. Anything
/// that still fails to parse (including `"-"` placeholders and null) coerces
/// to `0.0`. The result is always finite, so comparisons are total.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Parses a scalar as a calendar date.
///
/// Tries ISO (`2024-03-01`) first, then the day-first regional formats the
/// sheet data uses (`01/03/2024`, `01-03-2024`). Returns `None` for anything
/// unparsable; range filters exclude such rows rather than erroring.
#[must_use]
pub fn to_date(value: &Value) -> Option<NaiveDate> {
    let Value::String(text) = value else {
        return None;
    };
    let text = text.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
