//! Cell parsing and column type inference shared by every reader.
//!
//! A column is numeric when every non-empty value parses as a number,
//! temporal when every non-empty value parses as a date, and text otherwise.

use crate::types::ColumnData;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Check if a string looks like a number
///
/// Rejects strings with multiple symbols or non-numeric characters beyond
/// single symbols like $ or %.
///
/// # Examples
/// - `"123"` -> true
/// - `"$123.45"` -> true
/// - `"1,2,3"` -> false (too many separators)
/// - `"abc"` -> false
pub fn looks_like_number(s: &str) -> bool {
    clean_number(s).is_some()
}

/// Parse a number, tolerating one currency/percent symbol and one thousands separator
pub fn parse_number(s: &str) -> Option<f64> {
    clean_number(s)?.parse::<f64>().ok()
}

/// Parse an integer using the same tolerance as [`parse_number`]
pub fn parse_integer(s: &str) -> Option<i64> {
    clean_number(s)?.parse::<i64>().ok()
}

fn clean_number(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let symbol_count = trimmed
        .chars()
        .filter(|c| matches!(c, '$' | '%' | '€' | '£'))
        .count();
    if symbol_count > 1 || trimmed.matches(',').count() > 1 {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | '€' | '£' | ','))
        .collect();
    cleaned.parse::<f64>().ok().map(|_| cleaned)
}

/// Parse a date or date-time. Plain dates become midnight.
pub fn parse_temporal(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.len() < 6 {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Resolve raw string cells into a typed column.
pub fn infer_column(values: Vec<Option<String>>) -> ColumnData {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        return ColumnData::Text(values);
    }

    if present.iter().all(|s| looks_like_number(s)) {
        if present.iter().all(|s| parse_integer(s).is_some()) {
            return ColumnData::Int64(
                values
                    .iter()
                    .map(|v| v.as_deref().and_then(parse_integer))
                    .collect(),
            );
        }
        return ColumnData::Float64(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_number))
                .collect(),
        );
    }

    if present.iter().all(|s| parse_temporal(s).is_some()) {
        return ColumnData::Temporal(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_temporal))
                .collect(),
        );
    }

    ColumnData::Text(values)
}
