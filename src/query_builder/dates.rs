//! Date detection and normalization for filter values.
//!
//! A value is date-shaped when it is a `DD/MM/YYYY` string naming a real
//! calendar date. Date detection takes precedence over operator dispatch:
//! date-shaped filters bypass the operator table entirely and produce either
//! an equality or an inclusive range predicate. Malformed date-like strings
//! fall through to ordinary operator handling.

use chrono::NaiveDate;
use serde_json::Value;

use super::conditions::Condition;
use crate::filter::FilterValues;

pub const DATE_INPUT_FORMAT: &str = "%d/%m/%Y";

/// Parses a `DD/MM/YYYY` string into a date, rejecting other shapes and
/// impossible calendar dates.
pub fn parse_date_shaped(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_INPUT_FORMAT).ok()
}

pub fn is_date_shaped(value: &Value) -> bool {
    parse_date_shaped(value).is_some()
}

/// True when the filter's values should be routed to a date predicate:
/// a date-shaped scalar, or a non-empty sequence of date-shaped strings.
pub fn values_are_dates(values: &FilterValues) -> bool {
    !values.is_empty() && values.iter().all(is_date_shaped)
}

/// Reformats a detected date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Builds the date predicate for one filter (4.3).
///
/// A single date yields an equality on `DATE(column)`; the cast is
/// timezone-aware unless the column is date-only. A two-element sequence
/// yields an inclusive `BETWEEN`, always timezone-aware.
pub fn date_condition(
    field: &str,
    values: &FilterValues,
    date_only: bool,
    timezone: &str,
) -> Condition {
    match values {
        FilterValues::Many(list) if list.len() > 1 => {
            let start = parse_date_shaped(&list[0]).map(format_date).unwrap_or_default();
            let end = parse_date_shaped(&list[1]).map(format_date).unwrap_or_default();
            Condition::Raw {
                sql: format!(
                    "DATE(\"{field}\" AT TIME ZONE '{timezone}') BETWEEN '{start}'::DATE AND '{end}'::DATE"
                ),
            }
        }
        FilterValues::Many(list) => single_date_condition(
            field,
            list.first().and_then(parse_date_shaped),
            date_only,
            timezone,
        ),
        FilterValues::One(value) => {
            single_date_condition(field, parse_date_shaped(value), date_only, timezone)
        }
    }
}

fn single_date_condition(
    field: &str,
    date: Option<NaiveDate>,
    date_only: bool,
    timezone: &str,
) -> Condition {
    let formatted = date.map(format_date).unwrap_or_default();
    let sql = if date_only {
        format!("DATE(\"{field}\") = '{formatted}'::DATE")
    } else {
        format!("DATE(\"{field}\" AT TIME ZONE '{timezone}') = '{formatted}'::DATE")
    };
    Condition::Raw { sql }
}

/// Loosely parses an ISO-ish timestamp or date into a calendar date. Used to
/// collapse timestamp range filters into a single display-format date.
pub fn parse_timestampish(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(s, DATE_INPUT_FORMAT).ok()
}
