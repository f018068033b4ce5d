//! Timestamp rendering and parsing for date columns

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::config::DateFormat;

const DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const DATE: &str = "%Y-%m-%d";

/// Current time in the configured storage format
pub fn now(format: DateFormat) -> Value {
    render(Utc::now().naive_utc(), format)
}

/// Render a moment in the configured storage format
pub fn render(moment: NaiveDateTime, format: DateFormat) -> Value {
    match format {
        DateFormat::Datetime => Value::String(moment.format(DATETIME).to_string()),
        DateFormat::Date => Value::String(moment.format(DATE).to_string()),
        DateFormat::Int => Value::from(moment.and_utc().timestamp()),
    }
}

/// Read a stored or user-supplied date: unix seconds, `datetime`, `date`
/// or RFC 3339 text.
pub fn parse(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .map(|moment| moment.naive_utc()),
        Value::String(text) => {
            let text = text.trim();
            NaiveDateTime::parse_from_str(text, DATETIME)
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(text, DATE)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|moment| moment.with_timezone(&Utc).naive_utc())
                })
                .or_else(|| text.parse::<i64>().ok().and_then(|seconds| parse(&Value::from(seconds))))
        }
        _ => None,
    }
}
