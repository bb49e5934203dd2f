//! Record transformation
//!
//! Normalizes the `friends` and `born_at` fields of a record. The transform is
//! total: malformed input degrades to a fallback value and never fails.
//!
//! - `friends` always becomes an ordered list of non-empty, trimmed strings.
//! - `born_at` becomes an ISO-8601 UTC timestamp with an explicit `+00:00`
//!   offset. Values that cannot be interpreted are kept as they were.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::warn;

use crate::domain::record::Record;

pub const FRIENDS_FIELD: &str = "friends";
pub const BORN_AT_FIELD: &str = "born_at";

/// Accepted `born_at` string layouts, tried in order
enum Layout {
    Date(&'static str),
    Naive(&'static str),
    Rfc3339,
    Offset(&'static str),
}

const BORN_AT_LAYOUTS: &[Layout] = &[
    Layout::Date("%Y-%m-%d"),
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Naive("%Y/%m/%d %H:%M:%S"),
    Layout::Naive("%m-%d-%Y %H:%M:%S"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Rfc3339,
    Layout::Offset("%Y-%m-%dT%H:%M:%S%z"),
];

/// Transforms one record into its normalized shape
///
/// The input is left untouched; a normalized copy is returned. `friends` is
/// always present in the output, `born_at` only if it was present in the input.
pub fn transform_record(record: &Record) -> Record {
    let mut transformed = record.clone();

    let friends = normalize_friends(record.get(FRIENDS_FIELD));
    transformed.insert(
        FRIENDS_FIELD.to_string(),
        Value::Array(friends.into_iter().map(Value::String).collect()),
    );

    if let Some(born_at) = record.get(BORN_AT_FIELD) {
        transformed.insert(BORN_AT_FIELD.to_string(), normalize_born_at(born_at));
    }

    transformed
}

/// Normalizes a `friends` value into a list of names
pub fn normalize_friends(friends: Option<&Value>) -> Vec<String> {
    match friends {
        Some(Value::String(names)) => names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(|name| match name {
                Value::Null => None,
                Value::String(s) => Some(s.trim().to_string()),
                other => Some(other.to_string().trim().to_string()),
            })
            .filter(|name| !name.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalizes a `born_at` value
///
/// Numbers are epoch milliseconds. Strings are matched against the accepted
/// layouts. Anything else, or anything unparseable, is returned unchanged.
pub fn normalize_born_at(born_at: &Value) -> Value {
    let parsed = match born_at {
        Value::Number(n) => {
            let dt = match n.as_i64() {
                Some(ms) => DateTime::<Utc>::from_timestamp_millis(ms),
                None => n
                    .as_f64()
                    .and_then(|ms| DateTime::<Utc>::from_timestamp_micros((ms * 1000.0).round() as i64)),
            };
            if dt.is_none() {
                warn!("born_at epoch value out of range: {}", n);
            }
            dt
        }
        Value::String(s) => {
            let dt = parse_born_at(s);
            if dt.is_none() {
                warn!("Could not parse born_at: {}", s);
            }
            dt
        }
        _ => None,
    };

    match parsed {
        Some(dt) => Value::String(format_utc(&dt)),
        None => born_at.clone(),
    }
}

fn parse_born_at(s: &str) -> Option<DateTime<Utc>> {
    BORN_AT_LAYOUTS.iter().find_map(|layout| match layout {
        Layout::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc()),
        Layout::Naive(fmt) => NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .map(|naive| naive.and_utc()),
        Layout::Rfc3339 => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Layout::Offset(fmt) => DateTime::parse_from_str(s, fmt)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    })
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
