//! Turns raw provider records into a [`Series`].
//!
//! The provider's field names and date formats are not stable (`price` vs
//! `close`, `date` vs `Date`, ISO dates vs full timestamps), so every lookup
//! here is case-insensitive and alias-aware. Records that cannot be read are
//! dropped; a partial series is more useful than none.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::EPOCH_MILLIS_THRESHOLD;
use crate::error::{DashboardError, Result};
use crate::models::{Asset, Interval, PricePoint, Series};

const DATE_FIELDS: &[&str] = &["date", "timestamp", "time"];
const OPEN_FIELDS: &[&str] = &["open", "openPrice", "open_price"];
const CLOSE_FIELDS: &[&str] = &["close", "closePrice", "close_price", "price"];
const ENVELOPE_FIELDS: &[&str] = &["data"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Normalize a whole provider payload into a series.
///
/// The payload must be an array of records, or an object wrapping that array
/// under `data`. Anything else is a [`DashboardError::Fetch`].
pub fn normalize_payload(payload: &Value, asset: Asset, interval: Interval) -> Result<Series> {
    let records = records_from_payload(payload)?;
    Ok(normalize_records(records, asset, interval))
}

/// Extract the record array from a payload.
pub fn records_from_payload(payload: &Value) -> Result<&[Value]> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(obj) => match field(obj, ENVELOPE_FIELDS) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(DashboardError::Fetch(
                "Provider returned an object without a record array".to_string(),
            )),
        },
        other => Err(DashboardError::Fetch(format!(
            "Provider returned a non-sequence payload ({})",
            json_kind(other)
        ))),
    }
}

/// Normalize records, skipping the ones that fail to parse.
pub fn normalize_records(records: &[Value], asset: Asset, interval: Interval) -> Series {
    let mut points = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (idx, record) in records.iter().enumerate() {
        match parse_record(record) {
            Ok(point) => points.push(point),
            Err(e) => {
                dropped += 1;
                debug!(%asset, index = idx, error = %e, "dropping provider record");
            }
        }
    }

    if dropped > 0 {
        warn!(%asset, dropped, kept = points.len(), "skipped malformed provider records");
    }

    Series::new(asset, interval, points)
}

/// Parse a single provider record into a point.
pub fn parse_record(record: &Value) -> Result<PricePoint> {
    let obj = record
        .as_object()
        .ok_or_else(|| DashboardError::Parse(format!("record is a {}", json_kind(record))))?;

    let date_value = field(obj, DATE_FIELDS)
        .ok_or_else(|| DashboardError::Parse("missing date field".to_string()))?;
    let date = parse_date(date_value)
        .ok_or_else(|| DashboardError::Parse(format!("unreadable date {}", date_value)))?;

    let open = parse_price(obj, OPEN_FIELDS, "open")?;
    let close = parse_price(obj, CLOSE_FIELDS, "close")?;

    Ok(PricePoint::new(date, open, close))
}

/// Read a calendar date, ignoring any time-of-day or offset.
///
/// For strings carrying an offset the date is taken as written, not shifted
/// to UTC. Numbers are Unix epoch seconds or milliseconds, read in UTC.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            let dt = if raw.unsigned_abs() < EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
                DateTime::from_timestamp(raw, 0)?
            } else {
                DateTime::from_timestamp_millis(raw)?
            };
            Some(dt.date_naive())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // Anything else that still starts with an ISO date, e.g. "+0300" offsets.
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

fn parse_price(obj: &Map<String, Value>, names: &[&str], label: &str) -> Result<f64> {
    let value = field(obj, names)
        .ok_or_else(|| DashboardError::Parse(format!("missing {} price", label)))?;
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DashboardError::Parse(format!("unreadable {} price {}", label, value)))?;

    if !price.is_finite() || price < 0.0 {
        return Err(DashboardError::Parse(format!(
            "{} price out of range: {}",
            label, price
        )));
    }
    Ok(price)
}

/// Case-insensitive lookup; earlier aliases win over later ones.
fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        obj.iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_null())
            .map(|(_, value)| value)
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
