// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::warn;

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year], [hour repr:12 padding:none]:[minute]:[second] [period]"
);
const NAIVE_DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_DATETIME_FRACTION_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE_MINUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// One transaction entry as held by the store.
///
/// Every field except `id` may be absent on the wire. `timestamp` is `None`
/// both when the field is missing and when its value cannot be read as an
/// instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub beneficiary_id: Option<String>,
    pub beneficiary_mobile: Option<String>,
    pub trxid: Option<String>,
    pub timestamp: Option<OffsetDateTime>,
}

impl Record {
    /// The grouping key, skipping absent and empty mobiles.
    pub fn group_key(&self) -> Option<&str> {
        self.beneficiary_mobile
            .as_deref()
            .filter(|mobile| !mobile.is_empty())
    }

    pub fn timestamp_text(&self, offset: UtcOffset) -> Option<String> {
        self.timestamp
            .and_then(|timestamp| format_timestamp(timestamp, offset))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    #[serde(rename = "_id")]
    object_id: Option<Value>,
    id: Option<Value>,
    beneficiary_id: Option<Value>,
    beneficiary_mobile: Option<Value>,
    trxid: Option<Value>,
    timestamp: Option<Value>,
}

impl WireRecord {
    fn into_record(self) -> Record {
        Record {
            id: self
                .object_id
                .as_ref()
                .and_then(value_text)
                .or_else(|| self.id.as_ref().and_then(value_text))
                .unwrap_or_default(),
            beneficiary_id: self.beneficiary_id.as_ref().and_then(value_text),
            beneficiary_mobile: self.beneficiary_mobile.as_ref().and_then(value_text),
            trxid: self.trxid.as_ref().and_then(value_text),
            timestamp: self.timestamp.as_ref().and_then(parse_timestamp),
        }
    }
}

/// Decodes a JSON snapshot body. A `null` body is an empty snapshot; entries
/// that are not objects are skipped.
pub fn decode_records(body: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(body).context("decode record snapshot as JSON")?;
    records_from_value(value)
}

pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => bail!(
            "record snapshot must be a JSON array, got {}",
            json_kind(&other)
        ),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<WireRecord>(item) {
            Ok(wire) => records.push(wire.into_record()),
            Err(error) => warn!(index, %error, "skipping malformed record"),
        }
    }
    Ok(records)
}

/// Reads an instant from an RFC 3339 string, a naive ISO date-time or date
/// (taken as UTC), or a number of milliseconds since the Unix epoch. Fractional
/// milliseconds are truncated.
pub fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(number) => {
            let millis = number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|millis| millis.is_finite())
                    .map(|millis| millis.trunc() as i64)
            })?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        }
        _ => None,
    }
}

pub fn parse_timestamp_str(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, NAIVE_DATETIME_FRACTION_FORMAT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, NAIVE_DATETIME_FORMAT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, NAIVE_MINUTE_FORMAT) {
        return Some(parsed.assume_utc());
    }
    Date::parse(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Human-readable rendering, e.g. `3/7/2026, 2:05:09 PM`.
pub fn format_timestamp(timestamp: OffsetDateTime, offset: UtcOffset) -> Option<String> {
    timestamp
        .checked_to_offset(offset)?
        .format(DISPLAY_FORMAT)
        .ok()
}

/// Whole minutes from `timestamp` to `now`, rounded toward negative infinity.
pub fn elapsed_minutes(now: OffsetDateTime, timestamp: OffsetDateTime) -> i64 {
    let millis = (now - timestamp).whole_milliseconds();
    millis.div_euclid(60_000) as i64
}

pub fn elapsed_text(now: OffsetDateTime, timestamp: OffsetDateTime) -> String {
    format!("{} minutes ago", elapsed_minutes(now, timestamp))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
