// src/store/codec.rs
//! Field-level translation between entity values and store documents.
//!
//! Timestamps travel as UTC epoch milliseconds, which round-trips calendar
//! dates exactly on any host timezone. Blank optionals are omitted from the
//! written document so "not set" stays distinguishable from "set to empty".

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::{Fields, StoreError};

// ==================== WRITERS ====================

pub fn encode_timestamp(value: DateTime<Utc>) -> Value {
    Value::from(value.timestamp_millis())
}

pub fn put_str(fields: &mut Fields, key: &str, value: &str) {
    fields.insert(key.to_string(), Value::from(value));
}

/// Omitted entirely when absent or blank.
pub fn put_opt_str(fields: &mut Fields, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            fields.insert(key.to_string(), Value::from(v.trim()));
        }
    }
}

pub fn put_u32(fields: &mut Fields, key: &str, value: u32) {
    fields.insert(key.to_string(), Value::from(value));
}

pub fn put_timestamp(fields: &mut Fields, key: &str, value: DateTime<Utc>) {
    fields.insert(key.to_string(), encode_timestamp(value));
}

pub fn put_opt_map(fields: &mut Fields, key: &str, value: Option<&Map<String, Value>>) {
    if let Some(map) = value {
        if !map.is_empty() {
            fields.insert(key.to_string(), Value::Object(map.clone()));
        }
    }
}

// ==================== READERS ====================

pub fn req_str(collection: &str, fields: &Fields, key: &str) -> Result<String, StoreError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(StoreError::malformed(collection, key, "is not a string")),
        None => Err(StoreError::malformed(collection, key, "is missing")),
    }
}

pub fn opt_str(collection: &str, fields: &Fields, key: &str) -> Result<Option<String>, StoreError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(StoreError::malformed(collection, key, "is not a string")),
    }
}

pub fn req_u32(collection: &str, fields: &Fields, key: &str) -> Result<u32, StoreError> {
    let number = fields
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| StoreError::malformed(collection, key, "is not an integer"))?;
    u32::try_from(number)
        .map_err(|_| StoreError::malformed(collection, key, "is out of range"))
}

pub fn req_timestamp(
    collection: &str,
    fields: &Fields,
    key: &str,
) -> Result<DateTime<Utc>, StoreError> {
    let millis = fields
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| StoreError::malformed(collection, key, "is not a timestamp"))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StoreError::malformed(collection, key, "is not a valid timestamp"))
}

/// Parses a closed enum field via its `FromStr` spelling.
pub fn req_enum<T: FromStr>(collection: &str, fields: &Fields, key: &str) -> Result<T, StoreError> {
    let raw = req_str(collection, fields, key)?;
    T::from_str(&raw)
        .map_err(|_| StoreError::malformed(collection, key, "holds an unknown value"))
}

pub fn opt_map(
    collection: &str,
    fields: &Fields,
    key: &str,
) -> Result<Option<Map<String, Value>>, StoreError> {
    match fields.get(key) {
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(StoreError::malformed(collection, key, "is not an object")),
    }
}

// ==================== TESTS ====================
