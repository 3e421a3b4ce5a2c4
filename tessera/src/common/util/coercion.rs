use chrono::{DateTime, Utc};

use crate::collection::Document;
use crate::common::{format_timestamp, parse_timestamp, timestamp_from_millis, Value};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};

// Lenient conversions shared by the typed getters, schema validation and
// Convertible. Absence and null never fail; only a present value that cannot
// be read as the requested type does.

fn coercion_error(field: &str, value: &Value, target: &str) -> TesseraError {
    log::error!(
        "Field '{}' holds {} which cannot be read as {}",
        field,
        value.type_name(),
        target
    );
    TesseraError::new(
        &format!(
            "Field '{}' holds {} which cannot be read as {}",
            field,
            value.type_name(),
            target
        ),
        ErrorKind::InvalidDataType,
    )
}

pub fn coerce_string(field: &str, value: &Value) -> TesseraResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Int(i) => Ok(Some(i.to_string())),
        Value::Float(f) => Ok(Some(f.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Timestamp(ts) => Ok(Some(format_timestamp(ts))),
        _ => Err(coercion_error(field, value, "a string")),
    }
}

pub fn coerce_long(field: &str, value: &Value) -> TesseraResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => Ok(Some(*i)),
        Value::Float(f) => float_to_long(*f)
            .map(Some)
            .ok_or_else(|| coercion_error(field, value, "an integer")),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(parsed) = text.parse::<i64>() {
                return Ok(Some(parsed));
            }
            text.parse::<f64>()
                .ok()
                .and_then(float_to_long)
                .map(Some)
                .ok_or_else(|| coercion_error(field, value, "an integer"))
        }
        _ => Err(coercion_error(field, value, "an integer")),
    }
}

pub fn coerce_int(field: &str, value: &Value) -> TesseraResult<Option<i32>> {
    match coerce_long(field, value)? {
        None => Ok(None),
        Some(long) => i32::try_from(long)
            .map(Some)
            .map_err(|_| coercion_error(field, value, "a 32-bit integer")),
    }
}

pub fn coerce_float(field: &str, value: &Value) -> TesseraResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => Ok(Some(*i as f64)),
        Value::Float(f) => Ok(Some(*f)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| coercion_error(field, value, "a number")),
        _ => Err(coercion_error(field, value, "a number")),
    }
}

pub fn coerce_boolean(field: &str, value: &Value) -> TesseraResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Int(0) => Ok(Some(false)),
        Value::Int(1) => Ok(Some(true)),
        Value::String(s) => {
            let text = s.trim();
            if text.eq_ignore_ascii_case("true") {
                Ok(Some(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Some(false))
            } else {
                Err(coercion_error(field, value, "a boolean"))
            }
        }
        _ => Err(coercion_error(field, value, "a boolean")),
    }
}

pub fn coerce_timestamp(field: &str, value: &Value) -> TesseraResult<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Ok(None),
        Value::Timestamp(ts) => Ok(Some(*ts)),
        Value::Int(millis) => timestamp_from_millis(*millis)
            .map(Some)
            .map_err(|_| coercion_error(field, value, "a timestamp")),
        Value::String(s) => parse_timestamp(s)
            .map(Some)
            .map_err(|_| coercion_error(field, value, "a timestamp")),
        _ => Err(coercion_error(field, value, "a timestamp")),
    }
}

pub fn coerce_sequence(field: &str, value: &Value) -> TesseraResult<Option<Vec<Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items.clone())),
        _ => Err(coercion_error(field, value, "an array")),
    }
}

pub fn coerce_document(field: &str, value: &Value) -> TesseraResult<Option<Document>> {
    match value {
        Value::Null => Ok(None),
        Value::Document(doc) => Ok(Some(doc.clone())),
        _ => Err(coercion_error(field, value, "a document")),
    }
}

fn float_to_long(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
