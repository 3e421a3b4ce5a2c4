use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value as JsonValue};

use crate::collection::{Document, DocumentId};
use crate::common::{
    timestamp_from_millis, Value, DOC_ID, WIRE_DATE, WIRE_ID, WIRE_NUMBER_DOUBLE, WIRE_OID,
};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};

/// The store-native form of a document: a JSON object using extended-JSON
/// markers for identifiers, dates and non-finite floats.
pub type WireRecord = serde_json::Map<String, JsonValue>;

impl Document {
    /// Converts to the store-native record.
    ///
    /// The `id` field becomes `_id` and is written first. A well-formed
    /// [DocumentId] is wrapped as `{"$oid": "..."}`.
    pub fn to_wire(&self) -> WireRecord {
        let mut record = WireRecord::new();
        if let Some(id) = self.get(DOC_ID) {
            record.insert(WIRE_ID.to_string(), encode_id(id));
        }

        for (key, value) in self.iter() {
            if key == DOC_ID {
                continue;
            }
            record.insert(escape_key(key), encode_value(value));
        }
        record
    }

    /// Rebuilds a document from a store-native record.
    pub fn from_wire(record: &WireRecord) -> TesseraResult<Document> {
        let mut document = Document::new();
        for (key, value) in record.iter() {
            if key == WIRE_ID {
                document.set_raw(DOC_ID, decode_id(value)?);
            } else {
                document.set_raw(&unescape_key(key), decode_value(value)?);
            }
        }
        Ok(document)
    }
}

/// Field names starting with `$` get one more `$` on the wire, so a user
/// field can never be read back as a marker.
fn escape_key(key: &str) -> String {
    if key.starts_with('$') {
        format!("${}", key)
    } else {
        key.to_string()
    }
}

fn unescape_key(key: &str) -> String {
    match key.strip_prefix('$') {
        Some(rest) if rest.starts_with('$') => rest.to_string(),
        _ => key.to_string(),
    }
}

pub(crate) fn encode_id(id: &Value) -> JsonValue {
    match id {
        Value::String(text) if DocumentId::parse(text).is_ok() => {
            let mut oid = serde_json::Map::new();
            oid.insert(WIRE_OID.to_string(), JsonValue::String(text.clone()));
            JsonValue::Object(oid)
        }
        other => encode_value(other),
    }
}

pub(crate) fn encode_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number(Number::from(*i)),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(number) => JsonValue::Number(number),
            None => {
                let text = if f.is_nan() {
                    "NaN"
                } else if f.is_sign_positive() {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                marker(WIRE_NUMBER_DOUBLE, JsonValue::String(text.to_string()))
            }
        },
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Timestamp(ts) => marker(
            WIRE_DATE,
            JsonValue::Number(Number::from(ts.timestamp_millis())),
        ),
        Value::Document(doc) => JsonValue::Object(
            doc.iter()
                .map(|(key, value)| (escape_key(key), encode_value(value)))
                .collect(),
        ),
        Value::Array(items) => JsonValue::Array(items.iter().map(encode_value).collect()),
    }
}

fn decode_id(value: &JsonValue) -> TesseraResult<Value> {
    match value {
        JsonValue::Object(map) if map.len() == 1 && map.contains_key(WIRE_OID) => {
            match map.get(WIRE_OID) {
                Some(JsonValue::String(text)) => Ok(Value::String(text.clone())),
                _ => Err(encoding_error("'$oid' must hold a string")),
            }
        }
        JsonValue::Number(number) => match number.as_i64() {
            Some(i) => Ok(Value::String(i.to_string())),
            None => Ok(Value::String(number.to_string())),
        },
        other => decode_value(other),
    }
}

pub(crate) fn decode_value(value: &JsonValue) -> TesseraResult<Value> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(number) => match number.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => number
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| encoding_error(&format!("Unsupported number {}", number))),
        },
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(decode_value(item)?);
            }
            Ok(Value::Array(values))
        }
        JsonValue::Object(map) => {
            if map.len() == 1 {
                if let Some(decoded) = decode_marker(map)? {
                    return Ok(decoded);
                }
            }

            let mut document = Document::new();
            for (key, value) in map.iter() {
                document.set_raw(&unescape_key(key), decode_value(value)?);
            }
            Ok(Value::Document(document))
        }
    }
}

fn decode_marker(map: &serde_json::Map<String, JsonValue>) -> TesseraResult<Option<Value>> {
    if let Some(date) = map.get(WIRE_DATE) {
        let millis = date
            .as_i64()
            .ok_or_else(|| encoding_error("'$date' must hold epoch milliseconds"))?;
        return timestamp_from_millis(millis).map(|ts| Some(Value::Timestamp(ts)));
    }

    if let Some(oid) = map.get(WIRE_OID) {
        return match oid {
            JsonValue::String(text) => Ok(Some(Value::String(text.clone()))),
            _ => Err(encoding_error("'$oid' must hold a string")),
        };
    }

    if let Some(number) = map.get(WIRE_NUMBER_DOUBLE) {
        let parsed = match number.as_str() {
            Some("NaN") => f64::NAN,
            Some("Infinity") => f64::INFINITY,
            Some("-Infinity") => f64::NEG_INFINITY,
            Some(text) => text.parse::<f64>()?,
            None => return Err(encoding_error("'$numberDouble' must hold a string")),
        };
        return Ok(Some(Value::Float(parsed)));
    }

    Ok(None)
}

fn marker(key: &str, value: JsonValue) -> JsonValue {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), value);
    JsonValue::Object(map)
}

fn encoding_error(message: &str) -> TesseraError {
    log::error!("{}", message);
    TesseraError::new(message, ErrorKind::EncodingError)
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = WireRecord::deserialize(deserializer)?;
        Document::from_wire(&record).map_err(serde::de::Error::custom)
    }
}
