use chrono::{DateTime, Utc};

use crate::collection::{Document, DocumentId};
use crate::common::{
    coerce_boolean, coerce_document, coerce_float, coerce_int, coerce_long, coerce_string,
    coerce_timestamp, Value,
};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};

/// Two-way mapping between a Rust type and a [Value].
///
/// Implemented for the primitives, `String`, `DateTime<Utc>`, [Document],
/// [DocumentId] and the `Option`/`Vec`/`Box` wrappers. Structs and unit enums
/// get it from `#[derive(Convertible)]` in `tessera_derive`.
///
/// Reading goes through the same coercions as the typed document getters, so
/// a field stored as `"42"` maps onto an `i32` field.
pub trait Convertible {
    type Output;

    fn to_value(&self) -> TesseraResult<Value>;
    fn from_value(value: &Value) -> TesseraResult<Self::Output>;
}

/// Reads `T` out of a value. Used by derived implementations.
pub fn from_value<T: Convertible>(value: &Value) -> TesseraResult<T::Output> {
    T::from_value(value)
}

/// Reads `T` out of a document field, treating absence as null.
pub fn field_value<T: Convertible>(document: &Document, field: &str) -> TesseraResult<T::Output> {
    match document.get(field) {
        Some(value) => T::from_value(value),
        None => T::from_value(&Value::Null),
    }
}

/// Logs and builds an [ErrorKind::ObjectMappingError]. Used by derived
/// implementations.
pub fn mapping_error(message: &str) -> TesseraError {
    log::error!("{}", message);
    TesseraError::new(message, ErrorKind::ObjectMappingError)
}

fn required<T>(value: &Value, read: TesseraResult<Option<T>>, target: &str) -> TesseraResult<T> {
    match read? {
        Some(v) => Ok(v),
        None => {
            log::error!("Cannot map {} to {}", value.type_name(), target);
            Err(TesseraError::new(
                &format!("Cannot map {} to {}", value.type_name(), target),
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

macro_rules! impl_convertible_for_narrow_int {
    ($($t:ty),*) => {
        $(
            impl Convertible for $t {
                type Output = $t;

                fn to_value(&self) -> TesseraResult<Value> {
                    Ok(Value::Int(*self as i64))
                }

                fn from_value(value: &Value) -> TesseraResult<Self::Output> {
                    let long = required(value, coerce_long("value", value), stringify!($t))?;
                    <$t>::try_from(long).map_err(|_| {
                        log::error!("Value {} does not fit in {}", long, stringify!($t));
                        TesseraError::new(
                            &format!("Value {} does not fit in {}", long, stringify!($t)),
                            ErrorKind::ObjectMappingError,
                        )
                    })
                }
            }
        )*
    };
}

impl_convertible_for_narrow_int!(i8, i16, u8, u16, u32);

impl Convertible for i32 {
    type Output = i32;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Int(*self as i64))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_int("value", value), "i32")
    }
}

impl Convertible for i64 {
    type Output = i64;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Int(*self))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_long("value", value), "i64")
    }
}

impl Convertible for f32 {
    type Output = f32;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Float(*self as f64))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_float("value", value), "f32").map(|f| f as f32)
    }
}

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Float(*self))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_float("value", value), "f64")
    }
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_boolean("value", value), "bool")
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_string("value", value), "String")
    }
}

impl Convertible for DateTime<Utc> {
    type Output = DateTime<Utc>;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_timestamp("value", value), "DateTime<Utc>")
    }
}

impl Convertible for DocumentId {
    type Output = DocumentId;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        match value {
            Value::String(s) => DocumentId::parse(s),
            Value::Int(i) if *i > 0 => DocumentId::create_id(*i as u64),
            _ => {
                log::error!("Value {} is not a document id", value);
                Err(TesseraError::new(
                    "Value is not a document id",
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
}

impl Convertible for Document {
    type Output = Document;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> TesseraResult<Self> {
        required(value, coerce_document("value", value), "Document")
    }
}

impl Convertible for Value {
    type Output = Value;

    fn to_value(&self) -> TesseraResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> TesseraResult<Self::Output> {
        Ok(value.clone())
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    type Output = Option<T::Output>;

    fn to_value(&self) -> TesseraResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> TesseraResult<Self::Output> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

impl<T> Convertible for Box<T>
where
    T: Convertible,
{
    type Output = Box<T::Output>;

    fn to_value(&self) -> TesseraResult<Value> {
        self.as_ref().to_value()
    }

    fn from_value(value: &Value) -> TesseraResult<Self::Output> {
        Ok(Box::new(T::from_value(value)?))
    }
}

impl<T> Convertible for Vec<T>
where
    T: Convertible,
{
    type Output = Vec<T::Output>;

    fn to_value(&self) -> TesseraResult<Value> {
        let mut arr = Vec::with_capacity(self.len());
        for item in self {
            arr.push(item.to_value()?);
        }
        Ok(Value::Array(arr))
    }

    fn from_value(value: &Value) -> TesseraResult<Self::Output> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(arr) => {
                let mut vec = Vec::with_capacity(arr.len());
                for item in arr {
                    vec.push(T::from_value(item)?);
                }
                Ok(vec)
            }
            _ => {
                log::error!("Value {} is not an array", value);
                Err(TesseraError::new(
                    "Value is not an array",
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
}
