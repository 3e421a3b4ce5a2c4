use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::schema::Schema;
use regex::Regex;
use std::fmt::Display;
use std::sync::Arc;

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A document identifier, stored as text.
    Id,
    String,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Any number.
    Number,
    Boolean,
    Timestamp,
    List,
    /// A free-form nested document.
    Object,
    /// A nested document with its own schema.
    Embedded,
}

impl FieldType {
    /// Whether a non-null value is compatible with this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Id => value.is_string() || value.is_int(),
            FieldType::String => value.is_string(),
            FieldType::Integer => match integral(value) {
                Some(i) => i32::try_from(i).is_ok(),
                None => false,
            },
            FieldType::Long => integral(value).is_some(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_bool(),
            FieldType::Timestamp => value.is_timestamp(),
            FieldType::List => value.is_array(),
            FieldType::Object | FieldType::Embedded => value.is_document(),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Id => "id",
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::List => "list",
            FieldType::Object => "object",
            FieldType::Embedded => "embedded",
        };
        write!(f, "{}", name)
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}

/// One declared field of a [Schema] and its constraints.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) item_type: Option<FieldType>,
    pub(crate) required: bool,
    pub(crate) unique: bool,
    pub(crate) default: Option<Value>,
    pub(crate) min: Option<Value>,
    pub(crate) max: Option<Value>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) nested: Option<Arc<Schema>>,
    pub(crate) auto_create: bool,
    pub(crate) auto_update: bool,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        FieldDefinition {
            name: name.to_string(),
            field_type,
            item_type: None,
            required: false,
            unique: false,
            default: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            enum_values: None,
            nested: None,
            auto_create: false,
            auto_update: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Element type of a list field, when declared.
    pub fn item_type(&self) -> Option<FieldType> {
        self.item_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    pub fn nested(&self) -> Option<&Arc<Schema>> {
        self.nested.as_ref()
    }

    /// Filled with the current time when a document is first inserted.
    pub fn is_auto_create(&self) -> bool {
        self.auto_create
    }

    /// Filled with the current time on every write.
    pub fn is_auto_update(&self) -> bool {
        self.auto_update
    }

    /// Checks a present, non-null value against every constraint.
    pub(crate) fn validate_value(&self, path: &str, value: &Value) -> TesseraResult<()> {
        if !self.field_type.accepts(value) {
            return Err(validation_error(format!(
                "Field '{}' expects {} but holds {}",
                path,
                self.field_type,
                value.type_name()
            )));
        }

        if let (Some(item_type), Value::Array(items)) = (self.item_type, value) {
            if let Some(position) = items
                .iter()
                .position(|item| !item.is_null() && !item_type.accepts(item))
            {
                return Err(validation_error(format!(
                    "Field '{}' expects {} items but item {} holds {}",
                    path,
                    item_type,
                    position,
                    items[position].type_name()
                )));
            }
        }

        if let Some(min) = &self.min {
            if value.is_comparable_with(min) && value < min {
                return Err(validation_error(format!(
                    "Field '{}' must be at least {}",
                    path, min
                )));
            }
        }
        if let Some(max) = &self.max {
            if value.is_comparable_with(max) && value > max {
                return Err(validation_error(format!(
                    "Field '{}' must be at most {}",
                    path, max
                )));
            }
        }

        let length = match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };
        if let Some(length) = length {
            if self.min_length.is_some_and(|min| length < min) {
                return Err(validation_error(format!(
                    "Field '{}' is shorter than {}",
                    path,
                    self.min_length.unwrap_or_default()
                )));
            }
            if self.max_length.is_some_and(|max| length > max) {
                return Err(validation_error(format!(
                    "Field '{}' is longer than {}",
                    path,
                    self.max_length.unwrap_or_default()
                )));
            }
        }

        if let (Some(pattern), Value::String(text)) = (&self.pattern, value) {
            if !pattern.is_match(text) {
                return Err(validation_error(format!(
                    "Field '{}' does not match pattern {}",
                    path,
                    pattern.as_str()
                )));
            }
        }

        if let Some(allowed) = &self.enum_values {
            if !allowed.contains(value) {
                return Err(validation_error(format!(
                    "Field '{}' holds {} which is not one of the allowed values",
                    path, value
                )));
            }
        }

        if let (Some(nested), Value::Document(document)) = (&self.nested, value) {
            nested.validate_at(document, path)?;
        }
        Ok(())
    }
}

pub(crate) fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, FIELD_SEPARATOR, name)
    }
}

fn validation_error(message: String) -> TesseraError {
    log::error!("{}", message);
    TesseraError::new(&message, ErrorKind::ValidationError)
}
