use crate::common::{Value, CREATED_AT, UPDATED_AT};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::schema::{FieldDefinition, FieldType, IndexDeclaration, IndexOptions, Schema, SchemaRegistry};
use regex::Regex;
use std::sync::Arc;

/// Fluent builder for a [Schema].
///
/// Field adders append a definition and make it the current field;
/// configurators such as [SchemaBuilder::required] apply to the current
/// field. The first failure is kept and reported by [SchemaBuilder::build].
///
/// ```
/// use tessera::schema::{unique_index, Schema, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// let schema = Schema::collection("accounts")
///     .string("email").required().unique().pattern("@")
///     .list_of("roles", tessera::schema::FieldType::String)
///     .index(&["email"], unique_index())
///     .register(&registry)
///     .unwrap();
///
/// assert_eq!(schema.unique_fields(), vec!["email"]);
/// assert!(registry.contains("accounts"));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: Schema,
    current: Option<String>,
    error: Option<TesseraError>,
}

impl SchemaBuilder {
    pub(crate) fn new(collection: Option<String>) -> Self {
        SchemaBuilder {
            schema: Schema {
                collection,
                ..Schema::default()
            },
            current: None,
            error: None,
        }
    }

    pub fn id(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Id))
    }

    pub fn string(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::String))
    }

    pub fn integer(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Integer))
    }

    pub fn long(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Long))
    }

    pub fn number(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Number))
    }

    pub fn boolean(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Boolean))
    }

    pub fn timestamp(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Timestamp))
    }

    /// A list holding values of any type.
    pub fn list(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::List))
    }

    /// A list whose non-null items must all be of `item_type`.
    pub fn list_of(self, name: &str, item_type: FieldType) -> Self {
        let mut field = FieldDefinition::new(name, FieldType::List);
        field.item_type = Some(item_type);
        self.add_field(field)
    }

    /// A nested document checked against the schema `nested` builds.
    pub fn embedded(mut self, name: &str, nested: SchemaBuilder) -> Self {
        let nested = match nested.build() {
            Ok(nested) => nested,
            Err(err) => {
                self.keep_error(TesseraError::new_with_cause(
                    &format!("Invalid embedded schema for field '{}'", name),
                    ErrorKind::SchemaError,
                    err,
                ));
                return self;
            }
        };

        let mut field = FieldDefinition::new(name, FieldType::Embedded);
        field.nested = Some(Arc::new(nested));
        self.add_field(field)
    }

    /// A free-form nested document.
    pub fn object(self, name: &str) -> Self {
        self.add_field(FieldDefinition::new(name, FieldType::Object))
    }

    pub fn required(self) -> Self {
        self.configure("required", |field| {
            field.required = true;
            Ok(())
        })
    }

    pub fn unique(self) -> Self {
        self.configure("unique", |field| {
            field.unique = true;
            Ok(())
        })
    }

    pub fn default<T: Into<Value>>(self, value: T) -> Self {
        let value = value.into();
        self.configure("default", move |field| {
            field.default = Some(value);
            Ok(())
        })
    }

    /// Lower bound, compared with values of the same kind.
    pub fn min<T: Into<Value>>(self, bound: T) -> Self {
        let bound = bound.into();
        self.configure("min", move |field| {
            field.min = Some(bound);
            Ok(())
        })
    }

    /// Upper bound, compared with values of the same kind.
    pub fn max<T: Into<Value>>(self, bound: T) -> Self {
        let bound = bound.into();
        self.configure("max", move |field| {
            field.max = Some(bound);
            Ok(())
        })
    }

    pub fn min_length(self, length: usize) -> Self {
        self.configure("min_length", |field| {
            field.min_length = Some(length);
            Ok(())
        })
    }

    pub fn max_length(self, length: usize) -> Self {
        self.configure("max_length", |field| {
            field.max_length = Some(length);
            Ok(())
        })
    }

    pub fn enum_values<T: Into<Value>>(self, values: Vec<T>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.configure("enum_values", move |field| {
            field.enum_values = Some(values);
            Ok(())
        })
    }

    /// A regular expression string values must contain a match for.
    pub fn pattern(self, pattern: &str) -> Self {
        self.configure("pattern", |field| match Regex::new(pattern) {
            Ok(regex) => {
                field.pattern = Some(regex);
                Ok(())
            }
            Err(err) => Err(TesseraError::new_with_cause(
                &format!("Invalid pattern for field '{}'", field.name()),
                ErrorKind::SchemaError,
                TesseraError::from(err),
            )),
        })
    }

    /// Marks the current field to receive the insert time.
    pub fn auto_create(self) -> Self {
        self.configure("auto_create", |field| {
            field.auto_create = true;
            Ok(())
        })
    }

    /// Marks the current field to receive the time of every write.
    pub fn auto_update(self) -> Self {
        self.configure("auto_update", |field| {
            field.auto_update = true;
            Ok(())
        })
    }

    /// Adds `createdAt` and `updatedAt` timestamps maintained on write.
    pub fn timestamps(self) -> Self {
        let mut builder = self
            .timestamp(CREATED_AT)
            .auto_create()
            .timestamp(UPDATED_AT)
            .auto_update();
        builder.schema.timestamps = true;
        builder.current = None;
        builder
    }

    pub fn index(mut self, fields: &[&str], options: IndexOptions) -> Self {
        if fields.is_empty() {
            self.keep_error(TesseraError::new(
                "An index needs at least one field",
                ErrorKind::SchemaError,
            ));
            return self;
        }

        let fields = fields.iter().map(|f| f.to_string()).collect();
        self.schema.indexes.push(IndexDeclaration::new(fields, options));
        self.current = None;
        self
    }

    pub fn build(self) -> TesseraResult<Schema> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.schema),
        }
    }

    /// Builds the schema and registers it under its collection name.
    pub fn register(self, registry: &SchemaRegistry) -> TesseraResult<Arc<Schema>> {
        registry.register(self.build()?)
    }

    fn add_field(mut self, field: FieldDefinition) -> Self {
        if field.name().is_empty() {
            self.keep_error(TesseraError::new(
                "Field name cannot be empty",
                ErrorKind::InvalidFieldName,
            ));
            self.current = None;
            return self;
        }

        let name = field.name().to_string();
        if self.schema.fields.insert(name.clone(), field).is_some() {
            log::warn!("Field '{}' is declared twice, keeping the last definition", name);
        }
        self.current = Some(name);
        self
    }

    fn configure<F>(mut self, what: &str, apply: F) -> Self
    where
        F: FnOnce(&mut FieldDefinition) -> TesseraResult<()>,
    {
        let field = match &self.current {
            Some(name) => self.schema.fields.get_mut(name),
            None => None,
        };

        match field {
            Some(field) => {
                if let Err(err) = apply(field) {
                    self.keep_error(err);
                }
            }
            None => log::warn!("Ignoring {} as no field is being defined", what),
        }
        self
    }

    fn keep_error(&mut self, err: TesseraError) {
        log::error!("{}", err.message());
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
