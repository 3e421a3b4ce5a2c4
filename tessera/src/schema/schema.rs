use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::schema::field::child_path;
use crate::schema::{FieldDefinition, IndexDeclaration, SchemaBuilder};
use indexmap::IndexMap;

/// Declared shape of the documents of one collection, or of an embedded
/// document when it has no collection name.
///
/// Schemas are optional. Documents of a collection without a registered
/// schema are stored as they are.
///
/// ```
/// use tessera::schema::Schema;
///
/// let users = Schema::collection("users")
///     .id("id")
///     .string("name").required()
///     .integer("age").min(0)
///     .timestamps()
///     .build()
///     .unwrap();
///
/// assert_eq!(users.collection_name(), Some("users"));
/// assert!(users.get_field("name").unwrap().is_required());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) collection: Option<String>,
    pub(crate) fields: IndexMap<String, FieldDefinition>,
    pub(crate) indexes: Vec<IndexDeclaration>,
    pub(crate) timestamps: bool,
}

impl Schema {
    /// Starts a schema for the named collection.
    pub fn collection(name: &str) -> SchemaBuilder {
        SchemaBuilder::new(Some(name.to_string()))
    }

    /// Starts an embedded schema, usable only nested inside another one.
    pub fn object() -> SchemaBuilder {
        SchemaBuilder::new(None)
    }

    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn is_embedded(&self) -> bool {
        self.collection.is_none()
    }

    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    pub fn indexes(&self) -> &[IndexDeclaration] {
        &self.indexes
    }

    /// Resolves a field by name, following dotted paths into embedded
    /// schemas.
    pub fn get_field(&self, path: &str) -> Option<&FieldDefinition> {
        if let Some(field) = self.fields.get(path) {
            return Some(field);
        }

        let (head, rest) = path.split_once(FIELD_SEPARATOR)?;
        let field = self.fields.get(head)?;
        field.nested()?.get_field(rest)
    }

    /// Names of the fields filled in on first insert.
    pub fn auto_create_fields(&self) -> Vec<String> {
        self.fields()
            .filter(|field| field.is_auto_create())
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Names of the fields refreshed on every write.
    pub fn auto_update_fields(&self) -> Vec<String> {
        self.fields()
            .filter(|field| field.is_auto_update())
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Top level fields declared unique.
    pub fn unique_fields(&self) -> Vec<String> {
        self.fields()
            .filter(|field| field.is_unique())
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Fills absent fields that declare a default, recursing into embedded
    /// documents that are present.
    pub fn apply_defaults(&self, document: &mut Document) {
        for field in self.fields() {
            match document.get(field.name()) {
                None | Some(Value::Null) => {
                    if let Some(default) = field.default_value() {
                        document.set(field.name(), default.clone());
                    }
                }
                Some(Value::Document(embedded)) => {
                    if let Some(nested) = field.nested() {
                        let mut embedded = embedded.clone();
                        nested.apply_defaults(&mut embedded);
                        document.set(field.name(), embedded);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Checks a document against every declared field. Fields the schema
    /// does not declare are accepted as they are.
    pub fn validate(&self, document: &Document) -> TesseraResult<()> {
        self.validate_at(document, "")
    }

    pub(crate) fn validate_at(&self, document: &Document, prefix: &str) -> TesseraResult<()> {
        for field in self.fields() {
            let path = child_path(prefix, field.name());
            match document.get(field.name()) {
                None | Some(Value::Null) => {
                    if field.is_required() {
                        log::error!("Required field '{}' is missing", path);
                        return Err(TesseraError::new(
                            &format!("Required field '{}' is missing", path),
                            ErrorKind::MissingRequiredField,
                        ));
                    }
                }
                Some(value) => field.validate_value(&path, value)?,
            }
        }
        Ok(())
    }
}
