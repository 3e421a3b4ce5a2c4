use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::collection::DocumentId;
use crate::common::{
    coerce_boolean, coerce_document, coerce_float, coerce_int, coerce_long, coerce_sequence,
    coerce_string, coerce_timestamp, Convertible, Value, DOC_ID, FIELD_SEPARATOR,
};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

type FieldVec = SmallVec<[String; 8]>;

/// An ordered mapping from field name to [Value].
///
/// Fields keep their insertion order. The identifier, when present, lives
/// under the `id` key.
///
/// Keys passed to [Document::set], [Document::get], [Document::has] and
/// [Document::unset] are paths: `"address.city"` addresses the `city` field of
/// the nested `address` document. Writes create the nested documents they
/// need. Reads through a missing segment return `None`, and numeric segments
/// index into arrays (`"tags.0"`).
///
/// Two documents are equal when they hold the same fields with equal values,
/// regardless of field order.
#[derive(Clone, Default)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top-level fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `path`, creating intermediate documents.
    ///
    /// Never fails. An intermediate segment that is absent, or that holds
    /// anything other than a document, is replaced by a new empty document.
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.set("user.name", "Ada").set("user.age", 36);
    /// assert!(doc.get("user").unwrap().is_document());
    /// ```
    pub fn set<T: Into<Value>>(&mut self, path: &str, value: T) -> &mut Self {
        let value = value.into();
        if !path.contains(FIELD_SEPARATOR) {
            self.data.insert(path.to_string(), value);
        } else {
            let splits: Vec<&str> = path.split(FIELD_SEPARATOR).collect();
            self.deep_set(&splits, value);
        }
        self
    }

    /// Inserts under a literal key, without path resolution.
    pub(crate) fn set_raw(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Returns the value at `path`, if every segment resolves.
    pub fn get(&self, path: &str) -> Option<&Value> {
        // a literal top-level key wins over path resolution
        if let Some(value) = self.data.get(path) {
            return Some(value);
        }
        if !path.contains(FIELD_SEPARATOR) {
            return None;
        }

        let mut splits = path.split(FIELD_SEPARATOR);
        let first = splits.next()?;
        let mut current = self.data.get(first)?;
        for key in splits {
            current = match current {
                Value::Document(doc) => doc.data.get(key)?,
                Value::Array(arr) => arr.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Whether `path` resolves. An explicit null counts as present.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Removes the value at `path` and returns it.
    ///
    /// Parent documents are left in place even when they become empty.
    pub fn unset(&mut self, path: &str) -> Option<Value> {
        if self.data.contains_key(path) {
            return self.data.shift_remove(path);
        }

        let (parent, last) = path.rsplit_once(FIELD_SEPARATOR)?;
        match self.get_mut(parent)? {
            Value::Document(doc) => doc.data.shift_remove(last),
            Value::Array(arr) => {
                let index = last.parse::<usize>().ok()?;
                if index < arr.len() {
                    Some(arr.remove(index))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns a snapshot copy of the top-level fields.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.data.clone()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    /// All leaf paths, descending into nested documents.
    pub fn fields(&self) -> FieldVec {
        self.get_fields_internal("")
    }

    /// Deep-merges `other` into this document. Nested documents merge field by
    /// field; every other value from `other` overwrites.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            match (self.data.get_mut(key), value) {
                (Some(Value::Document(existing)), Value::Document(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// The identifier in its text form.
    pub fn id(&self) -> Option<String> {
        match self.data.get(DOC_ID) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Int(id)) => Some(id.to_string()),
            _ => None,
        }
    }

    /// The identifier, when it is a well-formed [DocumentId].
    pub fn document_id(&self) -> Option<DocumentId> {
        self.id().and_then(|id| DocumentId::parse(&id).ok())
    }

    pub fn has_id(&self) -> bool {
        self.id().is_some()
    }

    /// Sets the identifier, keeping it as the first field.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        let value = Value::String(id.into());
        if let Some(existing) = self.data.get_mut(DOC_ID) {
            *existing = value;
        } else {
            self.data.shift_insert(0, DOC_ID.to_string(), value);
        }
        self
    }

    pub fn get_string(&self, path: &str) -> TesseraResult<Option<String>> {
        self.coerce(path, coerce_string)
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> TesseraResult<String> {
        Ok(self.get_string(path)?.unwrap_or_else(|| default.to_string()))
    }

    /// Reads a 32-bit integer. Fails when the stored number does not fit.
    pub fn get_int(&self, path: &str) -> TesseraResult<Option<i32>> {
        self.coerce(path, coerce_int)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> TesseraResult<i32> {
        Ok(self.get_int(path)?.unwrap_or(default))
    }

    pub fn get_long(&self, path: &str) -> TesseraResult<Option<i64>> {
        self.coerce(path, coerce_long)
    }

    pub fn get_long_or(&self, path: &str, default: i64) -> TesseraResult<i64> {
        Ok(self.get_long(path)?.unwrap_or(default))
    }

    pub fn get_float(&self, path: &str) -> TesseraResult<Option<f64>> {
        self.coerce(path, coerce_float)
    }

    pub fn get_float_or(&self, path: &str, default: f64) -> TesseraResult<f64> {
        Ok(self.get_float(path)?.unwrap_or(default))
    }

    pub fn get_boolean(&self, path: &str) -> TesseraResult<Option<bool>> {
        self.coerce(path, coerce_boolean)
    }

    pub fn get_boolean_or(&self, path: &str, default: bool) -> TesseraResult<bool> {
        Ok(self.get_boolean(path)?.unwrap_or(default))
    }

    /// Reads a timestamp. RFC 3339 strings and epoch milliseconds are accepted.
    pub fn get_timestamp(&self, path: &str) -> TesseraResult<Option<DateTime<Utc>>> {
        self.coerce(path, coerce_timestamp)
    }

    pub fn get_timestamp_or(
        &self,
        path: &str,
        default: DateTime<Utc>,
    ) -> TesseraResult<DateTime<Utc>> {
        Ok(self.get_timestamp(path)?.unwrap_or(default))
    }

    pub fn get_sequence(&self, path: &str) -> TesseraResult<Option<Vec<Value>>> {
        self.coerce(path, coerce_sequence)
    }

    pub fn get_sequence_or(&self, path: &str, default: Vec<Value>) -> TesseraResult<Vec<Value>> {
        Ok(self.get_sequence(path)?.unwrap_or(default))
    }

    pub fn get_document(&self, path: &str) -> TesseraResult<Option<Document>> {
        self.coerce(path, coerce_document)
    }

    pub fn get_document_or(&self, path: &str, default: Document) -> TesseraResult<Document> {
        Ok(self.get_document(path)?.unwrap_or(default))
    }

    /// Maps this document onto a [Convertible] type.
    pub fn map_to<T: Convertible<Output = T>>(&self) -> TesseraResult<T> {
        T::from_value(&Value::Document(self.clone()))
    }

    /// Builds a document from a [Convertible] value that maps to a document.
    pub fn from_convertible<T: Convertible>(value: &T) -> TesseraResult<Document> {
        match value.to_value()? {
            Value::Document(doc) => Ok(doc),
            other => {
                log::error!("Value {} does not map to a document", other.type_name());
                Err(TesseraError::new(
                    &format!("Value {} does not map to a document", other.type_name()),
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut json_string = String::with_capacity(self.data.len() * 30 + indent * 2);
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            json_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_pretty_json(indent + 2)
            ));
        }

        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut debug_string = String::new();
        debug_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            debug_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_debug_string(indent + 2)
            ));
        }

        debug_string.pop();
        debug_string.pop();
        debug_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        debug_string
    }

    fn coerce<T>(
        &self,
        path: &str,
        read: fn(&str, &Value) -> TesseraResult<Option<T>>,
    ) -> TesseraResult<Option<T>> {
        match self.get(path) {
            None => Ok(None),
            Some(value) => read(path, value),
        }
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        if self.data.contains_key(path) {
            return self.data.get_mut(path);
        }

        let mut splits = path.split(FIELD_SEPARATOR);
        let first = splits.next()?;
        let mut current = self.data.get_mut(first)?;
        for key in splits {
            current = match current {
                Value::Document(doc) => doc.data.get_mut(key)?,
                Value::Array(arr) => arr.get_mut(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn deep_set(&mut self, splits: &[&str], value: Value) {
        match splits {
            [] => {}
            [last] => {
                self.data.insert(last.to_string(), value);
            }
            [first, rest @ ..] => {
                let entry = self
                    .data
                    .entry(first.to_string())
                    .or_insert_with(|| Value::Document(Document::new()));
                if !entry.is_document() {
                    *entry = Value::Document(Document::new());
                }
                if let Value::Document(nested) = entry {
                    nested.deep_set(rest, value);
                }
            }
        }
    }

    fn get_fields_internal(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();
        for (key, value) in self.data.iter() {
            let field = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            if let Value::Document(doc) = value {
                fields.append(&mut doc.get_fields_internal(&field));
            } else {
                fields.push(field);
            }
        }
        fields
    }

    fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<(&String, &Value)> = self.data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Document {}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_entries().cmp(&other.sorted_entries())
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (key, value) in self.sorted_entries() {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// ```rust
/// use tessera::doc;
///
/// let empty = doc!{};
///
/// let base = 100;
/// let complex = doc!{
///     name: "Charlie",
///     score: (base * 2),
///     address: {
///         city: "Paris",
///         tags: ["home", "primary"]
///     },
///     values: [1, 2, 3]
/// };
/// assert_eq!(complex.get("address.tags.1").unwrap().as_string().unwrap(), "primary");
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.set(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper for [doc!]: nested documents, arrays and plain expressions.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
