use std::time::Duration;

/// Options of an index declaration.
///
/// Declarations are metadata for the backing store; the in-memory store
/// keeps them on the schema and creates no physical index.
///
/// ```
/// use std::time::Duration;
/// use tessera::schema::{unique_index, IndexOptions};
///
/// let sessions = IndexOptions::new().expire_after(Duration::from_secs(3600));
/// assert!(unique_index().is_unique());
/// assert_eq!(sessions.expiry(), Some(Duration::from_secs(3600)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOptions {
    unique: bool,
    sparse: bool,
    text: bool,
    expire_after: Option<Duration>,
}

impl IndexOptions {
    pub fn new() -> IndexOptions {
        IndexOptions::default()
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Skips documents that lack the indexed fields.
    pub fn sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    pub fn text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    /// Documents expire this long after the indexed timestamp.
    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.expire_after = Some(ttl);
        self
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    pub fn is_text(&self) -> bool {
        self.text
    }

    pub fn expiry(&self) -> Option<Duration> {
        self.expire_after
    }
}

/// Options for a unique index.
pub fn unique_index() -> IndexOptions {
    IndexOptions::new().unique(true)
}

/// Options for a plain index allowing duplicates.
pub fn non_unique_index() -> IndexOptions {
    IndexOptions::new()
}

/// Options for a full-text index.
pub fn text_index() -> IndexOptions {
    IndexOptions::new().text(true)
}

/// An index declared on one or more fields of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDeclaration {
    fields: Vec<String>,
    options: IndexOptions,
}

impl IndexDeclaration {
    pub fn new(fields: Vec<String>, options: IndexOptions) -> Self {
        IndexDeclaration { fields, options }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Whether the declaration covers exactly these fields, in order.
    pub fn covers(&self, fields: &[&str]) -> bool {
        self.fields.len() == fields.len() && self.fields.iter().zip(fields).all(|(a, b)| a == b)
    }
}
