use crate::common::DEFAULT_STORE_NAME;

/// Configuration for an [super::InMemoryStore].
///
/// ```text
/// let config = InMemoryStoreConfig::new()
///     .with_name("test-store")
///     .with_collection("users");
/// let store = InMemoryStore::new(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStoreConfig {
    name: String,
    collections: Vec<String>,
}

impl InMemoryStoreConfig {
    pub fn new() -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            name: DEFAULT_STORE_NAME.to_string(),
            collections: Vec::new(),
        }
    }

    /// Sets the name the store reports in logs.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Creates this collection, empty, when the store opens.
    pub fn with_collection(mut self, collection: &str) -> Self {
        if !self.collections.iter().any(|c| c == collection) {
            self.collections.push(collection.to_string());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        InMemoryStoreConfig::new()
    }
}
