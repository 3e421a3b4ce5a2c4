use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::schema::Schema;
use dashmap::DashMap;
use std::sync::Arc;

/// Registered schemas by collection name.
///
/// Clones share the same map. A [crate::Tessera] owns one registry and
/// consults it on every write; tests build their own to stay isolated.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<DashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Registers `schema` under its collection name, replacing any schema
    /// registered before under the same name.
    pub fn register(&self, schema: Schema) -> TesseraResult<Arc<Schema>> {
        let name = match schema.collection_name() {
            Some(name) => name.to_string(),
            None => {
                log::error!("Cannot register an embedded schema");
                return Err(TesseraError::new(
                    "Cannot register an embedded schema, give it a collection name",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let schema = Arc::new(schema);
        if self.schemas.insert(name.clone(), schema.clone()).is_some() {
            log::debug!("Replaced schema of collection {}", name);
        } else {
            log::debug!("Registered schema of collection {}", name);
        }
        Ok(schema)
    }

    pub fn get(&self, collection: &str) -> Option<Arc<Schema>> {
        self.schemas.get(collection).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.schemas.contains_key(collection)
    }

    pub fn remove(&self, collection: &str) -> Option<Arc<Schema>> {
        self.schemas.remove(collection).map(|(_, schema)| schema)
    }

    /// Registered collection names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn clear(&self) {
        self.schemas.clear();
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("collections", &self.names())
            .finish()
    }
}
