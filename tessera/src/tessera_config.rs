//! Settings a [crate::Tessera] opens with.

use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::schema::{Schema, SchemaRegistry};
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::TesseraStore;

/// What [crate::tessera_builder::TesseraBuilder] collects before opening:
/// the store to connect, the registry to share and the schemas to register.
#[derive(Clone, Default)]
pub struct TesseraConfig {
    store: Option<TesseraStore>,
    registry: SchemaRegistry,
    schemas: Vec<Schema>,
}

impl TesseraConfig {
    pub fn new() -> Self {
        TesseraConfig::default()
    }

    pub fn store(&self) -> Option<&TesseraStore> {
        self.store.as_ref()
    }

    /// Selects the store to connect. A closed store is refused.
    pub fn set_store(&mut self, store: TesseraStore) -> TesseraResult<()> {
        if store.is_closed() {
            log::error!("Store {} is already closed", store.name());
            return Err(TesseraError::new(
                &format!("Cannot use store {}, it is already closed", store.name()),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        self.store = Some(store);
        Ok(())
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn set_registry(&mut self, registry: SchemaRegistry) {
        self.registry = registry;
    }

    /// Queues a schema for registration at open time.
    pub fn add_schema(&mut self, schema: Schema) -> TesseraResult<()> {
        if schema.is_embedded() {
            log::error!("Cannot register an embedded schema");
            return Err(TesseraError::new(
                "Cannot register an embedded schema, give it a collection name",
                ErrorKind::InvalidOperation,
            ));
        }
        self.schemas.push(schema);
        Ok(())
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// The selected store, or a fresh in-memory one.
    pub(crate) fn store_or_default(&self) -> TesseraStore {
        match &self.store {
            Some(store) => store.clone(),
            None => TesseraStore::new(InMemoryStore::new(InMemoryStoreConfig::default())),
        }
    }
}
