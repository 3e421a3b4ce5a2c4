use crate::errors::{TesseraError, TesseraResult};
use crate::schema::{SchemaBuilder, SchemaRegistry};
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::{StoreProvider, TesseraStore};
use crate::tessera::Tessera;
use crate::tessera_config::TesseraConfig;

/// Builder for a connected [Tessera].
///
/// Each step keeps the first failure and [TesseraBuilder::open] reports it.
///
/// ```
/// use tessera::schema::Schema;
/// use tessera::Tessera;
///
/// let db = Tessera::builder()
///     .schema(Schema::collection("users").string("name").required())
///     .open()
///     .unwrap();
/// assert!(db.is_connected());
/// assert!(db.registry().contains("users"));
/// ```
#[derive(Default)]
pub struct TesseraBuilder {
    error: Option<TesseraError>,
    config: TesseraConfig,
}

impl TesseraBuilder {
    pub fn new() -> Self {
        TesseraBuilder {
            error: None,
            config: TesseraConfig::new(),
        }
    }

    /// Connects to `provider` instead of the default in-memory store.
    pub fn store<T: StoreProvider + 'static>(self, provider: T) -> Self {
        self.store_handle(TesseraStore::new(provider))
    }

    /// Connects to an already shared store handle.
    pub fn store_handle(mut self, store: TesseraStore) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_store(store) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Connects to a new in-memory store built from `config`.
    pub fn in_memory(self, config: InMemoryStoreConfig) -> Self {
        self.store(InMemoryStore::new(config))
    }

    /// Shares an existing registry instead of starting an empty one.
    pub fn schema_registry(mut self, registry: SchemaRegistry) -> Self {
        self.config.set_registry(registry);
        self
    }

    /// Registers the schema `builder` produces when the store opens.
    pub fn schema(mut self, builder: SchemaBuilder) -> Self {
        if self.error.is_none() {
            let result = builder
                .build()
                .and_then(|schema| self.config.add_schema(schema));
            if let Err(e) = result {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn open(self) -> TesseraResult<Tessera> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let tessera = Tessera::with_registry(self.config.registry().clone());
        for schema in self.config.schemas() {
            tessera.registry().register(schema.clone())?;
        }
        tessera.connect_store(self.config.store_or_default())?;
        Ok(tessera)
    }
}
