use crate::collection::{Document, DocumentId, FindOptions};
use crate::common::{now_millis, Value, DOC_ID};
use crate::delete::Delete;
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::filter::{field, Filter};
use crate::query::Query;
use crate::schema::{Schema, SchemaRegistry};
use crate::store::{StoreProvider, TesseraStore};
use crate::tessera_builder::TesseraBuilder;
use crate::update::Update;
use parking_lot::RwLock;
use std::sync::Arc;

/// Entry point of the mapper.
///
/// `Tessera` owns one store connection and the [SchemaRegistry] consulted on
/// every write. Clones share both. Builders for reads, updates and deletes
/// come from [Tessera::find], [Tessera::update] and [Tessera::delete]; the
/// remaining methods are single-document conveniences.
///
/// Writes to a collection with a registered schema get defaults applied,
/// auto timestamps stamped, and constraints checked before they reach the
/// store. On success the caller's document is updated to what was stored.
///
/// ```
/// use tessera::doc;
/// use tessera::schema::Schema;
/// use tessera::Tessera;
///
/// let db = Tessera::builder()
///     .schema(Schema::collection("users").string("name").required().timestamps())
///     .open()
///     .unwrap();
///
/// let mut ada = doc! { name: "Ada" };
/// let id = db.save("users", &mut ada).unwrap();
/// assert_eq!(ada.id(), Some(id.clone()));
/// assert!(ada.has("createdAt"));
///
/// let found = db.find_by_id("users", &id).unwrap().unwrap();
/// assert_eq!(found.get_string("name").unwrap(), Some("Ada".to_string()));
/// ```
#[derive(Clone)]
pub struct Tessera {
    inner: Arc<TesseraInner>,
}

impl std::fmt::Debug for Tessera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tessera").finish_non_exhaustive()
    }
}

impl Tessera {
    /// An unconnected instance with an empty registry.
    pub fn new() -> Self {
        Tessera::with_registry(SchemaRegistry::new())
    }

    /// An unconnected instance sharing `registry`.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Tessera {
            inner: Arc::new(TesseraInner {
                registry,
                connection: RwLock::new(None),
            }),
        }
    }

    pub fn builder() -> TesseraBuilder {
        TesseraBuilder::new()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.inner.registry
    }

    /// Connects to `provider`, closing any previous connection.
    pub fn connect<T: StoreProvider + 'static>(&self, provider: T) -> TesseraResult<()> {
        self.connect_store(TesseraStore::new(provider))
    }

    /// Connects to a shared store handle, closing any previous connection
    /// unless it is this same handle.
    pub fn connect_store(&self, store: TesseraStore) -> TesseraResult<()> {
        self.inner.connect(store)
    }

    /// Closes the current connection, if any.
    pub fn disconnect(&self) -> TesseraResult<()> {
        self.inner.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connection.read().is_some()
    }

    /// The connected store, or [ErrorKind::StoreNotInitialized].
    pub fn store(&self) -> TesseraResult<TesseraStore> {
        self.inner.store()
    }

    pub fn find(&self, collection: &str) -> Query {
        Query::new(self.clone(), collection)
    }

    pub fn update(&self, collection: &str) -> Update {
        Update::new(self.clone(), collection)
    }

    pub fn delete(&self, collection: &str) -> Delete {
        Delete::new(self.clone(), collection)
    }

    /// Looks a document up by id. A blank or unknown id gives `None`.
    pub fn find_by_id(&self, collection: &str, id: &str) -> TesseraResult<Option<Document>> {
        let filter = match id_filter(id) {
            Some(filter) => filter,
            None => return Ok(None),
        };

        let store = self.store()?;
        let records = store.find(collection, &filter, &FindOptions::new().limit(1))?;
        records.first().map(Document::from_wire).transpose()
    }

    /// Inserts a document without an id, or replaces the stored document
    /// with the same id, inserting it when there is none. Returns the id,
    /// which is also set on `document`.
    pub fn save(&self, collection: &str, document: &mut Document) -> TesseraResult<String> {
        let id = match present_id(document) {
            Some(id) => id,
            None => return self.insert(collection, document),
        };

        let store = self.store()?;
        let mut prepared = document.clone();
        if let Some(schema) = self.registry().get(collection) {
            let now = Value::from(now_millis());
            self.keep_created(&store, collection, &id, &schema, &mut prepared, &now)?;
            self.prepare(&store, collection, &id, &schema, &mut prepared, &now)?;
        }

        store.replace(collection, &id, prepared.to_wire(), true)?;
        log::debug!("Saved document {} in {}", id, collection);
        *document = prepared;
        Ok(id)
    }

    /// Inserts `document`, generating an id when it has none. Returns the
    /// id, which is also set on `document`.
    pub fn insert(&self, collection: &str, document: &mut Document) -> TesseraResult<String> {
        let store = self.store()?;
        let mut prepared = document.clone();
        let id = match present_id(&prepared) {
            Some(id) => id,
            None => {
                let id = DocumentId::new().to_string();
                prepared.set_id(id.as_str());
                id
            }
        };

        if let Some(schema) = self.registry().get(collection) {
            let now = Value::from(now_millis());
            for name in schema.auto_create_fields() {
                if !prepared.has(&name) {
                    prepared.set(&name, now.clone());
                }
            }
            self.prepare(&store, collection, &id, &schema, &mut prepared, &now)?;
        }

        store.insert(collection, prepared.to_wire())?;
        log::debug!("Inserted document {} in {}", id, collection);
        *document = prepared;
        Ok(id)
    }

    /// Deletes the document with this id. A blank or unknown id gives
    /// `false`.
    pub fn delete_by_id(&self, collection: &str, id: &str) -> TesseraResult<bool> {
        let filter = match id_filter(id) {
            Some(filter) => filter,
            None => return Ok(false),
        };

        let store = self.store()?;
        Ok(store.delete(collection, &filter, true)? > 0)
    }

    pub fn count(&self, collection: &str) -> TesseraResult<u64> {
        let store = self.store()?;
        store.count(collection, &Filter::All)
    }

    pub fn exists(&self, collection: &str, id: &str) -> TesseraResult<bool> {
        let filter = match id_filter(id) {
            Some(filter) => filter,
            None => return Ok(false),
        };

        let store = self.store()?;
        Ok(store.count(collection, &filter)? > 0)
    }

    /// Carries auto-create values over from the stored document when a
    /// replacement omits them; a new document gets the current time.
    fn keep_created(
        &self,
        store: &TesseraStore,
        collection: &str,
        id: &str,
        schema: &Schema,
        document: &mut Document,
        now: &Value,
    ) -> TesseraResult<()> {
        let missing: Vec<String> = schema
            .auto_create_fields()
            .into_iter()
            .filter(|name| !document.has(name))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let stored = match id_filter(id) {
            Some(filter) => store
                .find(collection, &filter, &FindOptions::new().limit(1))?
                .first()
                .map(Document::from_wire)
                .transpose()?,
            None => None,
        };

        for name in missing {
            let value = stored
                .as_ref()
                .and_then(|stored| stored.get(&name))
                .cloned()
                .unwrap_or_else(|| now.clone());
            document.set(&name, value);
        }
        Ok(())
    }

    /// Applies defaults, stamps auto-update fields, validates, and checks
    /// unique fields against the store.
    fn prepare(
        &self,
        store: &TesseraStore,
        collection: &str,
        id: &str,
        schema: &Schema,
        document: &mut Document,
        now: &Value,
    ) -> TesseraResult<()> {
        for name in schema.auto_update_fields() {
            document.set(&name, now.clone());
        }
        schema.apply_defaults(document);
        schema.validate(document)?;

        for name in schema.unique_fields() {
            let value = match document.get(&name) {
                Some(value) if !value.is_null() => value.clone(),
                _ => continue,
            };

            let clash = field(&name).eq(value).and(field(DOC_ID).ne(id));
            if store.count(collection, &clash)? > 0 {
                log::error!("Duplicate value for unique field '{}' in {}", name, collection);
                return Err(TesseraError::new(
                    &format!(
                        "Another document in {} already has this value for unique field '{}'",
                        collection, name
                    ),
                    ErrorKind::UniqueConstraintViolation,
                ));
            }
        }
        Ok(())
    }
}

impl Default for Tessera {
    fn default() -> Self {
        Tessera::new()
    }
}

struct TesseraInner {
    registry: SchemaRegistry,
    connection: RwLock<Option<TesseraStore>>,
}

impl TesseraInner {
    fn connect(&self, store: TesseraStore) -> TesseraResult<()> {
        if store.is_closed() {
            log::error!("Cannot connect to closed store {}", store.name());
            return Err(TesseraError::new(
                &format!("Cannot connect to store {}, it is already closed", store.name()),
                ErrorKind::StoreAlreadyClosed,
            ));
        }

        let previous = self.connection.write().replace(store.clone());
        if let Some(previous) = previous {
            if Arc::ptr_eq(&*previous, &*store) {
                return Ok(());
            }

            log::warn!(
                "Replacing connection to {} with {}",
                previous.name(),
                store.name()
            );
            if let Err(err) = previous.close() {
                log::warn!("Failed to close store {}: {}", previous.name(), err);
            }
        }
        log::debug!("Connected to store {}", store.name());
        Ok(())
    }

    fn disconnect(&self) -> TesseraResult<()> {
        let current = self.connection.write().take();
        match current {
            Some(store) => {
                log::debug!("Disconnecting from store {}", store.name());
                store.close()
            }
            None => Ok(()),
        }
    }

    fn store(&self) -> TesseraResult<TesseraStore> {
        match self.connection.read().as_ref() {
            Some(store) => Ok(store.clone()),
            None => {
                log::error!("No store is connected");
                Err(TesseraError::new(
                    "No store is connected, call connect() first",
                    ErrorKind::StoreNotInitialized,
                ))
            }
        }
    }
}

fn present_id(document: &Document) -> Option<String> {
    document.id().filter(|id| !id.trim().is_empty())
}

fn id_filter(id: &str) -> Option<Filter> {
    if id.trim().is_empty() {
        None
    } else {
        Some(field(DOC_ID).eq(id))
    }
}
