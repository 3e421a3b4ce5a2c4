use super::collection::InMemoryCollection;
use super::config::InMemoryStoreConfig;
use crate::collection::{
    to_usize, Document, DocumentId, FindOptions, UpdateResult, UpdateSpec, WireRecord,
};
use crate::common::LockRegistry;
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::filter::Filter;
use crate::store::StoreProvider;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The bundled [StoreProvider]: every collection lives in a concurrent skip
/// list, and nothing survives [StoreProvider::close].
///
/// ```text
/// let store = InMemoryStore::new(InMemoryStoreConfig::new());
/// let db = Tessera::builder().store(store).open()?;
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new(config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(config)),
        }
    }

    /// Names of the collections created so far, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .collections
            .iter()
            .map(|entry| entry.value().name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Number of records in `collection`, ignoring filters.
    pub fn size(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map(|entry| entry.value().size())
            .unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        InMemoryStore::new(InMemoryStoreConfig::default())
    }
}

impl StoreProvider for InMemoryStore {
    fn name(&self) -> String {
        self.inner.config.name().to_string()
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> TesseraResult<Vec<WireRecord>> {
        self.inner.find(collection, filter, options)
    }

    fn count(&self, collection: &str, filter: &Filter) -> TesseraResult<u64> {
        self.inner.count(collection, filter)
    }

    fn insert(&self, collection: &str, record: WireRecord) -> TesseraResult<()> {
        self.inner.insert(collection, record)
    }

    fn replace(
        &self,
        collection: &str,
        id: &str,
        record: WireRecord,
        upsert: bool,
    ) -> TesseraResult<bool> {
        self.inner.replace(collection, id, record, upsert)
    }

    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<UpdateResult> {
        self.inner.update(collection, filter, spec)
    }

    fn find_and_modify(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<Option<WireRecord>> {
        self.inner.find_and_modify(collection, filter, spec)
    }

    fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> TesseraResult<u64> {
        self.inner.delete(collection, filter, just_once)
    }

    fn close(&self) -> TesseraResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    config: InMemoryStoreConfig,
    collections: DashMap<String, InMemoryCollection>,
    locks: LockRegistry,
}

impl InMemoryStoreInner {
    fn new(config: InMemoryStoreConfig) -> InMemoryStoreInner {
        let collections = DashMap::new();
        for name in config.collections() {
            collections.insert(name.clone(), InMemoryCollection::new(name));
        }
        log::debug!(
            "Opened in-memory store '{}' with {} collection(s)",
            config.name(),
            collections.len()
        );

        InMemoryStoreInner {
            closed: AtomicBool::new(false),
            config,
            collections,
            locks: LockRegistry::new(),
        }
    }

    fn check_opened(&self) -> TesseraResult<()> {
        if self.closed.load(Ordering::Acquire) {
            log::error!("Store '{}' is already closed", self.config.name());
            return Err(TesseraError::new(
                &format!("Store '{}' is already closed", self.config.name()),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }

    fn existing(&self, name: &str) -> Option<InMemoryCollection> {
        self.collections.get(name).map(|entry| entry.value().clone())
    }

    fn get_or_create(&self, name: &str) -> InMemoryCollection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| InMemoryCollection::new(name))
            .value()
            .clone()
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> TesseraResult<Vec<WireRecord>> {
        self.check_opened()?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.read();

        let Some(records) = self.existing(collection) else {
            return Ok(Vec::new());
        };

        // without sorting, the scan can stop once the page is full
        let scan_limit = match (options.sort_keys().is_empty(), options.limit_count()) {
            (true, Some(limit)) => Some(to_usize(
                options.skip_count().unwrap_or(0).saturating_add(limit),
            )),
            _ => None,
        };
        let documents = records
            .scan(filter, scan_limit)?
            .into_iter()
            .map(|(_, document)| document)
            .collect();

        Ok(options
            .apply(documents)
            .iter()
            .map(Document::to_wire)
            .collect())
    }

    fn count(&self, collection: &str, filter: &Filter) -> TesseraResult<u64> {
        self.check_opened()?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.read();

        match self.existing(collection) {
            Some(records) if filter.is_all() => Ok(records.size() as u64),
            Some(records) => Ok(records.scan(filter, None)?.len() as u64),
            None => Ok(0),
        }
    }

    fn insert(&self, collection: &str, record: WireRecord) -> TesseraResult<()> {
        self.check_opened()?;
        let id = record_id(&record)?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.write();

        let records = self.get_or_create(collection);
        if records.contains(&id) {
            log::error!("Duplicate id '{}' in collection '{}'", id, collection);
            return Err(TesseraError::new(
                &format!("Duplicate id '{}' in collection '{}'", id, collection),
                ErrorKind::UniqueConstraintViolation,
            ));
        }
        records.put(id, record);
        Ok(())
    }

    fn replace(
        &self,
        collection: &str,
        id: &str,
        record: WireRecord,
        upsert: bool,
    ) -> TesseraResult<bool> {
        self.check_opened()?;
        let record_id = record_id(&record)?;
        if record_id != id {
            log::error!("Replacement for '{}' carries id '{}'", id, record_id);
            return Err(TesseraError::new(
                &format!("Replacement for '{}' carries id '{}'", id, record_id),
                ErrorKind::InvalidOperation,
            ));
        }

        let lock = self.locks.get_lock(collection);
        let _guard = lock.write();

        let records = self.get_or_create(collection);
        if !upsert && !records.contains(id) {
            return Ok(false);
        }
        records.put(id.to_string(), record);
        Ok(true)
    }

    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<UpdateResult> {
        self.check_opened()?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.write();

        let records = self.get_or_create(collection);
        let limit = spec.options.is_just_once().then_some(1);
        let matches = records.scan(filter, limit)?;

        let mut result = UpdateResult {
            matched: matches.len() as u64,
            ..UpdateResult::default()
        };

        // every document is computed before anything is written
        let mut changed = Vec::with_capacity(matches.len());
        for (id, original) in matches {
            let updated = apply_update(spec, &original)?;
            if is_modified(&original, &updated) {
                changed.push((id, updated));
            }
        }
        result.modified = changed.len() as u64;
        for (id, updated) in changed {
            records.put(id, updated.to_wire());
        }

        if result.matched == 0 && spec.options.is_upsert() {
            let inserted = upsert_document(&records, filter, spec)?;
            result.upserted_id = inserted.id();
        }
        Ok(result)
    }

    fn find_and_modify(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<Option<WireRecord>> {
        self.check_opened()?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.write();

        let records = self.get_or_create(collection);
        match records.scan(filter, Some(1))?.into_iter().next() {
            Some((id, original)) => {
                let updated = apply_update(spec, &original)?;
                if is_modified(&original, &updated) {
                    records.put(id, updated.to_wire());
                }
                if spec.options.is_return_new() {
                    Ok(Some(updated.to_wire()))
                } else {
                    Ok(Some(original.to_wire()))
                }
            }
            None if spec.options.is_upsert() => {
                let inserted = upsert_document(&records, filter, spec)?;
                if spec.options.is_return_new() {
                    Ok(Some(inserted.to_wire()))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> TesseraResult<u64> {
        self.check_opened()?;
        let lock = self.locks.get_lock(collection);
        let _guard = lock.write();

        let Some(records) = self.existing(collection) else {
            return Ok(0);
        };

        if filter.is_all() && !just_once {
            let removed = records.size() as u64;
            records.clear();
            return Ok(removed);
        }

        let limit = just_once.then_some(1);
        let mut removed = 0;
        for (id, _) in records.scan(filter, limit)? {
            if records.remove(&id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn close(&self) -> TesseraResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        for entry in self.collections.iter() {
            entry.value().clear();
        }
        self.collections.clear();
        log::debug!("Closed in-memory store '{}'", self.config.name());
        Ok(())
    }
}

fn record_id(record: &WireRecord) -> TesseraResult<String> {
    match Document::from_wire(record)?.id() {
        Some(id) => Ok(id),
        None => {
            log::error!("Record has no identifier");
            Err(TesseraError::new(
                "Record has no identifier",
                ErrorKind::InvalidOperation,
            ))
        }
    }
}

/// Compares stored forms, so a numeric type change counts as a modification
/// even though `Int(5)` and `Float(5.0)` are equal values.
fn is_modified(original: &Document, updated: &Document) -> bool {
    original.to_wire() != updated.to_wire()
}

fn apply_update(spec: &UpdateSpec, original: &Document) -> TesseraResult<Document> {
    let mut updated = original.clone();
    spec.apply(&mut updated)?;
    if updated.id() != original.id() {
        log::error!("Update tried to change identifier of {:?}", original.id());
        return Err(TesseraError::new(
            "The identifier of a document cannot be changed by an update",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(updated)
}

fn upsert_document(
    records: &InMemoryCollection,
    filter: &Filter,
    spec: &UpdateSpec,
) -> TesseraResult<Document> {
    let mut document = filter.equality_seed();
    spec.apply_for_insert(&mut document)?;
    let id = match document.id() {
        Some(id) => id,
        None => {
            let id = DocumentId::new().to_string();
            document.set_id(id.clone());
            id
        }
    };

    if records.contains(&id) {
        log::error!("Upsert collides with existing id '{}'", id);
        return Err(TesseraError::new(
            &format!("Upsert collides with existing id '{}'", id),
            ErrorKind::UniqueConstraintViolation,
        ));
    }
    records.put(id, document.to_wire());
    Ok(document)
}
