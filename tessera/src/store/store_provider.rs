use crate::collection::{FindOptions, UpdateResult, UpdateSpec, WireRecord};
use crate::errors::TesseraResult;
use crate::filter::Filter;
use std::ops::Deref;
use std::sync::Arc;

/// Contract for a document store behind the [crate::tessera::Tessera] facade.
///
/// Records cross this boundary in wire form. Every call is atomic with
/// respect to other calls on the same collection; sequences of calls are not.
/// A closed store rejects every call with
/// [crate::errors::ErrorKind::StoreAlreadyClosed].
pub trait StoreProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> String;

    /// Matching records, sorted, paginated and projected per `options`.
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> TesseraResult<Vec<WireRecord>>;

    fn count(&self, collection: &str, filter: &Filter) -> TesseraResult<u64>;

    /// Inserts a record that already carries its `_id`. A duplicate id fails
    /// with [crate::errors::ErrorKind::UniqueConstraintViolation].
    fn insert(&self, collection: &str, record: WireRecord) -> TesseraResult<()>;

    /// Replaces the record stored under `id`. With `upsert`, inserts it when
    /// absent. Returns whether anything was written.
    fn replace(
        &self,
        collection: &str,
        id: &str,
        record: WireRecord,
        upsert: bool,
    ) -> TesseraResult<bool>;

    /// Applies `spec` to every match, or the first one with `just_once`.
    fn update(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<UpdateResult>;

    /// Updates the first match and returns its pre-image, or its post-image
    /// when `return_new` is set.
    fn find_and_modify(
        &self,
        collection: &str,
        filter: &Filter,
        spec: &UpdateSpec,
    ) -> TesseraResult<Option<WireRecord>>;

    /// Removes matches and returns how many were removed.
    fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> TesseraResult<u64>;

    fn close(&self) -> TesseraResult<()>;

    fn is_closed(&self) -> bool;
}

/// Shared handle to a [StoreProvider].
///
/// Cloning only bumps a reference count, so the facade and its builders can
/// all hold the same connection.
#[derive(Clone)]
pub struct TesseraStore {
    inner: Arc<dyn StoreProvider>,
}

impl TesseraStore {
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        TesseraStore {
            inner: Arc::new(inner),
        }
    }

    pub fn from_arc(inner: Arc<dyn StoreProvider>) -> Self {
        TesseraStore { inner }
    }
}

impl Deref for TesseraStore {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
