use crate::collection::{Document, WireRecord};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::filter::Filter;
use crossbeam_skiplist::SkipMap;
use std::sync::Arc;

/// One collection of an in-memory store: wire records keyed by id.
///
/// Keys are kept sorted, so iteration yields natural (id) order. Generated
/// ids all have 19 digits, which makes their text order match their numeric
/// order.
#[derive(Clone)]
pub(crate) struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

struct InMemoryCollectionInner {
    name: String,
    records: SkipMap<String, WireRecord>,
}

impl InMemoryCollection {
    pub(crate) fn new(name: &str) -> Self {
        InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner {
                name: name.to_string(),
                records: SkipMap::new(),
            }),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.inner.name
    }

    pub(crate) fn size(&self) -> usize {
        self.inner.records.len()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.inner.records.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<WireRecord> {
        self.inner.records.get(id).map(|entry| entry.value().clone())
    }

    pub(crate) fn put(&self, id: String, record: WireRecord) {
        self.inner.records.insert(id, record);
    }

    pub(crate) fn remove(&self, id: &str) -> bool {
        self.inner.records.remove(id).is_some()
    }

    pub(crate) fn clear(&self) {
        self.inner.records.clear();
    }

    /// Decodes every record and keeps those matching `filter`, in id order.
    /// Stops after `limit` matches when one is given.
    pub(crate) fn scan(
        &self,
        filter: &Filter,
        limit: Option<usize>,
    ) -> TesseraResult<Vec<(String, Document)>> {
        // a pinned id needs a single lookup
        if let Some(id) = filter.id_equality() {
            return match self.inner.records.get(&id) {
                Some(entry) => {
                    let document = self.decode(&id, entry.value())?;
                    if filter.apply(&document) {
                        Ok(vec![(id, document)])
                    } else {
                        Ok(Vec::new())
                    }
                }
                None => Ok(Vec::new()),
            };
        }

        let mut matches = Vec::new();
        for entry in self.inner.records.iter() {
            if limit.is_some_and(|limit| matches.len() >= limit) {
                break;
            }
            let document = self.decode(entry.key(), entry.value())?;
            if filter.apply(&document) {
                matches.push((entry.key().clone(), document));
            }
        }
        Ok(matches)
    }

    fn decode(&self, id: &str, record: &WireRecord) -> TesseraResult<Document> {
        Document::from_wire(record).map_err(|cause| {
            log::error!("Stored record '{}' in '{}' is corrupt", id, self.name());
            TesseraError::new_with_cause(
                &format!("Stored record '{}' in '{}' is corrupt", id, self.name()),
                ErrorKind::BackendError,
                cause,
            )
        })
    }
}
