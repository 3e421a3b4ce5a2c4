//! Filtered removal.
//!
//! [Delete::execute] removes at most one match and refuses to run without a
//! filter unless [Delete::all] was called. [Delete::execute_all] removes
//! every match, and with no filter that means every document.

use crate::common::Value;
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::filter::{field, Filter};
use crate::tessera::Tessera;

/// A removal from one collection. Consumed when it runs.
pub struct Delete {
    tessera: Tessera,
    collection: String,
    predicates: Vec<Filter>,
    everything: bool,
}

/// A field awaiting its comparison in a [Delete].
pub struct DeleteField {
    delete: Delete,
    field: String,
}

impl DeleteField {
    pub fn gt<T: Into<Value>>(self, value: T) -> Delete {
        let predicate = field(&self.field).gt(value);
        self.delete.push(predicate)
    }

    pub fn gte<T: Into<Value>>(self, value: T) -> Delete {
        let predicate = field(&self.field).gte(value);
        self.delete.push(predicate)
    }

    pub fn lt<T: Into<Value>>(self, value: T) -> Delete {
        let predicate = field(&self.field).lt(value);
        self.delete.push(predicate)
    }

    pub fn lte<T: Into<Value>>(self, value: T) -> Delete {
        let predicate = field(&self.field).lte(value);
        self.delete.push(predicate)
    }

    pub fn ne<T: Into<Value>>(self, value: T) -> Delete {
        let predicate = field(&self.field).ne(value);
        self.delete.push(predicate)
    }

    pub fn in_<T: Into<Value>>(self, values: Vec<T>) -> Delete {
        let predicate = field(&self.field).in_array(values);
        self.delete.push(predicate)
    }
}

impl Delete {
    pub(crate) fn new(tessera: Tessera, collection: &str) -> Self {
        Delete {
            tessera,
            collection: collection.to_string(),
            predicates: Vec::new(),
            everything: false,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn where_eq<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.push(field(field_name).eq(value))
    }

    pub fn where_field(self, field_name: &str) -> DeleteField {
        DeleteField {
            delete: self,
            field: field_name.to_string(),
        }
    }

    /// Makes [Delete::execute] remove every document of the collection.
    pub fn all(mut self) -> Self {
        self.everything = true;
        self
    }

    /// Removes one match, or everything after [Delete::all]. Returns whether
    /// anything was removed; always `true` after [Delete::all].
    pub fn execute(self) -> TesseraResult<bool> {
        if self.everything {
            let store = self.tessera.store()?;
            let removed = store.delete(&self.collection, &Filter::All, false)?;
            log::debug!("Removed all {} document(s) from {}", removed, self.collection);
            return Ok(true);
        }

        if self.predicates.is_empty() {
            log::error!("Delete.execute on {} has no filter", self.collection);
            return Err(TesseraError::new(
                &format!(
                    "Delete.execute requires a filter or all() on {}",
                    self.collection
                ),
                ErrorKind::InvalidOperation,
            ));
        }

        Ok(self.run(true)? > 0)
    }

    /// Removes every match and returns how many were removed. Without a
    /// filter every document matches.
    pub fn execute_all(self) -> TesseraResult<u64> {
        self.run(false)
    }

    fn push(mut self, predicate: Filter) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn filter(&self) -> Filter {
        if self.everything {
            return Filter::All;
        }
        self.predicates.iter().cloned().fold(Filter::All, Filter::and)
    }

    fn run(self, just_once: bool) -> TesseraResult<u64> {
        let filter = self.filter();
        let store = self.tessera.store()?;
        let removed = store.delete(&self.collection, &filter, just_once)?;
        log::debug!(
            "Removed {} document(s) from {} where {}",
            removed,
            self.collection,
            filter
        );
        Ok(removed)
    }
}
