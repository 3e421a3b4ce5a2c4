//! Fluent field and array mutations.
//!
//! An [Update] is bound to one collection and selects documents by
//! equality only. Writes to a collection with a registered schema also
//! refresh its auto-update fields; an upsert fills auto-create fields too.

use crate::collection::{Document, UpdateOperator, UpdateOptions, UpdateSpec};
use crate::common::{now_millis, Value};
use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::filter::{field, Filter};
use crate::tessera::Tessera;

/// A mutation against one collection. Consumed when it runs.
///
/// ```rust,ignore
/// db.update("users")
///     .where_eq("id", id)
///     .inc("logins", 1)
///     .current_date("lastSeen")
///     .execute()?;
/// ```
pub struct Update {
    tessera: Tessera,
    collection: String,
    predicates: Vec<Filter>,
    operators: Vec<UpdateOperator>,
    upsert: bool,
    return_new: bool,
}

impl Update {
    pub(crate) fn new(tessera: Tessera, collection: &str) -> Self {
        Update {
            tessera,
            collection: collection.to_string(),
            predicates: Vec::new(),
            operators: Vec::new(),
            upsert: false,
            return_new: false,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn where_eq<T: Into<Value>>(mut self, field_name: &str, value: T) -> Self {
        self.predicates.push(field(field_name).eq(value));
        self
    }

    pub fn set<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::Set(field_name.to_string(), value.into()))
    }

    pub fn unset(self, field_name: &str) -> Self {
        self.operator(UpdateOperator::Unset(field_name.to_string()))
    }

    /// Adds `amount`; a missing field starts from zero.
    pub fn inc<T: Into<Value>>(self, field_name: &str, amount: T) -> Self {
        self.operator(UpdateOperator::Inc(field_name.to_string(), amount.into()))
    }

    pub fn mul<T: Into<Value>>(self, field_name: &str, factor: T) -> Self {
        self.operator(UpdateOperator::Mul(field_name.to_string(), factor.into()))
    }

    /// Keeps the smaller of the stored value and `value`.
    pub fn min<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::Min(field_name.to_string(), value.into()))
    }

    /// Keeps the larger of the stored value and `value`.
    pub fn max<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::Max(field_name.to_string(), value.into()))
    }

    pub fn rename(self, field_name: &str, new_name: &str) -> Self {
        self.operator(UpdateOperator::Rename(
            field_name.to_string(),
            new_name.to_string(),
        ))
    }

    pub fn current_date(self, field_name: &str) -> Self {
        self.operator(UpdateOperator::CurrentDate(field_name.to_string()))
    }

    /// Sets epoch milliseconds as an integer.
    pub fn current_timestamp(self, field_name: &str) -> Self {
        self.operator(UpdateOperator::CurrentTimestamp(field_name.to_string()))
    }

    pub fn push<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::Push(field_name.to_string(), value.into()))
    }

    pub fn push_all<T: Into<Value>>(self, field_name: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.operator(UpdateOperator::PushAll(field_name.to_string(), values))
    }

    /// Appends `value` unless the array already holds it.
    pub fn add_to_set<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::AddToSet(field_name.to_string(), value.into()))
    }

    pub fn pop_first(self, field_name: &str) -> Self {
        self.operator(UpdateOperator::PopFirst(field_name.to_string()))
    }

    pub fn pop_last(self, field_name: &str) -> Self {
        self.operator(UpdateOperator::PopLast(field_name.to_string()))
    }

    pub fn pull<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.operator(UpdateOperator::Pull(field_name.to_string(), value.into()))
    }

    pub fn pull_all<T: Into<Value>>(self, field_name: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.operator(UpdateOperator::PullAll(field_name.to_string(), values))
    }

    /// Inserts a document built from the equality predicates and the
    /// operators when nothing matches.
    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }

    /// Makes [Update::execute_and_get] return the updated document.
    pub fn return_new(mut self) -> Self {
        self.return_new = true;
        self
    }

    pub fn operators(&self) -> &[UpdateOperator] {
        &self.operators
    }

    /// Updates the first match. Returns whether a document was modified or
    /// upserted.
    pub fn execute(self) -> TesseraResult<bool> {
        self.check_filter("execute")?;
        if self.operators.is_empty() {
            return Ok(false);
        }
        Ok(self.run(true)? > 0)
    }

    /// Updates every match. Returns how many documents were modified, an
    /// upsert counting as one.
    pub fn execute_all(self) -> TesseraResult<u64> {
        self.check_filter("execute_all")?;
        if self.operators.is_empty() {
            return Ok(0);
        }
        self.run(false)
    }

    /// Updates the first match, or the first document when there is no
    /// predicate, and returns it as it was before the update, or after it
    /// with [Update::return_new].
    pub fn execute_and_get(self) -> TesseraResult<Option<Document>> {
        if self.operators.is_empty() {
            return Ok(None);
        }

        let filter = self.filter();
        let spec = self.spec(true)?;
        let store = self.tessera.store()?;
        let record = store.find_and_modify(&self.collection, &filter, &spec)?;
        log::debug!(
            "Updated {} where {}, found {}",
            self.collection,
            filter,
            record.is_some()
        );
        record.as_ref().map(Document::from_wire).transpose()
    }

    fn operator(mut self, operator: UpdateOperator) -> Self {
        self.operators.push(operator);
        self
    }

    fn filter(&self) -> Filter {
        self.predicates.iter().cloned().fold(Filter::All, Filter::and)
    }

    fn check_filter(&self, operation: &str) -> TesseraResult<()> {
        if self.predicates.is_empty() {
            log::error!("Update.{} on {} has no filter", operation, self.collection);
            return Err(TesseraError::new(
                &format!(
                    "Update.{} requires at least one where_eq clause on {}",
                    operation, self.collection
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    /// Builds the store-bound spec, with auto fields from the schema
    /// registered at this moment.
    fn spec(&self, just_once: bool) -> TesseraResult<UpdateSpec> {
        let mut operators = self.operators.clone();
        let mut on_insert = Vec::new();

        if let Some(schema) = self.tessera.registry().get(&self.collection) {
            let now = Value::from(now_millis());
            for name in schema.auto_update_fields() {
                operators.push(UpdateOperator::Set(name, now.clone()));
            }
            if self.upsert {
                for name in schema.auto_create_fields() {
                    on_insert.push(UpdateOperator::Set(name, now.clone()));
                }
            }
        }

        let options = UpdateOptions::new(self.upsert, just_once).return_new(self.return_new);
        Ok(UpdateSpec::new(operators)
            .with_on_insert(on_insert)
            .with_options(options))
    }

    fn run(self, just_once: bool) -> TesseraResult<u64> {
        let filter = self.filter();
        let spec = self.spec(just_once)?;
        let store = self.tessera.store()?;
        let result = store.update(&self.collection, &filter, &spec)?;
        log::debug!(
            "Updated {} where {}: {} matched, {} modified, upserted {:?}",
            self.collection,
            filter,
            result.matched,
            result.modified,
            result.upserted_id
        );
        Ok(result.affected())
    }
}
