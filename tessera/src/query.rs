//! Fluent reads.
//!
//! A [Query] collects predicates, sort keys, pagination and a projection for
//! one collection, then runs once. Predicates are AND-combined; [Query::or]
//! adds one clause matching any of several [Criteria] groups.
//!
//! ```rust,ignore
//! let adults = db
//!     .find("users")
//!     .where_field("age").gte(18)
//!     .where_eq("active", true)
//!     .order_by("age").desc()
//!     .limit(10)
//!     .to_list()?;
//! ```

use crate::collection::{Document, FindOptions, Projection};
use crate::common::{SortOrder, Value};
use crate::errors::{TesseraError, TesseraResult};
use crate::filter::{field, Filter};
use crate::tessera::Tessera;

/// Something [QueryField] can hand a finished predicate to.
pub trait PredicateSink: Sized {
    fn push_predicate(self, predicate: Filter) -> Self;

    /// Keeps a predicate construction failure until execution.
    fn push_error(self, error: TesseraError) -> Self;
}

/// A field awaiting its operator. Every operator appends exactly one
/// predicate and hands back the builder it came from.
pub struct QueryField<S: PredicateSink> {
    sink: S,
    field: String,
}

impl<S: PredicateSink> QueryField<S> {
    pub(crate) fn new(sink: S, field: &str) -> Self {
        QueryField {
            sink,
            field: field.to_string(),
        }
    }

    pub fn gt<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).gt(value);
        self.sink.push_predicate(predicate)
    }

    pub fn gte<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).gte(value);
        self.sink.push_predicate(predicate)
    }

    pub fn lt<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).lt(value);
        self.sink.push_predicate(predicate)
    }

    pub fn lte<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).lte(value);
        self.sink.push_predicate(predicate)
    }

    pub fn ne<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).ne(value);
        self.sink.push_predicate(predicate)
    }

    pub fn in_<T: Into<Value>>(self, values: Vec<T>) -> S {
        let predicate = field(&self.field).in_array(values);
        self.sink.push_predicate(predicate)
    }

    pub fn not_in<T: Into<Value>>(self, values: Vec<T>) -> S {
        let predicate = field(&self.field).not_in_array(values);
        self.sink.push_predicate(predicate)
    }

    /// Matches string fields containing a match of `pattern`. An invalid
    /// pattern fails the query when it runs.
    pub fn regex(self, pattern: &str) -> S {
        match field(&self.field).regex(pattern) {
            Ok(predicate) => self.sink.push_predicate(predicate),
            Err(err) => self.sink.push_error(err),
        }
    }

    pub fn field_exists(self) -> S {
        let predicate = field(&self.field).exists();
        self.sink.push_predicate(predicate)
    }

    pub fn field_not_exists(self) -> S {
        let predicate = field(&self.field).not_exists();
        self.sink.push_predicate(predicate)
    }

    /// Missing or explicit null.
    pub fn is_null(self) -> S {
        let predicate = field(&self.field).is_null();
        self.sink.push_predicate(predicate)
    }

    pub fn is_not_null(self) -> S {
        let predicate = field(&self.field).is_not_null();
        self.sink.push_predicate(predicate)
    }

    /// Array element or substring match.
    pub fn contains<T: Into<Value>>(self, value: T) -> S {
        let predicate = field(&self.field).contains(value);
        self.sink.push_predicate(predicate)
    }

    pub fn contains_all<T: Into<Value>>(self, values: Vec<T>) -> S {
        let predicate = field(&self.field).contains_all(values);
        self.sink.push_predicate(predicate)
    }
}

/// An isolated group of AND-combined predicates, used as one branch of
/// [Query::or].
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    predicates: Vec<Filter>,
    error: Option<TesseraError>,
}

impl Criteria {
    pub fn new() -> Self {
        Criteria::default()
    }

    pub fn where_eq<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.push_predicate(field(field_name).eq(value))
    }

    pub fn where_field(self, field_name: &str) -> QueryField<Criteria> {
        QueryField::new(self, field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The predicates as one filter. An empty group matches everything.
    pub fn to_filter(&self) -> Filter {
        self.predicates.iter().cloned().fold(Filter::All, Filter::and)
    }
}

impl PredicateSink for Criteria {
    fn push_predicate(mut self, predicate: Filter) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn push_error(mut self, error: TesseraError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }
}

/// A read against one collection. Consumed when it runs.
pub struct Query {
    tessera: Tessera,
    collection: String,
    criteria: Criteria,
    sort_by: Vec<(String, SortOrder)>,
    skip: u64,
    limit: u64,
    projection: Option<Projection>,
}

impl Query {
    pub(crate) fn new(tessera: Tessera, collection: &str) -> Self {
        Query {
            tessera,
            collection: collection.to_string(),
            criteria: Criteria::new(),
            sort_by: Vec::new(),
            skip: 0,
            limit: 0,
            projection: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn where_eq<T: Into<Value>>(self, field_name: &str, value: T) -> Self {
        self.push_predicate(field(field_name).eq(value))
    }

    pub fn where_field(self, field_name: &str) -> QueryField<Query> {
        QueryField::new(self, field_name)
    }

    /// Adds one clause matching documents that satisfy any of `groups`.
    pub fn or(self, groups: Vec<Criteria>) -> Self {
        if groups.is_empty() {
            return self;
        }

        let mut query = self;
        let mut branches = Vec::with_capacity(groups.len());
        for group in groups {
            if let Some(error) = &group.error {
                query = query.push_error(error.clone());
            }
            branches.push(group.to_filter());
        }
        query.push_predicate(Filter::Or(branches))
    }

    pub fn order_by(mut self, field_name: &str) -> Self {
        self.sort_by.push((field_name.to_string(), SortOrder::Ascending));
        self
    }

    pub fn order_by_desc(mut self, field_name: &str) -> Self {
        self.sort_by.push((field_name.to_string(), SortOrder::Descending));
        self
    }

    /// Makes the most recent sort key descending.
    pub fn desc(mut self) -> Self {
        match self.sort_by.last_mut() {
            Some((_, order)) => *order = SortOrder::Descending,
            None => log::warn!("Ignoring desc() on a query without sort keys"),
        }
        self
    }

    /// Skips `n` matches; `0` clears it.
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = n;
        self
    }

    /// Returns at most `n` matches; `0` clears it.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }

    /// Returns only these fields and `id`. Replaces an earlier
    /// [Query::exclude].
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.projection = Some(Projection::Include(
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// Returns everything except these fields. Replaces an earlier
    /// [Query::select].
    pub fn exclude(mut self, fields: &[&str]) -> Self {
        self.projection = Some(Projection::Exclude(
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// The filter this query runs with.
    pub fn filter(&self) -> Filter {
        self.criteria.to_filter()
    }

    /// Sorting, pagination and projection this query runs with.
    pub fn find_options(&self) -> FindOptions {
        let mut options = FindOptions::new();
        for (field_name, order) in &self.sort_by {
            options = options.sort_by(field_name, *order);
        }
        if self.skip > 0 {
            options = options.skip(self.skip);
        }
        if self.limit > 0 {
            options = options.limit(self.limit);
        }
        if let Some(projection) = &self.projection {
            options = options.projection(projection.clone());
        }
        options
    }

    pub fn first(self) -> TesseraResult<Option<Document>> {
        let options = self.find_options().limit(1);
        Ok(self.run(options)?.into_iter().next())
    }

    pub fn to_list(self) -> TesseraResult<Vec<Document>> {
        let options = self.find_options();
        self.run(options)
    }

    /// Counts matches, ignoring sort, pagination and projection.
    pub fn count(self) -> TesseraResult<u64> {
        self.check_error()?;
        let filter = self.filter();
        let store = self.tessera.store()?;
        let count = store.count(&self.collection, &filter)?;
        log::debug!("Counted {} document(s) in {} where {}", count, self.collection, filter);
        Ok(count)
    }

    pub fn exists(self) -> TesseraResult<bool> {
        Ok(self.first()?.is_some())
    }

    fn run(self, options: FindOptions) -> TesseraResult<Vec<Document>> {
        self.check_error()?;
        let filter = self.filter();
        let store = self.tessera.store()?;
        let records = store.find(&self.collection, &filter, &options)?;
        log::debug!(
            "Found {} document(s) in {} where {}",
            records.len(),
            self.collection,
            filter
        );
        records.iter().map(Document::from_wire).collect()
    }

    fn check_error(&self) -> TesseraResult<()> {
        match &self.criteria.error {
            Some(err) => {
                log::error!("Query on {} is invalid: {}", self.collection, err.message());
                Err(err.clone())
            }
            None => Ok(()),
        }
    }
}

impl PredicateSink for Query {
    fn push_predicate(mut self, predicate: Filter) -> Self {
        self.criteria = self.criteria.push_predicate(predicate);
        self
    }

    fn push_error(mut self, error: TesseraError) -> Self {
        self.criteria = self.criteria.push_error(error);
        self
    }
}
