use crate::collection::Document;
use crate::common::{project_exclude, project_include, SortOrder, Value};
use std::cmp::Ordering;

/// Which fields a read returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Only these paths, plus `id`.
    Include(Vec<String>),
    /// Everything except these paths.
    Exclude(Vec<String>),
}

impl Projection {
    pub fn apply(&self, document: &Document) -> Document {
        match self {
            Projection::Include(fields) => project_include(document, fields),
            Projection::Exclude(fields) => project_exclude(document, fields),
        }
    }
}

/// Sorting, pagination and projection for a read.
///
/// Without sort keys results come back in natural order, which is ascending
/// id order.
///
/// ```rust,ignore
/// let options = FindOptions::new()
///     .sort_by("age", SortOrder::Descending)
///     .skip(10)
///     .limit(20);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub(crate) sort_by: Vec<(String, SortOrder)>,
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) projection: Option<Projection>,
}

/// Options sorted by one field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name, sort_order)
}

pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions::new().limit(limit)
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Appends a sort key. Earlier keys take precedence.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindOptions {
        self.sort_by.push((field_name.to_string(), sort_order));
        self
    }

    pub fn projection(mut self, projection: Projection) -> FindOptions {
        self.projection = Some(projection);
        self
    }

    pub fn sort_keys(&self) -> &[(String, SortOrder)] {
        &self.sort_by
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    pub fn limit_count(&self) -> Option<u64> {
        self.limit
    }

    pub fn projection_spec(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Orders two documents by the sort keys. A missing field sorts as null.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for (field, order) in &self.sort_by {
            let left = a.get(field).unwrap_or(&Value::Null);
            let right = b.get(field).unwrap_or(&Value::Null);
            let ordering = match order {
                SortOrder::Ascending => left.cmp(right),
                SortOrder::Descending => right.cmp(left),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Sorts, paginates and projects an already filtered result set.
    pub fn apply(&self, mut documents: Vec<Document>) -> Vec<Document> {
        if !self.sort_by.is_empty() {
            documents.sort_by(|a, b| self.compare(a, b));
        }

        let skip = to_usize(self.skip.unwrap_or(0));
        let limit = self.limit.map(to_usize).unwrap_or(usize::MAX);
        documents
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| match &self.projection {
                Some(projection) => projection.apply(&doc),
                None => doc,
            })
            .collect()
    }
}

/// Clamps a page bound to the address space.
pub(crate) fn to_usize(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}
