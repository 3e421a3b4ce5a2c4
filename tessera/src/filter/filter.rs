use crate::collection::Document;
use crate::common::{Value, DOC_ID};
use itertools::Itertools;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt::Display;

/// Relational operator of a [Filter::Compare].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
}

impl ComparisonMode {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonMode::Greater => ordering == Ordering::Greater,
            ComparisonMode::GreaterEqual => ordering != Ordering::Less,
            ComparisonMode::Lesser => ordering == Ordering::Less,
            ComparisonMode::LesserEqual => ordering != Ordering::Greater,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            ComparisonMode::Greater => ">",
            ComparisonMode::GreaterEqual => ">=",
            ComparisonMode::Lesser => "<",
            ComparisonMode::LesserEqual => "<=",
        }
    }
}

/// A predicate over documents.
///
/// Filters form a closed language that every store provider can evaluate or
/// translate. Field names are dotted paths.
///
/// When a field holds an array and the operand is a scalar, `Eq`, `In` and
/// `Compare` match if any element matches. A missing field reads as null for
/// `Eq` and `In`, and never satisfies a `Compare`.
#[derive(Debug, Clone)]
pub enum Filter {
    All,
    Eq(String, Value),
    Ne(String, Value),
    Compare(String, ComparisonMode, Value),
    In(String, Vec<Value>),
    NotIn(String, Vec<Value>),
    Regex(String, Regex),
    /// `true` matches when the path is present, `false` when it is absent.
    Exists(String, bool),
    /// Missing or explicit null.
    IsNull(String),
    IsNotNull(String),
    /// Array element membership, or substring for string fields.
    Contains(String, Value),
    ContainsAll(String, Vec<Value>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Evaluates this filter against a document.
    pub fn apply(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => matches_eq(lookup(document, field), value),
            Filter::Ne(field, value) => !matches_eq(lookup(document, field), value),
            Filter::Compare(field, mode, value) => match document.get(field) {
                Some(actual) => matches_compare(actual, *mode, value),
                None => false,
            },
            Filter::In(field, values) => {
                let actual = lookup(document, field);
                values.iter().any(|value| matches_eq(actual, value))
            }
            Filter::NotIn(field, values) => {
                let actual = lookup(document, field);
                !values.iter().any(|value| matches_eq(actual, value))
            }
            Filter::Regex(field, regex) => match document.get(field) {
                Some(Value::String(text)) => regex.is_match(text),
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| matches!(item, Value::String(text) if regex.is_match(text))),
                _ => false,
            },
            Filter::Exists(field, exists) => document.has(field) == *exists,
            Filter::IsNull(field) => lookup(document, field).is_null(),
            Filter::IsNotNull(field) => !lookup(document, field).is_null(),
            Filter::Contains(field, value) => match (document.get(field), value) {
                (Some(Value::Array(items)), _) => items.contains(value),
                (Some(Value::String(text)), Value::String(needle)) => text.contains(needle.as_str()),
                _ => false,
            },
            Filter::ContainsAll(field, values) => match document.get(field) {
                Some(Value::Array(items)) => values.iter().all(|value| items.contains(value)),
                _ => false,
            },
            Filter::And(filters) => filters.iter().all(|filter| filter.apply(document)),
            Filter::Or(filters) => filters.iter().any(|filter| filter.apply(document)),
        }
    }

    /// Combines with another filter so both must match.
    pub fn and(self, filter: Filter) -> Filter {
        match (self, filter) {
            (Filter::All, other) | (other, Filter::All) => other,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), other) => {
                left.push(other);
                Filter::And(left)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    /// Combines with another filter so either may match.
    pub fn or(self, filter: Filter) -> Filter {
        match (self, filter) {
            (Filter::Or(mut left), other) => {
                left.push(other);
                Filter::Or(left)
            }
            (this, other) => Filter::Or(vec![this, other]),
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            Filter::All => true,
            Filter::And(filters) => filters.iter().all(Filter::is_all),
            _ => false,
        }
    }

    /// The document an upsert starts from: every top-level equality,
    /// including those nested in `And`.
    pub fn equality_seed(&self) -> Document {
        let mut seed = Document::new();
        self.collect_equalities(&mut seed);
        seed
    }

    /// The identifier this filter pins, when it is a plain id equality.
    pub fn id_equality(&self) -> Option<String> {
        match self {
            Filter::Eq(field, Value::String(id)) if field == DOC_ID => Some(id.clone()),
            Filter::And(filters) => filters.iter().find_map(Filter::id_equality),
            _ => None,
        }
    }

    fn collect_equalities(&self, seed: &mut Document) {
        match self {
            Filter::Eq(field, value) => {
                seed.set(field, value.clone());
            }
            Filter::And(filters) => {
                for filter in filters {
                    filter.collect_equalities(seed);
                }
            }
            _ => {}
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "AllFilter"),
            Filter::Eq(field, value) => write!(f, "({} == {})", field, value),
            Filter::Ne(field, value) => write!(f, "({} != {})", field, value),
            Filter::Compare(field, mode, value) => {
                write!(f, "({} {} {})", field, mode.symbol(), value)
            }
            Filter::In(field, values) => write!(f, "({} in [{}])", field, values.iter().join(", ")),
            Filter::NotIn(field, values) => {
                write!(f, "({} not in [{}])", field, values.iter().join(", "))
            }
            Filter::Regex(field, regex) => write!(f, "({} =~ {})", field, regex.as_str()),
            Filter::Exists(field, true) => write!(f, "({} exists)", field),
            Filter::Exists(field, false) => write!(f, "({} not exists)", field),
            Filter::IsNull(field) => write!(f, "({} is null)", field),
            Filter::IsNotNull(field) => write!(f, "({} is not null)", field),
            Filter::Contains(field, value) => write!(f, "({} contains {})", field, value),
            Filter::ContainsAll(field, values) => {
                write!(f, "({} contains all [{}])", field, values.iter().join(", "))
            }
            Filter::And(filters) => write!(f, "({})", filters.iter().join(" && ")),
            Filter::Or(filters) => write!(f, "({})", filters.iter().join(" || ")),
        }
    }
}

/// Matches every document.
pub fn all() -> Filter {
    Filter::All
}

/// Matches when every filter matches.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::And(filters)
}

/// Matches when any filter matches.
pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::Or(filters)
}

fn lookup<'a>(document: &'a Document, field: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    document.get(field).unwrap_or(&NULL)
}

fn matches_eq(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Array(items), expected) if !expected.is_array() => {
            items.iter().any(|item| item == expected)
        }
        _ => false,
    }
}

fn matches_compare(actual: &Value, mode: ComparisonMode, expected: &Value) -> bool {
    if actual.is_comparable_with(expected) {
        return mode.accepts(actual.cmp(expected));
    }
    match actual {
        Value::Array(items) => items
            .iter()
            .any(|item| item.is_comparable_with(expected) && mode.accepts(item.cmp(expected))),
        _ => false,
    }
}
