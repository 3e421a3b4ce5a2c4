use crate::common::Value;
use crate::errors::TesseraResult;
use regex::Regex;

use super::{ComparisonMode, Filter};

/// Starts a filter on `field_name`.
///
/// ```rust,ignore
/// let adults = field("age").gte(18);
/// let londoners = field("address.city").eq("London");
/// let filter = adults.and(londoners);
/// ```
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// Builds one [Filter] on a single field.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Eq(self.field_name, value.into())
    }

    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Ne(self.field_name, value.into())
    }

    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(ComparisonMode::Greater, value.into())
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(ComparisonMode::GreaterEqual, value.into())
    }

    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(ComparisonMode::Lesser, value.into())
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        self.compare(ComparisonMode::LesserEqual, value.into())
    }

    /// Inclusive range on both ends.
    pub fn between<T: Into<Value>>(self, lower_bound: T, upper_bound: T) -> Filter {
        let lower = Filter::Compare(
            self.field_name.clone(),
            ComparisonMode::GreaterEqual,
            lower_bound.into(),
        );
        let upper = Filter::Compare(self.field_name, ComparisonMode::LesserEqual, upper_bound.into());
        lower.and(upper)
    }

    pub fn in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::In(self.field_name, values.into_iter().map(Into::into).collect())
    }

    pub fn not_in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::NotIn(self.field_name, values.into_iter().map(Into::into).collect())
    }

    /// Matches string fields where the pattern is found anywhere in the value.
    /// Fails with a filter error when the pattern does not compile.
    pub fn regex(self, pattern: &str) -> TesseraResult<Filter> {
        let regex = Regex::new(pattern).map_err(|err| {
            log::error!("Invalid pattern '{}' for field '{}': {}", pattern, self.field_name, err);
            err
        })?;
        Ok(Filter::Regex(self.field_name, regex))
    }

    pub fn exists(self) -> Filter {
        Filter::Exists(self.field_name, true)
    }

    pub fn not_exists(self) -> Filter {
        Filter::Exists(self.field_name, false)
    }

    pub fn is_null(self) -> Filter {
        Filter::IsNull(self.field_name)
    }

    pub fn is_not_null(self) -> Filter {
        Filter::IsNotNull(self.field_name)
    }

    pub fn contains<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Contains(self.field_name, value.into())
    }

    pub fn contains_all<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::ContainsAll(self.field_name, values.into_iter().map(Into::into).collect())
    }

    fn compare(self, mode: ComparisonMode, value: Value) -> Filter {
        Filter::Compare(self.field_name, mode, value)
    }
}
