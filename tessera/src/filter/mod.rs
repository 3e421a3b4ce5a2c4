//! Document predicates.
//!
//! Filters are built with the fluent API and combined with `and`/`or`:
//!
//! ```rust,ignore
//! use tessera::filter::{field, all};
//!
//! let filter = field("age").gt(30).and(field("status").eq("active"));
//! let email = field("email").regex(".*@example\\.com")?;
//! let everything = all();
//! ```
//!
//! - **Equality**: `eq`, `ne`, `in_array`, `not_in_array`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`, `between`
//! - **Pattern**: `regex`, `contains`
//! - **Presence**: `exists`, `not_exists`, `is_null`, `is_not_null`
//! - **Array**: `contains`, `contains_all`
//! - **Logical**: `and`, `or`, `all`

mod filter;
mod fluent;

pub use filter::*;
pub use fluent::*;
