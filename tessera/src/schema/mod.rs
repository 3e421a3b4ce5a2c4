//! Declared collection shapes.
//!
//! A [Schema] lists field definitions with their constraints, defaults and
//! bookkeeping markers, plus index declarations. Schemas are built with
//! [SchemaBuilder] and registered by collection name in a [SchemaRegistry].
//! Writes to a registered collection get defaults applied, auto timestamps
//! injected and constraints checked.

mod builder;
mod field;
mod index;
mod registry;
#[allow(clippy::module_inception)]
mod schema;

pub use builder::*;
pub use field::{FieldDefinition, FieldType};
pub use index::*;
pub use registry::*;
pub use schema::*;
