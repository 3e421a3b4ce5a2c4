//! # Tessera
//!
//! Tessera is a lightweight object-document mapper. It pairs a dynamically
//! typed [collection::Document] with optional per-collection
//! [schema::Schema]s, and reads and writes through fluent builders over a
//! pluggable document store.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::doc;
//! use tessera::schema::Schema;
//! use tessera::Tessera;
//!
//! # fn main() -> tessera::errors::TesseraResult<()> {
//! let db = Tessera::builder()
//!     .schema(
//!         Schema::collection("users")
//!             .string("name").required()
//!             .integer("age").min(0)
//!             .timestamps(),
//!     )
//!     .open()?;
//!
//! let mut ada = doc! { name: "Ada", age: 36 };
//! let id = db.insert("users", &mut ada)?;
//!
//! let adults = db.find("users").where_field("age").gte(18).to_list()?;
//! assert_eq!(adults.len(), 1);
//!
//! db.update("users").where_eq("id", id.as_str()).inc("logins", 1).execute()?;
//! db.delete("users").where_eq("id", id.as_str()).execute()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! [Tessera] is a cheaply cloneable handle over an `Arc` inner state holding
//! the store connection and the [schema::SchemaRegistry]. Stores implement
//! [store::StoreProvider] and receive records in wire form, a JSON object
//! using extended-JSON markers for ids, dates and non-finite numbers. The
//! bundled [store::memory::InMemoryStore] is the default.
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, ids, wire format, find and update options
//! - [`common`] - Values, conversions, constants, locks and helpers
//! - [`errors`] - Error type and result alias
//! - [`filter`] - Predicates over documents
//! - [`schema`] - Schemas, field definitions and the registry
//! - [`query`], [`update`], [`delete`] - Fluent builders
//! - [`store`] - Store contract and the in-memory store
//! - [`tessera`], [`tessera_builder`], [`tessera_config`] - The facade

use crate::collection::snowflake::SnowflakeIdGenerator;
use std::sync::LazyLock;

pub mod collection;
pub mod common;
pub mod delete;
pub mod errors;
pub mod filter;
pub mod query;
pub mod schema;
pub mod store;
pub mod tessera;
pub mod tessera_builder;
pub mod tessera_config;
pub mod update;

pub use crate::tessera::Tessera;

pub(crate) static ID_GENERATOR: LazyLock<SnowflakeIdGenerator> =
    LazyLock::new(SnowflakeIdGenerator::new);

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    colog::init();
}
