//! Documents and their persistence-side companions.
//!
//! A [Document] is an ordered map of field names to [crate::common::Value]s.
//! Nested fields are addressed with dotted paths:
//!
//! ```rust,ignore
//! use tessera::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.set("name", "Alice").set("address.city", "New York").set("age", 30);
//! assert_eq!(doc.get_string("address.city")?, Some("New York".to_string()));
//! ```
//!
//! Documents cross the store boundary as [WireRecord]s. [FindOptions] and
//! [UpdateSpec] describe reads and writes in a store-independent way.

mod document;
mod document_id;
mod find_options;
pub(crate) mod snowflake;
mod update_options;
mod wire;

pub use document::*;
pub use document_id::DocumentId;
pub use find_options::*;
pub use update_options::*;
pub use wire::WireRecord;
pub(crate) use wire::{decode_value, encode_value};
