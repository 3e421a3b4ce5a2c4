//! Storage backends.
//!
//! The facade talks to storage through the [StoreProvider] trait, wrapped in
//! a cloneable [TesseraStore]. Providers receive documents in wire form
//! together with a typed [crate::filter::Filter] and
//! [crate::collection::FindOptions] or [crate::collection::UpdateSpec], so a
//! provider for a real document database only has to translate those.
//!
//! [memory::InMemoryStore] is the bundled provider and the default one.

pub mod memory;
mod store_provider;

pub use store_provider::*;
