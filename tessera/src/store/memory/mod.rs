//! In-memory store provider, used by default and in tests.

mod collection;
mod config;
mod store;

pub use config::*;
pub use store::*;
