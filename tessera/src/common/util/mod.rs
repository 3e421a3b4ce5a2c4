mod coercion;
mod date_utils;
mod document_utils;
mod type_utils;

pub use coercion::*;
pub use date_utils::*;
pub use document_utils::*;
pub use type_utils::*;
