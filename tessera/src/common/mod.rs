mod constants;
mod convertible;
mod lock;
mod sort_order;
pub mod util;
mod value;

pub use constants::*;
pub use convertible::*;
pub use lock::*;
pub use sort_order::*;
pub use util::*;
pub use value::*;
