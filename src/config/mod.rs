pub mod env;
pub mod list;

pub use env::*;
pub use list::*;
