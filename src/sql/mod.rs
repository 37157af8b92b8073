//! Safe SQL builder: identifiers fixed in code, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
