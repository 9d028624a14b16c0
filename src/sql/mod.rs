//! Safe SQL building and parameter binding.

mod builder;
mod params;
pub use builder::*;
pub use params::FieldValue;
