//! Request extractors that reject with [`crate::error::AppError`].

mod json;
pub use json::JsonBody;
