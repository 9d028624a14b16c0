//! HTTP handlers for resource CRUD.

pub mod entity;
pub use entity::*;
