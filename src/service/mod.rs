//! CrudService: validated CRUD orchestration over a resource store.

mod crud;
mod pagination;
mod validation;
pub use crud::{CrudService, BULK_LIMIT};
pub use pagination::Pagination;
pub use validation::{FieldRule, Format, Mode, RequestValidator, ValidationPolicy};
