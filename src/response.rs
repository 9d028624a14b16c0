//! Response bodies that are not plain records.

use crate::resource::RecordSummary;
use serde::Serialize;

/// Confirmation returned by single deletes: `{"message": ..., "deleted_<name>": {id, name, email}}`.
pub fn deleted_body(name: &str, summary: RecordSummary) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        "message".into(),
        serde_json::Value::String(format!("{} deleted", name)),
    );
    map.insert(
        format!("deleted_{}", name),
        serde_json::json!({
            "id": summary.id,
            "name": summary.name,
            "email": summary.email,
        }),
    );
    serde_json::Value::Object(map)
}

#[derive(Serialize)]
pub struct BulkDeleted {
    pub deleted: u64,
}

/// Name of the header carrying the total row count on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
