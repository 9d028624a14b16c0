//! Builds parameterized INSERT, SELECT, UPDATE, DELETE and DDL for a resource table.

use super::FieldValue;
use crate::resource::{Resource, EMAIL_COLUMN};

pub const ID_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Quote identifier for SQLite (identifiers only come from resource definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: FieldValue) -> &'static str {
        self.params.push(v);
        "?"
    }
}

/// Every column of the table in select order: id, writable columns, timestamps.
pub fn column_names<R: Resource>() -> Vec<&'static str> {
    let mut cols = vec![ID_COLUMN];
    cols.extend(R::COLUMNS.iter().map(|c| c.name));
    cols.push(CREATED_AT_COLUMN);
    if R::TRACKS_UPDATES {
        cols.push(UPDATED_AT_COLUMN);
    }
    cols
}

fn select_column_list<R: Resource>() -> String {
    column_names::<R>()
        .into_iter()
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// CREATE TABLE plus name indexes. AUTOINCREMENT keeps deleted ids from being handed out again.
pub fn create_table<R: Resource>() -> Vec<String> {
    let mut defs = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quoted(ID_COLUMN))];
    for c in R::COLUMNS {
        let mut def = format!("{} {}", quoted(c.name), c.kind.sql_type());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if c.unique {
            def.push_str(" UNIQUE");
        }
        defs.push(def);
    }
    defs.push(format!("{} TEXT NOT NULL", quoted(CREATED_AT_COLUMN)));
    if R::TRACKS_UPDATES {
        defs.push(format!("{} TEXT NOT NULL", quoted(UPDATED_AT_COLUMN)));
    }
    let mut statements = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(R::TABLE),
        defs.join(", ")
    )];
    for c in R::COLUMNS.iter().filter(|c| c.indexed && !c.unique) {
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            quoted(&format!("ix_{}_{}", R::TABLE, c.name)),
            quoted(R::TABLE),
            quoted(c.name)
        ));
    }
    statements
}

/// INSERT ... RETURNING all columns. Timestamps are bound as parameters.
pub fn insert<R: Resource>(fields: &[(&'static str, FieldValue)], now: FieldValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in fields {
        cols.push(quoted(name));
        placeholders.push(q.push_param(value.clone()));
    }
    cols.push(quoted(CREATED_AT_COLUMN));
    placeholders.push(q.push_param(now.clone()));
    if R::TRACKS_UPDATES {
        cols.push(quoted(UPDATED_AT_COLUMN));
        placeholders.push(q.push_param(now));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(R::TABLE),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list::<R>()
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id<R: Resource>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(FieldValue::Int(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list::<R>(),
        quoted(R::TABLE),
        quoted(ID_COLUMN),
        ph
    );
    q
}

/// SELECT by email.
pub fn select_by_email<R: Resource>(email: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(FieldValue::Text(email.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {} LIMIT 1",
        select_column_list::<R>(),
        quoted(R::TABLE),
        quoted(EMAIL_COLUMN),
        ph
    );
    q
}

/// SELECT page ordered by id.
pub fn select_list<R: Resource>(offset: u64, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let limit_ph = q.push_param(FieldValue::Int(i64::from(limit)));
    let offset_ph = q.push_param(FieldValue::Int(i64::try_from(offset).unwrap_or(i64::MAX)));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} ASC LIMIT {} OFFSET {}",
        select_column_list::<R>(),
        quoted(R::TABLE),
        quoted(ID_COLUMN),
        limit_ph,
        offset_ph
    );
    q
}

/// UPDATE only the supplied fields (plus `updated_at` when tracked). None when there is nothing to set.
pub fn update<R: Resource>(id: i64, fields: &[(&'static str, FieldValue)], now: FieldValue) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, value) in fields {
        let ph = q.push_param(value.clone());
        sets.push(format!("{} = {}", quoted(name), ph));
    }
    if R::TRACKS_UPDATES {
        let ph = q.push_param(now);
        sets.push(format!("{} = {}", quoted(UPDATED_AT_COLUMN), ph));
    }
    if sets.is_empty() {
        return None;
    }
    let id_ph = q.push_param(FieldValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(R::TABLE),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_ph,
        select_column_list::<R>()
    );
    Some(q)
}

/// DELETE by primary key.
pub fn delete<R: Resource>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(FieldValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(R::TABLE),
        quoted(ID_COLUMN),
        ph
    );
    q
}

/// DELETE every row whose id is in `ids`. Caller guarantees `ids` is non-empty.
pub fn delete_in<R: Resource>(ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders: Vec<&str> = ids
        .iter()
        .map(|id| q.push_param(FieldValue::Int(*id)))
        .collect();
    q.sql = format!(
        "DELETE FROM {} WHERE {} IN ({})",
        quoted(R::TABLE),
        quoted(ID_COLUMN),
        placeholders.join(", ")
    );
    q
}

pub fn count<R: Resource>() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(R::TABLE));
    q
}
