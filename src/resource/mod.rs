//! Resource definitions: one table, one record type and its create/update payloads per resource.
//!
//! Handlers, services and stores are generic over [`Resource`]; adding a resource means
//! describing its columns and payloads, nothing else.

mod employee;
mod patch;
mod user;

pub use employee::{Employee, EmployeeChanges, Employees, NewEmployee};
pub use patch::Patch;
pub use user::{NewUser, User, UserChanges, Users};

use crate::service::FieldRule;
use crate::sql::FieldValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use std::fmt::Debug;

/// Column holding the unique contact address of every resource.
pub const EMAIL_COLUMN: &str = "email";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }
}

/// A caller-writable column. `id`, `created_at` and `updated_at` are managed by the store.
#[derive(Clone, Debug)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    pub indexed: bool,
    pub rule: FieldRule,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Column {
            name,
            kind,
            nullable: false,
            unique: false,
            indexed: false,
            rule: FieldRule::NONE,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub const fn rule(mut self, rule: FieldRule) -> Self {
        self.rule = rule;
        self
    }
}

/// Input payload that can be flattened into `(column, value)` pairs.
///
/// Create payloads list every column they carry; update payloads list only the fields the
/// caller supplied, with explicit nulls as [`FieldValue::Null`].
pub trait Payload {
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    fn email(&self) -> Option<&str>;
}

/// Push `column` only when the create payload supplied it; absent values stay absent so the
/// validator can report them as required.
fn push_present<T>(column: &'static str, value: &Option<T>, fields: &mut Vec<(&'static str, FieldValue)>)
where
    T: Clone + Into<FieldValue>,
{
    if let Some(v) = value {
        fields.push((column, v.clone().into()));
    }
}

/// Identity echoed back when a record is deleted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

pub trait Resource: Send + Sync + 'static {
    type Record: for<'r> sqlx::FromRow<'r, SqliteRow> + Serialize + Debug + Clone + Send + Sync + Unpin;
    type Create: DeserializeOwned + Payload + Debug + Send + Sync;
    type Update: DeserializeOwned + Payload + Debug + Send + Sync;

    /// Singular name used in messages and confirmations (e.g. "user").
    const NAME: &'static str;
    const TABLE: &'static str;
    /// First path segment of the resource routes.
    const PATH: &'static str;
    const COLUMNS: &'static [Column];
    /// Whether rows carry an `updated_at` timestamp refreshed on every update.
    const TRACKS_UPDATES: bool;
    const DEFAULT_PAGE_SIZE: u32;

    fn id(record: &Self::Record) -> i64;

    fn summary(record: &Self::Record) -> RecordSummary;
}
