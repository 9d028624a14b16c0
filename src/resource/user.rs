use super::{push_present, Column, ColumnKind, Patch, Payload, RecordSummary, Resource, EMAIL_COLUMN};
use crate::service::{FieldRule, Format};
use crate::sql::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Omitted fields deserialize to `None` and are reported by the validator.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserChanges {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
}

impl Payload for NewUser {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::new();
        push_present("name", &self.name, &mut fields);
        push_present(EMAIL_COLUMN, &self.email, &mut fields);
        fields.push(("age", self.age.into()));
        fields
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

impl Payload for UserChanges {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::new();
        self.name.push_into("name", &mut fields);
        self.email.push_into(EMAIL_COLUMN, &mut fields);
        self.age.push_into("age", &mut fields);
        fields
    }

    fn email(&self) -> Option<&str> {
        self.email.value().map(String::as_str)
    }
}

pub struct Users;

impl Resource for Users {
    type Record = User;
    type Create = NewUser;
    type Update = UserChanges;

    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const PATH: &'static str = "users";
    const COLUMNS: &'static [Column] = &[
        Column::new("name", ColumnKind::Text)
            .indexed()
            .rule(FieldRule::length(1, 50)),
        Column::new(EMAIL_COLUMN, ColumnKind::Text)
            .unique()
            .indexed()
            .rule(FieldRule::length(1, 100).with_format(Format::Email)),
        Column::new("age", ColumnKind::Integer)
            .nullable()
            .rule(FieldRule::range(0.0, 150.0)),
    ];
    const TRACKS_UPDATES: bool = false;
    const DEFAULT_PAGE_SIZE: u32 = 100;

    fn id(record: &User) -> i64 {
        record.id
    }

    fn summary(record: &User) -> RecordSummary {
        RecordSummary {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}
