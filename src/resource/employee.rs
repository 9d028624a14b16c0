use super::{push_present, Column, ColumnKind, Patch, Payload, RecordSummary, Resource, EMAIL_COLUMN};
use crate::service::{FieldRule, Format};
use crate::sql::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub position: String,
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmployeeChanges {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub position: Patch<String>,
    #[serde(default)]
    pub salary: Patch<f64>,
}

impl Payload for NewEmployee {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::new();
        push_present("name", &self.name, &mut fields);
        push_present(EMAIL_COLUMN, &self.email, &mut fields);
        push_present("position", &self.position, &mut fields);
        push_present("salary", &self.salary, &mut fields);
        fields
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

impl Payload for EmployeeChanges {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::new();
        self.name.push_into("name", &mut fields);
        self.email.push_into(EMAIL_COLUMN, &mut fields);
        self.position.push_into("position", &mut fields);
        self.salary.push_into("salary", &mut fields);
        fields
    }

    fn email(&self) -> Option<&str> {
        self.email.value().map(String::as_str)
    }
}

pub struct Employees;

impl Resource for Employees {
    type Record = Employee;
    type Create = NewEmployee;
    type Update = EmployeeChanges;

    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
    const PATH: &'static str = "employees";
    const COLUMNS: &'static [Column] = &[
        Column::new("name", ColumnKind::Text)
            .indexed()
            .rule(FieldRule::length(1, 100)),
        Column::new(EMAIL_COLUMN, ColumnKind::Text)
            .unique()
            .indexed()
            .rule(FieldRule::length(1, 100).with_format(Format::Email)),
        Column::new("position", ColumnKind::Text).rule(FieldRule::length(1, 100)),
        Column::new("salary", ColumnKind::Real).rule(FieldRule::positive()),
    ];
    const TRACKS_UPDATES: bool = true;
    const DEFAULT_PAGE_SIZE: u32 = 10;

    fn id(record: &Employee) -> i64 {
        record.id
    }

    fn summary(record: &Employee) -> RecordSummary {
        RecordSummary {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}
