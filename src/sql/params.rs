//! Column values that can be validated and bound to a SQLite query.

use chrono::{DateTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A single column value taken from a create or update payload.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl<'q> Encode<'q, Sqlite> for FieldValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            FieldValue::Null => <Option<i64> as Encode<Sqlite>>::encode_by_ref(&None, buf),
            FieldValue::Int(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            FieldValue::Float(n) => <f64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            FieldValue::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf),
            FieldValue::Timestamp(t) => <DateTime<Utc> as Encode<Sqlite>>::encode_by_ref(t, buf),
        }
    }
}

impl sqlx::Type<Sqlite> for FieldValue {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_map_to_null() {
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(31)), FieldValue::Int(31));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(FieldValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(FieldValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(FieldValue::Text("x".into()).as_f64(), None);
        assert_eq!(FieldValue::Text("x".into()).as_text(), Some("x"));
    }
}
