//! Tri-state field for partial updates: absent, explicit null, or a value.

use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Clone + Into<crate::sql::FieldValue>> Patch<T> {
    /// Push `(column, value)` unless the field was omitted.
    pub fn push_into(&self, column: &'static str, fields: &mut Vec<(&'static str, crate::sql::FieldValue)>) {
        match self {
            Patch::Absent => {}
            Patch::Null => fields.push((column, crate::sql::FieldValue::Null)),
            Patch::Value(v) => fields.push((column, v.clone().into())),
        }
    }
}

// Only reached when the key is present; `#[serde(default)]` covers the absent case.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Patch::Null, Patch::Value))
    }
}
