use super::ColumnType;
use serde::{Deserialize, Serialize};

/// A single field value, one variant per [`ColumnType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    String(String),
    Integer(i32),
    Long(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Double(f64),
}

impl FieldValue {
    pub fn kind(&self) -> ColumnType {
        match self {
            FieldValue::String(_) => ColumnType::String,
            FieldValue::Integer(_) => ColumnType::Integer,
            FieldValue::Long(_) => ColumnType::Long,
            FieldValue::Boolean(_) => ColumnType::Boolean,
            FieldValue::Bytes(_) => ColumnType::Bytes,
            FieldValue::Double(_) => ColumnType::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Long(v) => Some(*v),
            _ => None,
        }
    }
}

/// Ordered value tuple aligned to a schema's column order.
///
/// Unset columns stay `None`; the merge policy only applies where the
/// incoming record actually carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Option<FieldValue>>,
}

impl Record {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FieldValue> {
        self.values.get(position).and_then(|v| v.as_ref())
    }

    pub(crate) fn set_value(&mut self, position: usize, value: Option<FieldValue>) {
        self.values[position] = value;
    }

    pub(crate) fn take(&mut self, position: usize) -> Option<FieldValue> {
        self.values[position].take()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&FieldValue>> {
        self.values.iter().map(|v| v.as_ref())
    }
}
