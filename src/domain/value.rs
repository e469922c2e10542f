use serde::{Serialize, Serializer};
use std::fmt;

/// Parameter type a NULL is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullKind {
    Int,
    Float,
    Text,
}

/// A typed value bound as a statement parameter or read back from a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    /// NULL for a column of known type
    #[serde(serialize_with = "serialize_typed_null")]
    TypedNull(NullKind),
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl SqlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen so FLOAT columns read back through any driver compare cleanly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null | SqlValue::TypedNull(_) => write!(f, "NULL"),
            SqlValue::Int(value) => write!(f, "{}", value),
            SqlValue::Float(value) => write!(f, "{}", value),
            SqlValue::Text(value) => write!(f, "{}", value),
            SqlValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

fn serialize_typed_null<S: Serializer>(_kind: &NullKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_none()
}

/// One result row, columns in select order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub columns: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}
