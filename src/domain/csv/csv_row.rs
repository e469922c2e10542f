// ============================================================
// CSV ROW TYPES
// ============================================================
// Rows as read from the input file, keyed by header name

use serde::{Deserialize, Serialize};

/// A single field in a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvField {
    /// Header the value was read under
    pub name: String,

    /// Raw field value
    pub value: String,
}

impl CsvField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single row in a CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    /// Fields in header order
    pub fields: Vec<CsvField>,
}

impl CsvRow {
    pub fn new(index: usize, fields: Vec<CsvField>) -> Self {
        Self { index, fields }
    }

    /// Build a row from `(header, value)` pairs
    pub fn from_pairs<K, V, I>(index: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| CsvField::new(name, value))
            .collect();
        Self { index, fields }
    }

    /// Look up a value by header name. The first matching header wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
