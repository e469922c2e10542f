use serde::{Deserialize, Serialize};

use crate::domain::dialect::Dialect;
use crate::domain::value::{NullKind, SqlValue};

pub const META_TABLE: &str = "meta_table";
pub const FINANCE_TABLE: &str = "finance_table";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    Float,
    Varchar(u32),
    Text,
}

impl ColumnType {
    pub fn sql_name(&self) -> String {
        match self {
            ColumnType::Int => "INT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({})", len),
            ColumnType::Text => "TEXT".to_string(),
        }
    }

    pub fn null_kind(&self) -> NullKind {
        match self {
            ColumnType::Int => NullKind::Int,
            ColumnType::Float => NullKind::Float,
            ColumnType::Varchar(_) | ColumnType::Text => NullKind::Text,
        }
    }

    /// Turn a raw CSV value into the bind value for this column type.
    ///
    /// Text values are kept verbatim. An empty value is NULL only when the column allows it.
    pub fn convert(&self, raw: &str, nullable: bool) -> std::result::Result<SqlValue, String> {
        let trimmed = raw.trim();
        if nullable && trimmed.is_empty() {
            return Ok(SqlValue::TypedNull(self.null_kind()));
        }

        match self {
            ColumnType::Int => trimmed
                .parse::<i64>()
                .map(SqlValue::Int)
                .map_err(|_| format!("value '{}' is not a valid INT", raw)),
            ColumnType::Float => match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(SqlValue::Float(value)),
                _ => Err(format!("value '{}' is not a valid FLOAT", raw)),
            },
            ColumnType::Varchar(_) | ColumnType::Text => Ok(SqlValue::Text(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable: false,
            auto_increment: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Static description of one logical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: String,
}

impl TableDefinition {
    pub fn new(name: &str, columns: Vec<ColumnDef>, primary_key: &str) -> Self {
        Self {
            name: name.to_string(),
            columns,
            primary_key: primary_key.to_string(),
        }
    }

    pub fn meta_table() -> Self {
        Self::new(
            META_TABLE,
            vec![
                ColumnDef::new("id", ColumnType::Int).auto_increment(),
                ColumnDef::new("name", ColumnType::Varchar(255)),
            ],
            "id",
        )
    }

    pub fn finance_table() -> Self {
        Self::new(
            FINANCE_TABLE,
            vec![
                ColumnDef::new("id", ColumnType::Int).auto_increment(),
                ColumnDef::new("amount", ColumnType::Float),
            ],
            "id",
        )
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::meta_table(), Self::finance_table()]
    }

    /// Columns supplied by the caller on insert, in declaration order.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.auto_increment)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn create_table_sql(&self, dialect: Dialect) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.columns.len() + 1);
        let mut inline_primary_key = false;

        for column in &self.columns {
            let is_primary = column.name == self.primary_key;
            let line = match (dialect, column.auto_increment) {
                (Dialect::MySql, true) => format!(
                    "{} {} NOT NULL AUTO_INCREMENT",
                    column.name,
                    column.column_type.sql_name()
                ),
                (Dialect::Postgres, true) => format!("{} SERIAL NOT NULL", column.name),
                // SQLite only honours AUTOINCREMENT on an inline INTEGER PRIMARY KEY
                (Dialect::Sqlite, true) if is_primary => {
                    inline_primary_key = true;
                    format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", column.name)
                }
                _ => format!(
                    "{} {}{}",
                    column.name,
                    column.column_type.sql_name(),
                    if column.nullable { "" } else { " NOT NULL" }
                ),
            };
            lines.push(line);
        }

        if !inline_primary_key {
            lines.push(format!("PRIMARY KEY ({})", self.primary_key));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            lines.join(",\n    ")
        )
    }

    pub fn insert_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<&str> = self.insertable_columns().map(|c| c.name.as_str()).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            dialect.placeholders(columns.len())
        )
    }

    pub fn select_all_sql(&self) -> String {
        let columns: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns.join(", "),
            self.name,
            self.primary_key
        )
    }
}
