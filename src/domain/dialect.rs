use serde::{Deserialize, Serialize};

use crate::domain::error::{LoadError, Result};

/// SQL flavour of the connected backend. Decides DDL spelling and placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Detect the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(LoadError::Config(format!(
                "Unsupported database scheme '{}'",
                other
            ))),
        }
    }

    /// Comma separated positional placeholders for `count` parameters.
    pub fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|n| match self {
                Dialect::Postgres => format!("${}", n),
                Dialect::MySql | Dialect::Sqlite => "?".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
