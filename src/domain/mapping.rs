use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::error::{LoadError, Result};
use crate::domain::table::TableDefinition;

/// One rename: CSV header `source` becomes table column `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: String,
    pub target: String,
}

impl MappingEntry {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Ordered list of renames from CSV headers to table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: Vec<MappingEntry>,
}

impl Default for Mapping {
    fn default() -> Self {
        Self::from_pairs([("meta_table_name", "name"), ("finance_table_amount", "amount")])
    }
}

impl Mapping {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(source, target)| MappingEntry::new(source, target))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Source keys that do not appear among `headers`.
    pub fn missing_sources<'a>(&'a self, headers: &[String]) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|entry| !headers.iter().any(|h| h == &entry.source))
            .map(|entry| entry.source.as_str())
            .collect()
    }

    /// Check the mapping against the tables it feeds.
    ///
    /// Every target must name exactly one insertable column across all tables, and
    /// every insertable column must be fed by some target.
    pub fn validate_against(&self, tables: &[TableDefinition]) -> Result<()> {
        if self.entries.is_empty() {
            return Err(LoadError::Config("Mapping has no entries".to_string()));
        }

        let mut seen_targets = HashSet::new();
        for entry in &self.entries {
            if !seen_targets.insert(entry.target.as_str()) {
                return Err(LoadError::Config(format!(
                    "Mapping target '{}' is declared more than once",
                    entry.target
                )));
            }

            let owners: Vec<&TableDefinition> = tables
                .iter()
                .filter(|table| table.column(&entry.target).is_some())
                .collect();

            match owners.as_slice() {
                [] => {
                    return Err(LoadError::Config(format!(
                        "Mapping target '{}' (from '{}') matches no table column",
                        entry.target, entry.source
                    )))
                }
                [table] => {
                    let auto = table
                        .column(&entry.target)
                        .map(|c| c.auto_increment)
                        .unwrap_or(false);
                    if auto {
                        return Err(LoadError::Config(format!(
                            "Mapping target '{}' is auto-generated in table '{}'",
                            entry.target, table.name
                        )));
                    }
                }
                _ => {
                    let names: Vec<&str> = owners.iter().map(|t| t.name.as_str()).collect();
                    return Err(LoadError::Config(format!(
                        "Mapping target '{}' is ambiguous across tables: {}",
                        entry.target,
                        names.join(", ")
                    )));
                }
            }
        }

        for table in tables {
            for column in table.insertable_columns() {
                if !seen_targets.contains(column.name.as_str()) {
                    return Err(LoadError::Config(format!(
                        "Column '{}' of table '{}' has no mapping entry",
                        column.name, table.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{ColumnDef, ColumnType};

    #[test]
    fn test_default_mapping_fits_builtin_tables() {
        let mapping = Mapping::default();
        assert_eq!(mapping.entries().len(), 2);
        assert!(mapping.validate_against(&TableDefinition::builtin()).is_ok());
    }

    #[test]
    fn test_unknown_target_rejected() {
        let mapping = Mapping::from_pairs([
            ("meta_table_name", "name"),
            ("finance_table_amount", "amount"),
            ("extra", "nowhere"),
        ]);
        let err = mapping
            .validate_against(&TableDefinition::builtin())
            .unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_ambiguous_target_rejected() {
        let other = TableDefinition::new(
            "other_table",
            vec![ColumnDef::new("name", ColumnType::Text)],
            "name",
        );
        let tables = vec![TableDefinition::meta_table(), other];
        let mapping = Mapping::from_pairs([("meta_table_name", "name")]);
        let err = mapping.validate_against(&tables).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_uncovered_column_rejected() {
        let mapping = Mapping::from_pairs([("meta_table_name", "name")]);
        let err = mapping
            .validate_against(&TableDefinition::builtin())
            .unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_duplicate_and_auto_targets_rejected() {
        let duplicate = Mapping::from_pairs([("a", "name"), ("b", "name")]);
        assert!(duplicate
            .validate_against(&[TableDefinition::meta_table()])
            .is_err());

        let auto = Mapping::from_pairs([("a", "name"), ("b", "id")]);
        assert!(auto
            .validate_against(&[TableDefinition::meta_table()])
            .is_err());
    }

    #[test]
    fn test_missing_sources() {
        let mapping = Mapping::default();
        let headers = vec!["meta_table_name".to_string(), "other".to_string()];
        assert_eq!(mapping.missing_sources(&headers), vec!["finance_table_amount"]);
    }
}
