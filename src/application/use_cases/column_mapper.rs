use crate::domain::csv::{CsvRow, MappedRow};
use crate::domain::error::{LoadError, Result};
use crate::domain::mapping::Mapping;
use tracing::warn;

/// Rename CSV fields to table columns.
///
/// Values are copied verbatim and keep the mapping's declaration order. The first
/// row lacking a mapped source key aborts the whole load.
pub fn map_rows(rows: &[CsvRow], mapping: &Mapping) -> Result<Vec<MappedRow>> {
    rows.iter().map(|row| map_row(row, mapping)).collect()
}

pub fn map_row(row: &CsvRow, mapping: &Mapping) -> Result<MappedRow> {
    let mut mapped = MappedRow::new(row.index);
    for entry in mapping.entries() {
        let value = row.get(&entry.source).ok_or_else(|| {
            warn!(row = row.index, source_key = %entry.source, "CSV row is missing a mapped field");
            LoadError::MissingField {
                source_key: entry.source.clone(),
                row: row.index,
            }
        })?;
        mapped.push(entry.target.as_str(), value);
    }
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_row(index: usize) -> CsvRow {
        CsvRow::from_pairs(
            index,
            [
                ("meta_table_name", "Widget"),
                ("finance_table_amount", "19.99"),
                ("ignored", "x"),
            ],
        )
    }

    #[test]
    fn test_maps_exactly_target_keys() {
        let mapped = map_rows(&[widget_row(0)], &Mapping::default()).unwrap();

        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].columns().collect::<Vec<_>>(), vec!["name", "amount"]);
        assert_eq!(mapped[0].get("name"), Some("Widget"));
        assert_eq!(mapped[0].get("amount"), Some("19.99"));
        assert_eq!(mapped[0].get("ignored"), None);
    }

    #[test]
    fn test_order_follows_mapping_declaration() {
        let mapping =
            Mapping::from_pairs([("finance_table_amount", "amount"), ("meta_table_name", "name")]);
        let mapped = map_row(&widget_row(0), &mapping).unwrap();
        assert_eq!(mapped.columns().collect::<Vec<_>>(), vec!["amount", "name"]);
    }

    #[test]
    fn test_values_copied_verbatim() {
        let row = CsvRow::from_pairs(0, [("meta_table_name", "  padded  "), ("finance_table_amount", "")]);
        let mapped = map_row(&row, &Mapping::default()).unwrap();
        assert_eq!(mapped.get("name"), Some("  padded  "));
        assert_eq!(mapped.get("amount"), Some(""));
    }

    #[test]
    fn test_missing_field_names_key_and_row() {
        let rows = vec![
            widget_row(0),
            CsvRow::from_pairs(1, [("meta_table_name", "Gadget")]),
        ];
        let err = map_rows(&rows, &Mapping::default()).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingField {
                source_key: "finance_table_amount".to_string(),
                row: 1,
            }
        );
    }

    #[test]
    fn test_input_untouched_and_deterministic() {
        let rows = vec![widget_row(0), widget_row(1)];
        let before = rows.clone();
        let first = map_rows(&rows, &Mapping::default()).unwrap();
        let second = map_rows(&rows, &Mapping::default()).unwrap();
        assert_eq!(rows, before);
        assert_eq!(first, second);
        assert_eq!(first[1].index, 1);
    }
}
