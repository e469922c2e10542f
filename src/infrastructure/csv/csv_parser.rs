// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files with encoding fallback and error handling

use crate::domain::csv::{CsvField, CsvRow};
use crate::domain::error::{LoadError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed file: header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

/// CSV parser with encoding fallback
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values (off: values are copied verbatim)
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file
    pub fn parse_file(&self, path: &Path) -> Result<CsvDocument> {
        let bytes = std::fs::read(path).map_err(|e| {
            LoadError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let content = decode_content(&bytes);
        let document = self.parse_content(&content)?;

        debug!(
            path = %path.display(),
            rows = document.rows.len(),
            "Parsed CSV file"
        );
        Ok(document)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<CsvDocument> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Short rows are padded below
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                LoadError::ParseError(format!("Failed to parse CSV row {}: {}", index, e))
            })?;
            rows.push(Self::parse_row(index, &headers, &record));
        }

        Ok(CsvDocument { headers, rows })
    }

    fn parse_row(index: usize, headers: &[String], record: &StringRecord) -> CsvRow {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| CsvField::new(header.as_str(), record.get(idx).unwrap_or("")))
            .collect();

        CsvRow::new(index, fields)
    }
}

/// UTF-8 first, Windows-1252 for anything else. A leading BOM is dropped.
fn decode_content(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            warn!("CSV input is not valid UTF-8, decoding as Windows-1252");
            let (content, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            content.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_csv() {
        let content = "meta_table_name,finance_table_amount\nWidget,19.99\nGadget,5";
        let parser = CsvParser::new();
        let document = parser.parse_content(content).unwrap();

        assert_eq!(
            document.headers,
            vec!["meta_table_name", "finance_table_amount"]
        );
        assert_eq!(document.rows.len(), 2);
        assert_eq!(document.rows[0].index, 0);
        assert_eq!(document.rows[0].get("meta_table_name"), Some("Widget"));
        assert_eq!(document.rows[1].get("finance_table_amount"), Some("5"));
    }

    #[test]
    fn test_default_keeps_surrounding_whitespace() {
        let content = "meta_table_name,finance_table_amount\n  Widget  ,19.99";
        let document = CsvParser::new().parse_content(content).unwrap();
        assert_eq!(document.rows[0].get("meta_table_name"), Some("  Widget  "));
    }

    #[test]
    fn test_trim_when_enabled() {
        let content = "a,b\n x , y ";
        let document = CsvParser::new().with_trim(true).parse_content(content).unwrap();
        assert_eq!(document.rows[0].get("a"), Some("x"));
        assert_eq!(document.rows[0].get("b"), Some("y"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let content = "a,b,c\n1,2";
        let document = CsvParser::new().parse_content(content).unwrap();
        assert_eq!(document.rows[0].get("c"), Some(""));
    }

    #[test]
    fn test_custom_delimiter_and_no_trim() {
        let content = "a;b\n x ;y";
        let document = CsvParser::new()
            .with_delimiter(b';')
            .with_trim(false)
            .parse_content(content)
            .unwrap();
        assert_eq!(document.rows[0].get("a"), Some(" x "));
    }

    #[test]
    fn test_decode_strips_bom_and_falls_back() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"name\nx");
        assert_eq!(decode_content(&bytes), "name\nx");

        // 0xE9 is 'é' in Windows-1252 and invalid on its own in UTF-8
        assert_eq!(decode_content(b"caf\xE9"), "café");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "meta_table_name,finance_table_amount").unwrap();
        writeln!(file, "Widget,19.99").unwrap();

        let document = CsvParser::new().parse_file(file.path()).unwrap();
        assert_eq!(document.rows.len(), 1);
        assert_eq!(document.rows[0].get("meta_table_name"), Some("Widget"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CsvParser::new()
            .parse_file(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::IoError(_)));
    }
}
