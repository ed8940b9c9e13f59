//! In-memory tabular dataset parsed from delimited text
//!
//! A dataset lives only for the duration of one profiling call. Cells keep
//! their trimmed textual form; every missing representation collapses into
//! [`Cell::Missing`] so that row equality treats all of them alike.

mod infer;

pub use infer::{infer_column_type, is_missing_token, MISSING_TOKENS};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Coarse type bucket of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Datetime,
    /// Anything that fits no bucket (boolean-like, entirely missing)
    Other,
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Missing,
    Value(String),
}

impl Cell {
    /// Build a cell from a raw field, applying the missing-value policy.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if is_missing_token(trimmed) {
            Cell::Missing
        } else {
            Cell::Value(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Missing => None,
            Cell::Value(v) => Some(v),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Errors raised while reading delimited text
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Dataset has no header row")]
    MissingHeader,

    #[error("Malformed record at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Rows and typed columns of one dataset snapshot
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset from a header and rows already split into cells.
    ///
    /// Rows are padded with missing cells or truncated to the header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();

        let columns = unique_headers(headers)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let column_type = infer_column_type(rows.len(), rows.iter().map(|r| &r[idx]));
                Column { name, column_type }
            })
            .collect();

        Self { columns, rows }
    }

    /// Parse delimited text. The delimiter follows the filename extension.
    pub fn from_csv_bytes(content: &[u8], filename: &str) -> Result<Self, DatasetError> {
        let text = std::str::from_utf8(content)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_for(filename))
            .flexible(true)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DatasetError::Malformed {
                line: 1,
                message: e.to_string(),
            })?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DatasetError::MissingHeader);
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| DatasetError::Malformed {
                // +2: 1-based lines plus the header
                line: e.position().map(|p| p.line() as usize).unwrap_or(index + 2),
                message: e.to_string(),
            })?;
            rows.push(record.iter().map(Cell::from_field).collect());
        }

        debug!(
            "Parsed {} with {} columns and {} rows",
            filename,
            headers.len(),
            rows.len()
        );

        Ok(Self::from_rows(headers, rows))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cells of one column, top to bottom
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }
}

/// Best-effort (rows, columns) for content that failed to parse.
///
/// Counts non-blank lines after the first and delimiters in the first line.
/// Quoting is ignored, so the result is only an estimate.
pub fn lenient_shape(content: &[u8], filename: &str) -> (usize, usize) {
    let text = String::from_utf8_lossy(content);
    let delimiter = delimiter_for(filename) as char;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    match lines.next() {
        Some(header) => {
            let columns = header.split(delimiter).count();
            (lines.count(), columns)
        }
        None => (0, 0),
    }
}

fn delimiter_for(filename: &str) -> u8 {
    let lower = filename.to_lowercase();
    if lower.ends_with(".tsv") || lower.ends_with(".tab") {
        b'\t'
    } else {
        b','
    }
}

/// Make column names unique and non-empty.
///
/// Blank names become `Unnamed: {idx}`; repeats get `.1`, `.2`, ... suffixes.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(headers.len());

    for (idx, name) in headers.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_csv() {
        let data = b"id,name,score\n1,alice,9.5\n2,bob,7\n";
        let ds = Dataset::from_csv_bytes(data, "people.csv").unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 3);
        assert_eq!(ds.columns()[0].column_type, ColumnType::Numeric);
        assert_eq!(ds.columns()[1].column_type, ColumnType::Categorical);
        assert_eq!(ds.columns()[2].column_type, ColumnType::Numeric);
    }

    #[test]
    fn test_missing_tokens_collapse() {
        let data = b"a,b\n,NA\nnull,x\nN/A,\n";
        let ds = Dataset::from_csv_bytes(data, "m.csv").unwrap();
        let missing: usize = ds
            .rows()
            .iter()
            .flatten()
            .filter(|c| c.is_missing())
            .count();
        assert_eq!(missing, 5);
    }

    #[test]
    fn test_short_and_long_rows_are_normalized() {
        let data = b"a,b,c\n1,2\n1,2,3,4\n";
        let ds = Dataset::from_csv_bytes(data, "ragged.csv").unwrap();
        assert_eq!(ds.rows()[0].len(), 3);
        assert_eq!(ds.rows()[0][2], Cell::Missing);
        assert_eq!(ds.rows()[1].len(), 3);
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let data = "\u{feff}name,notes\n\"Smith, J\",\"said \"\"hi\"\"\"\n".as_bytes();
        let ds = Dataset::from_csv_bytes(data, "q.csv").unwrap();
        assert_eq!(ds.columns()[0].name, "name");
        assert_eq!(ds.rows()[0][0], Cell::Value("Smith, J".to_string()));
        assert_eq!(ds.rows()[0][1], Cell::Value("said \"hi\"".to_string()));
    }

    #[test]
    fn test_tsv_uses_tab_delimiter() {
        let data = b"a\tb\n1\t2\n";
        let ds = Dataset::from_csv_bytes(data, "data.TSV").unwrap();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.columns()[1].column_type, ColumnType::Numeric);
    }

    #[test]
    fn test_header_only_has_zero_rows() {
        let ds = Dataset::from_csv_bytes(b"a,b,c\n", "h.csv").unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 3);
        assert_eq!(ds.columns()[0].column_type, ColumnType::Categorical);
    }

    #[test]
    fn test_empty_content_fails() {
        assert!(matches!(
            Dataset::from_csv_bytes(b"", "empty.csv"),
            Err(DatasetError::MissingHeader)
        ));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let data = [b'a', b'\n', 0xff, 0xfe, b'\n'];
        assert!(matches!(
            Dataset::from_csv_bytes(&data, "bin.csv"),
            Err(DatasetError::Encoding(_))
        ));
    }

    #[test]
    fn test_duplicate_and_blank_headers_are_made_unique() {
        let ds = Dataset::from_csv_bytes(b"x,x,,x\n1,2,3,4\n", "dup.csv").unwrap();
        let names: Vec<&str> = ds.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "x.1", "Unnamed: 2", "x.2"]);
    }

    #[test]
    fn test_lenient_shape() {
        assert_eq!(lenient_shape(b"a,b,c\n1,2,3\n\n4,5,6\n", "f.csv"), (2, 3));
        assert_eq!(lenient_shape(b"", "f.csv"), (0, 0));
        assert_eq!(lenient_shape(b"a\tb\n1\t2\n", "f.tsv"), (1, 2));
    }
}
