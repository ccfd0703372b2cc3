//! Raw rows, working records, and processed output

use indexmap::IndexMap;
use serde::Serialize;

use super::shape::RecordShape;

/// One input line: source column name to cell value (absent cells are `None`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRow {
    cells: IndexMap<String, Option<String>>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.insert(column.into(), value);
    }

    /// Get a cell value; `None` when the column is absent or the cell is null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// Iterate cells in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<Option<String>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Working record built from a raw row while it is transformed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<String, Option<String>>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Field value, `None` when absent or null
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Set a field to a string value
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), Some(value.into()));
    }

    /// Set a field to a possibly null value
    pub fn set_raw(&mut self, field: impl Into<String>, value: Option<String>) {
        self.fields.insert(field.into(), value);
    }

    /// Check whether a field exists (even if null)
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A per-row processing warning; never blocks the row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// 1-based position of the row in the input
    pub row: usize,
    /// Human readable description
    pub message: String,
}

impl Warning {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zeile {}: {}", self.row, self.message)
    }
}

/// A transformed row holding exactly the shape's output columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    /// 1-based position of the source row
    pub row: usize,
    /// Output values in header order
    pub fields: IndexMap<String, String>,
    /// When the row was processed (RFC 3339, UTC)
    pub processed_at: String,
}

impl OutputRow {
    /// Project a working record onto a header list; missing or null fields become empty
    pub fn project(record: &Record, headers: &[&str], row: usize) -> Self {
        let fields = headers
            .iter()
            .map(|h| (h.to_string(), record.get(h).unwrap_or_default().to_string()))
            .collect();

        Self {
            row,
            fields,
            processed_at: record
                .get(super::fields::PROCESSED_AT)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Value of an output column
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Values in header order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }
}

/// A decoded input file, split into columns and rows
#[derive(Debug, Clone)]
pub struct RawDataset {
    /// Column names as they appear in the header line
    pub columns: Vec<String>,
    /// Rows in file order
    pub rows: Vec<RawRow>,
    /// Field delimiter used by the file
    pub delimiter: u8,
    /// Name of the character encoding the bytes were decoded with
    pub encoding: &'static str,
}

impl RawDataset {
    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Result of processing a whole dataset
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDataset {
    /// Shape selected for the dataset
    pub shape: RecordShape,
    /// Output column order
    pub headers: Vec<String>,
    /// Transformed rows in input order
    pub rows: Vec<OutputRow>,
    /// Warnings in row order
    pub warnings: Vec<Warning>,
}

impl ProcessedDataset {
    /// Check if any row produced a warning
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of output rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
