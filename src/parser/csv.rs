//! CSV export parser

use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{RawDataset, RawRow};

use super::encoding::decode;

/// Delimiters considered when none is configured, in tie-break order
const DELIMITER_CANDIDATES: [u8; 4] = *b",;\t|";

/// Parser for CSV exports
pub struct CsvParser;

impl CsvParser {
    /// Read and parse a file
    pub fn parse(&self, path: &Path, config: &Config) -> Result<RawDataset> {
        let bytes = std::fs::read(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(&bytes, path, config)
    }

    /// Parse file contents; `path` is only used in error messages
    pub fn parse_bytes(&self, bytes: &[u8], path: &Path, config: &Config) -> Result<RawDataset> {
        let (text, encoding) = decode(bytes);
        let delimiter = config
            .delimiter
            .unwrap_or_else(|| detect_delimiter(&text));
        debug!(encoding, delimiter = %char::from(delimiter), "decoded input");

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|source| Error::CsvParse {
                path: path.to_path_buf(),
                line: 1,
                source,
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(Error::MissingHeader {
                path: path.to_path_buf(),
            });
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.map_err(|source| Error::CsvParse {
                path: path.to_path_buf(),
                line: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;

            if record.len() > columns.len() {
                warn!(
                    row = rows.len() + 1,
                    extra = record.len() - columns.len(),
                    "row has more fields than the header; extra fields dropped"
                );
            }

            // Missing trailing cells are null
            let row: RawRow = columns
                .iter()
                .enumerate()
                .map(|(i, column)| (column.clone(), record.get(i).map(str::to_string)))
                .collect();
            rows.push(row);
        }

        Ok(RawDataset {
            columns,
            rows,
            delimiter,
            encoding,
        })
    }
}

/// Pick the candidate delimiter that occurs most often in the header line.
///
/// Characters inside double quotes are not counted.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();

    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for b in header.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = DELIMITER_CANDIDATES.iter().position(|&c| c == b) {
                counts[i] += 1;
            }
        }
    }

    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0;
    for (&candidate, &count) in DELIMITER_CANDIDATES.iter().zip(&counts) {
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
