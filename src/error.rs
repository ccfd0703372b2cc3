//! File-level errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before or after the rows are transformed
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no header line.
    #[error("CSV file has no header line: {path}")]
    MissingHeader { path: PathBuf },

    /// A record could not be split into fields.
    #[error("failed to parse CSV {path} at line {line}: {source}")]
    CsvParse {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// Failed to serialize the processed rows.
    #[error("failed to write CSV: {0}")]
    CsvWrite(#[from] csv::Error),
}

/// Result type for file-level operations
pub type Result<T> = std::result::Result<T, Error>;
