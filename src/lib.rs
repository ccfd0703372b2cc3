//! clubcsv - Normalize club registration exports
//!
//! Reads CSV exports of membership registrations and trial-training sign-ups,
//! derives salutation, entry date and membership status, formats phone and
//! AHV numbers, consolidates e-mail addresses and reports per-row warnings.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod transform;

pub use config::Config;
pub use error::Error;
pub use model::{OutputRow, ProcessedDataset, RawRow, RecordShape, Warning};
pub use transform::{process, DatasetProcessor, RecordTransformer, RunTime};
