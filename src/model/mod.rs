//! Data model for registration exports

mod record;
mod shape;

pub use record::{OutputRow, ProcessedDataset, RawDataset, RawRow, Record, Warning};
pub use shape::{fields, RecordShape};
