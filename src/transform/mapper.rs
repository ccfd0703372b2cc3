//! Column renaming and value trimming

use crate::model::{RawRow, Record, RecordShape};

/// Map a raw row onto canonical column names, trimming string values.
///
/// Null cells stay null. Columns without a rename keep their source name.
pub fn map_row(raw: &RawRow, shape: RecordShape) -> Record {
    let mut record = Record::new();
    for (column, value) in raw.iter() {
        record.set_raw(
            shape.rename(column),
            value.map(|v| v.trim().to_string()),
        );
    }
    record
}
