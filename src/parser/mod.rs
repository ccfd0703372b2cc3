//! Parser layer for reading exported registration files

mod csv;
mod encoding;

pub use self::csv::{detect_delimiter, CsvParser};
pub use self::encoding::decode;
