//! Processed CSV writer

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ProcessedDataset;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes processed rows in the shape's column order
pub struct CsvOutput {
    delimiter: u8,
    bom: bool,
}

impl CsvOutput {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            bom: true,
        }
    }

    /// Enable or disable the leading byte-order mark
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Serialize the dataset to a writer
    pub fn write<W: Write>(&self, dataset: &ProcessedDataset, mut writer: W) -> Result<()> {
        if self.bom {
            writer.write_all(UTF8_BOM).map_err(csv::Error::from)?;
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(&dataset.headers)?;
        for row in &dataset.rows {
            csv_writer.write_record(row.values())?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Serialize the dataset to a file
    pub fn write_file(&self, dataset: &ProcessedDataset, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        self.write(dataset, std::io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OutputRow, RecordShape};
    use indexmap::IndexMap;

    fn dataset() -> ProcessedDataset {
        let fields: IndexMap<String, String> = [
            ("Vorname".to_string(), "Anna".to_string()),
            ("Ort".to_string(), "Basel; Stadt".to_string()),
        ]
        .into_iter()
        .collect();

        ProcessedDataset {
            shape: RecordShape::Standard,
            headers: vec!["Vorname".to_string(), "Ort".to_string()],
            rows: vec![OutputRow {
                row: 1,
                fields,
                processed_at: String::new(),
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_write_with_bom_and_delimiter() {
        let mut buf = Vec::new();
        CsvOutput::new(b';').write(&dataset(), &mut buf).unwrap();

        assert!(buf.starts_with(UTF8_BOM));
        let text = String::from_utf8(buf[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Vorname;Ort\nAnna;\"Basel; Stadt\"\n");
    }

    #[test]
    fn test_write_without_bom() {
        let mut buf = Vec::new();
        CsvOutput::new(b',')
            .with_bom(false)
            .write(&dataset(), &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Vorname,Ort\nAnna,Basel; Stadt\n");
    }
}
