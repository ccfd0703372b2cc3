//! Output: processed CSV and run reports

mod csv;
mod json;
mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::ReportFormat;
use crate::model::{ProcessedDataset, RawDataset};

pub use self::csv::CsvOutput;
pub use json::JsonReport;
pub use terminal::TerminalReport;

/// Everything a report needs to know about one run
pub struct RunSummary<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub raw: &'a RawDataset,
    pub processed: &'a ProcessedDataset,
    /// Number of rows shown in previews
    pub preview_rows: usize,
}

impl RunSummary<'_> {
    /// Original rows shown in previews, as cell strings in column order
    pub fn original_preview(&self) -> Vec<Vec<String>> {
        self.raw
            .rows
            .iter()
            .take(self.preview_rows)
            .map(|row| {
                self.raw
                    .columns
                    .iter()
                    .map(|c| row.get(c).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    /// Processed rows shown in previews, in header order
    pub fn processed_preview(&self) -> Vec<Vec<String>> {
        self.processed
            .rows
            .iter()
            .take(self.preview_rows)
            .map(|row| row.values().map(str::to_string).collect())
            .collect()
    }
}

/// Human readable form of a delimiter byte
pub fn delimiter_label(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "Tab".to_string(),
        d => char::from(d).to_string(),
    }
}

/// Trait for report formatters
pub trait ReportFormatter {
    /// Render a run report to a writer
    fn render(&self, summary: &RunSummary<'_>, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating report formatters
pub struct ReportFactory;

impl ReportFactory {
    /// Create a report formatter for a format
    pub fn create(format: ReportFormat) -> Box<dyn ReportFormatter> {
        match format {
            ReportFormat::Terminal => Box::new(TerminalReport::new()),
            ReportFormat::Json => Box::new(JsonReport::new()),
        }
    }
}

/// Render a run report to stdout
pub fn render_to_stdout(summary: &RunSummary<'_>, format: ReportFormat) -> Result<()> {
    let formatter = ReportFactory::create(format);
    let mut stdout = std::io::stdout().lock();
    formatter.render(summary, &mut stdout)
}
