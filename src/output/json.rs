//! JSON run report

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{RecordShape, Warning};

use super::{delimiter_label, ReportFormatter, RunSummary};

/// JSON report formatter
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonRunReport<'a> {
    file: String,
    output: String,
    kind: RecordShape,
    kind_label: &'static str,
    delimiter: String,
    encoding: &'static str,
    row_count: usize,
    column_count: usize,
    headers: &'a [String],
    warnings: &'a [Warning],
    preview: Vec<JsonPreviewRow<'a>>,
}

#[derive(Serialize)]
struct JsonPreviewRow<'a> {
    row: usize,
    processed_at: &'a str,
    fields: &'a IndexMap<String, String>,
}

impl ReportFormatter for JsonReport {
    fn render(&self, summary: &RunSummary<'_>, writer: &mut dyn Write) -> Result<()> {
        let processed = summary.processed;

        let report = JsonRunReport {
            file: summary.input.display().to_string(),
            output: summary.output.display().to_string(),
            kind: processed.shape,
            kind_label: processed.shape.label(),
            delimiter: delimiter_label(summary.raw.delimiter),
            encoding: summary.raw.encoding,
            row_count: summary.raw.row_count(),
            column_count: summary.raw.column_count(),
            headers: &processed.headers,
            warnings: &processed.warnings,
            preview: processed
                .rows
                .iter()
                .take(summary.preview_rows)
                .map(|row| JsonPreviewRow {
                    row: row.row,
                    processed_at: &row.processed_at,
                    fields: &row.fields,
                })
                .collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
