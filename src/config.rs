//! Configuration handling for clubcsv

use std::path::{Path, PathBuf};

/// Format of the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Configuration for a processing run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the exported CSV file
    pub input: PathBuf,
    /// Where to write the processed CSV (defaults next to the input)
    pub output: Option<PathBuf>,
    /// Field delimiter; detected from the header line when unset
    pub delimiter: Option<u8>,
    /// Prefix the output with a UTF-8 byte-order mark
    pub write_bom: bool,
    /// Report format
    pub report_format: ReportFormat,
    /// Number of rows shown in the report previews
    pub preview_rows: usize,
    /// Transform rows on the rayon thread pool
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            delimiter: None,
            write_bom: true,
            report_format: ReportFormat::default(),
            preview_rows: 10,
            parallel: true,
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Set the output path
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Force a field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Enable or disable the byte-order mark
    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    /// Set report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Set number of preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Enable or disable parallel row processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Output path, defaulting to `<stem>_processed.csv` beside the input
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let name = match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => format!("{}_processed.csv", stem),
        _ => "processed.csv".to_string(),
    };
    input.with_file_name(name)
}
