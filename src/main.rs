//! clubcsv - Normalize club registration exports

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use clubcsv::config::{Config, ReportFormat};
use clubcsv::logging::{init_logging, LogConfig};
use clubcsv::output::{render_to_stdout, CsvOutput, RunSummary};
use clubcsv::parser::CsvParser;
use clubcsv::transform::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Terminal,
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Terminal => ReportFormat::Terminal,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

/// Prepare registration and trial-training CSV exports for import
#[derive(Parser, Debug)]
#[command(name = "clubcsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Exported CSV file
    input: PathBuf,

    /// Where to write the processed file [default: <input>_processed.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter (detected from the header line when omitted)
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Do not write a UTF-8 byte-order mark
    #[arg(long)]
    no_bom: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliReportFormat,

    /// Number of rows shown in the report previews
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Process rows on a single thread
    #[arg(long)]
    sequential: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character or 'tab': {}", s)),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(has_warnings) => {
            if has_warnings {
                ExitCode::from(1) // Processed with warnings
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    init_logging(
        &LogConfig::from_verbosity(cli.verbose).with_ansi(std::io::stderr().is_terminal()),
    );

    let mut config = Config::new(cli.input)
        .with_bom(!cli.no_bom)
        .with_report_format(cli.format.into())
        .with_preview_rows(cli.preview)
        .with_parallel(!cli.sequential);
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    if let Some(delimiter) = cli.delimiter {
        config = config.with_delimiter(delimiter);
    }

    let raw = CsvParser
        .parse(&config.input, &config)
        .with_context(|| format!("Failed to parse file: {}", config.input.display()))?;

    let processed = process(&raw, &config);

    let output_path = config.output_path();
    CsvOutput::new(raw.delimiter)
        .with_bom(config.write_bom)
        .write_file(&processed, &output_path)
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    let summary = RunSummary {
        input: &config.input,
        output: &output_path,
        raw: &raw,
        processed: &processed,
        preview_rows: config.preview_rows,
    };
    render_to_stdout(&summary, config.report_format)?;

    Ok(processed.has_warnings())
}
