//! Terminal run report

use std::io::{IsTerminal, Write};

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Ansi, Color, ColorChoice, ColorSpec, NoColor, WriteColor};

use super::{delimiter_label, ReportFormatter, RunSummary};

/// Terminal report with optional colors
pub struct TerminalReport {
    color_choice: ColorChoice,
}

impl TerminalReport {
    pub fn new() -> Self {
        Self {
            color_choice: ColorChoice::Auto,
        }
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self { color_choice }
    }

    fn use_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }

    fn write_status(&self, summary: &RunSummary<'_>, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            writer,
            "{} Zeilen und {} Spalten analysiert und verarbeitet (Dateiart: {}, Trennzeichen: {})",
            summary.raw.row_count(),
            summary.raw.column_count(),
            summary.processed.shape.label(),
            delimiter_label(summary.raw.delimiter)
        )?;
        writeln!(writer, "Ausgabe: {}", summary.output.display())?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_warnings(&self, summary: &RunSummary<'_>, writer: &mut dyn WriteColor) -> Result<()> {
        let warnings = &summary.processed.warnings;
        if warnings.is_empty() {
            return Ok(());
        }

        writer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(writer, "Warnungen ({})", warnings.len())?;
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        for warning in warnings {
            writeln!(writer, "  ⚠ {}", warning)?;
        }
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_preview(
        &self,
        title: &str,
        headers: &[String],
        rows: Vec<Vec<String>>,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        writeln!(writer, "{} (Erste {} Zeilen)", title, rows.len())?;
        writeln!(writer, "{}", build_table(headers, rows))?;
        writeln!(writer)?;
        Ok(())
    }

    fn render_to(&self, summary: &RunSummary<'_>, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_status(summary, writer)?;
        self.write_warnings(summary, writer)?;
        self.write_preview(
            "Originaldaten",
            &summary.raw.columns,
            summary.original_preview(),
            writer,
        )?;
        self.write_preview(
            "Verarbeitete Daten",
            &summary.processed.headers,
            summary.processed_preview(),
            writer,
        )?;
        Ok(())
    }
}

impl Default for TerminalReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TerminalReport {
    fn render(&self, summary: &RunSummary<'_>, writer: &mut dyn Write) -> Result<()> {
        if self.use_color() {
            self.render_to(summary, &mut Ansi::new(writer))
        } else {
            self.render_to(summary, &mut NoColor::new(writer))
        }
    }
}

/// Build a formatted table from a header and rows
fn build_table(headers: &[String], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
