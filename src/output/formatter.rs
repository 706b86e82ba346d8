//! Result table formatter
//!
//! Reads a LaTeX results artifact, ranks its rows and renders them as an
//! aligned table, CSV, or JSON.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::table::{ResultsTable, DEFAULT_SORT_COLUMN};

/// Separator between aligned columns
const COLUMN_GAP: &str = "  ";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result of formatting one artifact
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Artifact was found and rendered
    Rendered(String),

    /// Nothing exists at the given path
    NotFound(PathBuf),
}

impl fmt::Display for FormatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatOutcome::Rendered(text) => f.write_str(text),
            FormatOutcome::NotFound(path) => {
                write!(f, "results file not found: {}", path.display())
            }
        }
    }
}

/// Formats LaTeX result artifacts for the terminal
pub struct ResultTableFormatter {
    format: OutputFormat,
    sort_column: usize,
}

impl ResultTableFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sort_column: DEFAULT_SORT_COLUMN,
        }
    }

    /// Rank rows by a different column
    pub fn with_sort_column(mut self, column: usize) -> Self {
        self.sort_column = column;
        self
    }

    /// Read, rank and render the artifact at `path`.
    ///
    /// Anything other than a regular file at `path` is reported as
    /// [`FormatOutcome::NotFound`]. Bytes that are not UTF-8 are replaced
    /// rather than rejected.
    pub fn format(&self, path: impl AsRef<Path>) -> Result<FormatOutcome> {
        let path = path.as_ref();

        if !path.is_file() {
            debug!("Artifact missing: {}", path.display());
            return Ok(FormatOutcome::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read results file: {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            warn!(
                "{} is not valid UTF-8; invalid bytes replaced",
                path.display()
            );
        }

        let mut table = ResultsTable::parse(&content);
        if table.is_empty() {
            return Ok(FormatOutcome::Rendered(format!(
                "no table rows found in {}",
                path.display()
            )));
        }

        debug!(
            "Parsed {} rows x {} columns from {}",
            table.rows.len(),
            table.width(),
            path.display()
        );

        table.sort_descending_by(self.sort_column);
        self.render(&table).map(FormatOutcome::Rendered)
    }

    /// Render an already ranked table
    pub fn render(&self, table: &ResultsTable) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(render_aligned(table)),
            OutputFormat::Csv => render_csv(table),
            OutputFormat::Json => {
                serde_json::to_string(table).context("Failed to serialize table")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(table).context("Failed to serialize table")
            }
        }
    }
}

impl Default for ResultTableFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Left-aligned columns, widest cell per column, last column unpadded
fn render_aligned(table: &ResultsTable) -> String {
    let widths: Vec<usize> = (0..table.width())
        .map(|col| {
            table
                .all_rows()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let last = table.width().saturating_sub(1);

    table
        .all_rows()
        .map(|row| {
            let mut line = String::new();
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    line.push_str(COLUMN_GAP);
                }
                if col < last {
                    line.push_str(&format!("{:<width$}", cell, width = widths[col]));
                } else {
                    line.push_str(cell);
                }
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_csv(table: &ResultsTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table.all_rows() {
        writer.write_record(row).context("Failed to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    let mut text = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
