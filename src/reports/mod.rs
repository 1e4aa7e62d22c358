//! Report generation for HLR forests and diff results.
//!
//! Output formats:
//! - Tree: indented instance tree, with origin markers for diffs
//! - Table: aligned columns with every display field
//! - JSON: structured data for programmatic integration
//! - DOT: Graphviz instance tree (and the part/relation graph, see [`dot`])
//! - Summary: compact counts and outcome

pub mod dot;
mod json;
mod summary;
mod table;
mod tree;
mod types;

pub use dot::{render_part_graph, DotReporter};
pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use table::TableReporter;
pub use tree::TreeReporter;
pub use types::{GraphStyle, ReportConfig, ReportFormat, ReportMetadata};

use crate::diff::{DiffResult, PartOf};
use crate::hlr::Row;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for the forest of a single file
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report from diff results
    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write a diff report to a writer
    fn write_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_diff_report(result, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Tree => {
            if use_color {
                Box::new(TreeReporter::new())
            } else {
                Box::new(TreeReporter::new().no_color())
            }
        }
        ReportFormat::Table => {
            if use_color {
                Box::new(TableReporter::new())
            } else {
                Box::new(TableReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Dot => Box::new(DotReporter::new()),
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
    }
}

/// Apply ANSI color formatting if colored output is enabled.
pub(crate) fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Marker and color of a row origin in text reports
pub(crate) const fn origin_style(part_of: Option<PartOf>) -> (char, &'static str) {
    match part_of {
        None | Some(PartOf::Both) => (' ', ""),
        Some(PartOf::First) => ('-', "red"),
        Some(PartOf::Second) => ('+', "green"),
        Some(PartOf::SecondToRelocate) => ('?', "yellow"),
    }
}
