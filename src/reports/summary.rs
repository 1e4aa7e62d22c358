//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ansi_color, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{DiffOutcome, DiffResult};
use crate::hlr::{forest, Row};
use std::collections::HashSet;

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        lines.push(self.color("STEP Assembly Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let Some(path) = &config.metadata.first_path {
            lines.push(format!("{}  {path}", self.color("File:", "cyan")));
        }

        let distinct_parts: HashSet<_> = rows.iter().map(|r| r.part.step_id).collect();
        let max_depth = rows.iter().map(|r| r.depth).max().unwrap_or(0);
        lines.push(format!(
            "{}  {} instances of {} parts",
            self.color("Rows:", "cyan"),
            rows.len(),
            distinct_parts.len()
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Roots:", "cyan"),
            forest::roots(rows).len()
        ));
        lines.push(format!("{}  {max_depth}", self.color("Depth:", "cyan")));
        lines.push(format!(
            "{}  {:016x}",
            self.color("Fingerprint:", "cyan"),
            forest::fingerprint(rows)
        ));

        Ok(lines.join("\n") + "\n")
    }

    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let summary = &result.summary;
        let mut lines = Vec::new();

        lines.push(self.color("STEP Diff Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        let first = config.metadata.first_path.as_deref().unwrap_or("first");
        let second = config.metadata.second_path.as_deref().unwrap_or("second");
        lines.push(format!(
            "{}  {first} → {second}",
            self.color("Files:", "cyan")
        ));
        lines.push(String::new());

        lines.push(format!(
            "{}  {} shared, {} only in first, {} only in second",
            self.color("Rows:", "cyan"),
            summary.both,
            self.color(&summary.first_only.to_string(), "red"),
            self.color(&summary.second_only.to_string(), "green"),
        ));
        if summary.unresolved > 0 {
            lines.push(format!(
                "{}  {}",
                self.color("Unresolved:", "cyan"),
                self.color(&summary.unresolved.to_string(), "yellow")
            ));
        }
        lines.push(format!(
            "{}  {} merged, {} branches relocated",
            self.color("Matching:", "cyan"),
            summary.merged_duplicates,
            summary.relocated_branches
        ));
        let max_depth = forest::depth_of(&result.rows)
            .into_values()
            .max()
            .unwrap_or(0);
        lines.push(format!("{}  {max_depth}", self.color("Depth:", "cyan")));
        lines.push(String::new());

        let status = summary.outcome.status_text();
        let status_color = match summary.outcome {
            DiffOutcome::Identical => "green",
            DiffOutcome::Merged => "cyan",
            DiffOutcome::NoCommonRoot => "red",
            DiffOutcome::Partial => "yellow",
        };
        lines.push(format!(
            "{}  {}",
            self.color("Status:", "bold"),
            self.color(status, status_color)
        ));

        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
