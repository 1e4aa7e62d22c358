//! Aligned table report.

use super::{
    ansi_color, origin_style, ReportConfig, ReportError, ReportFormat, ReportGenerator,
};
use crate::diff::DiffResult;
use crate::hlr::{HlrNode, Row};
use unicode_width::UnicodeWidthStr;

/// Table reporter, one line per row in forest order
pub struct TableReporter {
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
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

    fn render<N: HlrNode>(&self, nodes: &[N], with_origin: bool) -> Vec<String> {
        let mut header = vec!["ID", "PARENT", "STEP", "DESCRIPTION", "INSTANCE PATH"];
        if with_origin {
            header.push("PART OF");
        }

        let cells: Vec<Vec<String>> = nodes
            .iter()
            .map(|node| {
                let mut row = vec![
                    node.id().to_string(),
                    node.parent_id().map_or_else(|| "-".to_string(), |p| p.to_string()),
                    node.part().step_id.to_string(),
                    node.description(),
                    node.instance_path().to_string(),
                ];
                if let Some(part_of) = node.part_of().filter(|_| with_origin) {
                    row.push(part_of.to_string());
                }
                row
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 2);
        let header_cells: Vec<String> = header.iter().map(|h| (*h).to_string()).collect();
        lines.push(ansi_color(&join_padded(&header_cells, &widths), "bold", self.colored));
        lines.push("─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

        for (node, row) in nodes.iter().zip(&cells) {
            let line = join_padded(row, &widths);
            let (_, color) = origin_style(node.part_of());
            lines.push(if color.is_empty() {
                line
            } else {
                ansi_color(&line, color, self.colored)
            });
        }
        lines
    }
}

/// Left-align cells to display widths, two spaces apart, without trailing padding.
fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        }
    }
    line
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Ok(self.render(rows, false).join("\n") + "\n")
    }

    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Ok(self.render(&result.rows, true).join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}
