//! Indented tree report.

use super::{
    ansi_color, origin_style, ReportConfig, ReportError, ReportFormat, ReportGenerator,
};
use crate::diff::DiffResult;
use crate::hlr::{forest, HlrNode, Row};

/// Renders a forest as an indented tree.
///
/// Diff rows are prefixed with their origin: ` ` shared, `-` first file only,
/// `+` second file only, `?` not placed.
pub struct TreeReporter {
    colored: bool,
}

impl TreeReporter {
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

    fn render<N: HlrNode>(&self, nodes: &[N], markers: bool) -> Vec<String> {
        let children = forest::children_map(nodes);
        let mut lines = Vec::with_capacity(nodes.len());

        // (position, prefix of the line, prefix handed to children, connector)
        let mut stack: Vec<(usize, String, &str)> = forest::roots(nodes)
            .into_iter()
            .rev()
            .map(|pos| (pos, String::new(), ""))
            .collect();

        while let Some((pos, prefix, connector)) = stack.pop() {
            let node = &nodes[pos];
            let (marker, color) = origin_style(node.part_of());

            let label = format!(
                "{prefix}{connector}{} {}",
                node.instance_name(),
                ansi_color(&node.description(), "dim", self.colored)
            );
            let line = if markers {
                format!("{marker} {label}")
            } else {
                label
            };
            lines.push(if color.is_empty() {
                line
            } else {
                ansi_color(&line, color, self.colored)
            });

            let child_prefix = match connector {
                "" => prefix,
                "└── " => format!("{prefix}    "),
                _ => format!("{prefix}│   "),
            };
            if let Some(kids) = children.get(&Some(node.id())) {
                let last = kids.len() - 1;
                for (i, &kid) in kids.iter().enumerate().rev() {
                    let connector = if i == last { "└── " } else { "├── " };
                    stack.push((kid, child_prefix.clone(), connector));
                }
            }
        }
        lines
    }
}

impl Default for TreeReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TreeReporter {
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        if let Some(title) = &config.title {
            lines.push(ansi_color(title, "bold", self.colored));
        }
        lines.extend(self.render(rows, false));
        Ok(lines.join("\n") + "\n")
    }

    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        if let Some(title) = &config.title {
            lines.push(ansi_color(title, "bold", self.colored));
        }
        lines.extend(self.render(&result.rows, true));
        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Tree
    }
}
