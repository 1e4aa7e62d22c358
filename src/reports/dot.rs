//! Graphviz DOT output.
//!
//! Two graphs are available:
//!
//! - the instance forest ([`DotReporter`]): one node per row, diff rows
//!   coloured by origin
//! - the part/relation graph ([`render_part_graph`]): one node per part and
//!   one edge per relation, so a reused part has several incoming edges

use super::{GraphStyle, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{DiffResult, PartOf};
use crate::hlr::{HlrNode, Row};
use crate::model::{StepFile, StepId};
use indexmap::{IndexMap, IndexSet};
use std::fmt::Write as _;

/// Escape a string for use inside a double-quoted DOT label.
#[must_use]
pub fn escape_label(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// DOT reporter for instance forests
pub struct DotReporter;

impl DotReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render<N: HlrNode>(nodes: &[N], title: Option<&str>) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "digraph HLR {{")?;
        if let Some(title) = title {
            writeln!(out, "label=\"{}\";", escape_label(title))?;
        }
        writeln!(out, "node [fontname=\"Courier New\", fontsize=10, shape=box, style=\"rounded\"];")?;

        for node in nodes {
            let label = escape_label(&format!("{}\n{}", node.instance_name(), node.description()));
            match node.part_of().and_then(origin_attrs) {
                Some(attrs) => writeln!(out, "R{} [label=\"{label}\", {attrs}];", node.id())?,
                None => writeln!(out, "R{} [label=\"{label}\"];", node.id())?,
            }
        }
        for node in nodes {
            if let Some(parent) = node.parent_id() {
                writeln!(out, "R{parent} -> R{};", node.id())?;
            }
        }
        writeln!(out, "}}")?;
        Ok(out)
    }
}

fn origin_attrs(part_of: PartOf) -> Option<&'static str> {
    match part_of {
        PartOf::Both => None,
        PartOf::First => Some("color=red, fontcolor=red"),
        PartOf::Second => Some("color=darkgreen, fontcolor=darkgreen"),
        PartOf::SecondToRelocate => Some("color=orange, style=\"rounded,dashed\""),
    }
}

impl Default for DotReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for DotReporter {
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Self::render(rows, config.title.as_deref())
    }

    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Self::render(&result.rows, config.title.as_deref())
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Dot
    }
}

/// Render the part/relation graph of a file.
///
/// With `label_relations`, edges carry `<type>#<stepId> <id>` of their relation.
pub fn render_part_graph(
    file: &StepFile,
    style: GraphStyle,
    label_relations: bool,
) -> Result<String, ReportError> {
    let mut out = String::new();
    match style {
        GraphStyle::Normal => {
            writeln!(out, "digraph G {{")?;
            writeln!(out, "node [fontname=\"Courier New\", fontsize=10];")?;
            writeln!(out, "node [shape=box, style=\"filled, rounded\", fillcolor=\"#E5E5E5\"];")?;
            write_directed_body(&mut out, file, label_relations, false)?;
        }
        GraphStyle::RankdirLr => {
            writeln!(out, "digraph G {{")?;
            writeln!(out, "rankdir=LR;")?;
            writeln!(out, "fixedsize=true;")?;
            writeln!(
                out,
                "node [style=\"rounded,filled\", width=0, height=0, shape=box, fillcolor=\"#E5E5E5\", concentrate=true];"
            )?;
            writeln!(out)?;
            write_directed_body(&mut out, file, label_relations, true)?;
        }
        GraphStyle::Folder => write_folder(&mut out, file)?,
    }
    writeln!(out, "}}")?;
    Ok(out)
}

fn part_label(kind: &str, step_id: StepId, name: &str) -> String {
    escape_label(&format!("{kind}#{step_id} {name}"))
}

fn write_directed_body(
    out: &mut String,
    file: &StepFile,
    label_relations: bool,
    spaced: bool,
) -> std::fmt::Result {
    for part in &file.parts {
        writeln!(
            out,
            "I{} [label=\"{}\"];",
            part.step_id,
            part_label(&part.kind, part.step_id, &part.name)
        )?;
    }
    if spaced {
        writeln!(out)?;
    }
    for relation in &file.relations {
        if label_relations {
            writeln!(
                out,
                "I{} -> I{} [label=\"{}\"];",
                relation.relating_id,
                relation.related_id,
                escape_label(&format!("{}#{} {}", relation.kind, relation.step_id, relation.id))
            )?;
        } else {
            writeln!(out, "I{} -> I{};", relation.relating_id, relation.related_id)?;
        }
    }
    // Assemblies drawn as plain boxes
    for relation in &file.relations {
        writeln!(out, "I{} [shape=box, style=\"\"];", relation.relating_id)?;
    }
    Ok(())
}

fn write_folder(out: &mut String, file: &StepFile) -> std::fmt::Result {
    let mut assemblies: IndexMap<StepId, Vec<StepId>> = IndexMap::new();
    let mut related = IndexSet::new();
    for relation in &file.relations {
        assemblies
            .entry(relation.relating_id)
            .or_default()
            .push(relation.related_id);
        related.insert(relation.related_id);
    }
    assemblies.sort_keys();

    writeln!(out, "digraph tree")?;
    writeln!(out, "{{")?;
    writeln!(out, "fixedsize=true;")?;
    writeln!(
        out,
        "node [style=\"rounded,filled\", width=0, height=0, shape=box, fillcolor=\"#E5E5E5\"]"
    )?;

    for part in &file.parts {
        let label = part_label(&part.kind, part.step_id, &part.name);
        if related.contains(&part.step_id) {
            writeln!(out, "{{rank=same")?;
            writeln!(out, "  i_point_{} [shape=point]", part.step_id)?;
            writeln!(out, "  i_dir_{} [label=\"{label}\", width=2]", part.step_id)?;
            writeln!(out, "}}")?;
            writeln!(out, "i_point_{} -> i_dir_{}", part.step_id, part.step_id)?;
        } else {
            writeln!(out, "i_dir_{} [label=\"{label}\", width=2]", part.step_id)?;
        }
    }

    writeln!(out)?;
    writeln!(out)?;

    for (relating, children) in &assemblies {
        write!(out, "i_dir_{relating}")?;
        for child in children {
            write!(out, " -> i_point_{child}")?;
        }
        writeln!(out, " [arrowhead=none]")?;
    }
    Ok(())
}
