//! Graph command handler.
//!
//! Renders the part/relation graph (parts, not instances) as Graphviz DOT.

use crate::config::GraphCommandConfig;
use crate::pipeline::{exit_codes, load_step_file, write_output, OutputTarget};
use crate::reports::render_part_graph;
use anyhow::{Context, Result};

/// Run the graph command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_graph(config: GraphCommandConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let file = load_step_file(&config.path, quiet)?;

    let dot = render_part_graph(&file, config.graph.style, config.graph.label_relations)
        .context("Failed to render part graph")?;

    if !quiet {
        tracing::info!("Rendered {} graph for {}", config.graph.style, file.display_name());
    }
    write_output(&dot, &OutputTarget::from_option(config.file.clone()), quiet)?;
    Ok(exit_codes::SUCCESS)
}
