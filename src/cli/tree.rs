//! Tree command handler.

use crate::config::TreeConfig;
use crate::hlr::{Row, RowId};
use crate::pipeline::{
    build_forest, exit_codes, load_step_file, should_use_color, write_output, OutputTarget,
};
use crate::reports::{create_reporter_with_options, ReportConfig};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Run the tree command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_tree(config: TreeConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let file = load_step_file(&config.path, quiet)?;
    let mut rows = build_forest(&file, quiet)?;

    if let Some(pattern) = &config.filter {
        let regex =
            Regex::new(pattern).with_context(|| format!("Invalid --match regex '{pattern}'"))?;
        let before = rows.len();
        rows = filter_rows(rows, &regex);
        if !quiet {
            tracing::info!("Kept {} of {} rows matching '{}'", rows.len(), before, pattern);
        }
    }

    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter = create_reporter_with_options(
        config.output.format,
        should_use_color(config.output.no_color, &target),
    );
    let report = reporter
        .generate_tree_report(&rows, &ReportConfig::for_file(config.path.display().to_string()))
        .context("Failed to generate tree report")?;
    write_output(&report, &target, quiet)?;

    Ok(exit_codes::SUCCESS)
}

/// Keep rows whose instance path matches `regex`, plus all their ancestors,
/// so the result is still a forest.
pub fn filter_rows<'a>(rows: Vec<Row<'a>>, regex: &Regex) -> Vec<Row<'a>> {
    let parents: HashMap<RowId, Option<RowId>> =
        rows.iter().map(|r| (r.id, r.parent_id)).collect();

    let mut keep: HashSet<RowId> = HashSet::new();
    for row in rows.iter().filter(|r| regex.is_match(&r.instance_path)) {
        let mut current = Some(row.id);
        while let Some(id) = current {
            if !keep.insert(id) {
                break;
            }
            current = parents.get(&id).copied().flatten();
        }
    }

    rows.into_iter().filter(|r| keep.contains(&r.id)).collect()
}
