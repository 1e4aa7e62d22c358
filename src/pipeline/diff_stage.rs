//! Tree building and diff computation stage.

use crate::config::DiffConfig;
use crate::diff::{second_offset, DiffEngine, DiffResult};
use crate::hlr::{forest, Row, RowId, TreeBuilder};
use crate::model::StepFile;
use anyhow::{Context, Result};

/// Build the HLR forest of one file, numbering rows from 1.
pub fn build_forest<'a>(file: &'a StepFile, quiet: bool) -> Result<Vec<Row<'a>>> {
    let rows = TreeBuilder::new()
        .build_file(Some(file))
        .with_context(|| format!("Failed to build the tree of {}", file.display_name()))?;
    if !quiet {
        tracing::info!(
            "Built {} rows for {} (fingerprint {:016x})",
            rows.len(),
            file.display_name(),
            forest::fingerprint(&rows)
        );
    }
    Ok(rows)
}

/// Build both forests in parallel and merge them.
///
/// The second forest's ids continue after the first's with a gap of one, as
/// if it had been built with [`second_offset`].
pub fn compute_diff<'a>(
    config: &DiffConfig,
    first: &'a StepFile,
    second: &'a StepFile,
) -> Result<DiffResult<'a>> {
    let quiet = config.behavior.quiet;

    let (first_rows, second_rows) = rayon::join(
        || build_forest(first, quiet),
        || build_forest(second, quiet),
    );
    let first_rows = first_rows?;
    let mut second_rows = second_rows?;
    shift_ids(&mut second_rows, second_offset(first_rows.len()).saturating_sub(1));

    if !quiet {
        tracing::info!("Computing structural diff...");
    }

    let result = DiffEngine::new()
        .with_root_policy(config.diff.root_policy)
        .diff(&first_rows, &second_rows)
        .context("Failed to compute diff")?;

    if !quiet {
        let summary = &result.summary;
        tracing::info!(
            "Diff: {} shared, {} only in first, {} only in second, {} unresolved",
            summary.both,
            summary.first_only,
            summary.second_only,
            summary.unresolved
        );
    }
    Ok(result)
}

fn shift_ids(rows: &mut [Row<'_>], shift: u32) {
    if shift == 0 {
        return;
    }
    for row in rows {
        row.id = RowId(row.id.0.saturating_add(shift));
        row.parent_id = row.parent_id.map(|p| RowId(p.0.saturating_add(shift)));
    }
}
