//! Loading of extracted part/relation records.
//!
//! STEP parsing itself happens upstream; the records it produces arrive here
//! as JSON or YAML, chosen by file extension.

use crate::error::{ErrorContext, LoadErrorKind, Result, StepToolsError};
use crate::model::StepFile;
use std::path::Path;

/// Read and deserialize a records file.
///
/// When the records carry no `file_name`, the file stem is used so reports
/// have something to show.
pub fn read_step_file(path: &Path) -> Result<StepFile> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|e| StepToolsError::io(path, e))?;

    let mut file: StepFile = match extension.as_str() {
        "json" => serde_json::from_str::<StepFile>(&content)
            .context(path.display().to_string())?,
        "yaml" | "yml" => serde_yaml::from_str::<StepFile>(&content)
            .context(path.display().to_string())?,
        other => {
            return Err(StepToolsError::load(
                path.display().to_string(),
                LoadErrorKind::UnsupportedExtension(other.to_string()),
            ))
        }
    };

    if file.file_name.is_none() {
        file.file_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    Ok(file)
}

/// Load a records file with context, for CLI handlers.
pub fn load_step_file(path: &Path, quiet: bool) -> anyhow::Result<StepFile> {
    if !quiet {
        tracing::info!("Loading STEP records: {:?}", path);
    }

    let file = read_step_file(path).map_err(|e| {
        anyhow::Error::new(e).context(format!("Failed to load STEP records: {}", path.display()))
    })?;

    if !quiet {
        tracing::info!(
            "Loaded {}: {} parts, {} relations",
            file.display_name(),
            file.parts.len(),
            file.relations.len()
        );
    }
    Ok(file)
}
