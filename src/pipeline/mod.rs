//! Pipeline orchestration for STEP tree operations.
//!
//! Shared load → build → diff → output logic, so CLI command handlers stay
//! thin.

mod diff_stage;
mod load;
mod output;

pub use diff_stage::{build_forest, compute_diff};
pub use load::{load_step_file, read_step_file};
pub use output::{should_use_color, write_output, OutputTarget};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or deserialize a records file
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Tree construction or diff computation failed
    #[error("Diff failed: {source}")]
    DiffFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success (or no failing condition requested)
    pub const SUCCESS: i32 = 0;
    /// The two files differ
    pub const CHANGES_DETECTED: i32 = 1;
    /// Some second-file nodes could not be placed in the merged forest
    pub const UNRESOLVED_NODES: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::UNRESOLVED_NODES, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::LoadFailed {
            path: "a.json".to_string(),
            source: anyhow::anyhow!("bad"),
        };
        assert_eq!(err.to_string(), "Load failed for a.json: bad");
    }
}
