//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two record files.

use crate::config::DiffConfig;
use crate::diff::DiffResult;
use crate::pipeline::{
    compute_diff, exit_codes, load_step_file, should_use_color, write_output, OutputTarget,
};
use crate::reports::{create_reporter_with_options, ReportConfig};
use anyhow::{Context, Result};

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    let first = load_step_file(&config.paths.first, quiet)?;
    let second = load_step_file(&config.paths.second, quiet)?;

    let result = compute_diff(&config, &first, &second)?;
    let exit_code = determine_exit_code(&config, &result);

    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter = create_reporter_with_options(
        config.output.format,
        should_use_color(config.output.no_color, &target),
    );
    let report_config = ReportConfig::for_files(
        config.paths.first.display().to_string(),
        config.paths.second.display().to_string(),
    );
    let report = reporter
        .generate_diff_report(&result, &report_config)
        .context("Failed to generate diff report")?;
    write_output(&report, &target, quiet)?;

    Ok(exit_code)
}

/// Determine the appropriate exit code based on diff results and config flags.
///
/// Unresolved nodes take precedence over plain changes.
fn determine_exit_code(config: &DiffConfig, result: &DiffResult<'_>) -> i32 {
    if config.behavior.fail_on_unresolved && result.is_partial() {
        return exit_codes::UNRESOLVED_NODES;
    }
    if config.behavior.fail_on_change && result.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::diff::{DiffEngine, RootPolicy};
    use crate::model::{Part, StepFile};
    use std::path::PathBuf;

    fn config(app: &AppConfig) -> DiffConfig {
        DiffConfig::from_app(PathBuf::from("a.json"), PathBuf::from("b.json"), app)
    }

    #[test]
    fn test_exit_code_for_changes() {
        let first = StepFile::new(vec![Part::new(1, "A")], vec![]);
        let second = StepFile::new(vec![Part::new(1, "B")], vec![]);
        let result = DiffEngine::new().diff_files(&first, &second).unwrap();

        assert_eq!(determine_exit_code(&config(&AppConfig::default()), &result), 0);
        let strict = AppConfig::builder().fail_on_change(true).build();
        assert_eq!(
            determine_exit_code(&config(&strict), &result),
            exit_codes::CHANGES_DETECTED
        );
    }

    #[test]
    fn test_exit_code_for_unresolved() {
        let first = StepFile::new(vec![Part::new(1, "A")], vec![]);
        let second = StepFile::new(vec![Part::new(1, "B")], vec![]);
        let result = DiffEngine::new()
            .with_root_policy(RootPolicy::LeaveUnresolved)
            .diff_files(&first, &second)
            .unwrap();

        let strict = AppConfig::builder()
            .fail_on_change(true)
            .fail_on_unresolved(true)
            .build();
        assert_eq!(
            determine_exit_code(&config(&strict), &result),
            exit_codes::UNRESOLVED_NODES
        );
    }

    #[test]
    fn test_identical_files_succeed() {
        let file = StepFile::new(vec![Part::new(1, "A")], vec![]);
        let result = DiffEngine::new().diff_files(&file, &file).unwrap();
        let strict = AppConfig::builder().fail_on_change(true).build();
        assert_eq!(determine_exit_code(&config(&strict), &result), exit_codes::SUCCESS);
    }
}
