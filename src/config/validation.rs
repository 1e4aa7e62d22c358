//! Configuration validation for step-tools.

use super::types::{
    AppConfig, BehaviorConfig, DiffConfig, GraphCommandConfig, OutputConfig, TreeConfig,
};
use std::path::Path;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(file) = &self.file {
            if let Some(err) = check_output_parent("output.file", file) {
                errors.push(err);
            }
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for TreeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(err) = check_input("path", &self.path) {
            errors.push(err);
        }
        if let Some(pattern) = &self.filter {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError {
                    field: "filter".to_string(),
                    message: format!("Invalid regex '{pattern}': {e}"),
                });
            }
        }
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(err) = check_input("paths.first", &self.paths.first) {
            errors.push(err);
        }
        if let Some(err) = check_input("paths.second", &self.paths.second) {
            errors.push(err);
        }
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for GraphCommandConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(err) = check_input("path", &self.path) {
            errors.push(err);
        }
        if let Some(file) = &self.file {
            if let Some(err) = check_output_parent("file", file) {
                errors.push(err);
            }
        }
        errors
    }
}

fn check_input(field: &str, path: &Path) -> Option<ConfigError> {
    (!path.exists()).then(|| ConfigError {
        field: field.to_string(),
        message: format!("File not found: {}", path.display()),
    })
}

fn check_output_parent(field: &str, file: &Path) -> Option<ConfigError> {
    let parent = file.parent()?;
    (!parent.as_os_str().is_empty() && !parent.exists()).then(|| ConfigError {
        field: field.to_string(),
        message: format!("Output directory does not exist: {}", parent.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiffPaths, DiffSettings};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_output_config_validation() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..OutputConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "output.file");

        let relative = OutputConfig {
            file: Some(PathBuf::from("report.json")),
            ..OutputConfig::default()
        };
        assert!(relative.is_valid());
    }

    #[test]
    fn test_tree_config_bad_regex() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.json");
        std::fs::write(&path, "{}").unwrap();

        let config = TreeConfig {
            path,
            filter: Some("Bolt(".to_string()),
            output: OutputConfig::default(),
            behavior: BehaviorConfig::default(),
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "filter");
    }

    #[test]
    fn test_diff_config_missing_files() {
        let config = DiffConfig {
            paths: DiffPaths {
                first: PathBuf::from("/nonexistent/a.json"),
                second: PathBuf::from("/nonexistent/b.json"),
            },
            diff: DiffSettings::default(),
            output: OutputConfig::default(),
            behavior: BehaviorConfig::default(),
        };
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["paths.first", "paths.second"]);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError {
            field: "output.file".to_string(),
            message: "bad".to_string(),
        };
        assert_eq!(error.to_string(), "output.file: bad");
    }

    #[test]
    fn test_app_config_validation() {
        assert!(AppConfig::default().is_valid());
    }
}
