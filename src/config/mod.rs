//! Configuration module for step-tools.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use step_tools::config::AppConfig;
//! use step_tools::diff::RootPolicy;
//!
//! let config = AppConfig::builder()
//!     .root_policy(RootPolicy::LeaveUnresolved)
//!     .fail_on_unresolved(true)
//!     .build();
//!
//! // Load from file
//! use step_tools::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.step-tools.yaml` file in your project root or `~/.config/step-tools/`:
//!
//! ```yaml
//! diff:
//!   root_policy: leave-unresolved
//! output:
//!   format: table
//! behavior:
//!   fail_on_change: true
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, DiffPaths, DiffSettings,
    GraphCommandConfig, GraphConfig, OutputConfig, TreeConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Documents every option that can be set in `.step-tools.yaml`, for editor
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
