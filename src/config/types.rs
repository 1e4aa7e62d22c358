//! Configuration types for step-tools operations.
//!
//! Provides structured configuration for tree, diff and graph operations.

use crate::diff::RootPolicy;
use crate::reports::{GraphStyle, ReportFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments override file settings, see [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Diff engine settings
    pub diff: DiffSettings,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Part graph rendering
    pub graph: GraphConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the root relocation policy.
    pub const fn root_policy(mut self, policy: RootPolicy) -> Self {
        self.config.diff.root_policy = policy;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Set the part graph style.
    pub const fn graph_style(mut self, style: GraphStyle) -> Self {
        self.config.graph.style = style;
        self
    }

    /// Label graph edges with their relation.
    pub const fn label_relations(mut self, label: bool) -> Self {
        self.config.graph.label_relations = label;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable fail-on-unresolved mode.
    pub const fn fail_on_unresolved(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_unresolved = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Diff engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffSettings {
    /// What to do with second-file roots that have no first-file counterpart
    pub root_policy: RootPolicy,
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Part/relation graph rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    /// Layout style
    pub style: GraphStyle,
    /// Label edges with `<type>#<stepId> <id>` of their relation
    pub label_relations: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if the two files differ
    pub fail_on_change: bool,
    /// Exit with code 2 if some second-file nodes could not be placed
    pub fail_on_unresolved: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Per-command runtime configuration
// ============================================================================

/// Configuration for the `tree` command
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Path to the part/relation records
    pub path: PathBuf,
    /// Keep only rows whose instance path matches this regex (and their ancestors)
    pub filter: Option<String>,
    pub output: OutputConfig,
    pub behavior: BehaviorConfig,
}

/// Configuration for the `diff` command
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Paths to compare
    pub paths: DiffPaths,
    pub diff: DiffSettings,
    pub output: OutputConfig,
    pub behavior: BehaviorConfig,
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    pub first: PathBuf,
    pub second: PathBuf,
}

/// Configuration for the `graph` command
#[derive(Debug, Clone)]
pub struct GraphCommandConfig {
    pub path: PathBuf,
    pub graph: GraphConfig,
    /// Output file path (None for stdout)
    pub file: Option<PathBuf>,
    pub behavior: BehaviorConfig,
}

impl DiffConfig {
    /// Runtime config for comparing `first` and `second` under `app` settings
    #[must_use]
    pub fn from_app(first: PathBuf, second: PathBuf, app: &AppConfig) -> Self {
        Self {
            paths: DiffPaths { first, second },
            diff: app.diff.clone(),
            output: app.output.clone(),
            behavior: app.behavior.clone(),
        }
    }
}
