//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Indented tree with origin markers
    #[default]
    Tree,
    /// Aligned columns, one row per instance
    Table,
    /// Structured JSON output
    Json,
    /// Graphviz DOT
    Dot,
    /// Brief summary output
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Dot => write!(f, "dot"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Layout of the part/relation graph
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum GraphStyle {
    /// Top-down directed graph
    #[default]
    Normal,
    /// Left-to-right directed graph
    #[value(alias = "lr")]
    #[serde(alias = "lr")]
    RankdirLr,
    /// File-browser like layout with fan-out points
    Folder,
}

impl std::fmt::Display for GraphStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::RankdirLr => write!(f, "rankdir-lr"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title for the report
    pub title: Option<String>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    /// Config describing a single-file report
    pub fn for_file(path: impl Into<String>) -> Self {
        Self {
            title: None,
            metadata: ReportMetadata {
                first_path: Some(path.into()),
                ..ReportMetadata::new()
            },
        }
    }

    /// Config describing a two-file report
    pub fn for_files(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            title: None,
            metadata: ReportMetadata {
                first_path: Some(first.into()),
                second_path: Some(second.into()),
                ..ReportMetadata::new()
            },
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// First (or only) input path
    pub first_path: Option<String>,
    /// Second input path, for diffs
    pub second_path: Option<String>,
    /// Tool version
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }
}
