//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{DiffResult, DiffSummary, PartOf};
use crate::hlr::{HlrNode, Row, RowId};
use crate::model::StepId;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_tree_report(
        &self,
        rows: &[Row<'_>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonTreeReport {
            metadata: JsonReportMetadata::new(config),
            fingerprint: format!("{:016x}", crate::hlr::forest::fingerprint(rows)),
            rows: rows.iter().map(JsonRow::from_node).collect(),
        };
        self.serialize(&report)
    }

    fn generate_diff_report(
        &self,
        result: &DiffResult<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonDiffReport {
            metadata: JsonReportMetadata::new(config),
            summary: &result.summary,
            rows: result.rows.iter().map(JsonRow::from_node).collect(),
        };
        self.serialize(&report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonTreeReport<'r> {
    metadata: JsonReportMetadata,
    fingerprint: String,
    rows: Vec<JsonRow<'r>>,
}

#[derive(Serialize)]
struct JsonDiffReport<'r> {
    metadata: JsonReportMetadata,
    summary: &'r DiffSummary,
    rows: Vec<JsonRow<'r>>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    files: Vec<String>,
}

impl JsonReportMetadata {
    fn new(config: &ReportConfig) -> Self {
        Self {
            tool: ToolInfo {
                name: "step-tools".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            generated_at: Utc::now().to_rfc3339(),
            title: config.title.clone(),
            files: config
                .metadata
                .first_path
                .iter()
                .chain(config.metadata.second_path.iter())
                .cloned()
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

/// Display fields of one row
#[derive(Serialize)]
struct JsonRow<'r> {
    id: RowId,
    parent_id: Option<RowId>,
    name: &'r str,
    #[serde(rename = "type")]
    kind: &'r str,
    representation_type: &'r str,
    step_id: StepId,
    description: String,
    relation_label: &'r str,
    relation_id: Option<StepId>,
    instance_name: &'r str,
    instance_path: &'r str,
    signature: &'r str,
    #[serde(skip_serializing_if = "Option::is_none")]
    part_of: Option<PartOf>,
}

impl<'r> JsonRow<'r> {
    fn from_node<N: HlrNode>(node: &'r N) -> Self {
        let part = node.part();
        Self {
            id: node.id(),
            parent_id: node.parent_id(),
            name: &part.name,
            kind: &part.kind,
            representation_type: &part.representation_type,
            step_id: part.step_id,
            description: part.description(),
            relation_label: node.relation_label(),
            relation_id: node.relation().map(|r| r.step_id),
            instance_name: node.instance_name(),
            instance_path: node.instance_path(),
            signature: node.signature(),
            part_of: node.part_of(),
        }
    }
}
