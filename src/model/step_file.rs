//! Part and relation records extracted from a STEP AP242 file.

use serde::{Deserialize, Serialize};

/// Entity instance id inside one STEP file (the `#123` of `#123=PRODUCT_DEFINITION(...)`).
pub type StepId = i64;

/// A product definition (a part or an assembly) of the CAD structure.
///
/// Parts are immutable input: the tree builder only ever borrows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    /// `PRODUCT_DEFINITION` entity id, unique within one file
    pub step_id: StepId,
    /// Product name
    pub name: String,
    /// Short entity kind code, e.g. `PD`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Kind of the geometric representation (`SR`, `ABSR`, ...)
    #[serde(default)]
    pub representation_type: String,
}

impl Part {
    /// Create a part with an empty kind and representation type
    #[must_use]
    pub fn new(step_id: StepId, name: impl Into<String>) -> Self {
        Self {
            step_id,
            name: name.into(),
            kind: String::new(),
            representation_type: String::new(),
        }
    }

    /// Set the entity kind code
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the representation type
    #[must_use]
    pub fn with_representation_type(mut self, representation_type: impl Into<String>) -> Self {
        self.representation_type = representation_type.into();
        self
    }

    /// `{type}#{stepId} '{name}'`
    #[must_use]
    pub fn description(&self) -> String {
        format!("{}#{} '{}'", self.kind, self.step_id, self.name)
    }
}

/// A usage occurrence: `related_id` is placed inside assembly `relating_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartRelation {
    /// `NEXT_ASSEMBLY_USAGE_OCCURRENCE` entity id, unique within one file
    pub step_id: StepId,
    /// Occurrence label; human readable and not guaranteed unique
    pub id: String,
    /// Optional occurrence name
    #[serde(default)]
    pub name: String,
    /// Step id of the parent part
    pub relating_id: StepId,
    /// Step id of the child part
    pub related_id: StepId,
    /// Short entity kind code, e.g. `NAUO`
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PartRelation {
    /// Create a relation placing `related_id` under `relating_id`
    #[must_use]
    pub fn new(
        step_id: StepId,
        id: impl Into<String>,
        relating_id: StepId,
        related_id: StepId,
    ) -> Self {
        Self {
            step_id,
            id: id.into(),
            name: String::new(),
            relating_id,
            related_id,
            kind: String::new(),
        }
    }

    /// Set the entity kind code
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the occurrence name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// `FILE_DESCRIPTION` header entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDescription {
    pub description: String,
    pub implementation_level: String,
}

/// `FILE_NAME` header entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNameHeader {
    pub name: String,
    pub time_stamp: String,
    pub author: String,
    pub organization: String,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorisation: String,
}

/// The HEADER section of a STEP file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderInfo {
    pub file_description: FileDescription,
    pub file_name: FileNameHeader,
    pub file_schema: String,
}

/// A successfully parsed STEP file reduced to its assembly structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFile {
    /// Path or name of the source file, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Header section, when the parser exported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderInfo>,
    /// Product definitions in file order
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Assembly usage relations in file order
    #[serde(default)]
    pub relations: Vec<PartRelation>,
}

impl StepFile {
    /// Create a file from its parts and relations
    #[must_use]
    pub fn new(parts: Vec<Part>, relations: Vec<PartRelation>) -> Self {
        Self {
            file_name: None,
            header: None,
            parts,
            relations,
        }
    }

    /// Set the file name
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the header section
    #[must_use]
    pub fn with_header(mut self, header: HeaderInfo) -> Self {
        self.header = Some(header);
        self
    }

    /// Display name for reports
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<unnamed>")
    }

    /// True when the file holds no parts at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
