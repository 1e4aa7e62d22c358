//! Rows of a merged forest.

use crate::hlr::{HlrNode, Row, RowId};
use crate::model::{Part, PartRelation};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a merged row.
///
/// Transitions during a diff: `First`/`Second` become `Both` when the
/// signature occurs in both files; a lone `Second` becomes
/// `SecondToRelocate` and, once reattached, `Second` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartOf {
    /// Only in the first file
    First,
    /// Only in the second file, placed in the merged forest
    Second,
    /// Only in the second file, parent chain not yet matched
    SecondToRelocate,
    /// Signature present in both files
    Both,
}

impl PartOf {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Second => "SECOND",
            Self::SecondToRelocate => "SECOND_TO_RELOCATE",
            Self::Both => "BOTH",
        }
    }
}

impl fmt::Display for PartOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a second-file root that has no counterpart in the first file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum RootPolicy {
    /// Add it (and its subtree) as another top-level root, tagged `SECOND`
    #[default]
    KeepAsRoot,
    /// Leave it and its subtree tagged `SECOND_TO_RELOCATE`
    LeaveUnresolved,
}

impl fmt::Display for RootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepAsRoot => write!(f, "keep-as-root"),
            Self::LeaveUnresolved => write!(f, "leave-unresolved"),
        }
    }
}

/// A row of the merged forest.
///
/// `row` is the untouched row of its source build; `id` and `parent_id` are
/// the row's identity in the merged forest and change when it is relocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow<'a> {
    pub row: Row<'a>,
    pub id: RowId,
    pub parent_id: Option<RowId>,
    pub part_of: PartOf,
}

impl<'a> DiffRow<'a> {
    pub(crate) fn new(row: Row<'a>, part_of: PartOf) -> Self {
        Self {
            id: row.id,
            parent_id: row.parent_id,
            row,
            part_of,
        }
    }

    /// The diff identity key
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.row.signature
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self.part_of, PartOf::SecondToRelocate)
    }
}

impl HlrNode for DiffRow<'_> {
    fn id(&self) -> RowId {
        self.id
    }

    fn parent_id(&self) -> Option<RowId> {
        self.parent_id
    }

    fn part(&self) -> &Part {
        self.row.part
    }

    fn relation(&self) -> Option<&PartRelation> {
        self.row.relation
    }

    fn instance_name(&self) -> &str {
        &self.row.instance_name
    }

    fn instance_path(&self) -> &str {
        &self.row.instance_path
    }

    fn signature(&self) -> &str {
        &self.row.signature
    }

    fn part_of(&self) -> Option<PartOf> {
        Some(self.part_of)
    }
}
