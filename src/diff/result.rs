//! Diff result structures.

use super::{DiffRow, PartOf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall verdict of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffOutcome {
    /// Every row matched: both files have the same structure
    Identical,
    /// The forests share at least one node and every second-file row found a place
    Merged,
    /// No signature is shared: the files have no common root node
    NoCommonRoot,
    /// Some second-file rows could not be reattached
    Partial,
}

impl DiffOutcome {
    /// Status line for the outcome
    #[must_use]
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Identical => "Both step files look the same",
            Self::Merged => "Step files merged",
            Self::NoCommonRoot => "Both step files look completely different",
            Self::Partial => "Step files merged, some nodes could not be placed",
        }
    }
}

impl fmt::Display for DiffOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => write!(f, "identical"),
            Self::Merged => write!(f, "merged"),
            Self::NoCommonRoot => write!(f, "no-common-root"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

/// Counts over the merged forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Rows tagged `FIRST`
    pub first_only: usize,
    /// Rows tagged `SECOND`
    pub second_only: usize,
    /// Rows tagged `BOTH`
    pub both: usize,
    /// Rows left `SECOND_TO_RELOCATE`
    pub unresolved: usize,
    /// Rows folded into a `BOTH` representative
    pub merged_duplicates: usize,
    /// Second-file branches reattached (including new roots)
    pub relocated_branches: usize,
    pub outcome: DiffOutcome,
}

impl DiffSummary {
    pub(crate) fn from_rows(
        rows: &[DiffRow<'_>],
        merged_duplicates: usize,
        relocated_branches: usize,
    ) -> Self {
        let count = |tag: PartOf| rows.iter().filter(|r| r.part_of == tag).count();
        let first_only = count(PartOf::First);
        let second_only = count(PartOf::Second);
        let both = count(PartOf::Both);
        let unresolved = count(PartOf::SecondToRelocate);

        let outcome = if both == rows.len() {
            DiffOutcome::Identical
        } else if both == 0 {
            DiffOutcome::NoCommonRoot
        } else if unresolved > 0 {
            DiffOutcome::Partial
        } else {
            DiffOutcome::Merged
        };

        Self {
            first_only,
            second_only,
            both,
            unresolved,
            merged_duplicates,
            relocated_branches,
            outcome,
        }
    }

    /// Total rows in the merged forest
    #[must_use]
    pub const fn total(&self) -> usize {
        self.first_only + self.second_only + self.both + self.unresolved
    }
}

/// Merged forest plus its summary.
#[derive(Debug, Clone)]
#[must_use]
pub struct DiffResult<'a> {
    pub rows: Vec<DiffRow<'a>>,
    pub summary: DiffSummary,
}

impl<'a> DiffResult<'a> {
    /// True when the files differ in structure
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.outcome != DiffOutcome::Identical
    }

    /// True when some rows could not be reattached
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.summary.unresolved > 0
    }

    /// Rows carrying `tag`
    pub fn rows_tagged(&self, tag: PartOf) -> impl Iterator<Item = &DiffRow<'a>> {
        self.rows.iter().filter(move |r| r.part_of == tag)
    }
}
