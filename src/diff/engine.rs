//! Structural diff of two HLR forests.

use super::{DiffResult, DiffRow, DiffSummary, PartOf, RootPolicy};
use crate::error::{DiffErrorKind, ErrorContext, Result, StepToolsError};
use crate::hlr::{Row, RowId, TreeBuilder};
use crate::model::StepFile;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Merges two independently built forests.
///
/// Rows are matched by signature. Matching signatures collapse into one `BOTH`
/// row; first-file leftovers stay `FIRST`; second-file leftovers are pending
/// until their parent signature is found among the `BOTH` rows, at which point
/// the whole pending branch moves under it with fresh ids.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct DiffEngine {
    root_policy: RootPolicy,
}

impl DiffEngine {
    /// Create a diff engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose what happens to second-file roots with no first-file counterpart
    pub const fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    #[must_use]
    pub const fn root_policy(&self) -> RootPolicy {
        self.root_policy
    }

    /// Build both forests and diff them.
    ///
    /// The second build continues the id sequence of the first one, leaving a
    /// gap of one, so the two id spaces never meet.
    pub fn diff_files<'a>(
        &self,
        first: &'a StepFile,
        second: &'a StepFile,
    ) -> Result<DiffResult<'a>> {
        let first_rows = TreeBuilder::new()
            .build_file(Some(first))
            .context("first file")?;
        let second_rows = TreeBuilder::new()
            .with_id_offset(second_offset(first_rows.len()))
            .build_file(Some(second))
            .context("second file")?;
        self.diff(&first_rows, &second_rows)
    }

    /// Merge `first` and `second` into one forest.
    ///
    /// Never fails on dissimilar inputs: rows that cannot be placed stay
    /// `SECOND_TO_RELOCATE` and the summary reports a partial outcome.
    pub fn diff<'a>(&self, first: &[Row<'a>], second: &[Row<'a>]) -> Result<DiffResult<'a>> {
        let candidates = wrap_inputs(first, second)?;
        let mut next_id = match candidates.iter().map(|r| r.id).max() {
            Some(max) => RowId(max.0.checked_add(1).ok_or_else(|| id_overflow(max.0))?),
            None => RowId(1),
        };

        let (mut rows, merged_duplicates) = group_by_signature(candidates);
        let relocated_branches = Relocation::new(&mut rows, &mut next_id).run(self.root_policy);

        ensure_unique_ids(&rows).context("merging forests")?;

        let summary = DiffSummary::from_rows(&rows, merged_duplicates, relocated_branches);
        tracing::info!("Step Diff: {}", summary.outcome.status_text());
        if summary.unresolved > 0 {
            tracing::warn!(
                unresolved = summary.unresolved,
                "Step Diff: some nodes from the second file could not be placed"
            );
        }
        Ok(DiffResult { rows, summary })
    }
}

/// Id offset for the second of two builds, given the first build's row count
#[must_use]
pub fn second_offset(first_len: usize) -> u32 {
    u32::try_from(first_len).map_or(u32::MAX, |n| n.saturating_add(2))
}

/// Wrap both inputs, shifting second-file ids when they collide with the first's.
///
/// Fails when the shifted ids no longer fit a [`RowId`].
fn wrap_inputs<'a>(first: &[Row<'a>], second: &[Row<'a>]) -> Result<Vec<DiffRow<'a>>> {
    let first_ids: HashSet<RowId> = first.iter().map(|r| r.id).collect();
    let shift = if second.iter().any(|r| first_ids.contains(&r.id)) {
        let first_max = first_ids.iter().max().map_or(0, |id| id.0);
        let second_min = second.iter().map(|r| r.id.0).min().unwrap_or(0);
        let shift = (first_max - second_min)
            .checked_add(1)
            .ok_or_else(|| id_overflow(first_max))?;
        tracing::debug!(shift, "second forest ids overlap the first, shifting");
        shift
    } else {
        0
    };

    let mut rows = Vec::with_capacity(first.len() + second.len());
    rows.extend(first.iter().map(|r| DiffRow::new(r.clone(), PartOf::First)));
    for r in second {
        let mut row = DiffRow::new(r.clone(), PartOf::Second);
        row.id = shifted(row.id, shift)?;
        row.parent_id = row.parent_id.map(|p| shifted(p, shift)).transpose()?;
        rows.push(row);
    }
    Ok(rows)
}

fn shifted(id: RowId, shift: u32) -> Result<RowId> {
    id.0.checked_add(shift)
        .map(RowId)
        .ok_or_else(|| id_overflow(id.0))
}

fn id_overflow(id: u32) -> StepToolsError {
    StepToolsError::diff("numbering merged rows", DiffErrorKind::IdOverflow(id))
}

/// Keep one representative per signature.
///
/// Returns the surviving rows in first-seen order and the number of rows folded
/// away. Survivors whose parent was folded are re-pointed at the parent's
/// representative, except pending second-file rows, which are placed by
/// relocation.
fn group_by_signature(candidates: Vec<DiffRow<'_>>) -> (Vec<DiffRow<'_>>, usize) {
    let mut groups: IndexMap<String, Vec<DiffRow<'_>>> = IndexMap::new();
    for row in candidates {
        groups.entry(row.row.signature.clone()).or_default().push(row);
    }

    let mut folded: HashMap<RowId, RowId> = HashMap::new();
    let mut merged_duplicates = 0;
    let mut rows = Vec::with_capacity(groups.len());

    for (_, members) in groups {
        let mut members = members.into_iter();
        let Some(mut keep) = members.next() else {
            continue;
        };
        let mut folded_any = false;
        for dropped in members {
            folded.insert(dropped.id, keep.id);
            merged_duplicates += 1;
            folded_any = true;
        }
        keep.part_of = match (folded_any, keep.part_of) {
            (true, _) => PartOf::Both,
            (false, PartOf::Second) => PartOf::SecondToRelocate,
            (false, tag) => tag,
        };
        rows.push(keep);
    }

    for row in rows.iter_mut().filter(|r| !r.is_unresolved()) {
        if let Some(rep) = row.parent_id.and_then(|p| folded.get(&p)) {
            row.parent_id = Some(*rep);
        }
    }

    (rows, merged_duplicates)
}

/// Reattachment of pending second-file branches.
struct Relocation<'r, 'a> {
    rows: &'r mut [DiffRow<'a>],
    next_id: &'r mut RowId,
    /// Merged id of every `BOTH` row by signature
    both_by_signature: HashMap<String, RowId>,
    /// Pending rows by their current parent id
    pending_children: HashMap<RowId, Vec<usize>>,
    /// Pending rows whose relocation already failed
    attempted: HashSet<usize>,
    /// Old id to fresh id of every moved row
    renumbered: HashMap<RowId, RowId>,
}

impl<'r, 'a> Relocation<'r, 'a> {
    fn new(rows: &'r mut [DiffRow<'a>], next_id: &'r mut RowId) -> Self {
        let mut both_by_signature = HashMap::new();
        let mut pending_children: HashMap<RowId, Vec<usize>> = HashMap::new();
        for (pos, row) in rows.iter().enumerate() {
            match row.part_of {
                PartOf::Both => {
                    both_by_signature.insert(row.row.signature.clone(), row.id);
                }
                PartOf::SecondToRelocate => {
                    if let Some(parent) = row.parent_id {
                        pending_children.entry(parent).or_default().push(pos);
                    }
                }
                PartOf::First | PartOf::Second => {}
            }
        }
        Self {
            rows,
            next_id,
            both_by_signature,
            pending_children,
            attempted: HashSet::new(),
            renumbered: HashMap::new(),
        }
    }

    /// Shallowest pending row not yet attempted, first-seen on ties
    fn next_candidate(&self) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(pos, r)| r.is_unresolved() && !self.attempted.contains(pos))
            .min_by_key(|(_, r)| r.row.depth)
            .map(|(pos, _)| pos)
    }

    /// Relocate until nothing is pending or every pending row has been tried.
    /// Returns the number of branches moved.
    fn run(mut self, policy: RootPolicy) -> usize {
        let mut relocated = 0;
        while let Some(pos) = self.next_candidate() {
            let parent = self.rows[pos]
                .row
                .parent_signature()
                .and_then(|sig| self.both_by_signature.get(sig))
                .copied();

            match parent {
                Some(parent_id) => {
                    tracing::debug!(
                        "Step Diff: relocating the branch {} from the second file to {}",
                        self.rows[pos].row.instance_path,
                        parent_id
                    );
                    self.move_branch(pos, Some(parent_id));
                    relocated += 1;
                }
                None if self.rows[pos].row.is_root() && policy == RootPolicy::KeepAsRoot => {
                    tracing::debug!(
                        "Step Diff: no common root node, keeping {} as a root",
                        self.rows[pos].row.instance_path
                    );
                    self.move_branch(pos, None);
                    relocated += 1;
                }
                None => {
                    tracing::debug!(
                        "Step Diff: no parent found for {}",
                        self.rows[pos].row.instance_path
                    );
                    self.attempted.insert(pos);
                }
            }
        }

        // Rows that stayed put may hang under a moved row, e.g. a second-file
        // row tagged `BOTH` by a signature collision within that file.
        for row in self.rows.iter_mut() {
            if let Some(fresh) = row.parent_id.and_then(|p| self.renumbered.get(&p)) {
                row.parent_id = Some(*fresh);
            }
        }
        relocated
    }

    /// Retag `root` and its pending descendants as `SECOND`, renumbering them
    /// in pre-order under `parent`.
    fn move_branch(&mut self, root: usize, parent: Option<RowId>) {
        let mut stack = vec![(root, parent)];
        while let Some((pos, parent)) = stack.pop() {
            let old_id = self.rows[pos].id;
            let fresh = *self.next_id;
            *self.next_id = fresh.next();
            self.renumbered.insert(old_id, fresh);

            let row = &mut self.rows[pos];
            row.id = fresh;
            row.parent_id = parent;
            row.part_of = PartOf::Second;

            if let Some(children) = self.pending_children.remove(&old_id) {
                stack.extend(
                    children
                        .into_iter()
                        .rev()
                        .filter(|&child| self.rows[child].is_unresolved())
                        .map(|child| (child, Some(fresh))),
                );
            }
        }
    }
}

/// Reject a merged forest in which two rows share an id.
fn ensure_unique_ids(rows: &[DiffRow<'_>]) -> Result<()> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.id) {
            return Err(StepToolsError::diff(
                "checking row ids",
                DiffErrorKind::DuplicateRowId(row.id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffOutcome;
    use crate::model::{Part, PartIndex, PartRelation};

    fn build(parts: &[Part], relations: &[PartRelation], offset: u32) -> Vec<Row<'static>> {
        // Leak the inputs so rows can outlive the helper.
        let parts: &'static [Part] = Box::leak(parts.to_vec().into_boxed_slice());
        let relations: &'static [PartRelation] = Box::leak(relations.to_vec().into_boxed_slice());
        let index = PartIndex::new(parts, relations).unwrap();
        TreeBuilder::new().with_id_offset(offset).build(&index).unwrap()
    }

    fn tags(result: &DiffResult<'_>) -> Vec<(String, PartOf)> {
        result
            .rows
            .iter()
            .map(|r| (r.row.instance_path.clone(), r.part_of))
            .collect()
    }

    #[test]
    fn test_different_roots() {
        let first = build(&[Part::new(1, "A")], &[], 1);
        let second = build(&[Part::new(1, "B")], &[], 3);
        let result = DiffEngine::new().diff(&first, &second).unwrap();

        assert_eq!(
            tags(&result),
            [("A".into(), PartOf::First), ("B".into(), PartOf::Second)]
        );
        assert_eq!(result.rows[1].parent_id, None);
        assert_eq!(result.summary.outcome, DiffOutcome::NoCommonRoot);
    }

    #[test]
    fn test_leave_unresolved_policy() {
        let first = build(&[Part::new(1, "A")], &[], 1);
        let second = build(&[Part::new(1, "B")], &[], 3);
        let result = DiffEngine::new()
            .with_root_policy(RootPolicy::LeaveUnresolved)
            .diff(&first, &second)
            .unwrap();

        assert_eq!(result.rows[1].part_of, PartOf::SecondToRelocate);
        assert!(result.is_partial());
        assert_eq!(result.summary.relocated_branches, 0);
    }

    #[test]
    fn test_same_files() {
        let rows = build(&[Part::new(1, "A")], &[], 1);
        let result = DiffEngine::new().diff(&rows, &rows).unwrap();
        assert_eq!(tags(&result), [("A".into(), PartOf::Both)]);
        assert_eq!(result.summary.outcome, DiffOutcome::Identical);
        assert_eq!(result.summary.merged_duplicates, 1);
        assert!(!result.has_changes());
    }

    #[test]
    fn test_merge_relocates_under_common_root() {
        let first = build(
            &[Part::new(1, "Root"), Part::new(2, "X")],
            &[PartRelation::new(10, "x", 1, 2)],
            1,
        );
        let second = build(
            &[Part::new(1, "Root"), Part::new(2, "Y"), Part::new(3, "Z")],
            &[
                PartRelation::new(10, "y", 1, 2),
                PartRelation::new(11, "z", 2, 3),
            ],
            4,
        );
        let result = DiffEngine::new().diff(&first, &second).unwrap();

        assert_eq!(
            tags(&result),
            [
                ("Root".into(), PartOf::Both),
                ("Root.X (x)".into(), PartOf::First),
                ("Root.Y (y)".into(), PartOf::Second),
                ("Root.Y (y).Z (z)".into(), PartOf::Second),
            ]
        );
        // Fresh ids follow the largest input id (second build: 4, 5, 6).
        assert_eq!(result.rows[2].id, RowId(7));
        assert_eq!(result.rows[2].parent_id, Some(RowId(1)));
        assert_eq!(result.rows[3].id, RowId(8));
        assert_eq!(result.rows[3].parent_id, Some(RowId(7)));
        assert_eq!(result.summary.relocated_branches, 1);
        assert_eq!(result.summary.outcome, DiffOutcome::Merged);
    }

    #[test]
    fn test_overlapping_ids_are_shifted() {
        let first = build(
            &[Part::new(1, "Root"), Part::new(2, "X")],
            &[PartRelation::new(10, "x", 1, 2)],
            1,
        );
        let second = build(
            &[Part::new(1, "Root"), Part::new(2, "Y")],
            &[PartRelation::new(10, "y", 1, 2)],
            1,
        );
        let result = DiffEngine::new().diff(&first, &second).unwrap();

        let ids: HashSet<_> = result.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), result.rows.len());
        assert_eq!(result.rows[2].part_of, PartOf::Second);
        assert_eq!(result.rows[2].parent_id, Some(RowId(1)));
    }

    #[test]
    fn test_colliding_second_rows_follow_moved_parent() {
        let first = build(&[Part::new(1, "Root")], &[], 1);
        // `Bolt`, `Bolt` and a real `Bolt1` under one parent: the second
        // `Bolt` is renamed `Bolt1` and shares the real part's signature.
        let second = build(
            &[
                Part::new(1, "Root"),
                Part::new(2, "N"),
                Part::new(3, "Bolt"),
                Part::new(4, "Bolt1"),
            ],
            &[
                PartRelation::new(10, "n", 1, 2),
                PartRelation::new(11, "a", 2, 3),
                PartRelation::new(12, "b", 2, 3),
                PartRelation::new(13, "c", 2, 4),
            ],
            3,
        );
        let result = DiffEngine::new().diff(&first, &second).unwrap();

        assert_eq!(
            tags(&result),
            [
                ("Root".into(), PartOf::Both),
                ("Root.N (n)".into(), PartOf::Second),
                ("Root.N (n).Bolt (a)".into(), PartOf::Second),
                ("Root.N (n).Bolt (b)".into(), PartOf::Both),
            ]
        );
        let moved = result.rows[1].id;
        assert_eq!(moved, RowId(8));
        assert_eq!(result.rows[2].parent_id, Some(moved));
        assert_eq!(result.rows[3].parent_id, Some(moved));

        let ids: HashSet<_> = result.rows.iter().map(|r| r.id).collect();
        for row in &result.rows {
            if let Some(parent) = row.parent_id {
                assert!(ids.contains(&parent), "{} has no parent", row.row.instance_path);
            }
        }
        assert_eq!(result.summary.merged_duplicates, 2);
        assert_eq!(result.summary.relocated_branches, 1);
    }

    #[test]
    fn test_id_overflow_is_an_error() {
        let first = build(&[Part::new(1, "A")], &[], u32::MAX);
        let second = build(&[Part::new(1, "A")], &[], u32::MAX);
        let err = DiffEngine::new().diff(&first, &second).unwrap_err();
        assert!(matches!(
            err,
            StepToolsError::Diff {
                source: DiffErrorKind::IdOverflow(u32::MAX),
                ..
            }
        ));

        // No overlap, but no room left for relocated rows either.
        let low = build(&[Part::new(1, "A")], &[], 1);
        let err = DiffEngine::new().diff(&low, &second).unwrap_err();
        assert!(matches!(
            err,
            StepToolsError::Diff {
                source: DiffErrorKind::IdOverflow(_),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let result = DiffEngine::new().diff(&[], &[]).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.summary.outcome, DiffOutcome::Identical);
    }

    #[test]
    fn test_second_offset() {
        assert_eq!(second_offset(0), 2);
        assert_eq!(second_offset(5), 7);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let rows = build(&[Part::new(1, "A"), Part::new(2, "B")], &[], 1);
        let mut merged: Vec<_> = rows
            .iter()
            .map(|r| DiffRow::new(r.clone(), PartOf::First))
            .collect();
        merged[1].id = merged[0].id;
        let err = ensure_unique_ids(&merged).unwrap_err();
        assert!(matches!(
            err,
            StepToolsError::Diff {
                source: DiffErrorKind::DuplicateRowId(RowId(1)),
                ..
            }
        ));
    }
}
