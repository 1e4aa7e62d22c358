//! Property-based tests for tree construction and diffing.
//!
//! Generated assemblies only relate a part to parts declared after it, so they
//! are always acyclic. Part names are drawn from a small pool to force name
//! reuse.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use step_tools::{
    DiffEngine, Part, PartIndex, PartOf, PartRelation, Row, RowId, StepFile, TreeBuilder,
};

const NAMES: [&str; 5] = ["Frame", "Arm", "Bolt", "Bolt1", "Pin"];
const LABELS: [&str; 3] = ["", "left", "right"];

fn assembly() -> impl Strategy<Value = StepFile> {
    (1i64..7)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::sample::select(NAMES.to_vec()), n as usize),
                prop::collection::vec((0..n, 0..n, prop::sample::select(LABELS.to_vec())), 0..9),
            )
        })
        .prop_map(|(names, edges)| {
            let parts = names
                .iter()
                .zip(1..)
                .map(|(name, step_id)| Part::new(step_id, *name))
                .collect();
            let relations = edges
                .into_iter()
                .filter(|(parent, child, _)| parent < child)
                .zip(100..)
                .map(|((parent, child, label), step_id)| {
                    PartRelation::new(step_id, label, parent + 1, child + 1)
                })
                .collect();
            StepFile::new(parts, relations)
        })
}

/// Each part after the first few hangs under exactly one earlier part.
fn tree_assembly() -> impl Strategy<Value = StepFile> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 1..12).prop_map(
        |slots| {
            let mut parts = Vec::with_capacity(slots.len());
            let mut relations = Vec::new();
            for (pos, (parent, is_root)) in slots.iter().enumerate() {
                let step_id = pos as i64 + 1;
                parts.push(Part::new(step_id, NAMES[pos % NAMES.len()]));
                if pos > 0 && !is_root {
                    let parent = parent.index(pos) as i64 + 1;
                    relations.push(PartRelation::new(step_id + 100, "occ", parent, step_id));
                }
            }
            StepFile::new(parts, relations)
        },
    )
}

fn build(file: &StepFile) -> Vec<Row<'_>> {
    TreeBuilder::new().build_file(Some(file)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn tree_shaped_assembly_has_one_row_per_part(file in tree_assembly()) {
        let index = PartIndex::from_file(&file).unwrap();
        let rows = TreeBuilder::new().build(&index).unwrap();
        prop_assert_eq!(rows.len(), file.parts.len());
        prop_assert_eq!(
            rows.len(),
            index.isolated_parts().count() + index.resolvable_relation_count()
        );
    }

    #[test]
    fn ids_are_contiguous_from_offset(file in assembly(), offset in 1u32..1000) {
        let rows = TreeBuilder::new()
            .with_id_offset(offset)
            .build_file(Some(&file))
            .unwrap();
        for (row, expected) in rows.iter().zip(offset..) {
            prop_assert_eq!(row.id, RowId(expected));
        }
    }

    #[test]
    fn parents_precede_children(file in assembly()) {
        let rows = build(&file);
        let mut seen = HashSet::new();
        for row in &rows {
            if let Some(parent) = row.parent_id {
                prop_assert!(seen.contains(&parent));
            }
            prop_assert!(seen.insert(row.id));
        }
    }

    #[test]
    fn equal_signatures_share_a_parent_signature(file in assembly()) {
        let rows = build(&file);
        let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
        for row in &rows {
            let parent = row.parent_signature();
            let first = *parents.entry(row.signature.as_str()).or_insert(parent);
            prop_assert_eq!(first, parent);
        }
    }

    #[test]
    fn paths_extend_parent_paths(file in assembly()) {
        let rows = build(&file);
        let by_id: HashMap<RowId, &Row<'_>> = rows.iter().map(|r| (r.id, r)).collect();
        for row in &rows {
            match row.parent_id {
                Some(parent) => {
                    let parent = by_id[&parent];
                    prop_assert_eq!(
                        &row.instance_path,
                        &format!("{}.{}", parent.instance_path, row.instance_name)
                    );
                    let parent_prefix = format!("{}/", parent.signature);
                    prop_assert!(row.signature.starts_with(&parent_prefix));
                    prop_assert_eq!(row.depth, parent.depth + 1);
                }
                None => {
                    prop_assert_eq!(&row.instance_path, &row.instance_name);
                    prop_assert_eq!(row.depth, 0);
                }
            }
        }
    }

    #[test]
    fn file_diffed_with_itself_is_all_both(file in assembly()) {
        let rows = build(&file);
        let distinct: HashSet<_> = rows.iter().map(|r| r.signature.as_str()).collect();
        let result = DiffEngine::new().diff_files(&file, &file).unwrap();
        prop_assert_eq!(result.rows.len(), distinct.len());
        prop_assert!(result.rows.iter().all(|r| r.part_of == PartOf::Both));
    }

    #[test]
    fn every_signature_appears_once(first in assembly(), second in assembly()) {
        let first_rows = build(&first);
        let second_rows = build(&second);
        let result = DiffEngine::new().diff_files(&first, &second).unwrap();

        let expected: HashSet<_> = first_rows
            .iter()
            .chain(&second_rows)
            .map(|r| r.signature.as_str())
            .collect();
        let actual: Vec<_> = result.rows.iter().map(|r| r.signature()).collect();
        let unique: HashSet<_> = actual.iter().copied().collect();
        prop_assert_eq!(unique.len(), actual.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn merged_forest_is_well_formed(first in assembly(), second in assembly()) {
        let result = DiffEngine::new().diff_files(&first, &second).unwrap();
        let ids: HashSet<_> = result.rows.iter().map(|r| r.id).collect();
        prop_assert_eq!(ids.len(), result.rows.len());
        for row in &result.rows {
            if let Some(parent) = row.parent_id {
                prop_assert!(ids.contains(&parent));
            }
            prop_assert!(row.part_of != PartOf::SecondToRelocate);
        }
        prop_assert_eq!(result.summary.total(), result.rows.len());
    }
}
