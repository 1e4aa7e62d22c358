#![no_main]
use libfuzzer_sys::fuzz_target;
use step_tools::{DiffEngine, Part, PartRelation, RootPolicy, StepFile};

/// Decode a small assembly from raw bytes: one part per name byte, then one
/// relation per following byte pair.
fn assembly(bytes: &[u8]) -> StepFile {
    let Some((&count, rest)) = bytes.split_first() else {
        return StepFile::default();
    };
    let count = usize::from(count % 8) + 1;
    let (names, edges) = rest.split_at(rest.len().min(count));

    let parts = names
        .iter()
        .zip(1..)
        .map(|(b, id)| Part::new(id, format!("P{}", b % 4)))
        .collect::<Vec<_>>();
    let len = parts.len().max(1) as i64;
    let relations = edges
        .chunks_exact(2)
        .take(16)
        .zip(100..)
        .map(|(pair, id)| {
            PartRelation::new(
                id,
                format!("r{}", pair[0] % 3),
                i64::from(pair[0]) % len + 1,
                i64::from(pair[1]) % len + 1,
            )
        })
        .collect();
    StepFile::new(parts, relations)
}

// Cycles are rejected by the builder; anything that builds must diff.
fuzz_target!(|data: &[u8]| {
    let (left, right) = data.split_at(data.len() / 2);
    let first = assembly(left);
    let second = assembly(right);
    for policy in [RootPolicy::KeepAsRoot, RootPolicy::LeaveUnresolved] {
        let _ = DiffEngine::new()
            .with_root_policy(policy)
            .diff_files(&first, &second);
    }
});
