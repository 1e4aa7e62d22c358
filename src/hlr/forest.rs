//! Navigation helpers over flat row sequences.
//!
//! Rows are stored flat with `parent_id` links; renderers need them back as a
//! tree. These helpers work on anything implementing [`HlrNode`].

use super::row::{HlrNode, RowId};
use std::collections::HashMap;
use xxhash_rust::xxh3::xxh3_64;

/// Positions of each node's children, keyed by parent id (`None` for roots).
///
/// Children keep their order in `nodes`. A node whose parent id matches no
/// node in the sequence is listed under its dangling parent id; use [`roots`]
/// to pick it up as a top-level node.
#[must_use]
pub fn children_map<N: HlrNode>(nodes: &[N]) -> HashMap<Option<RowId>, Vec<usize>> {
    let mut map: HashMap<Option<RowId>, Vec<usize>> = HashMap::new();
    for (pos, node) in nodes.iter().enumerate() {
        map.entry(node.parent_id()).or_default().push(pos);
    }
    map
}

/// Positions of top-level nodes: rows without a parent, plus rows whose
/// parent is not part of the sequence.
#[must_use]
pub fn roots<N: HlrNode>(nodes: &[N]) -> Vec<usize> {
    let ids: HashMap<RowId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect();
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.parent_id().map_or(true, |p| !ids.contains_key(&p)))
        .map(|(i, _)| i)
        .collect()
}

/// Depth of every node by id, following `parent_id` links inside `nodes`.
#[must_use]
pub fn depth_of<N: HlrNode>(nodes: &[N]) -> HashMap<RowId, usize> {
    let parents: HashMap<RowId, Option<RowId>> =
        nodes.iter().map(|n| (n.id(), n.parent_id())).collect();
    let mut depths = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let mut depth = 0;
        let mut current = node.parent_id();
        while let Some(parent) = current {
            if let Some(&known) = depths.get(&parent) {
                depth += known + 1;
                break;
            }
            match parents.get(&parent) {
                Some(&next) if depth <= nodes.len() => {
                    depth += 1;
                    current = next;
                }
                _ => break,
            }
        }
        depths.insert(node.id(), depth);
    }
    depths
}

/// Hash of the signature sequence.
///
/// Two forests with equal fingerprints have the same structure, in the same
/// order, regardless of their synthetic ids.
#[must_use]
pub fn fingerprint<N: HlrNode>(nodes: &[N]) -> u64 {
    let mut hasher_input = Vec::new();
    for node in nodes {
        hasher_input.extend(node.signature().as_bytes());
        hasher_input.push(b'\n');
    }
    xxh3_64(&hasher_input)
}
