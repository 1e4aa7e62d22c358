//! Index structures over the flat part/relation records.
//!
//! `PartIndex` answers the questions the tree builder asks over and over
//! (which part has this id, what are the children of that assembly, is this
//! part ever placed inside another one) without rescanning the relation list.
//!
//! # Example
//!
//! ```
//! use step_tools::model::{Part, PartIndex, PartRelation};
//!
//! let parts = vec![Part::new(1, "Assy"), Part::new(2, "Bolt")];
//! let relations = vec![PartRelation::new(10, "r1", 1, 2)];
//! let index = PartIndex::new(&parts, &relations)?;
//!
//! assert!(index.is_isolated(&parts[0]));
//! assert_eq!(index.children_of(1)?.len(), 1);
//! # Ok::<(), step_tools::StepToolsError>(())
//! ```

use super::{Part, PartRelation, StepFile, StepId};
use crate::error::{LookupErrorKind, Result, StepToolsError};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One child instance of an assembly: the placed part and the relation placing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child<'a> {
    pub part: &'a Part,
    pub relation: &'a PartRelation,
}

/// Precomputed lookups over one file's parts and relations.
///
/// Built once per file. Children lists are resolved lazily on first request
/// and memoized for the lifetime of the index, so repeated calls for the same
/// parent hand back the same sequence in relation order.
#[derive(Debug)]
#[must_use]
pub struct PartIndex<'a> {
    parts: &'a [Part],
    relations: &'a [PartRelation],
    /// Part position by step id
    part_by_id: HashMap<StepId, usize>,
    /// Relation position by step id
    relation_by_id: HashMap<StepId, usize>,
    /// Step ids used as `relating_id` (parents)
    relating: HashSet<StepId>,
    /// Step ids used as `related_id` (children)
    related: HashSet<StepId>,
    /// Memoized children by parent step id
    children: RefCell<HashMap<StepId, Rc<[Child<'a>]>>>,
}

impl<'a> PartIndex<'a> {
    /// Build an index from parts and relations.
    ///
    /// Empty slices give an empty index. Fails when a part or relation step id
    /// is declared twice.
    pub fn new(parts: &'a [Part], relations: &'a [PartRelation]) -> Result<Self> {
        let mut part_by_id = HashMap::with_capacity(parts.len());
        for (pos, part) in parts.iter().enumerate() {
            if part_by_id.insert(part.step_id, pos).is_some() {
                return Err(StepToolsError::lookup(
                    "indexing parts",
                    LookupErrorKind::DuplicatePart(part.step_id),
                ));
            }
        }

        let mut relation_by_id = HashMap::with_capacity(relations.len());
        let mut relating = HashSet::new();
        let mut related = HashSet::new();
        for (pos, relation) in relations.iter().enumerate() {
            if relation_by_id.insert(relation.step_id, pos).is_some() {
                return Err(StepToolsError::lookup(
                    "indexing relations",
                    LookupErrorKind::DuplicateRelation(relation.step_id),
                ));
            }
            relating.insert(relation.relating_id);
            related.insert(relation.related_id);
        }

        Ok(Self {
            parts,
            relations,
            part_by_id,
            relation_by_id,
            relating,
            related,
            children: RefCell::new(HashMap::new()),
        })
    }

    /// Build an index over a parsed file.
    pub fn from_file(file: &'a StepFile) -> Result<Self> {
        Self::new(&file.parts, &file.relations)
    }

    /// An index over no parts at all.
    pub fn empty() -> Self {
        Self {
            parts: &[],
            relations: &[],
            part_by_id: HashMap::new(),
            relation_by_id: HashMap::new(),
            relating: HashSet::new(),
            related: HashSet::new(),
            children: RefCell::new(HashMap::new()),
        }
    }

    /// Parts in their original order.
    #[must_use]
    pub const fn parts(&self) -> &'a [Part] {
        self.parts
    }

    /// Relations in their original order.
    #[must_use]
    pub const fn relations(&self) -> &'a [PartRelation] {
        self.relations
    }

    /// Resolve a part by step id.
    ///
    /// Only call this with ids already known to exist; an unknown id means the
    /// input is malformed.
    pub fn part_by_id(&self, step_id: StepId) -> Result<&'a Part> {
        self.part_by_id
            .get(&step_id)
            .map(|&pos| &self.parts[pos])
            .ok_or_else(|| StepToolsError::part_not_found(step_id))
    }

    /// Resolve a relation by step id.
    #[must_use]
    pub fn relation_by_id(&self, step_id: StepId) -> Option<&'a PartRelation> {
        self.relation_by_id.get(&step_id).map(|&pos| &self.relations[pos])
    }

    /// Child instances of an assembly, in relation order.
    ///
    /// The list is computed on the first call for `parent` and shared by every
    /// later call. A relation whose child is not a known part fails the lookup
    /// and nothing is memoized.
    pub fn children_of(&self, parent: StepId) -> Result<Rc<[Child<'a>]>> {
        if let Some(cached) = self.children.borrow().get(&parent) {
            return Ok(Rc::clone(cached));
        }

        let mut children = Vec::new();
        if self.relating.contains(&parent) {
            for relation in self.relations.iter().filter(|r| r.relating_id == parent) {
                children.push(Child {
                    part: self.part_by_id(relation.related_id)?,
                    relation,
                });
            }
        }

        let children: Rc<[Child<'a>]> = children.into();
        self.children
            .borrow_mut()
            .insert(parent, Rc::clone(&children));
        Ok(children)
    }

    /// True when no relation places `part` inside an assembly: it is a root of
    /// the forest.
    #[must_use]
    pub fn is_isolated(&self, part: &Part) -> bool {
        !self.related.contains(&part.step_id)
    }

    /// True when some relation uses `step_id` as the child.
    #[must_use]
    pub fn is_used_as_child(&self, step_id: StepId) -> bool {
        self.related.contains(&step_id)
    }

    /// True when some relation uses `step_id` as the parent.
    #[must_use]
    pub fn is_used_as_parent(&self, step_id: StepId) -> bool {
        self.relating.contains(&step_id)
    }

    /// Number of relations whose child resolves to a known part.
    ///
    /// Together with the isolated part count this is the number of rows a
    /// full build produces for an acyclic structure whose assemblies are all
    /// reachable from a root.
    #[must_use]
    pub fn resolvable_relation_count(&self) -> usize {
        self.relations
            .iter()
            .filter(|r| self.part_by_id.contains_key(&r.related_id))
            .count()
    }

    /// Parts that are roots of the forest, in file order.
    pub fn isolated_parts(&self) -> impl Iterator<Item = &'a Part> + '_ {
        self.parts.iter().filter(move |p| self.is_isolated(p))
    }

    /// Number of parents whose children list has been memoized.
    #[must_use]
    pub fn memoized_parent_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Total part count
    #[must_use]
    pub const fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Total relation count
    #[must_use]
    pub const fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Part>, Vec<PartRelation>) {
        let parts = vec![
            Part::new(1, "Assy"),
            Part::new(2, "Bolt"),
            Part::new(3, "Nut"),
            Part::new(4, "Loose"),
        ];
        let relations = vec![
            PartRelation::new(10, "r1", 1, 2),
            PartRelation::new(11, "r2", 1, 3),
            PartRelation::new(12, "r3", 1, 2),
        ];
        (parts, relations)
    }

    #[test]
    fn test_empty_index() {
        let index = PartIndex::new(&[], &[]).expect("empty input is valid");
        assert_eq!(index.part_count(), 0);
        assert!(index.children_of(1).expect("no relations").is_empty());
        assert_eq!(PartIndex::empty().relation_count(), 0);
    }

    #[test]
    fn test_part_by_id() {
        let (parts, relations) = sample();
        let index = PartIndex::new(&parts, &relations).unwrap();
        assert_eq!(index.part_by_id(3).unwrap().name, "Nut");

        let err = index.part_by_id(99).unwrap_err();
        assert_eq!(err.lookup_kind(), Some(&LookupErrorKind::PartNotFound(99)));
    }

    #[test]
    fn test_relation_by_id() {
        let (parts, relations) = sample();
        let index = PartIndex::new(&parts, &relations).unwrap();
        assert_eq!(index.relation_by_id(11).map(|r| r.id.as_str()), Some("r2"));
        assert!(index.relation_by_id(1).is_none());
    }

    #[test]
    fn test_children_keep_relation_order() {
        let (parts, relations) = sample();
        let index = PartIndex::new(&parts, &relations).unwrap();
        let children = index.children_of(1).unwrap();
        let labels: Vec<_> = children.iter().map(|c| c.relation.id.as_str()).collect();
        assert_eq!(labels, ["r1", "r2", "r3"]);
        assert!(std::ptr::eq(children[0].part, children[2].part));
    }

    #[test]
    fn test_children_are_memoized() {
        let (parts, relations) = sample();
        let index = PartIndex::new(&parts, &relations).unwrap();
        assert_eq!(index.memoized_parent_count(), 0);

        let first = index.children_of(1).unwrap();
        let second = index.children_of(1).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(index.memoized_parent_count(), 1);
    }

    #[test]
    fn test_isolation() {
        let (parts, relations) = sample();
        let index = PartIndex::new(&parts, &relations).unwrap();
        let roots: Vec<_> = index.isolated_parts().map(|p| p.step_id).collect();
        assert_eq!(roots, [1, 4]);
        assert!(index.is_used_as_parent(1));
        assert!(index.is_used_as_child(2));
        assert!(!index.is_used_as_parent(4));
    }

    #[test]
    fn test_dangling_child_is_not_memoized() {
        let parts = vec![Part::new(1, "Assy")];
        let relations = vec![PartRelation::new(10, "r1", 1, 2)];
        let index = PartIndex::new(&parts, &relations).unwrap();

        let err = index.children_of(1).unwrap_err();
        assert_eq!(err.lookup_kind(), Some(&LookupErrorKind::PartNotFound(2)));
        assert_eq!(index.memoized_parent_count(), 0);
        assert_eq!(index.resolvable_relation_count(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let parts = vec![Part::new(1, "A"), Part::new(1, "B")];
        let err = PartIndex::new(&parts, &[]).unwrap_err();
        assert_eq!(err.lookup_kind(), Some(&LookupErrorKind::DuplicatePart(1)));

        let parts = vec![Part::new(1, "A"), Part::new(2, "B")];
        let relations = vec![
            PartRelation::new(5, "r1", 1, 2),
            PartRelation::new(5, "r2", 1, 2),
        ];
        let err = PartIndex::new(&parts, &relations).unwrap_err();
        assert_eq!(
            err.lookup_kind(),
            Some(&LookupErrorKind::DuplicateRelation(5))
        );
    }
}
