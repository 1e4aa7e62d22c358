//! One instance of a part at one tree position.

use crate::diff::PartOf;
use crate::model::{Child, Part, PartRelation, StepId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Separator between `unique_name` segments of a signature.
///
/// A separator (or backslash) inside a name is escaped with a backslash, so a
/// part named `A/B` never shares a signature with `B` placed under `A`.
pub const SIGNATURE_SEPARATOR: char = '/';

/// Separator between `instance_name` segments of an instance path
pub const PATH_SEPARATOR: char = '.';

/// Synthetic row identity, sequential within one build.
///
/// Unrelated to the STEP entity ids of parts and relations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(pub u32);

impl RowId {
    /// The id following this one, saturating at `u32::MAX`
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RowId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Per-build occurrence counter behind `unique_name`.
///
/// Keyed by part name across the whole build, not per parent: the first
/// occurrence of a name keeps it as is, later ones get `1`, `2`, ... appended.
#[derive(Debug, Default)]
pub(crate) struct NameCounter {
    seen: HashMap<String, u32>,
}

impl NameCounter {
    pub(crate) fn unique_name(&mut self, name: &str) -> String {
        match self.seen.get_mut(name) {
            Some(count) => {
                let unique = format!("{name}{count}");
                *count += 1;
                unique
            }
            None => {
                self.seen.insert(name.to_string(), 1);
                name.to_string()
            }
        }
    }
}

/// A node of the HLR forest.
///
/// `part` and `relation` borrow from the parsed file, which outlives every
/// row built from it. `relation` is `None` only for isolated root parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub id: RowId,
    pub parent_id: Option<RowId>,
    pub part: &'a Part,
    pub relation: Option<&'a PartRelation>,
    /// Part name, disambiguated by the relation label when there is one
    pub instance_name: String,
    /// Dotted path of instance names from the root down to this row
    pub instance_path: String,
    /// Part name with its per-build occurrence suffix
    pub unique_name: String,
    /// Slash-separated path of unique names; the diff identity key
    pub signature: String,
    /// Number of ancestors (0 for roots)
    pub depth: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn root(id: RowId, part: &'a Part, names: &mut NameCounter) -> Self {
        let unique_name = names.unique_name(&part.name);
        let instance_name = part.name.clone();
        Self {
            id,
            parent_id: None,
            part,
            relation: None,
            instance_path: instance_name.clone(),
            instance_name,
            signature: signature_segment(&unique_name).into_owned(),
            unique_name,
            depth: 0,
        }
    }

    pub(crate) fn child(&self, id: RowId, child: Child<'a>, names: &mut NameCounter) -> Self {
        let unique_name = names.unique_name(&child.part.name);
        let instance_name = instance_name(child.part, Some(child.relation));
        Self {
            id,
            parent_id: Some(self.id),
            part: child.part,
            relation: Some(child.relation),
            instance_path: format!("{}{PATH_SEPARATOR}{instance_name}", self.instance_path),
            instance_name,
            signature: format!(
                "{}{SIGNATURE_SEPARATOR}{}",
                self.signature,
                signature_segment(&unique_name)
            ),
            unique_name,
            depth: self.depth + 1,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.part.name
    }

    #[must_use]
    pub fn kind(&self) -> &'a str {
        &self.part.kind
    }

    #[must_use]
    pub fn representation_type(&self) -> &'a str {
        &self.part.representation_type
    }

    #[must_use]
    pub fn step_id(&self) -> StepId {
        self.part.step_id
    }

    /// `{type}#{stepId} '{name}'`
    #[must_use]
    pub fn description(&self) -> String {
        self.part.description()
    }

    /// The relation's `id` label, empty for roots
    #[must_use]
    pub fn relation_label(&self) -> &'a str {
        self.relation.map_or("", |r| r.id.as_str())
    }

    /// STEP entity id of the relation, `None` for roots
    #[must_use]
    pub fn relation_id(&self) -> Option<StepId> {
        self.relation.map(|r| r.step_id)
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Signature of the parent row, `None` for roots.
    #[must_use]
    pub fn parent_signature(&self) -> Option<&str> {
        if self.depth == 0 {
            return None;
        }
        let segment = signature_segment(&self.unique_name);
        let cut = self.signature.len() - segment.len() - SIGNATURE_SEPARATOR.len_utf8();
        self.signature.get(..cut)
    }
}

/// `unique_name` as it appears inside a signature
fn signature_segment(unique_name: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| c == SIGNATURE_SEPARATOR || c == '\\';
    if !unique_name.contains(needs_escape) {
        return Cow::Borrowed(unique_name);
    }
    let mut escaped = String::with_capacity(unique_name.len() + 2);
    for c in unique_name.chars() {
        if needs_escape(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

fn instance_name(part: &Part, relation: Option<&PartRelation>) -> String {
    match relation {
        Some(relation) if !relation.id.trim().is_empty() => {
            format!("{} ({})", part.name, relation.id)
        }
        _ => part.name.clone(),
    }
}

/// Common view over plain rows and diff rows, used by renderers.
pub trait HlrNode {
    fn id(&self) -> RowId;
    fn parent_id(&self) -> Option<RowId>;
    fn part(&self) -> &Part;
    fn relation(&self) -> Option<&PartRelation>;
    fn instance_name(&self) -> &str;
    fn instance_path(&self) -> &str;
    fn signature(&self) -> &str;

    /// Origin tag, only set on diff rows
    fn part_of(&self) -> Option<PartOf> {
        None
    }

    fn description(&self) -> String {
        self.part().description()
    }

    fn relation_label(&self) -> &str {
        self.relation().map_or("", |r| r.id.as_str())
    }
}

impl HlrNode for Row<'_> {
    fn id(&self) -> RowId {
        self.id
    }

    fn parent_id(&self) -> Option<RowId> {
        self.parent_id
    }

    fn part(&self) -> &Part {
        self.part
    }

    fn relation(&self) -> Option<&PartRelation> {
        self.relation
    }

    fn instance_name(&self) -> &str {
        &self.instance_name
    }

    fn instance_path(&self) -> &str {
        &self.instance_path
    }

    fn signature(&self) -> &str {
        &self.signature
    }
}
