//! Forest construction from a [`PartIndex`].

use super::row::{NameCounter, Row, RowId};
use crate::error::{ErrorContext, LookupErrorKind, Result, StepToolsError};
use crate::model::{Child, PartIndex, StepFile};
use std::rc::Rc;

/// Builds the HLR forest of one file.
///
/// Every isolated part becomes a root; each relation whose child resolves
/// becomes one more row under its parent instance. Rows come out in pre-order
/// with sibling order following the relation array, and ids are assigned
/// sequentially from the configured offset.
///
/// ```
/// use step_tools::hlr::{RowId, TreeBuilder};
/// use step_tools::model::{Part, PartIndex, PartRelation};
///
/// let parts = vec![Part::new(1, "Assy"), Part::new(2, "Bolt")];
/// let relations = vec![PartRelation::new(10, "r1", 1, 2)];
/// let index = PartIndex::new(&parts, &relations)?;
///
/// let rows = TreeBuilder::new().build(&index)?;
/// assert_eq!(rows[1].parent_id, Some(RowId(1)));
/// assert_eq!(rows[1].instance_path, "Assy.Bolt (r1)");
/// # Ok::<(), step_tools::StepToolsError>(())
/// ```
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct TreeBuilder {
    id_offset: u32,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending expansion of one row
struct Frame<'a> {
    row: usize,
    children: Rc<[Child<'a>]>,
    next: usize,
}

impl TreeBuilder {
    /// A builder numbering rows from 1
    pub const fn new() -> Self {
        Self { id_offset: 1 }
    }

    /// Start numbering at `offset`, to continue an id sequence started elsewhere
    pub const fn with_id_offset(mut self, offset: u32) -> Self {
        self.id_offset = offset;
        self
    }

    /// First id this builder hands out
    #[must_use]
    pub const fn id_offset(&self) -> u32 {
        self.id_offset
    }

    /// Build the forest of an optional parsed file.
    ///
    /// An absent file yields an empty forest.
    pub fn build_file<'a>(&self, file: Option<&'a StepFile>) -> Result<Vec<Row<'a>>> {
        let Some(file) = file else {
            return Ok(Vec::new());
        };
        let index = PartIndex::from_file(file)?;
        self.build(&index)
            .with_context(|| format!("building forest for {}", file.display_name()))
    }

    /// Build the forest of an indexed file.
    ///
    /// Fails when a relation references an unknown part, or when an assembly
    /// reachable from a root contains itself.
    pub fn build<'a>(&self, index: &PartIndex<'a>) -> Result<Vec<Row<'a>>> {
        let mut rows: Vec<Row<'a>> = Vec::with_capacity(index.part_count() + index.relation_count());
        let mut names = NameCounter::default();
        let mut next_id = RowId(self.id_offset);

        for root in index.isolated_parts() {
            rows.push(Row::root(next_id, root, &mut names));
            next_id = next_id.next();

            let mut stack = vec![Frame {
                row: rows.len() - 1,
                children: index
                    .children_of(root.step_id)
                    .with_context(|| format!("expanding #{}", root.step_id))?,
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let Some(&child) = frame.children.get(frame.next) else {
                    stack.pop();
                    continue;
                };
                frame.next += 1;
                let parent = frame.row;

                if stack.iter().any(|f| rows[f.row].part.step_id == child.part.step_id) {
                    let path = stack
                        .iter()
                        .map(|f| rows[f.row].instance_name.as_str())
                        .chain(std::iter::once(child.part.name.as_str()))
                        .collect::<Vec<_>>()
                        .join(" > ");
                    return Err(StepToolsError::lookup(
                        format!("expanding relation #{}", child.relation.step_id),
                        LookupErrorKind::CyclicAssembly {
                            step_id: child.part.step_id,
                            path,
                        },
                    ));
                }

                let row = rows[parent].child(next_id, child, &mut names);
                next_id = next_id.next();
                rows.push(row);

                stack.push(Frame {
                    row: rows.len() - 1,
                    children: index
                        .children_of(child.part.step_id)
                        .with_context(|| format!("expanding #{}", child.part.step_id))?,
                    next: 0,
                });
            }
        }

        tracing::debug!(rows = rows.len(), first_id = self.id_offset, "built HLR forest");
        Ok(rows)
    }
}
