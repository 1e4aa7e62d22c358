//! Input records of the assembly structure.
//!
//! A STEP parser (outside this crate) reduces an AP242 file to two flat lists:
//! [`Part`]s (product definitions) and [`PartRelation`]s (usage occurrences
//! placing one part inside another). [`StepFile`] carries both, and
//! [`PartIndex`] provides the lookups the tree builder needs:
//!
//! ```ignore
//! let file = pipeline::load_step_file(&path, false)?;
//! let index = PartIndex::from_file(&file)?;
//!
//! for root in index.isolated_parts() {
//!     let children = index.children_of(root.step_id)?;
//! }
//! ```

mod index;
mod step_file;

pub use index::*;
pub use step_file::*;
