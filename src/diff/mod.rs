//! Structural diff of two STEP assemblies.
//!
//! Both files are built into HLR forests independently, then merged by
//! signature. The merged forest tags every row with its origin
//! ([`PartOf`]), so a renderer can show first-only, second-only and shared
//! nodes side by side in one tree.
//!
//! # Example
//!
//! ```
//! use step_tools::diff::{DiffEngine, PartOf};
//! use step_tools::model::{Part, PartRelation, StepFile};
//!
//! let first = StepFile::new(
//!     vec![Part::new(1, "Root"), Part::new(2, "X")],
//!     vec![PartRelation::new(10, "x", 1, 2)],
//! );
//! let second = StepFile::new(
//!     vec![Part::new(1, "Root"), Part::new(2, "Y")],
//!     vec![PartRelation::new(10, "y", 1, 2)],
//! );
//!
//! let result = DiffEngine::new().diff_files(&first, &second)?;
//! let tags: Vec<_> = result.rows.iter().map(|r| r.part_of).collect();
//! assert_eq!(tags, [PartOf::Both, PartOf::First, PartOf::Second]);
//! # Ok::<(), step_tools::StepToolsError>(())
//! ```

mod engine;
mod result;
mod row;

pub use engine::{second_offset, DiffEngine};
pub use result::{DiffOutcome, DiffResult, DiffSummary};
pub use row::{DiffRow, PartOf, RootPolicy};
