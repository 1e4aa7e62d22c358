//! **Assembly trees and structural diffs for STEP-AP242 files.**
//!
//! `step-tools` turns the part/relation records extracted from a STEP-AP242
//! file into its High Level Representation (HLR): a forest of part
//! *instances*, one row per place a part is used in the assembly. Two such
//! forests can then be merged into one, each row tagged with where it comes
//! from.
//!
//! Parsing the STEP file itself is out of scope; the records arrive already
//! extracted, either in memory or serialized as JSON/YAML (see [`pipeline`]).
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Part`] and [`PartRelation`] records as found in the file,
//!   and [`PartIndex`], the lookup layer over them.
//! - **[`hlr`]**: [`TreeBuilder`] expands every root part into its instance
//!   tree. Each [`Row`] carries a *signature*, the path of per-build unique
//!   names from its root, which is what the diff matches on.
//! - **[`diff`]**: [`DiffEngine`] merges two forests. Rows are tagged
//!   `FIRST`, `SECOND`, `BOTH`, or `SECOND_TO_RELOCATE` when a second-file
//!   node could not be placed.
//! - **[`reports`]**: text tree, table, JSON, Graphviz DOT and summary output.
//! - **[`pipeline`]**, **[`config`]**, **[`cli`]**: what the `step-tools`
//!   binary is built from.
//!
//! ## Building a tree
//!
//! ```
//! use step_tools::{Part, PartRelation, StepFile, TreeBuilder};
//!
//! let file = StepFile::new(
//!     vec![Part::new(1, "Car"), Part::new(2, "Wheel")],
//!     vec![
//!         PartRelation::new(10, "front", 1, 2),
//!         PartRelation::new(11, "rear", 1, 2),
//!     ],
//! );
//!
//! let rows = TreeBuilder::new().build_file(Some(&file))?;
//! let paths: Vec<_> = rows.iter().map(|r| r.instance_path.as_str()).collect();
//! assert_eq!(paths, ["Car", "Car.Wheel (front)", "Car.Wheel (rear)"]);
//! assert_eq!(rows[2].signature, "Car/Wheel1");
//! # Ok::<(), step_tools::StepToolsError>(())
//! ```
//!
//! ## Diffing two files
//!
//! ```no_run
//! use std::path::Path;
//! use step_tools::pipeline::read_step_file;
//! use step_tools::{DiffEngine, PartOf};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let first = read_step_file(Path::new("rev-a.json"))?;
//!     let second = read_step_file(Path::new("rev-b.json"))?;
//!
//!     let result = DiffEngine::new().diff_files(&first, &second)?;
//!     println!("{}", result.summary.outcome.status_text());
//!     for row in result.rows_tagged(PartOf::Second) {
//!         println!("  + {}", row.row.instance_path);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `first`/`second` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod hlr;
pub mod model;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use config::{BehaviorConfig, DiffConfig, DiffSettings, GraphConfig, OutputConfig};
pub use diff::{DiffEngine, DiffOutcome, DiffResult, DiffRow, DiffSummary, PartOf, RootPolicy};
pub use error::{ErrorContext, OptionContext, Result, StepToolsError};
pub use hlr::{HlrNode, Row, RowId, TreeBuilder};
pub use model::{HeaderInfo, Part, PartIndex, PartRelation, StepFile, StepId};
pub use reports::{ReportFormat, ReportGenerator};
