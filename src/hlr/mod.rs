//! High-level representation (HLR) of an assembly.
//!
//! The HLR is a forest of [`Row`]s: one row per part instance. A part used
//! under three parents yields three rows sharing the same [`Part`](crate::model::Part).
//! Each row carries two paths:
//!
//! - `instance_path`: dotted display path (`Assy.Bolt (r1)`), unique within a build
//! - `signature`: slash path of per-build unique names (`Assy/Bolt1`), which
//!   the diff engine uses to match rows across two independent builds

mod builder;
pub mod forest;
mod row;

pub use builder::TreeBuilder;
pub use row::{HlrNode, Row, RowId, PATH_SEPARATOR, SIGNATURE_SEPARATOR};
