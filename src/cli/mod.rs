//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod diff;
mod graph;
mod info;
mod tree;

pub use diff::run_diff;
pub use graph::run_graph;
pub use info::{render_info, run_info};
pub use tree::{filter_rows, run_tree};

// Re-export config types used by handlers
pub use crate::config::{DiffConfig, GraphCommandConfig, TreeConfig};
