//! Data types shared by the backend, the assembler and the renderer.
//!
//! - `commit`: Commit as discovered from history
//! - `diff`: DiffFragment, the added/removed lines of one (commit, path) pair
//! - `graph`: Graph, GraphNode, NodeKey, GraphEdge, MergePolicy

pub mod commit;
pub mod diff;
pub mod graph;

pub use commit::*;
pub use diff::*;
pub use graph::*;
