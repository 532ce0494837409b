//! Difference records and the difference tree.
//!
//! Every discrepancy found by a comparison is a [`Difference`] located by a
//! path relative to the compared root. When a tree is requested the same
//! traversal also records each difference on the [`DifferenceTree`] node of
//! the member where it was found.
//!
//! ## Entry point
//!
//! ```ignore
//! let tree = comparer.compare_with_tree(&left, &right)?;
//! let summary = structdiff_core::diff::human_summary::render_tree_summary(&tree);
//! ```

pub mod human_summary;
pub mod model;
pub mod tree;

pub use human_summary::{render_human_summary, render_tree_summary};
pub use model::{Difference, DifferenceKind};
pub use tree::{DifferenceTree, NodeContext, NodeCursor, NodeId, NodeRef, TreeMember, TreeReport};
