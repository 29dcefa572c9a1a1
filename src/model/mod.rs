//! Tree data model.
//!
//! - [Node]: a tip or internal node with label, note, branch length and
//!   sibling/ancestor links
//! - [NodeGraph]: arena owning linked nodes before they form a [Tree]
//! - [Tree]: indexed tree with preorder lookup arrays
//! - [Cursor]: traversal over a subtree of a [Tree]
//!
//! Nodes never hold references to one another, only [NodeId] handles into
//! the arena of their owner.

/// Tree nodes and their handles
pub mod node;
/// Arena of not-yet-built nodes
pub mod graph;
/// Indexed tree
pub mod tree;
/// Traversal cursors
pub mod cursor;

pub use cursor::{Cursor, Order, Traversal, Visit};
pub use graph::{Children, NodeGraph};
pub use node::{ClientData, Node, NodeId};
pub use tree::Tree;
