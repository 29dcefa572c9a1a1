//! Phylocore is an in-memory engine to parse, traverse and restructure
//! phylogenetic trees.
//!
//! Core functionality provided:
//! - Newick: parse single strings, lists of trees and files; write trees
//!   and clades back to strings and files.
//! - Tree model: rooted or unrooted, bifurcating or multifurcating trees
//!   stored in an arena. Nodes are addressed by [NodeId] handles and carry
//!   a canonical index (tips `0..ntip`, internal nodes `ntip..nnode`).
//!   Nodes can hold arbitrary client data.
//! - Traversal: [Cursor]s walk any subtree in preorder or postorder, over
//!   all nodes or internal nodes only, without recursion. Cursors only read
//!   the tree, so walks can run concurrently.
//! - Structural algorithms: clade and subtree extraction, rerooting,
//!   unrooting, ladderizing, rotation, sibling swap, most recent common
//!   ancestor and spanning tips. See [algorithms].
//!
//! Limitations:
//! - Only unquoted labels
//! - No whitespace inside a tree
//!
//! Logging goes through the [log] facade; no logger is installed.
//!
//! # Example
//! ```
//! use phylocore::{Order, Visit, parse_newick_str};
//!
//! let tree = parse_newick_str("((A:1,B:2)N1:3,(C:1,D:1)N2:1);").unwrap();
//! assert_eq!(tree.ntip(), 4);
//! assert_eq!(tree.nnode(), 7);
//! assert_eq!(tree.tip_labels(), vec![Some("A"), Some("B"), Some("C"), Some("D")]);
//!
//! let a = tree.find("A").unwrap();
//! let b = tree.find("B").unwrap();
//! assert_eq!(tree.node(tree.mrca(a, b)).label(), Some("N1"));
//!
//! let internal: Vec<_> = tree
//!     .traverse(tree.root(), Visit::Internal, Order::Preorder)
//!     .map(|id| tree.node(id).index().unwrap())
//!     .collect();
//! assert_eq!(internal, vec![4, 5, 6]);
//! ```
//!
//! Build a tree by hand:
//! ```
//! use phylocore::{NodeGraph, Tree};
//!
//! let mut graph = NodeGraph::new();
//! let root = graph.alloc();
//! let a = graph.alloc();
//! let b = graph.alloc();
//! graph[a].set_label("A");
//! graph[b].set_label("B");
//! graph[b].set_branch_length(0.25);
//! graph.add_child(root, a);
//! graph.add_child(root, b);
//!
//! let tree = Tree::build(graph, root, 3, 2).unwrap();
//! assert_eq!(tree.to_newick(), "(A,B:0.25);");
//! ```

pub mod algorithms;
pub mod error;
pub mod model;
pub mod newick;
pub mod parser;

pub use error::{ErrorKind, PhyError, Result};
pub use model::{Children, ClientData, Cursor, Node, NodeGraph, NodeId, Order, Traversal, Tree, Visit};
pub use newick::WriteMode;

use std::path::Path;

// =#========================================================================#=
// QUICK NEWICK API
// =#========================================================================#=
/// Parses a Newick string into a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree> {
    newick::parse_str(newick)
}

/// Reads a file and parses the Newick tree in it.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    newick::parse_file(path)
}

/// Writes a tree to a file in Newick format.
///
/// See [`newick::write_file`] for full documentation of this convenience function.
pub fn write_newick_file<P: AsRef<Path>>(tree: &Tree, path: P, mode: WriteMode) -> Result<()> {
    newick::write_file(tree, path, mode)
}
