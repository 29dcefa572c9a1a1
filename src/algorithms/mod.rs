//! Structural algorithms on built trees.
//!
//! All algorithms are methods of [Tree](crate::Tree):
//! - ancestry: [mrca](crate::Tree::mrca), [spanning_pair](crate::Tree::spanning_pair),
//!   [spanning_index](crate::Tree::spanning_index)
//! - extraction (returns a new tree): [extract_clade](crate::Tree::extract_clade),
//!   [extract_subtree](crate::Tree::extract_subtree)
//! - rooting (returns a new tree): [reroot](crate::Tree::reroot),
//!   [unroot](crate::Tree::unroot)
//! - reordering (in place): [ladderize](crate::Tree::ladderize),
//!   [rotate](crate::Tree::rotate), [swap](crate::Tree::swap)
//!
//! Algorithms that return a new tree leave the input untouched. In-place
//! algorithms keep every [NodeId](crate::NodeId) valid but reassign indices.

mod ancestry;
mod clade;
mod order;
mod reroot;
