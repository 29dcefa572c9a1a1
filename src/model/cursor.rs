//! Traversal cursor over a built [Tree].
//!
//! A [Cursor] is prepared on a node with a [Visit] and an [Order] and then
//! stepped until it is exhausted. Preparing computes the boundary of the
//! walk once, in time proportional to the depth of the subtree; each step
//! is constant time as it only reads the tree's preorder arrays.
//!
//! Cursors only read the tree, so any number of them can walk the same tree
//! at once, also from different threads. [Traversal] wraps a cursor as an
//! [Iterator].
//!
//! ```
//! use phylocore::{Order, Visit, newick};
//!
//! let tree = newick::parse_str("((A,B)N1,(C,D)N2)N3;").unwrap();
//! let labels: Vec<_> = tree
//!     .traverse(tree.root(), Visit::All, Order::Postorder)
//!     .map(|id| tree.node(id).label().unwrap())
//!     .collect();
//! assert_eq!(labels, ["D", "C", "N2", "B", "A", "N1", "N3"]);
//! ```

use crate::model::node::NodeId;
use crate::model::tree::Tree;

/// Which nodes a cursor visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Tips and internal nodes
    All,
    /// Internal nodes only
    Internal,
}

/// Direction of a cursor walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Every node before its descendants, siblings left to right
    Preorder,
    /// Reverse preorder: every node after its descendants, siblings right to left
    Postorder,
}

// =#========================================================================#=
// CURSOR
// =#========================================================================#=
/// Stateful traversal over a subtree of a [Tree].
///
/// A default cursor is unprepared and yields nothing. Once the boundary node
/// has been returned, [step](Cursor::step) returns `None` until the cursor
/// is prepared again.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    visit: Visit,
    order: Order,
    /// Position in the preorder array of the node returned after `next`
    position: usize,
    next: Option<NodeId>,
    end: Option<NodeId>,
}

impl Cursor {
    /// Creates an unprepared cursor.
    pub fn new() -> Self {
        Cursor {
            visit: Visit::All,
            order: Order::Preorder,
            position: 0,
            next: None,
            end: None,
        }
    }

    /// Prepares the cursor to walk the subtree of `node`.
    ///
    /// An internal-only walk prepared on a tip visits nothing.
    ///
    /// # Arguments
    /// * `tree` - The tree `node` belongs to
    /// * `node` - Root of the subtree to walk
    /// * `visit` - Whether to visit all nodes or internal nodes only
    /// * `order` - Preorder or postorder
    pub fn prepare(&mut self, tree: &Tree, node: NodeId, visit: Visit, order: Order) {
        self.visit = visit;
        self.order = order;
        self.next = None;
        self.end = None;
        self.position = 0;

        let subtree_root = tree.node(node);
        if visit == Visit::Internal && subtree_root.is_tip() {
            return;
        }

        let last = match visit {
            Visit::All => subtree_root.last_visit.unwrap_or(node),
            Visit::Internal => tree.last_internal(node),
        };
        let (begin, end) = match order {
            Order::Preorder => (node, last),
            Order::Postorder => (last, node),
        };

        let begin_position = match visit {
            Visit::All => tree.position_of(tree.node(begin).index),
            Visit::Internal => tree.node(begin).index - tree.ntip(),
        };
        self.position = match order {
            Order::Preorder => begin_position + 1,
            Order::Postorder => begin_position.saturating_sub(1),
        };
        self.next = Some(begin);
        self.end = Some(end);
    }

    /// Returns the next node of the walk, or `None` once the walk is over.
    pub fn step(&mut self, tree: &Tree) -> Option<NodeId> {
        let current = self.next?;

        if Some(current) == self.end {
            self.next = None;
            self.end = None;
        } else {
            let sequence = match self.visit {
                Visit::All => tree.nodes_preorder(),
                Visit::Internal => tree.internal_nodes(),
            };
            self.next = sequence.get(self.position).copied();
            self.position = match self.order {
                Order::Preorder => self.position + 1,
                Order::Postorder => self.position.saturating_sub(1),
            };
        }

        Some(current)
    }

    /// Returns `true` if the cursor has nothing left to visit.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::new()
    }
}

// =#========================================================================#=
// TRAVERSAL
// =#========================================================================#=
/// Iterator over the nodes of a subtree, created by [Tree::traverse].
pub struct Traversal<'a> {
    tree: &'a Tree,
    cursor: Cursor,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(tree: &'a Tree, node: NodeId, visit: Visit, order: Order) -> Self {
        let mut cursor = Cursor::new();
        cursor.prepare(tree, node, visit, order);
        Traversal { tree, cursor }
    }
}

impl Iterator for Traversal<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.step(self.tree)
    }
}
