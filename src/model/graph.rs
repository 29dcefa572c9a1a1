//! Arena of linked nodes that have not (yet) been built into a [Tree].
//!
//! A [NodeGraph] owns its nodes; nodes refer to each other only through
//! [NodeId] handles. Nodes are allocated with [NodeGraph::alloc] and linked
//! with [NodeGraph::add_child] and [NodeGraph::prune]. Once connected,
//! [Tree::build] turns the graph into an indexed [Tree].
//!
//! ```
//! use phylocore::{NodeGraph, Tree};
//!
//! let mut graph = NodeGraph::new();
//! let root = graph.alloc();
//! for label in ["A", "B", "C"] {
//!     let tip = graph.alloc();
//!     graph[tip].set_label(label);
//!     graph.add_child(root, tip);
//! }
//!
//! let tree = Tree::build(graph, root, 4, 3).unwrap();
//! assert_eq!(tree.to_newick(), "(A,B,C);");
//! ```

// Imports for doc links
#[allow(unused_imports)]
use crate::model::Tree;

use crate::error::PhyError;
use crate::model::node::{Node, NodeId};
use std::ops::{Index, IndexMut};

/// Arena owning a set of nodes.
#[derive(Debug, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeGraph { nodes: Vec::new() }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeGraph {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocates a new unlinked node and returns its handle.
    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new());
        id
    }

    /// Returns the number of allocated slots, linked or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the node behind a handle mutably.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this arena.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Appends `child` to the end of `parent`'s descendant list.
    ///
    /// `child` must be detached (no ancestor, no siblings), as returned by
    /// [alloc](Self::alloc) or [prune](Self::prune).
    ///
    /// # Returns
    /// `false` (and nothing changes) if `child` is still attached or is
    /// `parent` itself, `true` otherwise
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let node = &self[child];
        let attached = node.ancestor.is_some() || node.next.is_some() || node.prev.is_some();
        if attached || parent == child {
            return false;
        }

        match self.last_child(parent) {
            Some(last) => {
                self[last].next = Some(child);
                self[child].prev = Some(last);
            }
            None => self[parent].first_child = Some(child),
        }
        self[child].ancestor = Some(parent);
        self[parent].ndesc += 1;
        true
    }

    /// Removes `child` from `parent`'s descendant list and returns it,
    /// or `None` if `child` is not a descendant of `parent`.
    ///
    /// The pruned node keeps its own descendants.
    pub fn prune(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        if self[child].ancestor != Some(parent) {
            return None;
        }

        let prev = self[child].prev.take();
        let next = self[child].next.take();
        self[child].ancestor = None;

        if let Some(prev) = prev {
            self[prev].next = next;
        }
        if let Some(next) = next {
            self[next].prev = prev;
        }
        if self[parent].first_child == Some(child) {
            self[parent].first_child = next;
        }
        self[parent].ndesc -= 1;

        Some(child)
    }

    /// Returns the rightmost immediate descendant.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        let mut last = self[id].first_child?;
        while let Some(next) = self[last].next {
            last = next;
        }
        Some(last)
    }

    /// Returns an iterator over the immediate descendants, left to right.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            graph: self,
            next: self[id].first_child,
        }
    }

    /// Rewrites `parent`'s sibling list to hold exactly `children`, in order.
    ///
    /// `children` must be a permutation of `parent`'s current descendants.
    pub(crate) fn relink_children(&mut self, parent: NodeId, children: &[NodeId]) {
        let mut prev = None;
        for &child in children {
            self[child].prev = prev;
            self[child].next = None;
            if let Some(prev) = prev {
                self[prev].next = Some(child);
            }
            prev = Some(child);
        }
        self[parent].first_child = children.first().copied();
    }

    /// Puts `replacement` at the sibling position of `old`, taking over
    /// `old`'s ancestor and siblings. `old` is left detached.
    pub(crate) fn splice(&mut self, old: NodeId, replacement: NodeId) {
        let (ancestor, prev, next) = {
            let node = &mut self[old];
            (node.ancestor.take(), node.prev.take(), node.next.take())
        };
        self[replacement].ancestor = ancestor;
        self[replacement].prev = prev;
        self[replacement].next = next;

        if let Some(prev) = prev {
            self[prev].next = Some(replacement);
        }
        if let Some(next) = next {
            self[next].prev = Some(replacement);
        }
        if let Some(ancestor) = ancestor {
            if self[ancestor].first_child == Some(old) {
                self[ancestor].first_child = Some(replacement);
            }
        }
    }

    /// Returns the nodes of the subtree rooted at `root` in preorder,
    /// walking sibling and ancestor links without recursion.
    ///
    /// # Errors
    /// [PhyError::InvalidGraph] if the links contain a cycle.
    pub(crate) fn preorder_from(&self, root: NodeId) -> Result<Vec<NodeId>, PhyError> {
        let mut order = Vec::new();
        let mut current = Some(root);

        while let Some(id) = current {
            if order.len() >= self.nodes.len() {
                return Err(PhyError::InvalidGraph(
                    "sibling/descendant links contain a cycle".to_string(),
                ));
            }
            order.push(id);

            current = match self[id].first_child {
                Some(child) => Some(child),
                None => self.next_after_subtree(id, root),
            };
        }

        Ok(order)
    }

    /// Climbs from a boundary tip to the first ancestor (up to `root`)
    /// that has a next sibling and returns that sibling.
    fn next_after_subtree(&self, tip: NodeId, root: NodeId) -> Option<NodeId> {
        let mut p = tip;
        loop {
            if p == root {
                return None;
            }
            if let Some(next) = self[p].next {
                return Some(next);
            }
            p = self[p].ancestor?;
        }
    }

    /// Moves the nodes listed in `order` into a new arena, slot `i` holding
    /// `order[i]`, and rewrites all links. Nodes not in `order` are dropped.
    ///
    /// Every link of a listed node must point to another listed node.
    pub(crate) fn compact(self, order: &[NodeId]) -> NodeGraph {
        const UNMAPPED: usize = usize::MAX;

        let mut remap = vec![UNMAPPED; self.nodes.len()];
        for (slot, id) in order.iter().enumerate() {
            remap[id.0] = slot;
        }
        let map = |link: Option<NodeId>| -> Option<NodeId> {
            link.and_then(|id| match remap[id.0] {
                UNMAPPED => None,
                slot => Some(NodeId(slot)),
            })
        };

        let mut old: Vec<Option<Node>> = self.nodes.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            if let Some(mut node) = old[id.0].take() {
                node.first_child = map(node.first_child);
                node.next = map(node.next);
                node.prev = map(node.prev);
                node.ancestor = map(node.ancestor);
                node.last_visit = None;
                nodes.push(node);
            }
        }

        NodeGraph { nodes }
    }
}

impl Index<NodeId> for NodeGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

/// Iterator over the immediate descendants of a node.
///
/// Created by [NodeGraph::children] and [Tree::children].
pub struct Children<'a> {
    graph: &'a NodeGraph,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.graph[id].next;
        Some(id)
    }
}
