//! Indexed phylogenetic tree built from a [NodeGraph].
//!
//! A [Tree] owns its nodes in an arena and keeps three lookup arrays that
//! are refreshed whenever the tree is built or reordered:
//! - all nodes in preorder,
//! - internal nodes in preorder, position `k` holding index `ntip + k`,
//! - the position of each index in the preorder array.
//!
//! Tips are indexed `0..ntip` in the order they are met in preorder,
//! internal nodes `ntip..nnode`; the root always receives index `ntip`.

use crate::error::{PhyError, Result};
use crate::model::cursor::{Cursor, Order, Traversal, Visit};
use crate::model::graph::{Children, NodeGraph};
use crate::model::node::{Node, NodeId};
use crate::newick;
use std::fmt;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted or unrooted, bifurcating or multifurcating phylogeny.
///
/// Trees are created by [Tree::build] or by the [Newick parser](crate::newick).
/// There is no `Clone`; use [Tree::duplicate] to obtain an independent copy.
#[derive(Debug)]
pub struct Tree {
    graph: NodeGraph,
    ntip: usize,
    nnode: usize,
    root: NodeId,
    nodes: Vec<NodeId>,
    internal_nodes: Vec<NodeId>,
    index_to_position: Vec<usize>,
    cursor: Cursor,
}

impl Tree {
    /// Builds a tree from the nodes reachable from `root`.
    ///
    /// Reachable nodes are moved into a fresh, compact arena (so handles into
    /// `graph` are not valid for the returned tree) and receive their
    /// canonical indices. Unreachable nodes are dropped.
    ///
    /// # Arguments
    /// * `graph` - Arena holding the linked nodes
    /// * `root` - The node to become the root
    /// * `nnode` - Number of nodes reachable from `root`
    /// * `ntip` - Number of tips reachable from `root`
    ///
    /// # Errors
    /// * [PhyError::InvalidGraph] if `root` has an ancestor or siblings, the
    ///   counts do not match, a node has exactly one descendant, or a
    ///   descendant count disagrees with the sibling list
    /// * [PhyError::AllocationFailure] if the lookup arrays cannot be allocated
    pub fn build(graph: NodeGraph, root: NodeId, nnode: usize, ntip: usize) -> Result<Tree> {
        let order = validate(&graph, root, nnode, ntip)?;
        let graph = graph.compact(&order);

        let mut tree = Tree {
            graph,
            ntip,
            nnode,
            root: NodeId(0),
            nodes: try_filled(nnode, NodeId(0))?,
            internal_nodes: try_filled(nnode - ntip, NodeId(0))?,
            index_to_position: try_filled(nnode, 0)?,
            cursor: Cursor::new(),
        };
        tree.reindex(None);

        log::debug!("Built tree with {} nodes ({} tips)", nnode, ntip);
        Ok(tree)
    }

    /// Reassigns indices and refills the lookup arrays with one preorder walk
    /// over the current links. Node counts must not have changed.
    ///
    /// If `perm` is given, `perm[new_index]` is set to the index the node had
    /// before.
    pub(crate) fn reindex(&mut self, mut perm: Option<&mut Vec<usize>>) {
        let mut position = 0;
        let mut next_internal = 0;
        let mut next_tip = 0;
        let mut current = Some(self.root);

        while let Some(id) = current {
            self.nodes[position] = id;

            let node = &mut self.graph[id];
            let old_index = node.index;
            if node.is_internal() {
                node.index = self.ntip + next_internal;
                self.internal_nodes[next_internal] = id;
                next_internal += 1;
            } else {
                node.index = next_tip;
                next_tip += 1;
            }
            let index = node.index;
            self.index_to_position[index] = position;
            position += 1;

            if let Some(perm) = perm.as_deref_mut() {
                perm[index] = old_index;
            }

            current = match (node.first_child, node.next) {
                (Some(child), _) => Some(child),
                (None, Some(next)) => Some(next),
                (None, None) => {
                    // Boundary tip: it is the last visit of every ancestor
                    // whose subtree ends here
                    let mut p = id;
                    while let (Some(ancestor), None) = (self.graph[p].ancestor, self.graph[p].next) {
                        p = ancestor;
                        self.graph[p].last_visit = Some(id);
                    }
                    self.graph[p].next
                }
            };
        }
    }

    // =#========================================================================#=
    // ACCESSORS
    // =#========================================================================#=

    /// Returns the number of tips.
    pub fn ntip(&self) -> usize {
        self.ntip
    }

    /// Returns the number of nodes (tips and internal nodes).
    pub fn nnode(&self) -> usize {
        self.nnode
    }

    /// Returns the root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.graph[id]
    }

    /// Returns the node behind a handle mutably, e.g. to edit its label,
    /// note, branch length or client data. Links cannot be changed this way.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.graph[id]
    }

    /// Returns the node with the given canonical index.
    pub fn node_by_index(&self, index: usize) -> Option<NodeId> {
        let position = *self.index_to_position.get(index)?;
        self.nodes.get(position).copied()
    }

    /// Returns the first node carrying `label`, searching in postorder.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.traverse(self.root, Visit::All, Order::Postorder)
            .find(|&id| self.graph[id].label() == Some(label))
    }

    /// Returns `true` if the root has at most two descendants.
    ///
    /// A basal polytomy (three or more root descendants) marks an unrooted tree.
    pub fn is_rooted(&self) -> bool {
        self.graph[self.root].ndesc <= 2
    }

    /// Returns `true` if every internal node has exactly two descendants.
    pub fn is_binary(&self) -> bool {
        self.nnode + 1 == 2 * self.ntip
    }

    /// Returns the immediate descendants of a node, left to right.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.graph.children(id)
    }

    /// Returns the rightmost immediate descendant of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.graph.last_child(id)
    }

    /// Returns all nodes in preorder.
    pub fn nodes_preorder(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns all internal nodes in preorder; position `k` holds the node
    /// with index `ntip + k`.
    pub fn internal_nodes(&self) -> &[NodeId] {
        &self.internal_nodes
    }

    /// Returns the preorder position of the node with the given index.
    pub(crate) fn position_of(&self, index: usize) -> usize {
        self.index_to_position[index]
    }

    /// Returns the last internal node visited in a preorder walk of the
    /// subtree of the internal node `node`.
    pub(crate) fn last_internal(&self, node: NodeId) -> NodeId {
        let mut current = node;
        loop {
            let bottom = self.graph[current]
                .last_visit
                .and_then(|tip| self.graph[tip].ancestor)
                .unwrap_or(current);
            let last_internal_child = self
                .graph
                .children(bottom)
                .filter(|&child| self.graph[child].is_internal())
                .last();
            match last_internal_child {
                Some(child) => current = child,
                None => return bottom,
            }
        }
    }

    pub(crate) fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    /// Gives up the indexing and returns the arena with the current root.
    pub(crate) fn into_graph(self) -> (NodeGraph, NodeId) {
        (self.graph, self.root)
    }

    // =#========================================================================#=
    // TRAVERSAL
    // =#========================================================================#=

    /// Returns an iterator over the subtree of `node`.
    ///
    /// Only borrows the tree, so several traversals may run at once.
    pub fn traverse(&self, node: NodeId, visit: Visit, order: Order) -> Traversal<'_> {
        Traversal::new(self, node, visit, order)
    }

    /// Prepares the cursor embedded in this tree.
    ///
    /// The embedded cursor supports one walk at a time; use a caller-owned
    /// [Cursor] or [traverse](Self::traverse) for concurrent walks.
    pub fn cursor_prepare(&mut self, node: NodeId, visit: Visit, order: Order) {
        let mut cursor = self.cursor;
        cursor.prepare(self, node, visit, order);
        self.cursor = cursor;
    }

    /// Steps the cursor embedded in this tree.
    pub fn cursor_step(&mut self) -> Option<NodeId> {
        let mut cursor = self.cursor;
        let next = cursor.step(self);
        self.cursor = cursor;
        next
    }

    // =#========================================================================#=
    // SERIALIZATION
    // =#========================================================================#=

    /// Returns the Newick representation of this tree, terminated by `;`.
    pub fn to_newick(&self) -> String {
        newick::to_newick(self, self.root)
    }

    /// Returns an independent copy of this tree by writing and reparsing it.
    ///
    /// Canonical indices carry over; client data does not.
    ///
    /// # Errors
    /// Any [PhyError] the parser reports, e.g. if a label was edited to hold
    /// a character that is not allowed in Newick labels.
    pub fn duplicate(&self) -> Result<Tree> {
        newick::parse_str(self.to_newick())
    }

    // =#========================================================================#=
    // DERIVED QUERIES
    // =#========================================================================#=

    /// Returns the tip labels in index order.
    pub fn tip_labels(&self) -> Vec<Option<&str>> {
        (0..self.ntip)
            .map(|index| self.graph[self.nodes[self.index_to_position[index]]].label())
            .collect()
    }

    /// Returns, per index, the sum of branch lengths from the node up to and
    /// including the root's own branch length.
    pub fn node_ages(&self) -> Vec<f64> {
        let mut ages = vec![0.0; self.nnode];
        for &id in &self.nodes {
            let node = &self.graph[id];
            let above = node.ancestor.map_or(0.0, |a| ages[self.graph[a].index]);
            ages[node.index] = above + node.branch_length;
        }
        ages
    }

    /// Returns `node` and all its ancestors, ending with the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(ancestor) = self.graph[current].ancestor {
            path.push(ancestor);
            current = ancestor;
        }
        path
    }

    /// Returns the indices of the subtree of `node` in walk order.
    pub fn descendants(&self, node: NodeId, visit: Visit, order: Order) -> Vec<usize> {
        self.traverse(node, visit, order)
            .map(|id| self.graph[id].index)
            .collect()
    }

    /// Returns the branch lengths in index order.
    pub fn branch_lengths(&self) -> Vec<f64> {
        self.index_to_position
            .iter()
            .map(|&position| self.graph[self.nodes[position]].branch_length)
            .collect()
    }

    /// Returns the notes in index order.
    pub fn notes(&self) -> Vec<Option<&str>> {
        self.index_to_position
            .iter()
            .map(|&position| self.graph[self.nodes[position]].note())
            .collect()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_newick())
    }
}

// =#========================================================================#=
// BUILD HELPERS
// =#========================================================================#=

/// Checks that the graph below `root` is a tree with the given counts and
/// returns its nodes in preorder.
fn validate(graph: &NodeGraph, root: NodeId, nnode: usize, ntip: usize) -> Result<Vec<NodeId>> {
    let invalid = |reason: String| -> Result<Vec<NodeId>> { Err(PhyError::InvalidGraph(reason)) };

    if root.0 >= graph.len() {
        return invalid(format!("root {:?} is not part of the graph", root));
    }
    let root_node = &graph[root];
    if root_node.ancestor.is_some() || root_node.next.is_some() || root_node.prev.is_some() {
        return invalid("root is attached to an ancestor or siblings".to_string());
    }
    if root_node.ndesc < 2 {
        return invalid(format!("root has {} descendants, expected at least 2", root_node.ndesc));
    }

    let order = graph.preorder_from(root)?;

    let mut tips = 0;
    for &id in &order {
        let node = &graph[id];
        match node.ndesc {
            0 => tips += 1,
            1 => return invalid(format!("node {:?} has a single descendant", id)),
            ndesc => {
                let linked = graph.children(id).count();
                if linked != ndesc {
                    return invalid(format!(
                        "node {:?} counts {} descendants but links {}",
                        id, ndesc, linked
                    ));
                }
            }
        }
    }

    if order.len() != nnode {
        return invalid(format!("expected {} nodes, found {}", nnode, order.len()));
    }
    if tips != ntip {
        return invalid(format!("expected {} tips, found {}", ntip, tips));
    }

    Ok(order)
}

/// Allocates a vector of `len` copies of `fill`, reporting failure instead of
/// aborting.
fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| PhyError::AllocationFailure(len))?;
    slots.resize(len, fill);
    Ok(slots)
}
