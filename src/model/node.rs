//! Node module for phylogenetic tree representation.

use std::any::Any;
use std::fmt;

/// Handle of a node in a [NodeGraph](crate::model::NodeGraph) arena.
///
/// Handles are navigational only; the arena owns the nodes. A handle stays
/// valid for the lifetime of the tree that owns the node, including across
/// [ladderize](crate::Tree::ladderize) and [rotate](crate::Tree::rotate),
/// but not across a rebuild into a new [Tree](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena slot of this handle.
    pub fn slot(self) -> usize {
        self.0
    }
}

/// Before a tree is built, nodes carry no canonical index.
pub(crate) const NO_INDEX: usize = usize::MAX;

/// Arbitrary data a client attaches to a node.
pub type ClientData = Box<dyn Any + Send + Sync>;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A taxon (tip) or an inferred ancestor (internal node).
///
/// Descendants form a doubly linked sibling list: the node stores its first
/// (leftmost) descendant, every descendant stores its `next` and `prev`
/// siblings and its `ancestor`. All links are [NodeId]s into the owning arena.
///
/// # Invariants (once built into a [Tree](crate::Tree))
/// - tips are indexed `0..ntip`, internal nodes `ntip..nnode`
/// - internal nodes have `ndesc >= 2`
/// - `last_visit` of an internal node is the tip visited last when walking
///   its subtree in preorder
pub struct Node {
    pub(crate) index: usize,
    pub(crate) ndesc: usize,
    pub(crate) label: Option<String>,
    /// Bracketed metadata from the source text, without the brackets
    pub(crate) note: Option<String>,
    /// Length of the edge to the ancestor
    pub(crate) branch_length: f64,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) ancestor: Option<NodeId>,
    pub(crate) last_visit: Option<NodeId>,
    pub(crate) data: Option<ClientData>,
}

impl Node {
    pub(crate) fn new() -> Self {
        Node {
            index: NO_INDEX,
            ndesc: 0,
            label: None,
            note: None,
            branch_length: 0.0,
            first_child: None,
            next: None,
            prev: None,
            ancestor: None,
            last_visit: None,
            data: None,
        }
    }

    /// Returns the canonical index, or `None` if the node has not been
    /// built into a tree yet.
    pub fn index(&self) -> Option<usize> {
        if self.index == NO_INDEX {
            None
        } else {
            Some(self.index)
        }
    }

    /// Returns the number of immediate descendants.
    pub fn ndesc(&self) -> usize {
        self.ndesc
    }

    /// Returns `true` if this node has no descendants.
    pub fn is_tip(&self) -> bool {
        self.ndesc == 0
    }

    /// Returns `true` if this node has descendants.
    pub fn is_internal(&self) -> bool {
        self.ndesc > 0
    }

    /// Returns the label, or `None` if not set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Sets the label.
    pub fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = Some(label.into());
    }

    /// Returns the note, or `None` if not set.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Sets the note (text that is written back inside `[...]`).
    pub fn set_note<S: Into<String>>(&mut self, note: S) {
        self.note = Some(note.into());
    }

    /// Returns the length of the branch subtending this node.
    pub fn branch_length(&self) -> f64 {
        self.branch_length
    }

    /// Sets the length of the branch subtending this node.
    pub fn set_branch_length(&mut self, branch_length: f64) {
        self.branch_length = branch_length;
    }

    /// Returns the leftmost immediate descendant.
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    /// Returns the next sibling.
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }

    /// Returns the previous sibling.
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev
    }

    /// Returns the immediate ancestor (`None` for the root).
    pub fn ancestor(&self) -> Option<NodeId> {
        self.ancestor
    }

    /// Returns the tip visited last in a preorder walk of this node's
    /// subtree, `None` for tips and for nodes not yet built into a tree.
    pub fn last_visit(&self) -> Option<NodeId> {
        self.last_visit
    }

    /// Attaches client data, dropping any data attached before.
    pub fn set_data(&mut self, data: ClientData) {
        self.data = Some(data);
    }

    /// Returns the attached client data if it is of type `T`.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_ref().and_then(|d| d.downcast_ref::<T>())
    }

    /// Returns the attached client data mutably if it is of type `T`.
    pub fn data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.as_mut().and_then(|d| d.downcast_mut::<T>())
    }

    /// Detaches and returns the client data.
    pub fn take_data(&mut self) -> Option<ClientData> {
        self.data.take()
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::new()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index())
            .field("ndesc", &self.ndesc)
            .field("label", &self.label)
            .field("note", &self.note)
            .field("branch_length", &self.branch_length)
            .field("first_child", &self.first_child)
            .field("next", &self.next)
            .field("prev", &self.prev)
            .field("ancestor", &self.ancestor)
            .field("last_visit", &self.last_visit)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}
