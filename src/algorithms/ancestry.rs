use crate::model::{NodeId, Tree};

impl Tree {
    /// Returns the most recent common ancestor of `a` and `b`.
    ///
    /// `mrca(a, a)` is `a`, and if `a` is an ancestor of `b` the result is `a`.
    ///
    /// # Panics
    /// Panics if a handle does not belong to this tree.
    pub fn mrca(&self, a: NodeId, b: NodeId) -> NodeId {
        let mut marked = vec![false; self.nnode()];
        for id in self.ancestors(a) {
            marked[self.node(id).index] = true;
        }

        let mut p = b;
        while !marked[self.node(p).index] {
            match self.node(p).ancestor() {
                Some(ancestor) => p = ancestor,
                None => break,
            }
        }
        p
    }

    /// Returns the tips bounding the subtree of `node`: the tip reached by
    /// following leftmost descendants and the tip visited last in preorder.
    ///
    /// For a tip, both are the tip itself.
    pub fn spanning_tips(&self, node: NodeId) -> (NodeId, NodeId) {
        let mut leftmost = node;
        while let Some(child) = self.node(leftmost).first_child() {
            leftmost = child;
        }
        let last = self.node(node).last_visit().unwrap_or(node);
        (leftmost, last)
    }

    /// Returns the labels of the [spanning tips](Self::spanning_tips) of `node`.
    pub fn spanning_pair(&self, node: NodeId) -> (Option<&str>, Option<&str>) {
        let (a, b) = self.spanning_tips(node);
        (self.node(a).label(), self.node(b).label())
    }

    /// Returns the indices of the [spanning tips](Self::spanning_tips) of `node`.
    ///
    /// Unlike labels, indices identify the tips even if labels are missing
    /// or repeated, and they are preserved by [duplicate](Self::duplicate).
    pub fn spanning_index(&self, node: NodeId) -> (usize, usize) {
        let (a, b) = self.spanning_tips(node);
        (self.node(a).index, self.node(b).index)
    }
}
