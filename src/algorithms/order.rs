use crate::model::{NodeId, Tree};

impl Tree {
    /// Orders the descendants of every internal node ascending by the number
    /// of tips in their subtrees, keeping ties in their current order, and
    /// reindexes the tree.
    ///
    /// # Returns
    /// The permutation `perm` with `perm[new_index] == old_index`.
    ///
    /// # Example
    /// ```
    /// use phylocore::newick;
    ///
    /// let mut tree = newick::parse_str("((A,B,C)X,D);").unwrap();
    /// let perm = tree.ladderize();
    /// assert_eq!(tree.to_newick(), "(D,(A,B,C)X);");
    /// // D moved from index 3 to index 0
    /// assert_eq!(perm, vec![3, 0, 1, 2, 4, 5]);
    /// ```
    pub fn ladderize(&mut self) -> Vec<usize> {
        // Sizes are keyed by the indices from before reordering
        let sizes = self.subtree_tips();
        let internal_nodes = self.internal_nodes().to_vec();
        for node in internal_nodes {
            let graph = self.graph_mut();
            let mut children: Vec<NodeId> = graph.children(node).collect();
            let before = children.clone();
            children.sort_by_key(|&c| sizes[graph[c].index]);
            if children != before {
                log::trace!("Ladderized descendants of {:?}", graph[node].index());
                graph.relink_children(node, &children);
            }
        }

        let mut perm = vec![0; self.nnode()];
        self.reindex(Some(&mut perm));
        perm
    }

    /// Returns, per index, the number of tips in the node's subtree.
    fn subtree_tips(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.nnode()];
        for &id in self.nodes_preorder().iter().rev() {
            let node = self.node(id);
            if node.is_tip() {
                sizes[node.index] = 1;
            }
            if let Some(ancestor) = node.ancestor() {
                sizes[self.node(ancestor).index] += sizes[node.index];
            }
        }
        sizes
    }

    /// Reverses the order of the descendants of each given node and
    /// reindexes the tree. Tips are left as they are.
    pub fn rotate(&mut self, nodes: &[NodeId]) {
        let graph = self.graph_mut();
        for &node in nodes {
            let mut children: Vec<NodeId> = graph.children(node).collect();
            children.reverse();
            graph.relink_children(node, &children);
        }
        self.reindex(None);
    }

    /// Exchanges the positions of two siblings and reindexes the tree.
    ///
    /// # Returns
    /// `false` (and nothing changes) if `a` and `b` are the same node or do
    /// not share an ancestor.
    pub fn swap(&mut self, a: NodeId, b: NodeId) -> bool {
        let Some(parent) = self.node(a).ancestor() else {
            return false;
        };
        if a == b || self.node(b).ancestor() != Some(parent) {
            return false;
        }

        let graph = self.graph_mut();
        let mut children: Vec<NodeId> = graph.children(parent).collect();
        let (Some(i), Some(j)) = (
            children.iter().position(|&c| c == a),
            children.iter().position(|&c| c == b),
        ) else {
            return false;
        };
        children.swap(i, j);
        graph.relink_children(parent, &children);

        self.reindex(None);
        true
    }
}
