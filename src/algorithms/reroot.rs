use crate::error::Result;
use crate::model::{NodeId, Tree};

impl Tree {
    /// Returns a copy of this tree rooted on the branch above `node`.
    ///
    /// The branch above `node` is split in half by a new root. Every edge on
    /// the path from `node` to the old root is reversed; each former ancestor
    /// takes the branch length of the edge that led to it. If this tree is
    /// rooted, the old root is removed and its two branches are merged, so
    /// the node count stays the same. If it is unrooted, the new root adds
    /// one node.
    ///
    /// Rerooting on the root returns an unchanged copy.
    ///
    /// # Errors
    /// Any error of [duplicate](Self::duplicate).
    ///
    /// # Example
    /// ```
    /// use phylocore::newick;
    ///
    /// let tree = newick::parse_str("((A:1,B:1)N1:2,C:1,D:1)N0;").unwrap();
    /// let a = tree.find("A").unwrap();
    /// let rerooted = tree.reroot(a).unwrap();
    /// assert_eq!(rerooted.to_newick(), "(A:0.5,(B:1,(C:1,D:1)N0:2)N1:0.5);");
    /// ```
    pub fn reroot(&self, node: NodeId) -> Result<Tree> {
        let rooted = self.is_rooted();
        let (a, b) = self.spanning_index(node);
        let nnode = if rooted { self.nnode() } else { self.nnode() + 1 };
        let ntip = self.ntip();

        let copy = self.duplicate()?;
        let (Some(a), Some(b)) = (copy.node_by_index(a), copy.node_by_index(b)) else {
            return Ok(copy);
        };
        let root_on = copy.mrca(a, b);
        let Some(parent) = copy.node(root_on).ancestor() else {
            return Ok(copy);
        };

        let (mut graph, old_root) = copy.into_graph();

        // Split the branch above root_on with the new root
        let mut length = graph[root_on].branch_length / 2.0;
        graph.prune(parent, root_on);
        let root = graph.alloc();
        graph.add_child(root, root_on);
        graph[root_on].branch_length = length;

        // Detach the path from parent up to the old root, bottom to top
        let mut path = vec![parent];
        let mut p = parent;
        while let Some(ancestor) = graph[p].ancestor {
            graph.prune(ancestor, p);
            path.push(ancestor);
            p = ancestor;
        }

        if rooted {
            // The old root has a single child left; bypass the old root
            let remaining = graph[old_root].first_child;
            path.pop();
            if let Some(other) = remaining.and_then(|c| graph.prune(old_root, c)) {
                match path.last() {
                    Some(&below) => {
                        graph.add_child(below, other);
                        graph[other].branch_length += graph[below].branch_length;
                    }
                    None => {
                        length += graph[other].branch_length;
                        path.push(other);
                    }
                }
            }
        }

        // Reverse the edges top-down: each upper node becomes a child of the
        // node below it and takes over the length of the edge between them
        for i in (1..path.len()).rev() {
            let (lower, upper) = (path[i - 1], path[i]);
            graph.add_child(lower, upper);
            graph[upper].branch_length = graph[lower].branch_length;
        }

        if let Some(&top) = path.first() {
            graph.add_child(root, top);
            graph[top].branch_length = length;
        }

        log::debug!(
            "Rerooted {} tree on node {:?} ({} nodes)",
            if rooted { "rooted" } else { "unrooted" },
            self.node(node).index(),
            nnode
        );
        Tree::build(graph, root, nnode, ntip)
    }

    /// Returns a copy of this tree with the root bifurcation turned into a
    /// basal polytomy, or `None` if the tree is unrooted already.
    ///
    /// The first internal descendant of the root becomes the new root; the
    /// other descendant is attached below it, taking over both branch
    /// lengths. A tree of two tips cannot be unrooted and yields `None`.
    ///
    /// # Errors
    /// Any error of [duplicate](Self::duplicate).
    ///
    /// # Example
    /// ```
    /// use phylocore::newick;
    ///
    /// let tree = newick::parse_str("((A:1,B:1)N1:2,C:3);").unwrap();
    /// let unrooted = tree.unroot().unwrap().unwrap();
    /// assert_eq!(unrooted.to_newick(), "(A:1,B:1,C:5)N1;");
    /// assert!(unrooted.unroot().unwrap().is_none());
    /// ```
    pub fn unroot(&self) -> Result<Option<Tree>> {
        if !self.is_rooted() {
            return Ok(None);
        }

        let copy = self.duplicate()?;
        let root = copy.root();
        let children: Vec<NodeId> = copy.children(root).collect();
        let Some(&new_root) = children.iter().find(|&&c| copy.node(c).is_internal()) else {
            log::debug!("Cannot unroot a tree without internal root descendants");
            return Ok(None);
        };
        let nnode = copy.nnode() - 1;
        let ntip = copy.ntip();

        let (mut graph, _) = copy.into_graph();
        for &child in &children {
            graph.prune(root, child);
        }
        for &child in children.iter().filter(|&&c| c != new_root) {
            graph[child].branch_length += graph[new_root].branch_length;
            graph.add_child(new_root, child);
        }
        graph[new_root].branch_length = 0.0;

        log::debug!("Unrooted tree ({} nodes)", nnode);
        Tree::build(graph, new_root, nnode, ntip).map(Some)
    }
}
