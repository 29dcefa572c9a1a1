use crate::error::{PhyError, Result};
use crate::model::{NodeGraph, NodeId, Tree};
use crate::newick;

impl Tree {
    /// Returns the subtree of `node` as a new tree whose root has branch
    /// length 0.
    ///
    /// # Errors
    /// [PhyError::Unifurcation] if `node` is a tip, as a single tip is not a tree.
    pub fn extract_clade(&self, node: NodeId) -> Result<Tree> {
        let mut clade = newick::parse_str(newick::to_newick(self, node))?;
        let root = clade.root();
        clade.node_mut(root).set_branch_length(0.0);

        log::debug!(
            "Extracted clade with {} tips below node {:?}",
            clade.ntip(),
            self.node(node).index()
        );
        Ok(clade)
    }

    /// Returns the smallest tree connecting the given tips.
    ///
    /// Every requested tip and all its ancestors are copied (label and
    /// branch length; the root without either), then every copied node left
    /// with a single descendant is spliced out, its branch length added to
    /// the descendant's. Path lengths between kept tips are conserved. If the
    /// root keeps a single descendant, that descendant becomes the root with
    /// branch length 0.
    ///
    /// # Errors
    /// [PhyError::InvalidGraph] if fewer than two distinct tips are given.
    pub fn extract_subtree(&self, tips: &[NodeId]) -> Result<Tree> {
        if tips.is_empty() {
            return Err(PhyError::InvalidGraph("no tips to extract".to_string()));
        }

        // Mark tips and their ancestors
        let mut marked = vec![false; self.nnode()];
        for &tip in tips {
            let mut p = Some(tip);
            while let Some(id) = p {
                let index = self.node(id).index;
                if marked[index] {
                    break;
                }
                marked[index] = true;
                p = self.node(id).ancestor();
            }
        }

        // Copy marked nodes in preorder, so every ancestor is copied first
        let mut graph = NodeGraph::new();
        let mut copies: Vec<Option<NodeId>> = vec![None; self.nnode()];
        let mut order = Vec::new();
        let mut root = None;
        for &id in self.nodes_preorder() {
            let node = self.node(id);
            if !marked[node.index] {
                continue;
            }

            let copy = graph.alloc();
            match node.ancestor().and_then(|a| copies[self.node(a).index]) {
                Some(parent) => {
                    graph[copy].label = node.label.clone();
                    graph[copy].branch_length = node.branch_length;
                    graph.add_child(parent, copy);
                }
                None => root = Some(copy),
            }
            copies[node.index] = Some(copy);
            order.push(copy);
        }
        let Some(mut root) = root else {
            return Err(PhyError::InvalidGraph("no tips to extract".to_string()));
        };

        let ntip = order.iter().filter(|&&id| graph[id].is_tip()).count();
        let mut nnode = order.len();

        // Collapse unifurcations
        for &id in &order {
            let mut p = id;
            while graph[p].ndesc == 1 {
                let Some(child) = graph[p].first_child else { break };
                graph.prune(p, child);
                graph.splice(p, child);
                graph[child].branch_length += graph[p].branch_length;
                if p == root {
                    root = child;
                    graph[child].branch_length = 0.0;
                }
                nnode -= 1;
                p = child;
            }
        }

        log::debug!("Extracted subtree with {} tips and {} nodes", ntip, nnode);
        Tree::build(graph, root, nnode, ntip)
    }
}
