//! Newick serialization of trees and clades.

use crate::model::{Node, NodeId, Tree};
use crate::newick::defs::BUFFER_CHARS;

/// Returns the Newick representation of the subtree of `node`, terminated
/// by `;`.
///
/// Internal nodes are written as `(child,child,...)`, followed for every
/// node by its label (if non-empty), its note in brackets (if non-empty)
/// and `:length` (if the branch length is positive). Lengths use the
/// shortest representation that reads back to the same `f64`.
///
/// The walk is iterative, so arbitrarily deep trees do not exhaust the stack.
///
/// # Example
/// ```
/// use phylocore::newick;
///
/// let tree = newick::parse_str("((A:1.0,B:1)N1[support=97]:0.50,C:1.5);").unwrap();
/// assert_eq!(newick::to_newick(&tree, tree.root()), "((A:1,B:1)N1[support=97]:0.5,C:1.5);");
///
/// let n1 = tree.find("N1").unwrap();
/// assert_eq!(newick::to_newick(&tree, n1), "(A:1,B:1)N1[support=97]:0.5;");
/// ```
pub fn to_newick(tree: &Tree, node: NodeId) -> String {
    /// Entering a node writes `(` or the tip; leaving writes `)` and the info
    enum Step {
        Enter(NodeId),
        Leave(NodeId),
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    let mut stack = vec![Step::Enter(node)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                let current = tree.node(id);
                if id != node && current.prev_sibling().is_some() {
                    newick.push(',');
                }

                if current.is_tip() {
                    write_node_info(&mut newick, current);
                    continue;
                }

                newick.push('(');
                stack.push(Step::Leave(id));
                // Push right to left so the leftmost child is popped first
                let mut child = tree.last_child(id);
                while let Some(c) = child {
                    stack.push(Step::Enter(c));
                    child = tree.node(c).prev_sibling();
                }
            }
            Step::Leave(id) => {
                newick.push(')');
                write_node_info(&mut newick, tree.node(id));
            }
        }
    }

    newick.push(';');
    newick
}

/// Writes label, note and branch length of a node.
fn write_node_info(newick: &mut String, node: &Node) {
    if let Some(label) = node.label().filter(|l| !l.is_empty()) {
        newick.push_str(label);
    }
    if let Some(note) = node.note().filter(|n| !n.is_empty()) {
        newick.push('[');
        newick.push_str(note);
        newick.push(']');
    }
    if node.branch_length() > 0.0 {
        newick.push(':');
        newick.push_str(&node.branch_length().to_string());
    }
}

/// Estimates the length of the Newick string of a tree, to pre-allocate
/// the output.
pub(crate) fn estimate_newick_len(tree: &Tree) -> usize {
    // Each internal node: "(,)" ~= 3 chars
    const INTERNAL_NODE_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;
    // Labels: rough guess per tip
    const LABEL_CHARS: usize = 10;

    let num_internal = tree.nnode() - tree.ntip();
    num_internal * INTERNAL_NODE_CHARS
        + tree.ntip() * LABEL_CHARS
        + tree.nnode() * BRANCH_LENGTH_CHARS
        + BUFFER_CHARS
}
