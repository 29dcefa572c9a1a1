use phylocore::{Cursor, NodeId, Order, Tree, Visit, parse_newick_str};
use std::collections::HashMap;

const TREE: &str = "((A,B)N1,(C,(D,E)N3)N2)R;";

fn labels(tree: &Tree, nodes: impl Iterator<Item = NodeId>) -> Vec<&str> {
    nodes.map(|id| tree.node(id).label().unwrap()).collect()
}

fn walk<'a>(tree: &'a Tree, label: &str, visit: Visit, order: Order) -> Vec<&'a str> {
    let node = tree.find(label).unwrap();
    labels(tree, tree.traverse(node, visit, order))
}

// --- TESTS WHOLE TREE ---
#[test]
fn test_preorder_all() {
    let tree = parse_newick_str(TREE).unwrap();
    assert_eq!(
        walk(&tree, "R", Visit::All, Order::Preorder),
        vec!["R", "N1", "A", "B", "N2", "C", "N3", "D", "E"]
    );
}

#[test]
fn test_postorder_all() {
    let tree = parse_newick_str(TREE).unwrap();
    assert_eq!(
        walk(&tree, "R", Visit::All, Order::Postorder),
        vec!["E", "D", "N3", "C", "N2", "B", "A", "N1", "R"]
    );
}

#[test]
fn test_internal_only() {
    let tree = parse_newick_str(TREE).unwrap();
    assert_eq!(walk(&tree, "R", Visit::Internal, Order::Preorder), vec!["R", "N1", "N2", "N3"]);
    assert_eq!(walk(&tree, "R", Visit::Internal, Order::Postorder), vec!["N3", "N2", "N1", "R"]);
}

// --- TESTS SUBTREES ---
#[test]
fn test_subtree_walks() {
    let tree = parse_newick_str(TREE).unwrap();
    assert_eq!(walk(&tree, "N2", Visit::All, Order::Preorder), vec!["N2", "C", "N3", "D", "E"]);
    assert_eq!(walk(&tree, "N2", Visit::All, Order::Postorder), vec!["E", "D", "N3", "C", "N2"]);
    assert_eq!(walk(&tree, "N2", Visit::Internal, Order::Preorder), vec!["N2", "N3"]);
    assert_eq!(walk(&tree, "N2", Visit::Internal, Order::Postorder), vec!["N3", "N2"]);
    assert_eq!(walk(&tree, "N1", Visit::Internal, Order::Preorder), vec!["N1"]);
    assert_eq!(walk(&tree, "N1", Visit::All, Order::Postorder), vec!["B", "A", "N1"]);
}

#[test]
fn test_last_internal_node_off_the_rightmost_path() {
    // The last internal node in preorder hangs below the root's first child
    let tree = parse_newick_str("((A,(B,C)X)Y,D,E)R;").unwrap();
    assert_eq!(walk(&tree, "R", Visit::Internal, Order::Preorder), vec!["R", "Y", "X"]);
    assert_eq!(walk(&tree, "R", Visit::Internal, Order::Postorder), vec!["X", "Y", "R"]);

    let tree = parse_newick_str("(((A,B)P,C)Q,((D,E)S,F)T)R;").unwrap();
    assert_eq!(
        walk(&tree, "R", Visit::Internal, Order::Preorder),
        vec!["R", "Q", "P", "T", "S"]
    );
    assert_eq!(walk(&tree, "T", Visit::Internal, Order::Postorder), vec!["S", "T"]);
}

#[test]
fn test_tips() {
    let tree = parse_newick_str(TREE).unwrap();
    assert_eq!(walk(&tree, "D", Visit::All, Order::Preorder), vec!["D"]);
    assert_eq!(walk(&tree, "D", Visit::All, Order::Postorder), vec!["D"]);
    assert!(walk(&tree, "D", Visit::Internal, Order::Preorder).is_empty());
    assert!(walk(&tree, "D", Visit::Internal, Order::Postorder).is_empty());
}

// --- TESTS COMPLETENESS ---
#[test]
fn test_counts_and_postorder_property() {
    let tree = parse_newick_str(
        "(((A,B,C)X,(D,E)Y)Z,(F,(G,(H,(I,J)P)Q)S)T,K,((L,M)U,N)V)R;",
    )
    .unwrap();
    let root = tree.root();

    assert_eq!(tree.traverse(root, Visit::All, Order::Preorder).count(), tree.nnode());
    assert_eq!(tree.traverse(root, Visit::All, Order::Postorder).count(), tree.nnode());
    assert_eq!(
        tree.traverse(root, Visit::Internal, Order::Preorder).count(),
        tree.nnode() - tree.ntip()
    );
    assert_eq!(
        tree.traverse(root, Visit::Internal, Order::Postorder).count(),
        tree.nnode() - tree.ntip()
    );

    // Every node comes after its descendants in postorder
    let position: HashMap<NodeId, usize> = tree
        .traverse(root, Visit::All, Order::Postorder)
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();
    for &id in tree.nodes_preorder() {
        if let Some(ancestor) = tree.node(id).ancestor() {
            assert!(position[&id] < position[&ancestor]);
        }
    }

    // Every internal subtree walk matches the filtered full walk
    for &id in tree.internal_nodes() {
        let filtered: Vec<NodeId> = tree
            .traverse(id, Visit::All, Order::Preorder)
            .filter(|&n| tree.node(n).is_internal())
            .collect();
        let internal: Vec<NodeId> = tree.traverse(id, Visit::Internal, Order::Preorder).collect();
        assert_eq!(internal, filtered);
    }
}

// --- TESTS CURSOR FLAVOURS ---
#[test]
fn test_embedded_cursor() {
    let mut tree = parse_newick_str(TREE).unwrap();
    let root = tree.root();

    tree.cursor_prepare(root, Visit::All, Order::Postorder);
    let mut visited = Vec::new();
    while let Some(id) = tree.cursor_step() {
        visited.push(id);
    }
    let expected: Vec<NodeId> = tree.traverse(root, Visit::All, Order::Postorder).collect();
    assert_eq!(visited, expected);

    // Exhausted cursors stay exhausted
    assert_eq!(tree.cursor_step(), None);
    assert_eq!(tree.cursor_step(), None);

    // Preparing again restarts
    tree.cursor_prepare(root, Visit::Internal, Order::Preorder);
    assert_eq!(tree.cursor_step(), Some(root));
}

#[test]
fn test_owned_cursor() {
    let tree = parse_newick_str(TREE).unwrap();

    let mut cursor = Cursor::new();
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.step(&tree), None);

    let n3 = tree.find("N3").unwrap();
    cursor.prepare(&tree, n3, Visit::All, Order::Preorder);
    assert!(!cursor.is_exhausted());
    let mut visited = Vec::new();
    while let Some(id) = cursor.step(&tree) {
        visited.push(id);
    }
    assert_eq!(labels(&tree, visited.into_iter()), vec!["N3", "D", "E"]);
    assert!(cursor.is_exhausted());
    assert_eq!(Cursor::default().step(&tree), None);
}

#[test]
fn test_concurrent_cursors() {
    let tree = parse_newick_str(
        "(((A:1,B:1)X:1,(C:1,D:1)Y:1)Z:1,((E:1,F:1)U:1,(G:1,H:1)V:1)W:1);",
    )
    .unwrap();
    let expected: Vec<NodeId> = tree.traverse(tree.root(), Visit::All, Order::Postorder).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut cursor = Cursor::new();
                    cursor.prepare(&tree, tree.root(), Visit::All, Order::Postorder);
                    let mut visited = Vec::new();
                    while let Some(id) = cursor.step(&tree) {
                        visited.push(id);
                    }
                    visited
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
