use phylocore::{ErrorKind, NodeId, Order, Tree, Visit, parse_newick_str};
use std::collections::BTreeSet;

const SCENARIO: &str = "((A:1,B:2)N1:3,(C:1,D:1)N2:1);";
const LARGER: &str = "((A:1,(B:1,C:2)BC:1,D:3)X:2,((E:1,F:1)EF:1,(G:2,H:2,I:2)GHI:1)Y:0.5,J:4)R;";

fn node(tree: &Tree, label: &str) -> NodeId {
    tree.find(label).unwrap()
}

fn label(tree: &Tree, id: NodeId) -> &str {
    tree.node(id).label().unwrap_or("")
}

/// Path length between two nodes.
fn distance(tree: &Tree, a: NodeId, b: NodeId) -> f64 {
    let ages = tree.node_ages();
    let age = |id: NodeId| ages[tree.node(id).index().unwrap()];
    age(a) + age(b) - 2.0 * age(tree.mrca(a, b))
}

/// Nontrivial splits of the tip set, each given by the side that does not
/// contain the alphabetically first tip.
fn splits(tree: &Tree) -> BTreeSet<Vec<String>> {
    let mut all: Vec<String> = tree.tip_labels().into_iter().flatten().map(String::from).collect();
    all.sort();
    let reference = all[0].clone();

    let mut splits = BTreeSet::new();
    for &id in tree.nodes_preorder() {
        if id == tree.root() {
            continue;
        }
        let mut below: Vec<String> = tree
            .traverse(id, Visit::All, Order::Preorder)
            .filter(|&n| tree.node(n).is_tip())
            .map(|n| label(tree, n).to_string())
            .collect();
        if below.contains(&reference) {
            below = all.iter().filter(|t| !below.contains(*t)).cloned().collect();
        }
        below.sort();
        if below.len() > 1 && below.len() < all.len() - 1 {
            splits.insert(below);
        }
    }
    splits
}

fn total_length(tree: &Tree) -> f64 {
    tree.branch_lengths().iter().sum()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// --- TESTS ANCESTRY ---
#[test]
fn test_mrca() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let (a, b, c) = (node(&tree, "A"), node(&tree, "B"), node(&tree, "C"));
    let n1 = node(&tree, "N1");

    assert_eq!(tree.mrca(a, b), n1);
    assert_eq!(tree.mrca(b, a), n1);
    assert_eq!(tree.mrca(a, c), tree.root());
    assert_eq!(tree.mrca(a, a), a);
    assert_eq!(tree.mrca(n1, a), n1);
    assert_eq!(tree.mrca(a, n1), n1);
}

#[test]
fn test_spanning_pair() {
    let tree = parse_newick_str("((A,B)N1,(C,(D,E)N3)N2)R;").unwrap();

    assert_eq!(tree.spanning_pair(node(&tree, "N2")), (Some("C"), Some("E")));
    assert_eq!(tree.spanning_pair(tree.root()), (Some("A"), Some("E")));
    assert_eq!(tree.spanning_pair(node(&tree, "D")), (Some("D"), Some("D")));
    assert_eq!(tree.spanning_index(node(&tree, "N2")), (2, 4));

    let (left, right) = tree.spanning_tips(node(&tree, "N1"));
    assert_eq!(tree.mrca(left, right), node(&tree, "N1"));
}

// --- TESTS EXTRACTION ---
#[test]
fn test_extract_clade() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let clade = tree.extract_clade(node(&tree, "N1")).unwrap();
    assert_eq!(clade.to_newick(), "(A:1,B:2)N1;");
    assert_eq!(clade.ntip(), 2);
    assert_eq!(clade.node(clade.root()).branch_length(), 0.0);

    // Source is untouched
    assert_eq!(tree.to_newick(), SCENARIO);

    let error = tree.extract_clade(node(&tree, "A")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unifurcation);
}

#[test]
fn test_extract_subtree_drops_tip() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let keep = [node(&tree, "B"), node(&tree, "C"), node(&tree, "D")];
    let subtree = tree.extract_subtree(&keep).unwrap();

    // N1 is left with B only and is spliced out: 2 + 3
    assert_eq!(subtree.to_newick(), "(B:5,(C:1,D:1)N2:1);");
    assert_eq!(subtree.ntip(), 3);
    assert_eq!(subtree.nnode(), 5);
}

#[test]
fn test_extract_subtree_collapses_root() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let subtree = tree.extract_subtree(&[node(&tree, "C"), node(&tree, "D")]).unwrap();
    assert_eq!(subtree.to_newick(), "(C:1,D:1)N2;");
    assert_eq!(subtree.node(subtree.root()).index(), Some(2));

    let subtree = tree.extract_subtree(&[node(&tree, "C"), node(&tree, "A")]).unwrap();
    assert_eq!(subtree.to_newick(), "(A:4,C:2);");
}

#[test]
fn test_extract_subtree_conserves_path_lengths() {
    let tree = parse_newick_str(LARGER).unwrap();
    let names = ["B", "D", "F", "H", "I", "J"];
    let keep: Vec<NodeId> = names.iter().map(|n| node(&tree, n)).collect();
    let subtree = tree.extract_subtree(&keep).unwrap();

    assert_eq!(subtree.ntip(), names.len());
    for &id in subtree.nodes_preorder() {
        assert_ne!(subtree.node(id).ndesc(), 1);
    }
    for x in names {
        for y in names {
            assert_close(
                distance(&subtree, node(&subtree, x), node(&subtree, y)),
                distance(&tree, node(&tree, x), node(&tree, y)),
            );
        }
    }
}

#[test]
fn test_extract_subtree_needs_two_tips() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    assert_eq!(tree.extract_subtree(&[]).unwrap_err().kind(), ErrorKind::InvalidGraph);
    let a = node(&tree, "A");
    assert_eq!(tree.extract_subtree(&[a]).unwrap_err().kind(), ErrorKind::InvalidGraph);
    assert_eq!(tree.extract_subtree(&[a, a]).unwrap_err().kind(), ErrorKind::InvalidGraph);
}

// --- TESTS ROOTING ---
#[test]
fn test_reroot_rooted_tree() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let rerooted = tree.reroot(node(&tree, "C")).unwrap();

    assert_eq!(rerooted.to_newick(), "(C:0.5,(D:1,(A:1,B:2)N1:4)N2:0.5);");
    assert_eq!(rerooted.nnode(), tree.nnode());
    assert_eq!(rerooted.ntip(), tree.ntip());
    assert_eq!(splits(&rerooted), splits(&tree));
    assert_close(total_length(&rerooted), total_length(&tree));
}

#[test]
fn test_reroot_next_to_old_root() {
    let tree = parse_newick_str(SCENARIO).unwrap();
    let rerooted = tree.reroot(node(&tree, "N1")).unwrap();
    assert_eq!(rerooted.to_newick(), "((A:1,B:2)N1:1.5,(C:1,D:1)N2:2.5);");
    assert_eq!(rerooted.nnode(), tree.nnode());
}

#[test]
fn test_reroot_unrooted_tree() {
    let tree = parse_newick_str("((A:1,B:1)N1:2,C:1,D:1)N0;").unwrap();
    let rerooted = tree.reroot(node(&tree, "A")).unwrap();

    assert_eq!(rerooted.to_newick(), "(A:0.5,(B:1,(C:1,D:1)N0:2)N1:0.5);");
    assert_eq!(rerooted.nnode(), tree.nnode() + 1);
    assert!(rerooted.is_rooted());
    assert_eq!(splits(&rerooted), splits(&tree));
    assert_close(total_length(&rerooted), total_length(&tree));
}

#[test]
fn test_reroot_preserves_splits_everywhere() {
    let tree = parse_newick_str(LARGER).unwrap();
    let expected = splits(&tree);

    for &id in tree.nodes_preorder() {
        let rerooted = tree.reroot(id).unwrap();
        assert_eq!(splits(&rerooted), expected, "rerooted on {}", label(&tree, id));
        assert_eq!(rerooted.ntip(), tree.ntip());
        assert_close(total_length(&rerooted), total_length(&tree));

        // Rerooting back on the old root's split restores the splits
        let back = rerooted.reroot(node(&rerooted, "X")).unwrap();
        assert_eq!(splits(&back), expected);
    }
}

#[test]
fn test_reroot_on_root_copies() {
    let tree = parse_newick_str(LARGER).unwrap();
    let rerooted = tree.reroot(tree.root()).unwrap();
    assert_eq!(rerooted.to_newick(), tree.to_newick());
}

#[test]
fn test_unroot() {
    let tree = parse_newick_str("((A:1,B:1)N1:2,C:3);").unwrap();
    let unrooted = tree.unroot().unwrap().unwrap();

    assert_eq!(unrooted.to_newick(), "(A:1,B:1,C:5)N1;");
    assert_eq!(unrooted.nnode(), tree.nnode() - 1);
    assert!(!unrooted.is_rooted());
    assert_close(total_length(&unrooted), total_length(&tree));

    // Nothing to do
    assert!(unrooted.unroot().unwrap().is_none());
    assert!(parse_newick_str("(A,B);").unwrap().unroot().unwrap().is_none());
}

#[test]
fn test_unroot_picks_internal_child() {
    let tree = parse_newick_str("(C:3,(A:1,B:1)N1:2);").unwrap();
    let unrooted = tree.unroot().unwrap().unwrap();
    assert_eq!(unrooted.to_newick(), "(A:1,B:1,C:5)N1;");

    let tree = parse_newick_str(SCENARIO).unwrap();
    let unrooted = tree.unroot().unwrap().unwrap();
    assert_eq!(unrooted.to_newick(), "(A:1,B:2,(C:1,D:1)N2:4)N1;");
    assert_eq!(splits(&unrooted), splits(&tree));
}

// --- TESTS REORDERING ---
#[test]
fn test_ladderize() {
    let mut tree = parse_newick_str("(((A,B)X,C)Y,D);").unwrap();
    let perm = tree.ladderize();
    assert_eq!(tree.to_newick(), "(D,(C,(A,B)X)Y);");

    // Old indices: A0 B1 C2 D3 root4 Y5 X6
    // New indices: D0 C1 A2 B3 root4 Y5 X6
    assert_eq!(perm, vec![3, 2, 0, 1, 4, 5, 6]);
    assert_eq!(tree.tip_labels(), vec![Some("D"), Some("C"), Some("A"), Some("B")]);
}

#[test]
fn test_ladderize_is_stable() {
    let mut tree = parse_newick_str(SCENARIO).unwrap();
    let perm = tree.ladderize();
    assert_eq!(tree.to_newick(), SCENARIO);
    assert_eq!(perm, (0..7).collect::<Vec<_>>());

    let mut tree = parse_newick_str("((A,B)P,C,(D,E)Q,F)R;").unwrap();
    tree.ladderize();
    assert_eq!(tree.to_newick(), "(C,F,(A,B)P,(D,E)Q)R;");
}

#[test]
fn test_ladderize_by_subtree_size() {
    let mut tree = parse_newick_str("((A,B,C)X,(D,E)Y);").unwrap();
    tree.ladderize();
    assert_eq!(tree.to_newick(), "((D,E)Y,(A,B,C)X);");

    // X and Z both have two descendants but hold two and three tips
    let expected = "((A,B)X,(E,(C,D)Y)Z);";
    for newick in ["((A,B)X,((C,D)Y,E)Z);", "(((C,D)Y,E)Z,(A,B)X);"] {
        let mut tree = parse_newick_str(newick).unwrap();
        tree.ladderize();
        assert_eq!(tree.to_newick(), expected, "ladderizing {newick}");
        assert_eq!(tree.tip_labels(), vec![Some("A"), Some("B"), Some("E"), Some("C"), Some("D")]);
    }

    // Old indices: C0 D1 E2 A3 B4 root5 Z6 Y7 X8
    // New indices: A0 B1 E2 C3 D4 root5 X6 Z7 Y8
    let mut tree = parse_newick_str("(((C,D)Y,E)Z,(A,B)X);").unwrap();
    assert_eq!(tree.ladderize(), vec![3, 4, 2, 0, 1, 5, 8, 6, 7]);
}

#[test]
fn test_rotate() {
    let mut tree = parse_newick_str(SCENARIO).unwrap();
    let n1 = node(&tree, "N1");
    let a = node(&tree, "A");

    tree.rotate(&[tree.root()]);
    assert_eq!(tree.to_newick(), "((C:1,D:1)N2:1,(A:1,B:2)N1:3);");
    assert_eq!(tree.tip_labels(), vec![Some("C"), Some("D"), Some("A"), Some("B")]);

    // Handles stay valid
    tree.rotate(&[n1, a]);
    assert_eq!(tree.to_newick(), "((C:1,D:1)N2:1,(B:2,A:1)N1:3);");
    assert_eq!(tree.node(a).index(), Some(3));
    assert_eq!(tree.node(n1).index(), Some(6));
}

#[test]
fn test_rotate_multifurcation() {
    let mut tree = parse_newick_str("(A,B,C,D,E);").unwrap();
    tree.rotate(&[tree.root()]);
    assert_eq!(tree.to_newick(), "(E,D,C,B,A);");
}

#[test]
fn test_swap() {
    let mut tree = parse_newick_str("(A,B,C,D);").unwrap();
    let (a, b, c, d) = (node(&tree, "A"), node(&tree, "B"), node(&tree, "C"), node(&tree, "D"));

    assert!(tree.swap(a, c));
    assert_eq!(tree.to_newick(), "(C,B,A,D);");
    assert_eq!(tree.node(c).index(), Some(0));

    // Adjacent siblings
    assert!(tree.swap(a, d));
    assert!(tree.swap(b, c));
    assert_eq!(tree.to_newick(), "(B,C,D,A);");
    assert_eq!(tree.tip_labels(), vec![Some("B"), Some("C"), Some("D"), Some("A")]);

    // Not siblings or the same node
    assert!(!tree.swap(a, a));
    assert!(!tree.swap(a, tree.root()));
    assert_eq!(tree.to_newick(), "(B,C,D,A);");
}

#[test]
fn test_swap_requires_same_ancestor() {
    let mut tree = parse_newick_str(SCENARIO).unwrap();
    let (a, c) = (node(&tree, "A"), node(&tree, "C"));
    assert!(!tree.swap(a, c));
    assert_eq!(tree.to_newick(), SCENARIO);

    let (n1, n2) = (node(&tree, "N1"), node(&tree, "N2"));
    assert!(tree.swap(n2, n1));
    assert_eq!(tree.to_newick(), "((C:1,D:1)N2:1,(A:1,B:2)N1:3);");
}
