use criterion::{Criterion, criterion_group, criterion_main};
use phylocore::newick::parse_str;
use phylocore::{Order, Visit};
use std::hint::black_box;

const TREE_SIZES: &[(&str, usize)] = &[("n128", 128), ("n1024", 1024)];

/// Balanced binary tree over `ntip` tips with labels and lengths.
fn balanced_newick(ntip: usize) -> String {
    fn clade(out: &mut String, first: usize, count: usize) {
        if count == 1 {
            out.push_str(&format!("t{first}:0.1"));
            return;
        }
        let half = count / 2;
        out.push('(');
        clade(out, first, half);
        out.push(',');
        clade(out, first + half, count - half);
        out.push_str("):0.05");
    }

    let mut out = String::new();
    let half = ntip / 2;
    out.push('(');
    clade(&mut out, 0, half);
    out.push(',');
    clade(&mut out, half, ntip - half);
    out.push_str(");");
    out
}

/// Caterpillar tree over `ntip` tips, the worst case for depth.
fn caterpillar_newick(ntip: usize) -> String {
    let mut out = "(".repeat(ntip - 1);
    out.push_str("t0:1");
    for i in 1..ntip {
        out.push_str(&format!(",t{i}:1):1"));
    }
    // Root carries no length
    out.truncate(out.len() - 2);
    out.push(';');
    out
}

fn newick_io(c: &mut Criterion) {
    for (name, ntip) in TREE_SIZES {
        let balanced = balanced_newick(*ntip);
        c.bench_function(&format!("parse balanced {name}"), |b| {
            b.iter(|| parse_str(black_box(&balanced)).unwrap());
        });

        let caterpillar = caterpillar_newick(*ntip);
        c.bench_function(&format!("parse caterpillar {name}"), |b| {
            b.iter(|| parse_str(black_box(&caterpillar)).unwrap());
        });

        let tree = parse_str(&balanced).unwrap();
        c.bench_function(&format!("write balanced {name}"), |b| {
            b.iter(|| black_box(tree.to_newick()));
        });
    }
}

fn tree_algorithms(c: &mut Criterion) {
    for (name, ntip) in TREE_SIZES {
        let tree = parse_str(caterpillar_newick(*ntip)).unwrap();
        let root = tree.root();

        c.bench_function(&format!("postorder {name}"), |b| {
            b.iter(|| tree.traverse(root, Visit::All, Order::Postorder).count());
        });

        c.bench_function(&format!("ladderize {name}"), |b| {
            b.iter_batched(
                || tree.duplicate().unwrap(),
                |mut copy| copy.ladderize(),
                criterion::BatchSize::SmallInput,
            );
        });

        let deep_tip = tree.find("t0").unwrap();
        c.bench_function(&format!("reroot {name}"), |b| {
            b.iter(|| tree.reroot(black_box(deep_tip)).unwrap());
        });
    }
}

criterion_group!(regression, newick_io);
criterion_group! {
    name = algorithms;
    config = Criterion::default().sample_size(20);
    targets = tree_algorithms
}
criterion_main!(regression, algorithms);
