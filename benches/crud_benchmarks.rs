use arbolb::BTree;
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;

const N: usize = 10_000;
const DEGREES: [usize; 3] = [2, 6, 32];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG so every run sees the same sequence.
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn build(t: usize, keys: &[i64]) -> BTree<i64> {
    BTree::from_keys(t, keys.iter().copied()).expect("benchmark degrees are valid")
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    for t in DEGREES {
        group.bench_function(BenchmarkId::new(format!("BTree(t={t})"), N), |b| {
            b.iter(|| build(t, keys));
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().copied().collect::<BTreeSet<i64>>());
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

fn bench_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("contains_random");

    for t in DEGREES {
        let tree = build(t, &keys);
        group.bench_function(BenchmarkId::new(format!("BTree(t={t})"), N), |b| {
            b.iter(|| keys.iter().filter(|&k| tree.contains(k)).count());
        });
    }

    let set: BTreeSet<i64> = keys.iter().copied().collect();
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter(|&k| set.contains(k)).count());
    });

    group.finish();
}

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("remove_random");

    for t in DEGREES {
        group.bench_function(BenchmarkId::new(format!("BTree(t={t})"), N), |b| {
            b.iter_batched(
                || build(t, &keys),
                |mut tree| {
                    for k in &keys {
                        tree.remove(k);
                    }
                    tree
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for k in &keys {
                    set.remove(k);
                }
                set
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_sorted_enumeration(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("to_sorted_vec");

    for t in DEGREES {
        let tree = build(t, &keys);
        group.bench_function(BenchmarkId::new(format!("BTree(t={t})"), N), |b| {
            b.iter(|| tree.to_sorted_vec());
        });
    }

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert_ordered, bench_insert_random);

criterion_group!(lookup_benches, bench_contains_random, bench_sorted_enumeration);

criterion_group!(remove_benches, bench_remove_random);

criterion_main!(insert_benches, lookup_benches, remove_benches);
