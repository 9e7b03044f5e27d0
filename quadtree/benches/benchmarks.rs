use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::quadtree::QuadTree;
use quadtree::shapes::Rect;
use rand::prelude::*;

const WORLD: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 100.0,
    height: 100.0,
};

fn random_rect<R: Rng>(rng: &mut R) -> Rect {
    WORLD.random_rect_inside(5.0, 5.0, rng)
}

fn populated(rng: &mut StdRng, count: u32) -> QuadTree {
    let mut quadtree = QuadTree::new(WORLD);
    for value in 0..count {
        let _ = quadtree.insert(value, random_rect(rng));
    }
    quadtree
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut quadtree = QuadTree::new(WORLD);

    c.bench_function("quadtree_insert", |b| {
        b.iter(|| {
            let rect = random_rect(&mut rng);
            let _ = quadtree.insert(black_box(rng.gen_range(0..10_000)), rect);
        })
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut quadtree = populated(&mut rng, 1000);

    c.bench_function("quadtree_remove_reinsert", |b| {
        b.iter(|| {
            let value = rng.gen_range(0..1000);
            let _ = quadtree.remove(black_box(value));
            let _ = quadtree.insert(value, random_rect(&mut rng));
        })
    });
}

fn update_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut quadtree = populated(&mut rng, 1000);
    let moves: Vec<(u32, Rect)> = (0..1000).map(|value| (value, random_rect(&mut rng))).collect();

    c.bench_function("quadtree_update", |b| {
        b.iter(|| {
            for (value, rect) in &moves {
                let _ = quadtree.update(black_box(*value), *rect);
            }
        })
    });
}

fn query_rect_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let quadtree = populated(&mut rng, 1000);
    let query = Rect::new(40.0, 40.0, 20.0, 20.0);

    c.bench_function("quadtree_query_rect", |b| {
        b.iter(|| {
            let mut collisions: Vec<u32> = Vec::new();
            quadtree.query_rect(black_box(&query), &mut collisions);
            collisions
        })
    });
}

fn all_pairs_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(5);
    let quadtree = populated(&mut rng, 1000);

    c.bench_function("quadtree_all_pairs", |b| {
        b.iter(|| {
            let mut pairs = Vec::new();
            quadtree.query_all_pairs(&mut pairs);
            pairs
        })
    });
}

criterion_group!(
    quadtree_benchmarks,
    insert_benchmark,
    remove_benchmark,
    update_benchmark,
    query_rect_benchmark,
    all_pairs_benchmark
);
criterion_main!(quadtree_benchmarks);
