use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_explorer::geometry::ScreenPoint;
use graph_explorer::graph::{Edge, GraphStateStore, Node, NodeId};
use graph_explorer::layout::LayoutEngine;
use graph_explorer::viewport::ViewportController;

/// A star of `size` leaves around `hub`, leaves chained to each other
fn star(hub: &str, size: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = vec![Node::new(hub, "Hub", hub)];
    let mut edges = Vec::with_capacity(size * 2);
    for i in 0..size {
        let leaf = format!("{}-leaf{}", hub, i);
        nodes.push(Node::new(leaf.as_str(), "Leaf", format!("Leaf {}", i)).with_property("rank", i as i64));
        edges.push(Edge::new(format!("{}-spoke{}", hub, i), hub, leaf.as_str(), "LINKS"));
        if i > 0 {
            edges.push(Edge::new(
                format!("{}-chain{}", hub, i),
                format!("{}-leaf{}", hub, i - 1),
                leaf.as_str(),
                "NEXT",
            ));
        }
    }
    (nodes, edges)
}

/// Benchmark merging a fresh neighborhood into an empty store
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [100, 1000, 5000].iter() {
        let (nodes, edges) = star("hub", *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut store = GraphStateStore::new();
                let report = store.merge(nodes.clone(), edges.clone());
                criterion::black_box(report.new_nodes.len());
            });
        });
    }
    group.finish();
}

/// Benchmark re-merging a payload the store already holds
fn bench_merge_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_overlap");

    for size in [100, 1000, 5000].iter() {
        let (nodes, edges) = star("hub", *size);
        let mut store = GraphStateStore::new();
        store.merge(nodes.clone(), edges.clone());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let report = store.merge(nodes.clone(), edges.clone());
                criterion::black_box(report.is_noop());
            });
        });
    }
    group.finish();
}

/// Benchmark incremental placement of an expansion next to a laid-out graph
fn bench_incremental_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_layout");

    for size in [50, 200, 1000].iter() {
        let (base_nodes, base_edges) = star("base", *size);
        let mut base = GraphStateStore::new();
        let report = base.merge(base_nodes, base_edges);
        let mut base_layout = LayoutEngine::default();
        base_layout.apply(&base, &report);

        let (mut nodes, mut edges) = star("grown", *size);
        edges.push(Edge::new("bridge", "base-leaf0", "grown", "LINKS"));
        nodes.push(Node::new("base-leaf0", "Leaf", "Leaf 0"));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut store = base.clone();
                let mut layout = base_layout.clone();
                let report = store.merge(nodes.clone(), edges.clone());
                criterion::black_box(layout.apply(&store, &report));
            });
        });
    }
    group.finish();
}

/// Benchmark hit testing a click against every placed node
fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");

    for size in [100, 1000, 5000].iter() {
        let (nodes, edges) = star("hub", *size);
        let mut store = GraphStateStore::new();
        let report = store.merge(nodes, edges);
        let mut layout = LayoutEngine::default();
        layout.apply(&store, &report);
        let viewport = ViewportController::default();
        let target = layout
            .position(&NodeId::new("hub-leaf1"))
            .map(|p| viewport.to_screen(p))
            .unwrap_or(ScreenPoint::origin());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                criterion::black_box(viewport.hit_test(target, layout.positions()));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_merge,
    bench_merge_overlap,
    bench_incremental_layout,
    bench_hit_test
);
criterion_main!(benches);
