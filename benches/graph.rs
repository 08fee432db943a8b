#![allow(unused)]
extern crate cilweave;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use cilweave::graph::{topological_sort, IlGraph, Vertex};
use cilweave::metadata::{FieldId, InstructionId, MethodId, TypeId};

/// Builds a synthetic clone graph shaped like a realistic mixin: one root
/// type, `methods` methods with `instructions` instructions each, plus a
/// field per method referenced by its body.
fn build_graph(methods: usize, instructions: u32) -> IlGraph {
    let root = Vertex::Type(TypeId::new(0));
    let mut vertices = vec![root];
    let mut parent = Vec::new();
    let mut sibling = Vec::new();
    let mut dependency = Vec::new();

    for m in 0..methods {
        let method = Vertex::Method(MethodId::new(m));
        let field = Vertex::Field(FieldId::new(m));
        vertices.push(field);
        vertices.push(method);
        parent.push((root, field));
        parent.push((root, method));
        dependency.push((method, field));

        let mut prev: Option<Vertex> = None;
        for i in 0..instructions {
            let instruction = Vertex::Instruction(InstructionId {
                method: MethodId::new(m),
                index: i,
            });
            vertices.push(instruction);
            parent.push((method, instruction));
            if let Some(previous) = prev {
                sibling.push((previous, instruction));
            }
            prev = Some(instruction);
        }
    }

    IlGraph::new(vertices, parent, sibling, dependency).expect("valid graph")
}

fn bench_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_construction");
    for (methods, instructions) in [(10, 50), (100, 100)] {
        let vertex_count = 1 + methods * (2 + instructions as usize);
        group.throughput(Throughput::Elements(vertex_count as u64));
        group.bench_function(format!("{methods}m_{instructions}i"), |b| {
            b.iter(|| black_box(build_graph(methods, instructions)));
        });
    }
    group.finish();
}

fn bench_creation_order(c: &mut Criterion) {
    let graph = build_graph(100, 100);
    let mut edges = graph.parent_edges().to_vec();
    edges.extend_from_slice(graph.sibling_edges());

    let mut group = c.benchmark_group("scheduling");
    group.throughput(Throughput::Elements(graph.vertices().len() as u64));
    group.bench_function("creation_order", |b| {
        b.iter(|| topological_sort(black_box(graph.vertices()), black_box(&edges)));
    });
    group.bench_function("population_order", |b| {
        b.iter(|| {
            topological_sort(
                black_box(graph.vertices()),
                black_box(graph.dependency_edges()),
            )
        });
    });
    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    c.bench_function("depth_of_all", |b| {
        b.iter_with_setup(
            || build_graph(100, 100),
            |graph| {
                for &v in graph.vertices() {
                    black_box(graph.depth_of(v).unwrap());
                }
            },
        );
    });
}

criterion_group!(
    benches,
    bench_graph_construction,
    bench_creation_order,
    bench_depth
);
criterion_main!(benches);
