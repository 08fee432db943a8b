//! Stable topological ordering of clone graph vertices.
//!
//! The scheduler sorts one vertex set twice against different edge subsets
//! (containment plus sibling order for the creation pass, dependencies for
//! the population pass). The sort is **stable**: vertices that the edge
//! subset leaves unordered keep their input order, which makes woven output
//! byte-deterministic for identical inputs.
//!
//! On a cycle the offending strongly connected component is computed with
//! Tarjan's algorithm so the error names every participating vertex.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::{graph::Vertex, Error, Result};

/// Computes a stable topological order of `vertices` against `edges`.
///
/// For every edge *(u, v)*, `u` precedes `v` in the result. Ties are broken
/// by input order. Edges may repeat; endpoints must be members of
/// `vertices` (the clone graph validates this at construction).
///
/// # Errors
///
/// [`Error::CyclicDependency`] listing the members of one offending
/// strongly connected component.
pub fn topological_sort(vertices: &[Vertex], edges: &[(Vertex, Vertex)]) -> Result<Vec<Vertex>> {
    try_topological_sort(vertices, edges).map_err(|scc| {
        let members: Vec<String> = scc.iter().map(Vertex::to_string).collect();
        Error::CyclicDependency(members.join(", "))
    })
}

/// Like [`topological_sort`], but surfaces the offending SCC as data.
///
/// The driver uses this form to re-render cycle members with fully-qualified
/// metadata names before reporting.
pub fn try_topological_sort(
    vertices: &[Vertex],
    edges: &[(Vertex, Vertex)],
) -> std::result::Result<Vec<Vertex>, Vec<Vertex>> {
    let n = vertices.len();
    let position: FxHashMap<Vertex, usize> =
        vertices.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree: Vec<usize> = vec![0; n];
    for (from, to) in edges {
        let (Some(&f), Some(&t)) = (position.get(from), position.get(to)) else {
            continue;
        };
        successors[f].push(t);
        indegree[t] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(i)) = ready.pop() {
        order.push(vertices[i]);
        for &succ in &successors[i] {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err(offending_scc(n, &successors, vertices))
    }
}

/// Finds one strongly connected component participating in a cycle.
///
/// Prefers a multi-vertex SCC; falls back to a self-loop vertex. Members are
/// returned in input order.
fn offending_scc(n: usize, successors: &[Vec<usize>], vertices: &[Vertex]) -> Vec<Vertex> {
    for scc in strongly_connected_components(n, successors) {
        if scc.len() > 1 {
            let mut members = scc;
            members.sort_unstable();
            return members.into_iter().map(|i| vertices[i]).collect();
        }
        let lone = scc[0];
        if successors[lone].contains(&lone) {
            return vec![vertices[lone]];
        }
    }
    Vec::new()
}

/// Tarjan's algorithm, iterative form.
///
/// Returns SCCs in reverse topological order over the condensation.
fn strongly_connected_components(n: usize, successors: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;
    let mut sccs: Vec<Vec<usize>> = Vec::new();

    // Explicit DFS frames: (node, next successor offset).
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }
        frames.push((start, 0));
        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            let offset = frame.1;
            if offset == 0 {
                index[node] = next_index;
                lowlink[node] = next_index;
                next_index += 1;
                stack.push(node);
                on_stack[node] = true;
            }
            if let Some(&succ) = successors[node].get(offset) {
                frame.1 += 1;
                if index[succ] == UNVISITED {
                    frames.push((succ, 0));
                } else if on_stack[succ] {
                    lowlink[node] = lowlink[node].min(index[succ]);
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }
                if lowlink[node] == index[node] {
                    let mut scc = Vec::new();
                    loop {
                        let member = match stack.pop() {
                            Some(m) => m,
                            None => break,
                        };
                        on_stack[member] = false;
                        scc.push(member);
                        if member == node {
                            break;
                        }
                    }
                    sccs.push(scc);
                }
            }
        }
    }
    sccs
}
