//! The clone graph over source entities.
//!
//! [`IlGraph`] is an immutable directed graph over the entities reachable from
//! a weave root, with three separately-stored edge flavors:
//!
//! - **Parent/child** edges express structural containment and form a forest.
//! - **Sibling** edges order peers of identical kind under one parent
//!   (parameter order, instruction sequence).
//! - **Dependency** edges express population prerequisites: the edge
//!   *(dependent, prerequisite)* states the prerequisite's target must exist
//!   before the dependent can be populated.
//!
//! The three relations are deliberately kept as three adjacency structures
//! over one vertex set rather than a single multigraph; each scheduling pass
//! sorts against the subset it needs. Edge iteration order is insertion
//! order, which the stable scheduler relies on for deterministic output.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::{graph::Vertex, Error, Result};

/// Immutable directed graph of source entities with three edge sets.
///
/// Construction validates edge endpoints and sibling kind-agreement and
/// builds the derived parent, previous-sibling, and root indices in
/// O(V + E). Depth is computed on demand and memoized.
///
/// # Examples
///
/// ```rust
/// use cilweave::graph::{IlGraph, Vertex};
/// use cilweave::metadata::{TypeId, FieldId};
///
/// let root = Vertex::Type(TypeId::new(0));
/// let field = Vertex::Field(FieldId::new(0));
/// let graph = IlGraph::new(
///     vec![root, field],
///     vec![(root, field)],
///     vec![],
///     vec![],
/// )?;
/// assert_eq!(graph.roots(), [root]);
/// assert_eq!(graph.depth_of(field)?, 1);
/// # Ok::<(), cilweave::Error>(())
/// ```
#[derive(Debug)]
pub struct IlGraph {
    vertices: Vec<Vertex>,
    parent_edges: Vec<(Vertex, Vertex)>,
    sibling_edges: Vec<(Vertex, Vertex)>,
    dependency_edges: Vec<(Vertex, Vertex)>,
    parent: FxHashMap<Vertex, Vertex>,
    prev_sibling: FxHashMap<Vertex, Vertex>,
    roots: Vec<Vertex>,
    depths: RefCell<FxHashMap<Vertex, usize>>,
}

impl IlGraph {
    /// Constructs a graph from a vertex set and three edge sets.
    ///
    /// # Arguments
    ///
    /// * `vertices` - The vertex set, in discovery order
    /// * `parent_edges` - Containment edges as *(parent, child)* pairs
    /// * `sibling_edges` - Order edges as *(previous, next)* pairs
    /// * `dependency_edges` - Prerequisite edges as *(dependent, prerequisite)* pairs
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGraph`] when an edge endpoint is not in the vertex
    /// set, a sibling edge connects vertices of different kinds, or a child
    /// carries more than one parent edge.
    pub fn new(
        vertices: Vec<Vertex>,
        parent_edges: Vec<(Vertex, Vertex)>,
        sibling_edges: Vec<(Vertex, Vertex)>,
        dependency_edges: Vec<(Vertex, Vertex)>,
    ) -> Result<Self> {
        let member: FxHashMap<Vertex, ()> = vertices.iter().map(|v| (*v, ())).collect();
        let check = |from: Vertex, to: Vertex| -> Result<()> {
            if !member.contains_key(&from) || !member.contains_key(&to) {
                return Err(Error::InvalidGraph(format!(
                    "edge endpoint outside vertex set: ({from}, {to})"
                )));
            }
            Ok(())
        };

        let mut parent = FxHashMap::default();
        for &(p, c) in &parent_edges {
            check(p, c)?;
            if parent.insert(c, p).is_some() {
                return Err(Error::InvalidGraph(format!(
                    "vertex has more than one parent: {c}"
                )));
            }
        }

        let mut prev_sibling = FxHashMap::default();
        for &(prev, next) in &sibling_edges {
            check(prev, next)?;
            if prev.kind() != next.kind() {
                return Err(Error::InvalidGraph(format!(
                    "sibling edge connects mismatched kinds: ({prev}, {next})"
                )));
            }
            prev_sibling.insert(next, prev);
        }

        for &(from, to) in &dependency_edges {
            check(from, to)?;
        }

        let roots: Vec<Vertex> = vertices
            .iter()
            .copied()
            .filter(|v| !parent.contains_key(v))
            .collect();

        Ok(IlGraph {
            vertices,
            parent_edges,
            sibling_edges,
            dependency_edges,
            parent,
            prev_sibling,
            roots,
            depths: RefCell::new(FxHashMap::default()),
        })
    }

    /// The vertex set, in discovery order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The root set: vertices with no incoming parent edge, in discovery order.
    #[must_use]
    pub fn roots(&self) -> &[Vertex] {
        &self.roots
    }

    /// Parent/child edges, in insertion order.
    #[must_use]
    pub fn parent_edges(&self) -> &[(Vertex, Vertex)] {
        &self.parent_edges
    }

    /// Sibling edges, in insertion order.
    #[must_use]
    pub fn sibling_edges(&self) -> &[(Vertex, Vertex)] {
        &self.sibling_edges
    }

    /// Dependency edges, in insertion order.
    #[must_use]
    pub fn dependency_edges(&self) -> &[(Vertex, Vertex)] {
        &self.dependency_edges
    }

    /// Parent of a vertex.
    ///
    /// # Errors
    ///
    /// [`Error::NoParent`] when the vertex is a root.
    pub fn parent_of(&self, v: Vertex) -> Result<Vertex> {
        self.try_parent_of(v)
            .ok_or_else(|| Error::NoParent(v.to_string()))
    }

    /// Parent of a vertex, or `None` for a root.
    #[must_use]
    pub fn try_parent_of(&self, v: Vertex) -> Option<Vertex> {
        self.parent.get(&v).copied()
    }

    /// Previous sibling of a vertex.
    ///
    /// # Errors
    ///
    /// [`Error::NoPreviousSibling`] when the vertex is first among its peers.
    pub fn previous_sibling_of(&self, v: Vertex) -> Result<Vertex> {
        self.try_previous_sibling_of(v)
            .ok_or_else(|| Error::NoPreviousSibling(v.to_string()))
    }

    /// Previous sibling of a vertex, or `None` when first among its peers.
    #[must_use]
    pub fn try_previous_sibling_of(&self, v: Vertex) -> Option<Vertex> {
        self.prev_sibling.get(&v).copied()
    }

    /// Depth of a vertex: 0 for a root, otherwise one past its parent's depth.
    ///
    /// The first computation walks parent pointers to a memoized ancestor or
    /// a root and unwinds with incrementing depth; results are memoized, so
    /// amortized cost is O(depth).
    ///
    /// # Errors
    ///
    /// [`Error::ParentCycle`] when the walk exceeds the vertex count, which
    /// means the parent relation is not a forest.
    pub fn depth_of(&self, v: Vertex) -> Result<usize> {
        if let Some(&d) = self.depths.borrow().get(&v) {
            return Ok(d);
        }

        let mut pending = Vec::new();
        let mut current = v;
        let mut hops = 0usize;
        let base = loop {
            if let Some(&d) = self.depths.borrow().get(&current) {
                break d;
            }
            match self.try_parent_of(current) {
                Some(parent) => {
                    pending.push(current);
                    current = parent;
                    hops += 1;
                    if hops > self.vertices.len() {
                        return Err(Error::ParentCycle(v.to_string()));
                    }
                }
                None => {
                    self.depths.borrow_mut().insert(current, 0);
                    break 0;
                }
            }
        };

        let mut depths = self.depths.borrow_mut();
        let mut depth = base;
        for vertex in pending.into_iter().rev() {
            depth += 1;
            depths.insert(vertex, depth);
        }
        Ok(depths[&v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldId, MethodId, ParamId, TypeId};

    fn ty(i: usize) -> Vertex {
        Vertex::Type(TypeId::new(i))
    }

    fn field(i: usize) -> Vertex {
        Vertex::Field(FieldId::new(i))
    }

    fn param(m: usize, i: u16) -> Vertex {
        Vertex::Parameter(ParamId {
            method: MethodId::new(m),
            index: i,
        })
    }

    #[test]
    fn test_roots_have_no_parent() {
        let graph = IlGraph::new(
            vec![ty(0), field(0), field(1)],
            vec![(ty(0), field(0)), (ty(0), field(1))],
            vec![(field(0), field(1))],
            vec![],
        )
        .unwrap();

        assert_eq!(graph.roots(), [ty(0)]);
        assert!(matches!(graph.parent_of(ty(0)), Err(Error::NoParent(_))));
        assert_eq!(graph.parent_of(field(1)).unwrap(), ty(0));
    }

    #[test]
    fn test_sibling_lookups() {
        let graph = IlGraph::new(
            vec![ty(0), param(0, 0), param(0, 1)],
            vec![(ty(0), param(0, 0)), (ty(0), param(0, 1))],
            vec![(param(0, 0), param(0, 1))],
            vec![],
        )
        .unwrap();

        assert_eq!(
            graph.previous_sibling_of(param(0, 1)).unwrap(),
            param(0, 0)
        );
        assert!(graph.try_previous_sibling_of(param(0, 0)).is_none());
        assert!(matches!(
            graph.previous_sibling_of(param(0, 0)),
            Err(Error::NoPreviousSibling(_))
        ));
    }

    #[test]
    fn test_mismatched_sibling_kinds_rejected() {
        let result = IlGraph::new(
            vec![ty(0), field(0)],
            vec![],
            vec![(ty(0), field(0))],
            vec![],
        );
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_foreign_endpoint_rejected() {
        let result = IlGraph::new(vec![ty(0)], vec![(ty(0), field(9))], vec![], vec![]);
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_double_parent_rejected() {
        let result = IlGraph::new(
            vec![ty(0), ty(1), field(0)],
            vec![(ty(0), field(0)), (ty(1), field(0))],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_depth_memoization_and_values() {
        let graph = IlGraph::new(
            vec![ty(0), ty(1), field(0)],
            vec![(ty(0), ty(1)), (ty(1), field(0))],
            vec![],
            vec![],
        )
        .unwrap();

        assert_eq!(graph.depth_of(ty(0)).unwrap(), 0);
        assert_eq!(graph.depth_of(field(0)).unwrap(), 2);
        assert_eq!(graph.depth_of(ty(1)).unwrap(), 1);
        // Memoized lookups return the same values.
        assert_eq!(graph.depth_of(field(0)).unwrap(), 2);
    }

    #[test]
    fn test_depth_zero_iff_root() {
        let graph = IlGraph::new(
            vec![ty(0), ty(1), field(0)],
            vec![(ty(0), field(0))],
            vec![],
            vec![],
        )
        .unwrap();
        for &v in graph.vertices() {
            let depth = graph.depth_of(v).unwrap();
            assert_eq!(depth == 0, graph.roots().contains(&v));
        }
    }

    #[test]
    fn test_parent_cycle_detected() {
        // A cycle cannot be produced through the validated constructor's
        // single-parent rule without a self-referential chain.
        let result = IlGraph::new(
            vec![ty(0), ty(1)],
            vec![(ty(0), ty(1)), (ty(1), ty(0))],
            vec![],
            vec![],
        );
        let graph = result.unwrap();
        assert!(matches!(
            graph.depth_of(ty(0)),
            Err(Error::ParentCycle(_))
        ));
    }
}
