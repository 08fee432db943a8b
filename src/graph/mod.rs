//! Clone graph modeling and scheduling.
//!
//! This module models the entities reachable from a weave root as a directed
//! graph with three edge flavors and provides the stable topological ordering
//! the two-pass weave scheduler runs on.
//!
//! # Key Components
//!
//! - [`Vertex`] / [`VertexKind`] - opaque handles to source entities, kinded
//!   as a closed sum
//! - [`IlGraph`] - the immutable graph with parent/child, sibling, and
//!   dependency edge sets plus derived indices
//! - [`topological_sort`] - stable ordering against one edge subset, with
//!   SCC diagnostics on cycles
//!
//! # Architecture
//!
//! The three edge flavors are layered, not unified: parent/child edges form
//! a forest, sibling edges order peers inside one level, and dependency
//! edges form a DAG. Each scheduling pass sorts the single shared vertex set
//! against the subset it cares about, so the flavors never need to coexist
//! in one adjacency structure.

mod ilgraph;
mod topological;
mod vertex;

pub use ilgraph::IlGraph;
pub use topological::{topological_sort, try_topological_sort};
pub use vertex::{Vertex, VertexKind};
