//! The weave engine.
//!
//! Composes a source type's members into a target type across a module
//! boundary: discovery of the source closure, two-pass scheduling over the
//! clone graph, per-kind cloners, and root-import reference rewriting.
//!
//! # Key Components
//!
//! - [`Weaver`] - the driver running one weave end to end
//! - [`WeaveOptions`] - skip marker and meta-attribute filter configuration
//! - [`ClonerRegistry`] / [`Target`] - source-to-target pairing with the
//!   discovery lifecycle gate
//! - [`Cloner`] and its kind structs - two-phase create/populate cloners
//! - [`RootImporter`] - the reference substitution engine with per-kind
//!   caches
//! - [`signatures_match`] / [`find_matching_method`] - the cross-module
//!   signature oracle
//!
//! # Data Flow
//!
//! The driver builds the clone graph from the source root, sorts it once by
//! containment-plus-sibling edges (creation order) and once by dependency
//! edges (population order), walks the creation order asking the dispatcher
//! for cloners, flips the registry gate, then walks the population order
//! invoking each cloner's populate phase, during which every reference is
//! rewritten through the root-import engine.

mod cloners;
mod context;
mod discover;
mod dispatch;
mod driver;
mod options;
mod registry;
mod rootimport;
mod signature;

pub use cloners::{
    Cloner, EventCloner, ExceptionHandlerCloner, FieldCloner, GenericParameterCloner,
    InstructionCloner, MethodBodyCloner, MethodSignatureCloner, ParameterCloner, PropertyCloner,
    RootTypeCloner, TypeCloner, VariableCloner,
};
pub use driver::Weaver;
pub use options::WeaveOptions;
pub use registry::{ClonerRegistry, Target};
pub use rootimport::RootImporter;
pub use signature::{find_matching_method, signatures_match};
