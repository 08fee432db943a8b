//! # cilweave Prelude
//!
//! This module provides a convenient prelude for the most commonly used
//! types from the crate. Import it to get quick access to the essentials
//! for building modules and running weaves.
//!
//! ```rust
//! use cilweave::prelude::*;
//!
//! let mut source = Module::new("MixLib", "MixLib.dll");
//! source.add_type(TypeDef::new("Mix", "Source", TypeAttributes::PUBLIC));
//! let options = WeaveOptions::new();
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all weave operations
pub use crate::Error;

/// The result type used throughout the crate
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The driver running one weave end to end
pub use crate::weave::Weaver;

/// Weave configuration: skip marker and meta-attribute filter
pub use crate::weave::WeaveOptions;

// ================================================================================================
// Metadata Object Model
// ================================================================================================

/// The mutable module object model
pub use crate::metadata::Module;

/// Type definitions and references
pub use crate::metadata::{TypeAttributes, TypeDef, TypeRef};

/// Member definitions
pub use crate::metadata::{
    EventAttributes, EventDef, FieldAttributes, FieldDef, MethodAttributes, MethodDef,
    ParamAttributes, ParamDef, PropertyAttributes, PropertyDef,
};

/// Member references
pub use crate::metadata::{FieldRef, MethodRef};

/// Method bodies and instructions
pub use crate::metadata::{ExceptionHandler, Instruction, MethodBody, OpCode, Operand};

/// Custom attributes
pub use crate::metadata::{AttributeArgument, CustomAttribute, NamedArgument};

/// Entity identifiers
pub use crate::metadata::{
    EventId, FieldId, GenericParamId, GenericParamOwner, InstructionId, MethodId, ParamId,
    PropertyId, TypeId, VariableId,
};

// ================================================================================================
// Clone Graph
// ================================================================================================

/// The clone graph and its scheduling primitives
pub use crate::graph::{IlGraph, Vertex, VertexKind};
