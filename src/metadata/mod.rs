//! Typed object model of module metadata and IL.
//!
//! This module is the substrate the weaver operates on: an arena-owned,
//! mutable object model of one assembly module with strongly-typed ids,
//! canonical full-name rendering, and an ordinary reference importer for
//! non-mixin references.
//!
//! # Key Components
//!
//! - [`Module`] - the per-module entity arenas and mutation API
//! - [`TypeDef`] / [`TypeRef`] - type definitions and the reference union
//! - [`FieldDef`], [`MethodDef`], [`PropertyDef`], [`EventDef`] - members
//! - [`MethodBody`], [`Instruction`], [`OpCode`], [`Operand`] - IL streams
//! - [`CustomAttribute`] - decoded custom attribute applications
//! - [`ReferenceImporter`] - frame translation for non-mixin references
//!
//! # Architecture
//!
//! Entities are owned by per-kind arenas on [`Module`] and addressed by
//! per-kind id newtypes. References ([`TypeRef`], [`FieldRef`],
//! [`MethodRef`]) are frame-relative: a reference only has meaning against
//! the module that holds it, and moving a reference between frames is an
//! explicit import. Assembly file I/O and symbol information are outside
//! this model; modules are constructed programmatically or by an external
//! reader layer.

mod attributes;
mod body;
mod flags;
mod ids;
mod import;
mod member;
mod module;
mod types;

pub use attributes::{AttributeArgument, CustomAttribute, NamedArgument};
pub use body::{ExceptionHandler, Instruction, MethodBody, OpCode, Operand};
pub use flags::{
    EventAttributes, ExceptionHandlerFlags, FieldAttributes, GenericParamAttributes,
    MethodAttributes, ParamAttributes, PropertyAttributes, TypeAttributes,
};
pub use ids::{
    EventId, FieldId, GenericParamId, GenericParamOwner, HandlerId, InstructionId, MethodId,
    ParamId, PropertyId, TypeId, VariableId,
};
pub use import::ReferenceImporter;
pub use member::{
    Constant, EventDef, FieldDef, FieldRef, GenericParamDef, MarshalInfo, MethodDef, MethodRef,
    ParamDef, PropertyDef, VariableDef,
};
pub use module::Module;
pub use types::{TypeDef, TypeLayout, TypeRef, CORE_ASSEMBLY};
