//! Member definitions and member references.
//!
//! Definition records ([`FieldDef`], [`MethodDef`], [`PropertyDef`],
//! [`EventDef`], [`ParamDef`], [`VariableDef`], [`GenericParamDef`]) live in
//! module arenas and own their data. Reference records ([`FieldRef`],
//! [`MethodRef`]) are the frame-relative handles instruction operands and
//! custom attributes carry; they name a member through a declaring
//! [`TypeRef`] and, when the member is module-local, additionally resolve to
//! its definition id.

use crate::metadata::{
    attributes::CustomAttribute,
    body::MethodBody,
    flags::{
        EventAttributes, FieldAttributes, GenericParamAttributes, MethodAttributes,
        ParamAttributes, PropertyAttributes,
    },
    ids::{FieldId, MethodId, TypeId},
    types::TypeRef,
};

/// A compile-time constant payload, as stored in metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Boolean constant
    Bool(bool),
    /// UTF-16 character constant
    Char(u16),
    /// 32-bit signed integer constant
    I4(i32),
    /// 64-bit signed integer constant
    I8(i64),
    /// 32-bit float constant
    R4(f32),
    /// 64-bit float constant
    R8(f64),
    /// String constant
    String(String),
    /// Null reference constant
    Null,
}

/// Native marshalling descriptor for a field or parameter.
///
/// Only the descriptor identity is modeled; the weaver copies descriptors
/// verbatim and never interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalInfo {
    /// Native type descriptor name, e.g. `lpwstr`
    pub native_type: String,
}

/// A field defined in a module.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Attribute word
    pub attributes: FieldAttributes,
    /// The field's type
    pub field_type: TypeRef,
    /// Default constant, when `HAS_DEFAULT` is set
    pub constant: Option<Constant>,
    /// Marshalling descriptor, when `HAS_FIELD_MARSHAL` is set
    pub marshal: Option<MarshalInfo>,
    /// Explicit byte offset, for explicit-layout declaring types
    pub offset: Option<u32>,
    /// Custom attributes applied to the field
    pub custom_attributes: Vec<CustomAttribute>,
    /// The declaring type
    pub declaring: TypeId,
}

/// A parameter of a method definition.
#[derive(Debug, Clone)]
pub struct ParamDef {
    /// Parameter name
    pub name: String,
    /// Attribute word (in/out/optional and payload presence bits)
    pub attributes: ParamAttributes,
    /// The parameter's type
    pub param_type: TypeRef,
    /// Default constant, when `HAS_DEFAULT` is set
    pub constant: Option<Constant>,
    /// Marshalling descriptor, when `HAS_FIELD_MARSHAL` is set
    pub marshal: Option<MarshalInfo>,
    /// Custom attributes applied to the parameter
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A local variable slot of a method body.
#[derive(Debug, Clone)]
pub struct VariableDef {
    /// The variable's type
    pub var_type: TypeRef,
    /// 0-based slot index in the variable table
    pub index: u16,
    /// The variable is pinned for the duration of the method
    pub pinned: bool,
}

/// A generic parameter declared by a type or method.
#[derive(Debug, Clone)]
pub struct GenericParamDef {
    /// Parameter name, e.g. `T`
    pub name: String,
    /// 0-based declaration position
    pub position: u16,
    /// Variance and special-constraint bits
    pub attributes: GenericParamAttributes,
    /// Constraint types, in declaration order
    pub constraints: Vec<TypeRef>,
}

/// A method defined in a module.
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Attribute word
    pub attributes: MethodAttributes,
    /// The receiver is passed as an implicit first argument
    pub has_this: bool,
    /// The receiver's type is listed explicitly in the signature
    pub explicit_this: bool,
    /// Return type
    pub return_type: TypeRef,
    /// Parameters, in declaration order
    pub params: Vec<ParamDef>,
    /// Generic parameters, in declaration order
    pub generic_params: Vec<GenericParamDef>,
    /// Executable body; absent for abstract and extern methods
    pub body: Option<MethodBody>,
    /// Custom attributes applied to the method
    pub custom_attributes: Vec<CustomAttribute>,
    /// The declaring type
    pub declaring: TypeId,
}

/// A property defined in a module.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name
    pub name: String,
    /// Attribute word
    pub attributes: PropertyAttributes,
    /// The property's type
    pub property_type: TypeRef,
    /// Getter accessor, when present
    pub getter: Option<MethodId>,
    /// Setter accessor, when present
    pub setter: Option<MethodId>,
    /// Custom attributes applied to the property
    pub custom_attributes: Vec<CustomAttribute>,
    /// The declaring type
    pub declaring: TypeId,
}

/// An event defined in a module.
#[derive(Debug, Clone)]
pub struct EventDef {
    /// Event name
    pub name: String,
    /// Attribute word
    pub attributes: EventAttributes,
    /// The event's delegate type
    pub event_type: TypeRef,
    /// Add accessor, when present
    pub add: Option<MethodId>,
    /// Remove accessor, when present
    pub remove: Option<MethodId>,
    /// Raise accessor, when present
    pub raise: Option<MethodId>,
    /// Custom attributes applied to the event
    pub custom_attributes: Vec<CustomAttribute>,
    /// The declaring type
    pub declaring: TypeId,
}

/// A reference to a field, in the frame of the module that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// The declaring type of the referenced field
    pub declaring: TypeRef,
    /// Field name
    pub name: String,
    /// The field's type
    pub field_type: TypeRef,
    /// Resolved definition, when the field is defined in the holding module
    pub definition: Option<FieldId>,
}

/// A reference to a method, in the frame of the module that holds it.
///
/// A non-empty [`MethodRef::generic_args`] makes this a generic instance
/// method reference; the remaining signature fields then describe the open
/// definition being instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// The declaring type of the referenced method
    pub declaring: TypeRef,
    /// Method name
    pub name: String,
    /// The receiver is passed as an implicit first argument
    pub has_this: bool,
    /// The receiver's type is listed explicitly in the signature
    pub explicit_this: bool,
    /// Return type
    pub return_type: TypeRef,
    /// Parameter types, in declaration order
    pub params: Vec<TypeRef>,
    /// Number of generic parameters the referenced definition declares
    pub generic_arity: u16,
    /// Generic arguments; non-empty for a generic instance method
    pub generic_args: Vec<TypeRef>,
    /// Resolved definition, when the method is defined in the holding module
    pub definition: Option<MethodId>,
}

impl MethodRef {
    /// Returns `true` when this reference instantiates a generic method.
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Returns the open reference, with instantiation stripped.
    #[must_use]
    pub fn open(&self) -> MethodRef {
        MethodRef {
            generic_args: Vec::new(),
            ..self.clone()
        }
    }
}
