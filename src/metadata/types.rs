//! Type definitions and the type reference union.
//!
//! This module provides [`TypeDef`], the arena record for a type defined in a
//! [`crate::metadata::Module`], and [`TypeRef`], the tagged union every type
//! reference in the object model is expressed in. The union's shape mirrors the
//! structural cases reference rewriting recurses over: a module-local
//! definition, an external named type, an array, a generic instance, and a
//! generic parameter.

use crate::metadata::{
    attributes::CustomAttribute,
    flags::TypeAttributes,
    ids::{EventId, FieldId, GenericParamId, MethodId, PropertyId, TypeId},
    member::GenericParamDef,
};

/// The assembly name used for references to the core library.
pub const CORE_ASSEMBLY: &str = "System.Runtime";

/// A reference to a type, in the frame of the module that holds it.
///
/// `TypeRef` is the currency of every typed slot in the object model: field
/// types, parameter types, base types, generic arguments, operand payloads.
/// A [`TypeRef::Definition`] is only meaningful against the module whose arena
/// issued the [`TypeId`]; rewriting a reference from one module's frame to
/// another's is exactly the root-import operation.
///
/// # Shape Cases
///
/// - [`TypeRef::Definition`] - a type defined in the holding module
/// - [`TypeRef::External`] - a named type resolved through the assembly
///   reference closure
/// - [`TypeRef::Array`] - single- or multi-dimensional array of an element type
/// - [`TypeRef::GenericInstance`] - a closed generic type with its arguments
/// - [`TypeRef::GenericParameter`] - a type or method generic parameter
///
/// # Examples
///
/// ```rust
/// use cilweave::metadata::TypeRef;
///
/// let int32 = TypeRef::core("System.Int32");
/// let array = TypeRef::Array { element: Box::new(int32), rank: 1 };
/// assert!(matches!(array, TypeRef::Array { rank: 1, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type defined in the module holding this reference
    Definition(TypeId),
    /// A type resolved through an external assembly reference
    External {
        /// Simple name of the declaring assembly
        assembly: String,
        /// Namespace-qualified type name, nested types separated by `/`
        full_name: String,
    },
    /// An array of an element type
    Array {
        /// The element type
        element: Box<TypeRef>,
        /// Number of dimensions; 1 for a vector
        rank: u32,
    },
    /// A generic type instantiated with concrete arguments
    GenericInstance {
        /// The open generic definition being instantiated
        definition: Box<TypeRef>,
        /// The type arguments, in declaration order
        arguments: Vec<TypeRef>,
    },
    /// A generic parameter of a type or method
    GenericParameter(GenericParamId),
}

impl TypeRef {
    /// Shorthand for a reference into the core library.
    #[must_use]
    pub fn core(full_name: &str) -> Self {
        TypeRef::External {
            assembly: CORE_ASSEMBLY.to_string(),
            full_name: full_name.to_string(),
        }
    }

    /// Returns `true` for a closed generic instance shape.
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        matches!(self, TypeRef::GenericInstance { .. })
    }

    /// Returns the definition id when this reference is module-local.
    #[must_use]
    pub fn as_definition(&self) -> Option<TypeId> {
        match self {
            TypeRef::Definition(id) => Some(*id),
            _ => None,
        }
    }

    /// Strips generic instantiation, yielding the open shape.
    ///
    /// Non-instance shapes are returned unchanged.
    #[must_use]
    pub fn open_definition(&self) -> &TypeRef {
        match self {
            TypeRef::GenericInstance { definition, .. } => definition,
            other => other,
        }
    }
}

/// Explicit layout information of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLayout {
    /// Field packing alignment in bytes
    pub packing_size: u16,
    /// Total byte size of the type
    pub class_size: u32,
}

/// A type defined in a module.
///
/// Owns the membership lists (fields, methods, properties, events, nested
/// types) as id vectors into the module arenas, in declaration order. The
/// declaration order of these lists is load-bearing: cloned output keeps it,
/// which keeps woven assemblies byte-deterministic.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Simple name, without namespace
    pub name: String,
    /// Namespace; empty for the global namespace and for nested types
    pub namespace: String,
    /// Attribute word
    pub attributes: TypeAttributes,
    /// Base type, absent for interfaces and `System.Object` itself
    pub base: Option<TypeRef>,
    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<TypeRef>,
    /// Explicit layout, when the attribute word carries a layout kind
    pub layout: Option<TypeLayout>,
    /// Enclosing type, for nested types
    pub enclosing: Option<TypeId>,
    /// Nested types, in declaration order
    pub nested: Vec<TypeId>,
    /// Field members, in declaration order
    pub fields: Vec<FieldId>,
    /// Method members, in declaration order
    pub methods: Vec<MethodId>,
    /// Property members, in declaration order
    pub properties: Vec<PropertyId>,
    /// Event members, in declaration order
    pub events: Vec<EventId>,
    /// Generic parameters, in declaration order
    pub generic_params: Vec<GenericParamDef>,
    /// Custom attributes applied to the type
    pub custom_attributes: Vec<CustomAttribute>,
}

impl TypeDef {
    /// Creates an empty type definition with the given name and attributes.
    #[must_use]
    pub fn new(namespace: &str, name: &str, attributes: TypeAttributes) -> Self {
        TypeDef {
            name: name.to_string(),
            namespace: namespace.to_string(),
            attributes,
            base: None,
            interfaces: Vec::new(),
            layout: None,
            enclosing: None,
            nested: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            generic_params: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_reference_shape() {
        let r = TypeRef::core("System.String");
        match &r {
            TypeRef::External {
                assembly,
                full_name,
            } => {
                assert_eq!(assembly, CORE_ASSEMBLY);
                assert_eq!(full_name, "System.String");
            }
            _ => panic!("expected external reference"),
        }
    }

    #[test]
    fn test_open_definition_strips_instantiation() {
        let open = TypeRef::core("System.Collections.Generic.List`1");
        let closed = TypeRef::GenericInstance {
            definition: Box::new(open.clone()),
            arguments: vec![TypeRef::core("System.Int32")],
        };
        assert_eq!(closed.open_definition(), &open);
        assert_eq!(open.open_definition(), &open);
    }

    #[test]
    fn test_as_definition_only_for_local_types() {
        assert!(TypeRef::core("System.Int32").as_definition().is_none());
        assert_eq!(
            TypeRef::Definition(TypeId::new(7)).as_definition(),
            Some(TypeId::new(7))
        );
    }
}
