//! Attribute bitflags for metadata definitions.
//!
//! This module defines the bitflag groups carried by type, field, method, parameter,
//! property, event, and generic-parameter definitions, plus exception-handler kind
//! flags. The numeric values follow the ECMA-335 attribute encodings so cloned
//! definitions keep byte-identical attribute words.

use bitflags::bitflags;

/// Bitmask for type visibility extraction
pub const TYPE_VISIBILITY_MASK: u32 = 0x0007;
/// Bitmask for type layout extraction
pub const TYPE_LAYOUT_MASK: u32 = 0x0018;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Attributes of a type definition
    pub struct TypeAttributes: u32 {
        /// Type is not visible outside the assembly
        const NOT_PUBLIC = 0x0000;
        /// Type is visible outside the assembly
        const PUBLIC = 0x0001;
        /// Nested type with public visibility
        const NESTED_PUBLIC = 0x0002;
        /// Nested type with private visibility
        const NESTED_PRIVATE = 0x0003;
        /// Nested type visible to the declaring family
        const NESTED_FAMILY = 0x0004;
        /// Nested type visible within the assembly
        const NESTED_ASSEMBLY = 0x0005;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0008;
        /// Fields are laid out at explicit offsets
        const EXPLICIT_LAYOUT = 0x0010;
        /// Type is an interface
        const INTERFACE = 0x0020;
        /// Type is abstract
        const ABSTRACT = 0x0080;
        /// Type cannot be derived from
        const SEALED = 0x0100;
        /// Name is special, interpreted by tooling
        const SPECIAL_NAME = 0x0400;
        /// Runtime provides special behavior
        const RTSPECIAL_NAME = 0x0800;
        /// Type initializer runs lazily
        const BEFORE_FIELD_INIT = 0x100000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Attributes of a field definition
    pub struct FieldAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible within the assembly
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by anyone who can see the scope
        const PUBLIC = 0x0006;
        /// Defined on the type, else per instance
        const STATIC = 0x0010;
        /// Writable only during initialization
        const INIT_ONLY = 0x0020;
        /// Compile-time constant; value lives in metadata
        const LITERAL = 0x0040;
        /// Not serialized when the type is remoted
        const NOT_SERIALIZED = 0x0080;
        /// Name is special
        const SPECIAL_NAME = 0x0200;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Runtime provides special behavior
        const RTSPECIAL_NAME = 0x0400;
        /// Field has a default constant
        const HAS_DEFAULT = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Attributes of a method definition
    pub struct MethodAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible within the assembly
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by anyone who can see the scope
        const PUBLIC = 0x0006;
        /// Defined on the type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new vtable slot
        const NEW_SLOT = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Name is special
        const SPECIAL_NAME = 0x0800;
        /// Runtime provides special behavior
        const RTSPECIAL_NAME = 0x1000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Attributes of a method parameter
    pub struct ParamAttributes: u32 {
        /// Parameter is an input
        const IN = 0x0001;
        /// Parameter is an output
        const OUT = 0x0002;
        /// Parameter is optional
        const OPTIONAL = 0x0010;
        /// Parameter has a default constant
        const HAS_DEFAULT = 0x1000;
        /// Parameter has marshalling information
        const HAS_FIELD_MARSHAL = 0x2000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Attributes of a property definition
    pub struct PropertyAttributes: u32 {
        /// Name is special
        const SPECIAL_NAME = 0x0200;
        /// Runtime provides special behavior
        const RTSPECIAL_NAME = 0x0400;
        /// Property has a default constant
        const HAS_DEFAULT = 0x1000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Attributes of an event definition
    pub struct EventAttributes: u32 {
        /// Name is special
        const SPECIAL_NAME = 0x0200;
        /// Runtime provides special behavior
        const RTSPECIAL_NAME = 0x0400;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    /// Attributes of a generic parameter
    pub struct GenericParamAttributes: u32 {
        /// Parameter is covariant
        const COVARIANT = 0x0001;
        /// Parameter is contravariant
        const CONTRAVARIANT = 0x0002;
        /// Argument must be a reference type
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// Argument must be a non-nullable value type
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// Argument must have a default constructor
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Kind flags of an exception handler clause
    pub struct ExceptionHandlerFlags: u32 {
        /// Typed exception clause
        const EXCEPTION = 0x0000;
        /// Filter clause; filter code precedes the handler
        const FILTER = 0x0001;
        /// Finally clause
        const FINALLY = 0x0002;
        /// Fault clause, runs only on exceptional exit
        const FAULT = 0x0004;
    }
}

impl TypeAttributes {
    /// Extract the visibility bits from the full attribute word
    #[must_use]
    pub fn visibility(self) -> Self {
        Self::from_bits_truncate(self.bits() & TYPE_VISIBILITY_MASK)
    }

    /// Extract the layout bits from the full attribute word
    #[must_use]
    pub fn layout(self) -> Self {
        Self::from_bits_truncate(self.bits() & TYPE_LAYOUT_MASK)
    }
}
