//! Strongly-typed identifiers for metadata object model entities.
//!
//! Every entity arena in a [`crate::metadata::Module`] is indexed by its own id
//! newtype. The wrappers prevent accidental mixing of indices between arenas and
//! between modules: an id is only meaningful against the module that issued it.
//! Entities owned by a method (parameters, variables, instructions, exception
//! handlers) use compound ids carrying the owning [`MethodId`] plus the position
//! inside the method, which keeps instruction identity stable for branch-target
//! mapping.

use std::fmt;

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Creates an id from a raw arena index.
            ///
            /// Normal usage obtains ids from the owning module's `add_*`
            /// methods; this constructor exists for internal use and tests.
            #[must_use]
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the raw 0-based arena index.
            #[must_use]
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id! {
    /// Identifier of a type definition within a module.
    TypeId, "t"
}
arena_id! {
    /// Identifier of a field definition within a module.
    FieldId, "f"
}
arena_id! {
    /// Identifier of a method definition within a module.
    MethodId, "m"
}
arena_id! {
    /// Identifier of a property definition within a module.
    PropertyId, "p"
}
arena_id! {
    /// Identifier of an event definition within a module.
    EventId, "e"
}

/// Identifier of a parameter, scoped to its declaring method.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ParamId {
    /// The method declaring the parameter
    pub method: MethodId,
    /// 0-based position in the parameter list
    pub index: u16,
}

/// Identifier of a local variable, scoped to its declaring method body.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VariableId {
    /// The method whose body declares the variable
    pub method: MethodId,
    /// 0-based slot in the variable table
    pub index: u16,
}

/// Identifier of an instruction, scoped to its declaring method body.
///
/// Instruction identity (not byte offset) is the currency of branch targets
/// and exception-handler ranges throughout the object model.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct InstructionId {
    /// The method whose body contains the instruction
    pub method: MethodId,
    /// 0-based position in the instruction stream
    pub index: u32,
}

/// Identifier of an exception handler clause, scoped to its declaring method body.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HandlerId {
    /// The method whose body contains the handler
    pub method: MethodId,
    /// 0-based position in the handler table
    pub index: u16,
}

/// The entity owning a generic parameter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum GenericParamOwner {
    /// Owned by a type definition
    Type(TypeId),
    /// Owned by a method definition
    Method(MethodId),
}

/// Identifier of a generic parameter, scoped to its owner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GenericParamId {
    /// The type or method declaring the parameter
    pub owner: GenericParamOwner,
    /// 0-based declaration position
    pub position: u16,
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:a{}", self.method, self.index)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.method, self.index)
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:i{}", self.method, self.index)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:h{}", self.method, self.index)
    }
}

impl fmt::Display for GenericParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            GenericParamOwner::Type(t) => write!(f, "{}:!{}", t, self.position),
            GenericParamOwner::Method(m) => write!(f, "{}:!!{}", m, self.position),
        }
    }
}
