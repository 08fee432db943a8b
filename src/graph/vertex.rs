//! Vertex handles for the clone graph.
//!
//! A [`Vertex`] is an opaque handle to one source-module entity reachable from
//! the weave root. The handle carries its [`VertexKind`] structurally, as a
//! closed sum over the entity id types, so kind dispatch is exhaustive at
//! compile time.

use std::fmt;

use strum::{Display, EnumIter};

use crate::metadata::{
    EventId, FieldId, GenericParamId, HandlerId, InstructionId, MethodId, ParamId, PropertyId,
    TypeId, VariableId,
};

/// The kind of a clone graph vertex.
///
/// Sibling edges may only connect vertices of identical kind, and the
/// dispatcher's factory table is indexed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum VertexKind {
    /// A type definition
    Type,
    /// A generic parameter of a type or method
    GenericParameter,
    /// A field definition
    Field,
    /// A method definition
    Method,
    /// A parameter of a method
    Parameter,
    /// A local variable of a method body
    Variable,
    /// An instruction of a method body
    Instruction,
    /// An exception handler clause of a method body
    ExceptionHandler,
    /// A property definition
    Property,
    /// An event definition
    Event,
}

/// An opaque handle to a source entity in the clone graph.
///
/// Vertices are small `Copy` values; kind-specific data is accessed through
/// the source module using the wrapped id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// A type definition vertex
    Type(TypeId),
    /// A generic parameter vertex
    GenericParameter(GenericParamId),
    /// A field vertex
    Field(FieldId),
    /// A method vertex
    Method(MethodId),
    /// A parameter vertex
    Parameter(ParamId),
    /// A variable vertex
    Variable(VariableId),
    /// An instruction vertex
    Instruction(InstructionId),
    /// An exception handler vertex
    ExceptionHandler(HandlerId),
    /// A property vertex
    Property(PropertyId),
    /// An event vertex
    Event(EventId),
}

impl Vertex {
    /// Returns the vertex's kind.
    #[must_use]
    pub fn kind(self) -> VertexKind {
        match self {
            Vertex::Type(_) => VertexKind::Type,
            Vertex::GenericParameter(_) => VertexKind::GenericParameter,
            Vertex::Field(_) => VertexKind::Field,
            Vertex::Method(_) => VertexKind::Method,
            Vertex::Parameter(_) => VertexKind::Parameter,
            Vertex::Variable(_) => VertexKind::Variable,
            Vertex::Instruction(_) => VertexKind::Instruction,
            Vertex::ExceptionHandler(_) => VertexKind::ExceptionHandler,
            Vertex::Property(_) => VertexKind::Property,
            Vertex::Event(_) => VertexKind::Event,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Type(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::GenericParameter(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Field(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Method(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Parameter(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Variable(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Instruction(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::ExceptionHandler(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Property(id) => write!(f, "{}:{id}", self.kind()),
            Vertex::Event(id) => write!(f, "{}:{id}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Vertex::Type(TypeId::new(0)).kind(), VertexKind::Type);
        assert_eq!(
            Vertex::Instruction(InstructionId {
                method: MethodId::new(2),
                index: 9
            })
            .kind(),
            VertexKind::Instruction
        );
    }

    #[test]
    fn test_kind_enumeration_is_closed() {
        assert_eq!(VertexKind::iter().count(), 10);
    }

    #[test]
    fn test_display_names_kind_and_entity() {
        let v = Vertex::Field(FieldId::new(4));
        assert_eq!(v.to_string(), "Field:f4");
    }
}
