//! Custom attribute model.
//!
//! A [`CustomAttribute`] pairs a constructor reference with its decoded
//! positional and named arguments. Argument payloads are modeled as a closed
//! union; the [`AttributeArgument::Type`] case carries a [`TypeRef`], which is
//! what lets `typeof(...)` payloads be rewritten when an attribute crosses the
//! module boundary during a weave.

use crate::metadata::{member::MethodRef, types::TypeRef};

/// A decoded custom attribute argument payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArgument {
    /// Boolean payload
    Bool(bool),
    /// 32-bit integer payload
    Int32(i32),
    /// 64-bit integer payload
    Int64(i64),
    /// 64-bit float payload
    Float64(f64),
    /// String payload
    String(String),
    /// Type reference payload, the decoded form of `typeof(...)`
    Type(TypeRef),
    /// Enum payload: the enum type and its underlying value
    Enum {
        /// The enum type
        enum_type: TypeRef,
        /// The underlying integral value
        value: i64,
    },
    /// Array payload
    Array(Vec<AttributeArgument>),
}

/// A named (field or property) custom attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    /// The field or property name being assigned
    pub name: String,
    /// The assigned payload
    pub value: AttributeArgument,
}

/// A custom attribute application.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttribute {
    /// The attribute constructor being invoked
    pub constructor: MethodRef,
    /// Positional constructor arguments, in order
    pub args: Vec<AttributeArgument>,
    /// Named field/property assignments, in order
    pub named_args: Vec<NamedArgument>,
}

impl CustomAttribute {
    /// Full name of the attribute type, as rendered by the constructor's
    /// declaring reference when it is externally named.
    ///
    /// Module-local declaring types have no name without their module; the
    /// module-aware rendering lives on [`crate::metadata::Module`].
    #[must_use]
    pub fn external_type_name(&self) -> Option<&str> {
        match &self.constructor.declaring {
            TypeRef::External { full_name, .. } => Some(full_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(full_name: &str) -> CustomAttribute {
        CustomAttribute {
            constructor: MethodRef {
                declaring: TypeRef::core(full_name),
                name: ".ctor".to_string(),
                has_this: true,
                explicit_this: false,
                return_type: TypeRef::core("System.Void"),
                params: Vec::new(),
                generic_arity: 0,
                generic_args: Vec::new(),
                definition: None,
            },
            args: Vec::new(),
            named_args: Vec::new(),
        }
    }

    #[test]
    fn test_external_type_name() {
        let a = attr("System.ObsoleteAttribute");
        assert_eq!(a.external_type_name(), Some("System.ObsoleteAttribute"));
    }

    #[test]
    fn test_type_argument_payload() {
        let payload = AttributeArgument::Type(TypeRef::core("System.Int32"));
        match payload {
            AttributeArgument::Type(TypeRef::External { full_name, .. }) => {
                assert_eq!(full_name, "System.Int32");
            }
            _ => panic!("expected type payload"),
        }
    }
}
