//! Ordinary metadata reference importer.
//!
//! [`ReferenceImporter`] translates references that are *not* part of a mixin
//! closure from a source module's frame into a target module's frame. A
//! module-local definition becomes an external named reference scoped to the
//! source's declaring assembly; external references are carried through
//! unchanged. Either way the declaring assembly is registered in the target's
//! assembly-reference closure on first use, so every imported reference
//! resolves within the closure afterwards.
//!
//! Closed generic instances and arrays are imported structurally. Open-generic
//! rewriting of external definitions is not performed: an open definition
//! flows through as an ordinary named reference.

use crate::metadata::{
    member::{FieldRef, MethodRef},
    module::Module,
    types::TypeRef,
};

/// Imports non-mixin references into a target module's frame.
///
/// The importer is stateless; callers that need memoization layer it on top
/// (reference rewriting caches by source full name).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceImporter;

impl ReferenceImporter {
    /// Imports a type reference from `source`'s frame into `target`'s frame.
    ///
    /// A [`TypeRef::Definition`] is externalized against the source assembly;
    /// composite shapes are imported structurally. Generic parameters are
    /// outside the importer's contract (they resolve through cloner
    /// registration) and are carried through unchanged.
    #[must_use]
    pub fn import_type(source: &Module, target: &mut Module, r: &TypeRef) -> TypeRef {
        match r {
            TypeRef::Definition(id) => {
                target.ensure_assembly_ref(source.assembly());
                TypeRef::External {
                    assembly: source.assembly().to_string(),
                    full_name: source.type_full_name(*id),
                }
            }
            TypeRef::External { assembly, .. } => {
                target.ensure_assembly_ref(assembly);
                r.clone()
            }
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(Self::import_type(source, target, element)),
                rank: *rank,
            },
            TypeRef::GenericInstance {
                definition,
                arguments,
            } => TypeRef::GenericInstance {
                definition: Box::new(Self::import_type(source, target, definition)),
                arguments: arguments
                    .iter()
                    .map(|a| Self::import_type(source, target, a))
                    .collect(),
            },
            TypeRef::GenericParameter(_) => r.clone(),
        }
    }

    /// Imports a field reference whose declaring type was already imported.
    ///
    /// The resulting reference is unresolved (no local definition); it names
    /// the field through the imported declaring type.
    #[must_use]
    pub fn import_field(
        source: &Module,
        target: &mut Module,
        r: &FieldRef,
        imported_declaring: TypeRef,
    ) -> FieldRef {
        FieldRef {
            declaring: imported_declaring,
            name: r.name.clone(),
            field_type: Self::import_type(source, target, &r.field_type),
            definition: None,
        }
    }

    /// Imports a method reference whose declaring type was already imported.
    ///
    /// Signature types are imported structurally; generic arguments, when
    /// present, are imported as closed shapes. The resulting reference is
    /// unresolved.
    #[must_use]
    pub fn import_method(
        source: &Module,
        target: &mut Module,
        r: &MethodRef,
        imported_declaring: TypeRef,
    ) -> MethodRef {
        MethodRef {
            declaring: imported_declaring,
            name: r.name.clone(),
            has_this: r.has_this,
            explicit_this: r.explicit_this,
            return_type: Self::import_type(source, target, &r.return_type),
            params: r
                .params
                .iter()
                .map(|p| Self::import_type(source, target, p))
                .collect(),
            generic_arity: r.generic_arity,
            generic_args: r
                .generic_args
                .iter()
                .map(|a| Self::import_type(source, target, a))
                .collect(),
            definition: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::flags::TypeAttributes;
    use crate::metadata::types::TypeDef;

    #[test]
    fn test_definition_is_externalized() {
        let mut source = Module::new("MixLib", "MixLib.dll");
        let id = source.add_type(TypeDef::new("Mix", "Helper", TypeAttributes::PUBLIC));
        let mut target = Module::new("App", "App.dll");

        let imported =
            ReferenceImporter::import_type(&source, &mut target, &TypeRef::Definition(id));
        assert_eq!(
            imported,
            TypeRef::External {
                assembly: "MixLib".to_string(),
                full_name: "Mix.Helper".to_string(),
            }
        );
        assert_eq!(target.assembly_refs(), ["MixLib".to_string()]);
    }

    #[test]
    fn test_external_registers_assembly_once() {
        let source = Module::new("MixLib", "MixLib.dll");
        let mut target = Module::new("App", "App.dll");
        let r = TypeRef::core("System.Int32");

        let first = ReferenceImporter::import_type(&source, &mut target, &r);
        let second = ReferenceImporter::import_type(&source, &mut target, &r);
        assert_eq!(first, r);
        assert_eq!(second, r);
        assert_eq!(target.assembly_refs().len(), 1);
    }

    #[test]
    fn test_generic_instance_imports_structurally() {
        let mut source = Module::new("MixLib", "MixLib.dll");
        let id = source.add_type(TypeDef::new("Mix", "Payload", TypeAttributes::PUBLIC));
        let mut target = Module::new("App", "App.dll");

        let closed = TypeRef::GenericInstance {
            definition: Box::new(TypeRef::core("System.Collections.Generic.List`1")),
            arguments: vec![TypeRef::Definition(id)],
        };
        let imported = ReferenceImporter::import_type(&source, &mut target, &closed);
        assert_eq!(
            target.type_ref_name(&imported),
            "System.Collections.Generic.List`1<Mix.Payload>"
        );
        assert_eq!(target.assembly_refs().len(), 2);
    }
}
