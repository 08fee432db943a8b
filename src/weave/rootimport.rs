//! Root-import reference rewriting engine.
//!
//! Root-import is the substitution function that maps any reference held in
//! the source module's frame to the equivalent reference in the target
//! module's frame. Mixin-cloned entities are *redirected* to their cloned
//! targets through the registry; everything else delegates to the ordinary
//! [`ReferenceImporter`]. Composite type shapes (arrays, generic instances)
//! are rewritten by structural recursion over the reference union.
//!
//! # Caches
//!
//! The engine memoizes by reference kind, keyed by the source reference's
//! canonical full name: one cache each for types, fields, and methods.
//! Caches are monotonic for the duration of a weave and are never evicted,
//! so repeated imports of one source reference always yield equal results.
//!
//! # Correctness
//!
//! After a full weave, every reference reachable from the target root points
//! into the target module or into an assembly the target module references;
//! no reference points into the source module.

use rustc_hash::FxHashMap;

use crate::{
    graph::Vertex,
    metadata::{
        FieldRef, GenericParamId, InstructionId, MethodRef, Module, ParamId, ReferenceImporter,
        TypeRef, VariableId,
    },
    weave::{
        registry::{ClonerRegistry, Target},
        signature,
    },
    Error, Result,
};

/// The reference rewriting engine of one weave.
///
/// Holds the substitution caches and the root names anchoring the signature
/// oracle. One engine instance lives exactly as long as its weave.
pub struct RootImporter {
    source_root_name: String,
    target_root_name: String,
    types: FxHashMap<String, TypeRef>,
    fields: FxHashMap<String, FieldRef>,
    methods: FxHashMap<String, MethodRef>,
}

impl RootImporter {
    /// Creates an engine for one weave.
    ///
    /// # Arguments
    ///
    /// * `source_root_name` - Canonical full name of the source root type
    /// * `target_root_name` - Canonical full name of the target root type
    #[must_use]
    pub fn new(source_root_name: &str, target_root_name: &str) -> Self {
        RootImporter {
            source_root_name: source_root_name.to_string(),
            target_root_name: target_root_name.to_string(),
            types: FxHashMap::default(),
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// Rewrites a type reference into the target frame.
    ///
    /// The checks run in order: generic parameter resolution, cache hit,
    /// array recursion, generic instance recursion, mixin redirection,
    /// ordinary import. Importing an already-imported external-shaped
    /// reference is a structural no-op, so the operation is idempotent over
    /// everything the ordinary importer produces.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownGenericParameter`] for an unregistered generic parameter
    /// - [`Error::UnmaterializedGenericParameter`] when its target is deferred
    pub fn import_type_ref(
        &mut self,
        source: &Module,
        target: &mut Module,
        registry: &ClonerRegistry,
        r: &TypeRef,
    ) -> Result<TypeRef> {
        if let TypeRef::GenericParameter(gp) = r {
            return self.import_generic_parameter(source, registry, *gp);
        }

        let key = source.type_ref_name(r);
        if let Some(cached) = self.types.get(&key) {
            return Ok(cached.clone());
        }

        let imported = match r {
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(self.import_type_ref(source, target, registry, element)?),
                rank: *rank,
            },
            TypeRef::GenericInstance {
                definition,
                arguments,
            } => {
                let definition = self.import_type_ref(source, target, registry, definition)?;
                let mut imported_args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    imported_args.push(self.import_type_ref(source, target, registry, argument)?);
                }
                TypeRef::GenericInstance {
                    definition: Box::new(definition),
                    arguments: imported_args,
                }
            }
            TypeRef::Definition(id) => {
                match registry.try_get_target_for(Vertex::Type(*id))? {
                    Some(Target::Type(cloned)) => TypeRef::Definition(cloned),
                    _ => ReferenceImporter::import_type(source, target, r),
                }
            }
            _ => ReferenceImporter::import_type(source, target, r),
        };

        self.types.insert(key, imported.clone());
        Ok(imported)
    }

    /// Resolves a generic parameter through the registry.
    ///
    /// Post-condition: the returned parameter and its owner belong to the
    /// target module.
    fn import_generic_parameter(
        &self,
        source: &Module,
        registry: &ClonerRegistry,
        gp: GenericParamId,
    ) -> Result<TypeRef> {
        match registry.generic_parameter_slot(gp) {
            None => Err(Error::UnknownGenericParameter(describe_generic_param(
                source, gp,
            ))),
            Some(None) => Err(Error::UnmaterializedGenericParameter(
                describe_generic_param(source, gp),
            )),
            Some(Some(target)) => Ok(TypeRef::GenericParameter(target)),
        }
    }

    /// Rewrites a field reference into the target frame.
    ///
    /// The declaring type is root-imported first. A registry hit redirects
    /// to the cloned field; a generic-instance declaring type yields a fresh
    /// reference reattached to the imported instance. Everything else
    /// delegates to the ordinary importer.
    ///
    /// # Errors
    ///
    /// Propagates declaring-type import failures.
    pub fn import_field_ref(
        &mut self,
        source: &Module,
        target: &mut Module,
        registry: &ClonerRegistry,
        r: &FieldRef,
    ) -> Result<FieldRef> {
        let key = source.field_ref_name(r);
        if let Some(cached) = self.fields.get(&key) {
            return Ok(cached.clone());
        }

        let declaring = self.import_type_ref(source, target, registry, &r.declaring)?;

        let cloned_target = match r.definition {
            Some(id) => match registry.try_get_target_for(Vertex::Field(id))? {
                Some(Target::Field(cloned)) => Some(cloned),
                _ => None,
            },
            None => None,
        };

        // Redirected references carry the source signature root-imported, not
        // the target definition's current slots: a reference can be rewritten
        // before the referenced member's own cloner has populated.
        let imported = match cloned_target {
            Some(cloned) => FieldRef {
                declaring,
                name: r.name.clone(),
                field_type: self.import_type_ref(source, target, registry, &r.field_type)?,
                definition: Some(cloned),
            },
            None => ReferenceImporter::import_field(source, target, r, declaring),
        };

        self.fields.insert(key, imported.clone());
        Ok(imported)
    }

    /// Rewrites a method reference into the target frame.
    ///
    /// The declaring type is root-imported first. A generic instance method
    /// resolves its open definition (registry redirection, then local
    /// signature matching), reattaches it to the imported declaring type,
    /// and re-instantiates with root-imported arguments. A non-generic
    /// method redirects through the registry, or resolves locally within an
    /// imported local declaring type, or delegates to the ordinary importer.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvedDeclaringType`] when local resolution is needed
    ///   but the imported declaring type is not a target definition
    /// - [`Error::SignatureMatchMissing`] when no local method matches the
    ///   substituted signature
    pub fn import_method_ref(
        &mut self,
        source: &Module,
        target: &mut Module,
        registry: &ClonerRegistry,
        r: &MethodRef,
    ) -> Result<MethodRef> {
        let key = source.method_ref_name(r);
        if let Some(cached) = self.methods.get(&key) {
            return Ok(cached.clone());
        }

        let declaring = self.import_type_ref(source, target, registry, &r.declaring)?;

        let imported = if r.is_generic_instance() {
            let open = r.open();
            let mut open_target =
                self.resolve_open_method(source, target, registry, &open, &declaring)?;
            if declaring.is_generic_instance() {
                open_target.declaring = declaring;
            }
            let mut generic_args = Vec::with_capacity(r.generic_args.len());
            for argument in &r.generic_args {
                generic_args.push(self.import_type_ref(source, target, registry, argument)?);
            }
            MethodRef {
                generic_args,
                ..open_target
            }
        } else {
            self.resolve_open_method(source, target, registry, r, &declaring)?
        };

        self.methods.insert(key, imported.clone());
        Ok(imported)
    }

    /// Resolves a non-instantiated method reference against the imported
    /// declaring type.
    fn resolve_open_method(
        &mut self,
        source: &Module,
        target: &mut Module,
        registry: &ClonerRegistry,
        r: &MethodRef,
        declaring: &TypeRef,
    ) -> Result<MethodRef> {
        let cloned_target = match r.definition {
            Some(id) => match registry.try_get_target_for(Vertex::Method(id))? {
                Some(Target::Method(cloned)) => Some(cloned),
                _ => None,
            },
            None => None,
        };

        // As with fields, a redirected method reference is assembled from the
        // source signature root-imported plus the cloned definition's
        // identity; the cloned method may not have populated yet.
        if let Some(cloned) = cloned_target {
            let mut params = Vec::with_capacity(r.params.len());
            for param in &r.params {
                params.push(self.import_type_ref(source, target, registry, param)?);
            }
            return Ok(MethodRef {
                declaring: declaring.clone(),
                name: r.name.clone(),
                has_this: r.has_this,
                explicit_this: r.explicit_this,
                return_type: self.import_type_ref(source, target, registry, &r.return_type)?,
                params,
                generic_arity: r.generic_arity,
                generic_args: Vec::new(),
                definition: Some(cloned),
            });
        }

        match declaring.open_definition().as_definition() {
            Some(local_type) => {
                // Match against the open declaring shape: local definitions
                // render without instantiation arguments.
                let mut probe = r.clone();
                probe.declaring = r.declaring.open_definition().clone();
                let source_signature = source.method_ref_name(&probe);
                let matched = signature::find_matching_method(
                    target,
                    local_type,
                    &source_signature,
                    &self.source_root_name,
                    &self.target_root_name,
                )
                .ok_or_else(|| {
                    Error::SignatureMatchMissing(
                        source_signature
                            .replace(&self.source_root_name, &self.target_root_name),
                    )
                })?;
                let mut reference = target.method_ref_to(matched);
                if declaring.is_generic_instance() {
                    reference.declaring = declaring.clone();
                }
                Ok(reference)
            }
            None => {
                if declaring.open_definition() == &TypeRef::core("System.Void") {
                    return Err(Error::UnresolvedDeclaringType(source.method_ref_name(r)));
                }
                Ok(ReferenceImporter::import_method(
                    source,
                    target,
                    r,
                    declaring.clone(),
                ))
            }
        }
    }

    /// Maps a parameter reference to its cloned target, or returns the
    /// original for parameters outside the cloning closure.
    ///
    /// # Errors
    ///
    /// Propagates registry gate violations.
    pub fn map_parameter(&self, registry: &ClonerRegistry, p: ParamId) -> Result<ParamId> {
        Ok(match registry.try_get_target_for(Vertex::Parameter(p))? {
            Some(Target::Parameter(mapped)) => mapped,
            _ => p,
        })
    }

    /// Maps a variable reference to its cloned target, or returns the
    /// original for variables outside the cloning closure.
    ///
    /// # Errors
    ///
    /// Propagates registry gate violations.
    pub fn map_variable(&self, registry: &ClonerRegistry, v: VariableId) -> Result<VariableId> {
        Ok(match registry.try_get_target_for(Vertex::Variable(v))? {
            Some(Target::Variable(mapped)) => mapped,
            _ => v,
        })
    }

    /// Maps an instruction reference to its cloned target, or returns the
    /// original for instructions outside the cloning closure.
    ///
    /// # Errors
    ///
    /// Propagates registry gate violations.
    pub fn map_instruction(
        &self,
        registry: &ClonerRegistry,
        i: InstructionId,
    ) -> Result<InstructionId> {
        Ok(match registry.try_get_target_for(Vertex::Instruction(i))? {
            Some(Target::Instruction(mapped)) => mapped,
            _ => i,
        })
    }
}

/// Renders a generic parameter for diagnostics: name, position, and owner
/// full name.
fn describe_generic_param(source: &Module, gp: GenericParamId) -> String {
    use crate::metadata::GenericParamOwner;
    match gp.owner {
        GenericParamOwner::Type(t) => {
            let name = source
                .type_(t)
                .generic_params
                .get(gp.position as usize)
                .map_or("?", |d| d.name.as_str());
            format!("{name} at {} on {}", gp.position, source.type_full_name(t))
        }
        GenericParamOwner::Method(m) => {
            let name = source
                .method(m)
                .generic_params
                .get(gp.position as usize)
                .map_or("?", |d| d.name.as_str());
            format!(
                "{name} at {} on {}",
                gp.position,
                source.method_full_name(m)
            )
        }
    }
}
