//! The module object model.
//!
//! [`Module`] is the arena-owned, mutable object model of one assembly module:
//! every type, field, method, property, and event definition lives in a typed
//! arena and is addressed by a strongly-typed per-kind id. The module
//! also owns the assembly-reference closure and a full-name index over its
//! types, and renders the canonical full-name string forms that reference
//! rewriting keys its caches and signature comparisons on.
//!
//! # Canonical Name Forms
//!
//! - Types: `Namespace.Name`, nested types as `Enclosing/Nested`, arrays as
//!   `Element[]` (`Element[,]` for rank 2), generic instances as
//!   `Definition<Arg1,Arg2>`, generic parameters as `!n` (type owner) or
//!   `!!n` (method owner).
//! - Fields: `FieldType DeclaringType::Name`.
//! - Methods: `ReturnType DeclaringType::Name(Param1,Param2)`, with `` `n ``
//!   appended to the name of an open generic definition and `<Arg1,Arg2>` for
//!   a generic instance reference.
//!
//! These forms are stable within a weave and are the oracle substrate for
//! cross-module signature matching.

use rustc_hash::FxHashMap;

use crate::metadata::{
    body::Instruction,
    ids::{EventId, FieldId, GenericParamOwner, InstructionId, MethodId, PropertyId, TypeId},
    member::{EventDef, FieldDef, FieldRef, MethodDef, MethodRef, PropertyDef},
    types::{TypeDef, TypeRef},
};

/// The mutable object model of one assembly module.
///
/// All definition records are owned by per-kind arenas; membership and
/// nesting are id lists on the owning records. Ids issued by one module must
/// never be used against another: a weave maps ids across modules explicitly,
/// which is what keeps the source module immutable by construction (the
/// weaver only ever holds `&Module` for the source).
///
/// # Examples
///
/// ```rust
/// use cilweave::metadata::{Module, TypeDef, TypeAttributes};
///
/// let mut module = Module::new("MixTests", "MixTests.dll");
/// let root = module.add_type(TypeDef::new("Mix", "Source", TypeAttributes::PUBLIC));
/// assert_eq!(module.type_full_name(root), "Mix.Source");
/// assert_eq!(module.type_by_name("Mix.Source"), Some(root));
/// ```
#[derive(Debug, Clone)]
pub struct Module {
    assembly: String,
    name: String,
    types: Vec<TypeDef>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    properties: Vec<PropertyDef>,
    events: Vec<EventDef>,
    assembly_refs: Vec<String>,
    type_index: FxHashMap<String, TypeId>,
}

impl Module {
    /// Creates an empty module.
    ///
    /// # Arguments
    ///
    /// * `assembly` - Simple name of the declaring assembly
    /// * `name` - Module file name
    #[must_use]
    pub fn new(assembly: &str, name: &str) -> Self {
        Module {
            assembly: assembly.to_string(),
            name: name.to_string(),
            types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            assembly_refs: Vec::new(),
            type_index: FxHashMap::default(),
        }
    }

    /// Simple name of the declaring assembly.
    #[must_use]
    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    /// Module file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assembly-reference closure, in registration order.
    #[must_use]
    pub fn assembly_refs(&self) -> &[String] {
        &self.assembly_refs
    }

    /// Registers an assembly reference if not already present.
    ///
    /// Returns `true` when a new reference was registered. Registration order
    /// is insertion order, which keeps woven output deterministic.
    pub fn ensure_assembly_ref(&mut self, assembly: &str) -> bool {
        if self.assembly == assembly || self.assembly_refs.iter().any(|a| a == assembly) {
            return false;
        }
        self.assembly_refs.push(assembly.to_string());
        true
    }

    // ---------------------------------------------------------------
    // Arena mutation
    // ---------------------------------------------------------------

    /// Adds a type definition, wiring nesting and the full-name index.
    ///
    /// When `def.enclosing` is set, the new type is appended to the enclosing
    /// type's nested list; the enclosing type must already be in the arena.
    pub fn add_type(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId::new(self.types.len());
        let enclosing = def.enclosing;
        self.types.push(def);
        if let Some(parent) = enclosing {
            self.types[parent.index()].nested.push(id);
        }
        let full_name = self.type_full_name(id);
        self.type_index.insert(full_name, id);
        id
    }

    /// Adds a field definition, attaching it to its declaring type.
    pub fn add_field(&mut self, def: FieldDef) -> FieldId {
        let id = FieldId::new(self.fields.len());
        let declaring = def.declaring;
        self.fields.push(def);
        self.types[declaring.index()].fields.push(id);
        id
    }

    /// Adds a method definition, attaching it to its declaring type.
    pub fn add_method(&mut self, def: MethodDef) -> MethodId {
        let id = MethodId::new(self.methods.len());
        let declaring = def.declaring;
        self.methods.push(def);
        self.types[declaring.index()].methods.push(id);
        id
    }

    /// Adds a property definition, attaching it to its declaring type.
    pub fn add_property(&mut self, def: PropertyDef) -> PropertyId {
        let id = PropertyId::new(self.properties.len());
        let declaring = def.declaring;
        self.properties.push(def);
        self.types[declaring.index()].properties.push(id);
        id
    }

    /// Adds an event definition, attaching it to its declaring type.
    pub fn add_event(&mut self, def: EventDef) -> EventId {
        let id = EventId::new(self.events.len());
        let declaring = def.declaring;
        self.events.push(def);
        self.types[declaring.index()].events.push(id);
        id
    }

    // ---------------------------------------------------------------
    // Arena access
    // ---------------------------------------------------------------

    /// Borrows a type definition.
    #[must_use]
    pub fn type_(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    /// Mutably borrows a type definition.
    pub fn type_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.types[id.index()]
    }

    /// Borrows a field definition.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    /// Mutably borrows a field definition.
    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDef {
        &mut self.fields[id.index()]
    }

    /// Borrows a method definition.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.index()]
    }

    /// Mutably borrows a method definition.
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDef {
        &mut self.methods[id.index()]
    }

    /// Borrows a property definition.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> &PropertyDef {
        &self.properties[id.index()]
    }

    /// Mutably borrows a property definition.
    pub fn property_mut(&mut self, id: PropertyId) -> &mut PropertyDef {
        &mut self.properties[id.index()]
    }

    /// Borrows an event definition.
    #[must_use]
    pub fn event(&self, id: EventId) -> &EventDef {
        &self.events[id.index()]
    }

    /// Mutably borrows an event definition.
    pub fn event_mut(&mut self, id: EventId) -> &mut EventDef {
        &mut self.events[id.index()]
    }

    /// Number of type definitions in the module.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Iterates over all type ids in arena order.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len()).map(TypeId::new)
    }

    /// Resolves a type by its canonical full name.
    #[must_use]
    pub fn type_by_name(&self, full_name: &str) -> Option<TypeId> {
        self.type_index.get(full_name).copied()
    }

    /// Borrows an instruction through its identity.
    ///
    /// Returns `None` when the method has no body or the index is past the
    /// instruction stream.
    #[must_use]
    pub fn instruction(&self, id: InstructionId) -> Option<&Instruction> {
        self.method(id.method)
            .body
            .as_ref()
            .and_then(|b| b.instructions.get(id.index as usize))
    }

    // ---------------------------------------------------------------
    // Canonical name rendering
    // ---------------------------------------------------------------

    /// Renders the canonical full name of a type definition.
    #[must_use]
    pub fn type_full_name(&self, id: TypeId) -> String {
        let def = self.type_(id);
        match def.enclosing {
            Some(parent) => format!("{}/{}", self.type_full_name(parent), def.name),
            None if def.namespace.is_empty() => def.name.clone(),
            None => format!("{}.{}", def.namespace, def.name),
        }
    }

    /// Renders the canonical name of a type reference held by this module.
    #[must_use]
    pub fn type_ref_name(&self, r: &TypeRef) -> String {
        match r {
            TypeRef::Definition(id) => self.type_full_name(*id),
            TypeRef::External { full_name, .. } => full_name.clone(),
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{}]", self.type_ref_name(element), commas)
            }
            TypeRef::GenericInstance {
                definition,
                arguments,
            } => {
                let args: Vec<String> = arguments.iter().map(|a| self.type_ref_name(a)).collect();
                format!("{}<{}>", self.type_ref_name(definition), args.join(","))
            }
            TypeRef::GenericParameter(gp) => match gp.owner {
                GenericParamOwner::Type(_) => format!("!{}", gp.position),
                GenericParamOwner::Method(_) => format!("!!{}", gp.position),
            },
        }
    }

    /// Renders the canonical full name of a field definition.
    #[must_use]
    pub fn field_full_name(&self, id: FieldId) -> String {
        let def = self.field(id);
        format!(
            "{} {}::{}",
            self.type_ref_name(&def.field_type),
            self.type_full_name(def.declaring),
            def.name
        )
    }

    /// Renders the canonical name of a field reference held by this module.
    #[must_use]
    pub fn field_ref_name(&self, r: &FieldRef) -> String {
        format!(
            "{} {}::{}",
            self.type_ref_name(&r.field_type),
            self.type_ref_name(&r.declaring),
            r.name
        )
    }

    /// Renders the canonical full name of a method definition.
    #[must_use]
    pub fn method_full_name(&self, id: MethodId) -> String {
        let def = self.method(id);
        let generic = if def.generic_params.is_empty() {
            String::new()
        } else {
            format!("`{}", def.generic_params.len())
        };
        let params: Vec<String> = def
            .params
            .iter()
            .map(|p| self.type_ref_name(&p.param_type))
            .collect();
        format!(
            "{} {}::{}{}({})",
            self.type_ref_name(&def.return_type),
            self.type_full_name(def.declaring),
            def.name,
            generic,
            params.join(",")
        )
    }

    /// Renders the canonical name of a method reference held by this module.
    #[must_use]
    pub fn method_ref_name(&self, r: &MethodRef) -> String {
        let generic = if !r.generic_args.is_empty() {
            let args: Vec<String> = r.generic_args.iter().map(|a| self.type_ref_name(a)).collect();
            format!("<{}>", args.join(","))
        } else if r.generic_arity > 0 {
            format!("`{}", r.generic_arity)
        } else {
            String::new()
        };
        let params: Vec<String> = r.params.iter().map(|p| self.type_ref_name(p)).collect();
        format!(
            "{} {}::{}{}({})",
            self.type_ref_name(&r.return_type),
            self.type_ref_name(&r.declaring),
            r.name,
            generic,
            params.join(",")
        )
    }

    /// Builds a reference to a method defined in this module.
    ///
    /// The reference carries the definition's signature and resolves to the
    /// definition id.
    #[must_use]
    pub fn method_ref_to(&self, id: MethodId) -> MethodRef {
        let def = self.method(id);
        MethodRef {
            declaring: TypeRef::Definition(def.declaring),
            name: def.name.clone(),
            has_this: def.has_this,
            explicit_this: def.explicit_this,
            return_type: def.return_type.clone(),
            params: def.params.iter().map(|p| p.param_type.clone()).collect(),
            generic_arity: def.generic_params.len() as u16,
            generic_args: Vec::new(),
            definition: Some(id),
        }
    }

    /// Builds a reference to a field defined in this module.
    #[must_use]
    pub fn field_ref_to(&self, id: FieldId) -> FieldRef {
        let def = self.field(id);
        FieldRef {
            declaring: TypeRef::Definition(def.declaring),
            name: def.name.clone(),
            field_type: def.field_type.clone(),
            definition: Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::flags::TypeAttributes;
    use crate::test::factories;

    #[test]
    fn test_nested_type_full_name() {
        let mut module = Module::new("Probe", "Probe.dll");
        let outer = module.add_type(TypeDef::new("Ns", "Outer", TypeAttributes::PUBLIC));
        let mut inner = TypeDef::new("", "Inner", TypeAttributes::NESTED_PUBLIC);
        inner.enclosing = Some(outer);
        let inner = module.add_type(inner);

        assert_eq!(module.type_full_name(inner), "Ns.Outer/Inner");
        assert_eq!(module.type_by_name("Ns.Outer/Inner"), Some(inner));
        assert_eq!(module.type_(outer).nested, vec![inner]);
    }

    #[test]
    fn test_array_and_generic_instance_names() {
        let module = Module::new("Probe", "Probe.dll");
        let list = TypeRef::GenericInstance {
            definition: Box::new(TypeRef::core("System.Collections.Generic.List`1")),
            arguments: vec![TypeRef::core("System.Int32")],
        };
        assert_eq!(
            module.type_ref_name(&list),
            "System.Collections.Generic.List`1<System.Int32>"
        );
        let grid = TypeRef::Array {
            element: Box::new(TypeRef::core("System.Byte")),
            rank: 2,
        };
        assert_eq!(module.type_ref_name(&grid), "System.Byte[,]");
    }

    #[test]
    fn test_assembly_ref_registration_is_idempotent() {
        let mut module = Module::new("Probe", "Probe.dll");
        assert!(module.ensure_assembly_ref("System.Runtime"));
        assert!(!module.ensure_assembly_ref("System.Runtime"));
        assert!(!module.ensure_assembly_ref("Probe"));
        assert_eq!(module.assembly_refs(), ["System.Runtime".to_string()]);
    }

    #[test]
    fn test_method_full_name_rendering() {
        let (mut module, root) = factories::module_with_root("Mix", "Source");
        let method =
            factories::add_void_method(&mut module, root, "Run", &[TypeRef::core("System.Int32")]);
        assert_eq!(
            module.method_full_name(method),
            "System.Void Mix.Source::Run(System.Int32)"
        );
    }

    #[test]
    fn test_method_ref_to_resolves_definition() {
        let (mut module, root) = factories::module_with_root("Mix", "Source");
        let method = factories::add_void_method(&mut module, root, "Run", &[]);
        let r = module.method_ref_to(method);
        assert_eq!(r.definition, Some(method));
        assert_eq!(module.method_ref_name(&r), "System.Void Mix.Source::Run()");
    }
}
