//! Reachability discovery over the source root.
//!
//! Walks the transitive closure of entities contained in the source root type
//! and emits the vertex set and three edge sets the clone graph is built
//! from. The walk order is deterministic (declaration order throughout),
//! which the stable scheduler turns into deterministic output.
//!
//! Dependency edges are emitted *(dependent, prerequisite)*:
//!
//! - a type depends on its generic parameters,
//! - a method depends on its generic parameters, parameters, and variables,
//! - a method depends on the in-closure types and fields its instructions
//!   reference,
//! - a property or event depends on its accessor methods.
//!
//! Method-to-method dependency edges are not emitted: mutually recursive
//! mixin methods would make every such input cyclic, and operand rewriting
//! resolves callee references against shells that the creation pass has
//! already materialized.
//!
//! Members carrying the configured skip attribute are excluded together with
//! everything they contain.

use rustc_hash::FxHashSet;

use crate::{
    graph::Vertex,
    metadata::{
        FieldId, FieldRef, GenericParamId, GenericParamOwner, HandlerId, InstructionId, MethodId,
        MethodRef, Module, Operand, ParamId, TypeId, TypeRef, VariableId,
    },
    weave::options::WeaveOptions,
};

/// The vertex and edge sets produced by discovery.
pub(crate) struct Discovery {
    pub vertices: Vec<Vertex>,
    pub parent_edges: Vec<(Vertex, Vertex)>,
    pub sibling_edges: Vec<(Vertex, Vertex)>,
    pub dependency_edges: Vec<(Vertex, Vertex)>,
}

/// Walks the closure of `root` in `source`.
pub(crate) fn discover(source: &Module, root: TypeId, options: &WeaveOptions) -> Discovery {
    let mut walker = Walker {
        source,
        options,
        vertices: Vec::new(),
        parent_edges: Vec::new(),
        sibling_edges: Vec::new(),
        dependency_edges: Vec::new(),
        method_references: Vec::new(),
    };
    walker.walk_type(root, None);
    walker.finish()
}

struct Walker<'w> {
    source: &'w Module,
    options: &'w WeaveOptions,
    vertices: Vec<Vertex>,
    parent_edges: Vec<(Vertex, Vertex)>,
    sibling_edges: Vec<(Vertex, Vertex)>,
    dependency_edges: Vec<(Vertex, Vertex)>,
    // Candidate (method, referenced entity) pairs; filtered against the
    // final vertex set once the walk completes.
    method_references: Vec<(Vertex, Vertex)>,
}

impl Walker<'_> {
    fn walk_type(&mut self, id: TypeId, parent: Option<Vertex>) {
        let v = Vertex::Type(id);
        self.vertices.push(v);
        if let Some(p) = parent {
            self.parent_edges.push((p, v));
        }

        let def = self.source.type_(id);

        let mut prev = None;
        for position in 0..def.generic_params.len() {
            let gv = Vertex::GenericParameter(GenericParamId {
                owner: GenericParamOwner::Type(id),
                position: position as u16,
            });
            self.child(v, gv, &mut prev);
            self.dependency_edges.push((v, gv));
        }

        let fields: Vec<FieldId> = def.fields.clone();
        let mut prev = None;
        for field in fields {
            if self
                .options
                .skips(self.source, &self.source.field(field).custom_attributes)
            {
                continue;
            }
            let fv = Vertex::Field(field);
            self.child(v, fv, &mut prev);
        }

        let methods: Vec<MethodId> = def.methods.clone();
        let mut prev = None;
        for method in methods {
            if self
                .options
                .skips(self.source, &self.source.method(method).custom_attributes)
            {
                continue;
            }
            self.walk_method(v, method, &mut prev);
        }

        let properties = def.properties.clone();
        let mut prev = None;
        for property in properties {
            let def = self.source.property(property);
            if self.options.skips(self.source, &def.custom_attributes) {
                continue;
            }
            let pv = Vertex::Property(property);
            let accessors = [def.getter, def.setter];
            self.child(v, pv, &mut prev);
            for accessor in accessors.into_iter().flatten() {
                self.method_references.push((pv, Vertex::Method(accessor)));
            }
        }

        let events = def.events.clone();
        let mut prev = None;
        for event in events {
            let def = self.source.event(event);
            if self.options.skips(self.source, &def.custom_attributes) {
                continue;
            }
            let ev = Vertex::Event(event);
            let accessors = [def.add, def.remove, def.raise];
            self.child(v, ev, &mut prev);
            for accessor in accessors.into_iter().flatten() {
                self.method_references.push((ev, Vertex::Method(accessor)));
            }
        }

        let nested = def.nested.clone();
        let mut prev = None;
        for inner in nested {
            if self
                .options
                .skips(self.source, &self.source.type_(inner).custom_attributes)
            {
                continue;
            }
            let nv = Vertex::Type(inner);
            if let Some(previous) = prev {
                self.sibling_edges.push((previous, nv));
            }
            prev = Some(nv);
            self.walk_type(inner, Some(v));
        }
    }

    fn walk_method(&mut self, parent: Vertex, id: MethodId, prev: &mut Option<Vertex>) {
        let v = Vertex::Method(id);
        self.vertices.push(v);
        self.parent_edges.push((parent, v));
        if let Some(previous) = *prev {
            self.sibling_edges.push((previous, v));
        }
        *prev = Some(v);

        let def = self.source.method(id);

        let mut prev_child = None;
        for position in 0..def.generic_params.len() {
            let gv = Vertex::GenericParameter(GenericParamId {
                owner: GenericParamOwner::Method(id),
                position: position as u16,
            });
            self.child(v, gv, &mut prev_child);
            self.dependency_edges.push((v, gv));
        }

        let mut prev_child = None;
        for index in 0..def.params.len() {
            let pv = Vertex::Parameter(ParamId {
                method: id,
                index: index as u16,
            });
            self.child(v, pv, &mut prev_child);
            self.dependency_edges.push((v, pv));
        }

        let Some(body) = &def.body else {
            return;
        };

        let mut prev_child = None;
        for index in 0..body.variables.len() {
            let vv = Vertex::Variable(VariableId {
                method: id,
                index: index as u16,
            });
            self.child(v, vv, &mut prev_child);
            self.dependency_edges.push((v, vv));
        }

        let mut prev_child = None;
        for (index, instruction) in body.instructions.iter().enumerate() {
            let iv = Vertex::Instruction(InstructionId {
                method: id,
                index: index as u32,
            });
            self.child(v, iv, &mut prev_child);
            self.collect_operand_references(v, &instruction.operand);
        }

        let mut prev_child = None;
        for index in 0..body.handlers.len() {
            let hv = Vertex::ExceptionHandler(HandlerId {
                method: id,
                index: index as u16,
            });
            self.child(v, hv, &mut prev_child);
        }
    }

    fn child(&mut self, parent: Vertex, v: Vertex, prev: &mut Option<Vertex>) {
        self.vertices.push(v);
        self.parent_edges.push((parent, v));
        if let Some(previous) = *prev {
            self.sibling_edges.push((previous, v));
        }
        *prev = Some(v);
    }

    fn collect_operand_references(&mut self, method: Vertex, operand: &Operand) {
        match operand {
            Operand::Type(r) => self.collect_type_references(method, r),
            Operand::Field(r) => self.collect_field_references(method, r),
            Operand::Method(r) => self.collect_method_references(method, r),
            _ => {}
        }
    }

    fn collect_type_references(&mut self, method: Vertex, r: &TypeRef) {
        match r {
            TypeRef::Definition(id) => {
                self.method_references.push((method, Vertex::Type(*id)));
            }
            TypeRef::Array { element, .. } => self.collect_type_references(method, element),
            TypeRef::GenericInstance {
                definition,
                arguments,
            } => {
                self.collect_type_references(method, definition);
                for argument in arguments {
                    self.collect_type_references(method, argument);
                }
            }
            TypeRef::External { .. } | TypeRef::GenericParameter(_) => {}
        }
    }

    fn collect_field_references(&mut self, method: Vertex, r: &FieldRef) {
        if let Some(definition) = r.definition {
            self.method_references.push((method, Vertex::Field(definition)));
        }
        self.collect_type_references(method, &r.declaring);
        self.collect_type_references(method, &r.field_type);
    }

    fn collect_method_references(&mut self, method: Vertex, r: &MethodRef) {
        // Deliberately no edge to the referenced method vertex: recursion
        // between mixin methods must not cycle the population order.
        self.collect_type_references(method, &r.declaring);
        self.collect_type_references(method, &r.return_type);
        for param in &r.params {
            self.collect_type_references(method, param);
        }
        for argument in &r.generic_args {
            self.collect_type_references(method, argument);
        }
    }

    fn finish(mut self) -> Discovery {
        let members: FxHashSet<Vertex> = self.vertices.iter().copied().collect();
        let mut seen: FxHashSet<(Vertex, Vertex)> = self.dependency_edges.iter().copied().collect();
        for (from, to) in self.method_references.drain(..) {
            if from != to && members.contains(&to) && seen.insert((from, to)) {
                self.dependency_edges.push((from, to));
            }
        }
        Discovery {
            vertices: self.vertices,
            parent_edges: self.parent_edges,
            sibling_edges: self.sibling_edges,
            dependency_edges: self.dependency_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::factories;

    #[test]
    fn test_zero_member_root() {
        let (source, root) = factories::module_with_root("Mix", "Source");
        let discovery = discover(&source, root, &WeaveOptions::new());
        assert_eq!(discovery.vertices, vec![Vertex::Type(root)]);
        assert!(discovery.parent_edges.is_empty());
        assert!(discovery.sibling_edges.is_empty());
        assert!(discovery.dependency_edges.is_empty());
    }

    #[test]
    fn test_fields_are_ordered_siblings() {
        let (mut source, root) = factories::module_with_root("Mix", "Source");
        let a = factories::add_field(&mut source, root, "A", TypeRef::core("System.Int32"));
        let b = factories::add_field(&mut source, root, "B", TypeRef::core("System.Int32"));
        let c = factories::add_field(&mut source, root, "C", TypeRef::core("System.Int32"));

        let discovery = discover(&source, root, &WeaveOptions::new());
        assert_eq!(
            discovery.sibling_edges,
            vec![
                (Vertex::Field(a), Vertex::Field(b)),
                (Vertex::Field(b), Vertex::Field(c)),
            ]
        );
        assert!(discovery
            .parent_edges
            .contains(&(Vertex::Type(root), Vertex::Field(b))));
    }

    #[test]
    fn test_method_children_and_dependencies() {
        let (mut source, root) = factories::module_with_root("Mix", "Source");
        let method = factories::add_void_method(
            &mut source,
            root,
            "Run",
            &[TypeRef::core("System.Int32")],
        );
        factories::give_simple_body(&mut source, method, 1);

        let discovery = discover(&source, root, &WeaveOptions::new());
        let mv = Vertex::Method(method);
        let pv = Vertex::Parameter(ParamId { method, index: 0 });
        let vv = Vertex::Variable(VariableId { method, index: 0 });

        assert!(discovery.parent_edges.contains(&(Vertex::Type(root), mv)));
        assert!(discovery.parent_edges.contains(&(mv, pv)));
        assert!(discovery.dependency_edges.contains(&(mv, pv)));
        assert!(discovery.dependency_edges.contains(&(mv, vv)));
    }

    #[test]
    fn test_skip_marker_excludes_member_subtree() {
        let (mut source, root) = factories::module_with_root("Mix", "Source");
        let kept = factories::add_void_method(&mut source, root, "Kept", &[]);
        let skipped = factories::add_void_method(&mut source, root, "Skipped", &[]);
        source
            .method_mut(skipped)
            .custom_attributes
            .push(factories::marker_attribute("Weaving.SkipAttribute"));

        let options = WeaveOptions::new().skip_attribute("Weaving.SkipAttribute");
        let discovery = discover(&source, root, &options);
        assert!(discovery.vertices.contains(&Vertex::Method(kept)));
        assert!(!discovery.vertices.contains(&Vertex::Method(skipped)));
    }

    #[test]
    fn test_in_closure_operand_reference_becomes_dependency() {
        let (mut source, root) = factories::module_with_root("Mix", "Source");
        let field = factories::add_field(&mut source, root, "Count", TypeRef::core("System.Int32"));
        let method = factories::add_void_method(&mut source, root, "Bump", &[]);
        let field_ref = source.field_ref_to(field);
        factories::give_body_with(
            &mut source,
            method,
            vec![crate::metadata::Instruction::with_operand(
                crate::metadata::OpCode::Ldsfld,
                Operand::Field(field_ref),
            )],
        );

        let discovery = discover(&source, root, &WeaveOptions::new());
        assert!(discovery
            .dependency_edges
            .contains(&(Vertex::Method(method), Vertex::Field(field))));
        assert!(discovery
            .dependency_edges
            .contains(&(Vertex::Method(method), Vertex::Type(root))));
    }

    #[test]
    fn test_nested_types_walked_recursively() {
        let (mut source, root) = factories::module_with_root("Mix", "Source");
        let inner = factories::add_nested_type(&mut source, root, "Inner");
        let deep = factories::add_nested_type(&mut source, inner, "Deep");

        let discovery = discover(&source, root, &WeaveOptions::new());
        assert!(discovery
            .parent_edges
            .contains(&(Vertex::Type(root), Vertex::Type(inner))));
        assert!(discovery
            .parent_edges
            .contains(&(Vertex::Type(inner), Vertex::Type(deep))));
    }
}
