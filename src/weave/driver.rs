//! The cloning driver.
//!
//! [`Weaver`] orchestrates one weave end to end:
//!
//! 1. Build the clone graph rooted at the source type.
//! 2. Compute **both** schedules up front - the creation order over
//!    containment and sibling edges, and the population order over
//!    dependency edges - so a cyclic input aborts before any target
//!    mutation.
//! 3. Seed the registry with the root pairing and run the creation pass
//!    through the dispatcher; every cloner's parent target exists before the
//!    child cloner is created.
//! 4. Flip the registry gate.
//! 5. Run the population pass; every reference a cloner rewrites has already
//!    been materialized by the order the dependency edges induce.
//!
//! A weave executes on one thread from start to finish and either completes
//! or fails with a typed error; the target is never partially repaired.

use crate::{
    graph::{try_topological_sort, IlGraph, Vertex},
    metadata::{GenericParamOwner, Module},
    weave::{
        cloners::{Cloner, RootTypeCloner},
        context::WeaveContext,
        discover, dispatch,
        options::WeaveOptions,
        registry::ClonerRegistry,
        rootimport::RootImporter,
    },
    Error, Result,
};

/// Drives one weave of a source root type into a target root type.
///
/// # Examples
///
/// ```rust
/// use cilweave::{Weaver, WeaveOptions};
/// use cilweave::metadata::{Module, TypeDef, TypeAttributes};
///
/// let mut source = Module::new("MixLib", "MixLib.dll");
/// source.add_type(TypeDef::new("Mix", "Source", TypeAttributes::PUBLIC));
/// let mut target = Module::new("App", "App.dll");
/// target.add_type(TypeDef::new("App", "Target", TypeAttributes::PUBLIC));
///
/// Weaver::new(&source, &mut target, WeaveOptions::new())
///     .weave("Mix.Source", "App.Target")?;
/// # Ok::<(), cilweave::Error>(())
/// ```
pub struct Weaver<'a> {
    source: &'a Module,
    target: &'a mut Module,
    options: WeaveOptions,
}

impl<'a> Weaver<'a> {
    /// Creates a driver over a source and an open-for-modification target.
    #[must_use]
    pub fn new(source: &'a Module, target: &'a mut Module, options: WeaveOptions) -> Self {
        Weaver {
            source,
            target,
            options,
        }
    }

    /// Weaves the members of `source_root` into `target_root`.
    ///
    /// Both names are canonical full names and must resolve in their
    /// respective modules; the target root must already exist.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeNotFound`] when a root name does not resolve
    /// - [`Error::CyclicDependency`] when the dependency edges admit no
    ///   order; the target is untouched in that case
    /// - Any reference rewriting error of the population pass
    pub fn weave(self, source_root: &str, target_root: &str) -> Result<()> {
        let source_root_id = self
            .source
            .type_by_name(source_root)
            .ok_or_else(|| Error::TypeNotFound(format!("{source_root} in {}", self.source.name())))?;
        let target_root_id = self
            .target
            .type_by_name(target_root)
            .ok_or_else(|| Error::TypeNotFound(format!("{target_root} in {}", self.target.name())))?;

        let discovery = discover::discover(self.source, source_root_id, &self.options);
        let graph = IlGraph::new(
            discovery.vertices,
            discovery.parent_edges,
            discovery.sibling_edges,
            discovery.dependency_edges,
        )?;

        let mut creation_edges = graph.parent_edges().to_vec();
        creation_edges.extend_from_slice(graph.sibling_edges());
        let creation_order = try_topological_sort(graph.vertices(), &creation_edges)
            .map_err(|scc| cycle_error(self.source, &scc))?;

        // Prerequisites must precede dependents, so the stored
        // (dependent, prerequisite) pairs are fed to the sorter reversed.
        let population_edges: Vec<(Vertex, Vertex)> = graph
            .dependency_edges()
            .iter()
            .map(|&(dependent, prerequisite)| (prerequisite, dependent))
            .collect();
        let population_order = try_topological_sort(graph.vertices(), &population_edges)
            .map_err(|scc| cycle_error(self.source, &scc))?;

        let Weaver {
            source,
            target,
            options,
        } = self;
        let source_root_name = source.type_full_name(source_root_id);
        let target_root_name = target.type_full_name(target_root_id);
        let mut ctx = WeaveContext {
            source,
            target,
            options: &options,
            source_root: source_root_id,
            target_root: target_root_id,
            source_root_name: source_root_name.clone(),
            target_root_name: target_root_name.clone(),
        };

        let mut registry = ClonerRegistry::new();
        registry.add(Cloner::Root(RootTypeCloner {
            source: source_root_id,
            target: target_root_id,
        }))?;
        for &vertex in &creation_order {
            dispatch::discover_cloners(vertex, &mut ctx, &graph, &mut registry)?;
        }
        registry.set_all_cloners_added()?;

        let mut importer = RootImporter::new(&source_root_name, &target_root_name);
        for &vertex in &population_order {
            for index in registry.cloner_indices(vertex).to_vec() {
                let cloner = registry.mark_populated(index)?;
                cloner.populate(&mut ctx, &registry, &mut importer)?;
            }
        }
        Ok(())
    }
}

/// Renders a cycle error with fully-qualified member names.
fn cycle_error(source: &Module, scc: &[Vertex]) -> Error {
    let members: Vec<String> = scc.iter().map(|&v| describe_vertex(source, v)).collect();
    Error::CyclicDependency(members.join(", "))
}

/// Renders a vertex as the fully-qualified name of its source entity.
fn describe_vertex(source: &Module, vertex: Vertex) -> String {
    match vertex {
        Vertex::Type(id) => source.type_full_name(id),
        Vertex::GenericParameter(gp) => match gp.owner {
            GenericParamOwner::Type(t) => {
                format!("!{} on {}", gp.position, source.type_full_name(t))
            }
            GenericParamOwner::Method(m) => {
                format!("!!{} on {}", gp.position, source.method_full_name(m))
            }
        },
        Vertex::Field(id) => source.field_full_name(id),
        Vertex::Method(id) => source.method_full_name(id),
        Vertex::Parameter(p) => {
            format!("parameter {} of {}", p.index, source.method_full_name(p.method))
        }
        Vertex::Variable(v) => {
            format!("variable {} of {}", v.index, source.method_full_name(v.method))
        }
        Vertex::Instruction(i) => {
            format!(
                "instruction {} of {}",
                i.index,
                source.method_full_name(i.method)
            )
        }
        Vertex::ExceptionHandler(h) => {
            format!("handler {} of {}", h.index, source.method_full_name(h.method))
        }
        Vertex::Property(id) => {
            let def = source.property(id);
            format!("{}::{}", source.type_full_name(def.declaring), def.name)
        }
        Vertex::Event(id) => {
            let def = source.event(id);
            format!("{}::{}", source.type_full_name(def.declaring), def.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldAttributes, TypeRef};
    use crate::test::factories;

    #[test]
    fn test_missing_roots_are_named() {
        let (source, _) = factories::module_with_root("Mix", "Source");
        let (mut target, _) = factories::module_with_root("App", "Target");

        let err = Weaver::new(&source, &mut target, WeaveOptions::new())
            .weave("Mix.Absent", "App.Target")
            .unwrap_err();
        assert!(matches!(err, Error::TypeNotFound(ref m) if m.contains("Mix.Absent")));

        let err = Weaver::new(&source, &mut target, WeaveOptions::new())
            .weave("Mix.Source", "App.Absent")
            .unwrap_err();
        assert!(matches!(err, Error::TypeNotFound(ref m) if m.contains("App.Absent")));
    }

    #[test]
    fn test_empty_root_weaves_nothing() {
        let (source, _) = factories::module_with_root("Mix", "Source");
        let (mut target, target_root) = factories::module_with_root("App", "Target");

        Weaver::new(&source, &mut target, WeaveOptions::new())
            .weave("Mix.Source", "App.Target")
            .unwrap();

        let root = target.type_(target_root);
        assert!(root.fields.is_empty());
        assert!(root.methods.is_empty());
        assert!(root.custom_attributes.is_empty());
        assert_eq!(target.type_count(), 1);
    }

    #[test]
    fn test_field_cloning_end_to_end() {
        let (mut source, source_root) = factories::module_with_root("Mix", "Source");
        let field = factories::add_field(
            &mut source,
            source_root,
            "Count",
            TypeRef::core("System.Int32"),
        );
        source.field_mut(field).attributes = FieldAttributes::PRIVATE | FieldAttributes::STATIC;
        let (mut target, target_root) = factories::module_with_root("App", "Target");

        Weaver::new(&source, &mut target, WeaveOptions::new())
            .weave("Mix.Source", "App.Target")
            .unwrap();

        let fields = &target.type_(target_root).fields;
        assert_eq!(fields.len(), 1);
        let cloned = target.field(fields[0]);
        assert_eq!(cloned.name, "Count");
        assert_eq!(
            cloned.attributes,
            FieldAttributes::PRIVATE | FieldAttributes::STATIC
        );
        assert_eq!(cloned.field_type, TypeRef::core("System.Int32"));
    }

    #[test]
    fn test_weave_is_deterministic() {
        let build_source = || {
            let (mut source, root) = factories::module_with_root("Mix", "Source");
            factories::add_field(&mut source, root, "A", TypeRef::core("System.Int32"));
            factories::add_field(&mut source, root, "B", TypeRef::core("System.String"));
            factories::add_void_method(&mut source, root, "Run", &[]);
            source
        };

        let run = || {
            let source = build_source();
            let (mut target, target_root) = factories::module_with_root("App", "Target");
            Weaver::new(&source, &mut target, WeaveOptions::new())
                .weave("Mix.Source", "App.Target")
                .unwrap();
            let names: Vec<String> = target
                .type_(target_root)
                .fields
                .iter()
                .map(|&f| target.field(f).name.clone())
                .collect();
            names
        };

        assert_eq!(run(), run());
        assert_eq!(run(), vec!["A".to_string(), "B".to_string()]);
    }
}
