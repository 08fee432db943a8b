//! Cloner registry and lifecycle gate.
//!
//! The registry owns every cloner of a weave and maps each source vertex to
//! its ordered cloner collection. Its lifecycle has two phases separated by a
//! one-shot gate:
//!
//! 1. **Discovery open** - cloners may be added; target lookups are forbidden.
//! 2. **Discovery closed** - additions are forbidden; target lookups serve
//!    the reference rewriting engine.
//!
//! Generic parameter targets are two-step handles: declared as a deferred
//! placeholder when the cloner is registered, patched to a concrete target
//! when the owner's shell exists. A lookup that observes the placeholder is a
//! scheduling bug and fails loudly.

use rustc_hash::FxHashMap;

use crate::{
    graph::Vertex,
    metadata::{
        EventId, FieldId, GenericParamId, HandlerId, InstructionId, MethodId, ParamId, PropertyId,
        TypeId, VariableId,
    },
    weave::cloners::Cloner,
    Error, Result,
};

/// A handle to a created target entity, mirroring [`Vertex`] kinds.
///
/// Ids are in the target module's id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A target type definition
    Type(TypeId),
    /// A target generic parameter
    GenericParameter(GenericParamId),
    /// A target field definition
    Field(FieldId),
    /// A target method definition
    Method(MethodId),
    /// A target parameter
    Parameter(ParamId),
    /// A target variable
    Variable(VariableId),
    /// A target instruction
    Instruction(InstructionId),
    /// A target exception handler
    ExceptionHandler(HandlerId),
    /// A target property definition
    Property(PropertyId),
    /// A target event definition
    Event(EventId),
}

struct ClonerEntry {
    cloner: Cloner,
    populated: bool,
}

/// Registry of all cloners of one weave.
///
/// Cloner collections per vertex keep registration order, which the driver
/// aligns with sibling order during the creation pass; population consumes
/// them in that same order.
#[derive(Default)]
pub struct ClonerRegistry {
    entries: Vec<ClonerEntry>,
    by_source: FxHashMap<Vertex, Vec<usize>>,
    targets: FxHashMap<Vertex, Target>,
    // None while deferred; patched when the owner's shell is created.
    generic_params: FxHashMap<GenericParamId, Option<GenericParamId>>,
    all_cloners_added: bool,
}

impl ClonerRegistry {
    /// Creates an empty registry with discovery open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cloner for its source vertex.
    ///
    /// # Errors
    ///
    /// [`Error::DoubleInvoke`] when discovery has already closed.
    pub fn add(&mut self, cloner: Cloner) -> Result<()> {
        if self.all_cloners_added {
            return Err(Error::DoubleInvoke(format!(
                "cloner added after discovery closed - {}",
                cloner.source_vertex()
            )));
        }
        let vertex = cloner.source_vertex();
        if let Some(target) = cloner.target() {
            self.targets.entry(vertex).or_insert(target);
        }
        let index = self.entries.len();
        self.entries.push(ClonerEntry {
            cloner,
            populated: false,
        });
        self.by_source.entry(vertex).or_default().push(index);
        Ok(())
    }

    /// Flips the one-shot discovery gate.
    ///
    /// # Errors
    ///
    /// [`Error::DoubleInvoke`] when the gate was already flipped.
    pub fn set_all_cloners_added(&mut self) -> Result<()> {
        if self.all_cloners_added {
            return Err(Error::DoubleInvoke(
                "discovery gate flipped twice".to_string(),
            ));
        }
        self.all_cloners_added = true;
        Ok(())
    }

    /// Returns `true` once discovery has closed.
    #[must_use]
    pub fn all_cloners_added(&self) -> bool {
        self.all_cloners_added
    }

    /// Number of registered cloners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no cloner has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of the cloners registered for a source vertex, in
    /// registration order.
    #[must_use]
    pub fn cloner_indices(&self, vertex: Vertex) -> &[usize] {
        self.by_source
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Borrows a cloner by index.
    #[must_use]
    pub fn cloner(&self, index: usize) -> &Cloner {
        &self.entries[index].cloner
    }

    /// Transitions a cloner to populated, returning a copy for execution.
    ///
    /// # Errors
    ///
    /// [`Error::DoubleInvoke`] when the cloner was already populated.
    pub fn mark_populated(&mut self, index: usize) -> Result<Cloner> {
        let entry = &mut self.entries[index];
        if entry.populated {
            return Err(Error::DoubleInvoke(format!(
                "cloner populated twice - {}",
                entry.cloner.source_vertex()
            )));
        }
        entry.populated = true;
        Ok(entry.cloner)
    }

    /// Looks up the target created for a source vertex.
    ///
    /// Returns `Ok(None)` for vertices outside the cloning closure.
    ///
    /// # Errors
    ///
    /// - [`Error::DoubleInvoke`] while discovery is still open
    /// - [`Error::UnmaterializedGenericParameter`] when the vertex is a
    ///   generic parameter whose target is still the deferred placeholder
    pub fn try_get_target_for(&self, vertex: Vertex) -> Result<Option<Target>> {
        if !self.all_cloners_added {
            return Err(Error::DoubleInvoke(format!(
                "target lookup before discovery closed - {vertex}"
            )));
        }
        if let Vertex::GenericParameter(gp) = vertex {
            return match self.generic_params.get(&gp) {
                None => Ok(None),
                Some(None) => Err(Error::UnmaterializedGenericParameter(gp.to_string())),
                Some(Some(target)) => Ok(Some(Target::GenericParameter(*target))),
            };
        }
        Ok(self.targets.get(&vertex).copied())
    }

    /// Target lookup for the dispatcher during the creation pass.
    ///
    /// Factories attach children under already-created parents, so this
    /// accessor is intentionally not gated.
    pub(crate) fn target_during_discovery(&self, vertex: Vertex) -> Option<Target> {
        self.targets.get(&vertex).copied()
    }

    /// Declares a generic parameter cloner's target as deferred.
    pub fn declare_generic_parameter(&mut self, source: GenericParamId) {
        self.generic_params.entry(source).or_insert(None);
    }

    /// Patches a deferred generic parameter target to its concrete handle.
    pub fn materialize_generic_parameter(
        &mut self,
        source: GenericParamId,
        target: GenericParamId,
    ) {
        self.generic_params.insert(source, Some(target));
    }

    /// Raw slot of a generic parameter target.
    ///
    /// `None` means unregistered; `Some(None)` means deferred. The reference
    /// rewriting engine turns these into named errors.
    #[must_use]
    pub fn generic_parameter_slot(&self, source: GenericParamId) -> Option<Option<GenericParamId>> {
        self.generic_params.get(&source).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::GenericParamOwner;
    use crate::weave::cloners::{Cloner, FieldCloner};

    fn field_cloner(i: usize) -> Cloner {
        Cloner::Field(FieldCloner {
            source: FieldId::new(i),
            target: FieldId::new(i + 10),
        })
    }

    #[test]
    fn test_add_then_lookup_after_gate() {
        let mut registry = ClonerRegistry::new();
        registry.add(field_cloner(0)).unwrap();

        let vertex = Vertex::Field(FieldId::new(0));
        assert!(matches!(
            registry.try_get_target_for(vertex),
            Err(Error::DoubleInvoke(_))
        ));

        registry.set_all_cloners_added().unwrap();
        assert_eq!(
            registry.try_get_target_for(vertex).unwrap(),
            Some(Target::Field(FieldId::new(10)))
        );
        assert_eq!(
            registry
                .try_get_target_for(Vertex::Field(FieldId::new(5)))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_add_after_gate_rejected() {
        let mut registry = ClonerRegistry::new();
        registry.set_all_cloners_added().unwrap();
        assert!(matches!(
            registry.add(field_cloner(0)),
            Err(Error::DoubleInvoke(_))
        ));
    }

    #[test]
    fn test_gate_is_one_shot() {
        let mut registry = ClonerRegistry::new();
        registry.set_all_cloners_added().unwrap();
        assert!(matches!(
            registry.set_all_cloners_added(),
            Err(Error::DoubleInvoke(_))
        ));
    }

    #[test]
    fn test_populate_is_one_shot() {
        let mut registry = ClonerRegistry::new();
        registry.add(field_cloner(0)).unwrap();
        registry.set_all_cloners_added().unwrap();

        let indices = registry.cloner_indices(Vertex::Field(FieldId::new(0))).to_vec();
        assert_eq!(indices.len(), 1);
        registry.mark_populated(indices[0]).unwrap();
        assert!(matches!(
            registry.mark_populated(indices[0]),
            Err(Error::DoubleInvoke(_))
        ));
    }

    #[test]
    fn test_deferred_generic_parameter_fails_until_materialized() {
        let mut registry = ClonerRegistry::new();
        let source = GenericParamId {
            owner: GenericParamOwner::Type(TypeId::new(0)),
            position: 0,
        };
        registry.declare_generic_parameter(source);
        registry.set_all_cloners_added().unwrap();

        let vertex = Vertex::GenericParameter(source);
        assert!(matches!(
            registry.try_get_target_for(vertex),
            Err(Error::UnmaterializedGenericParameter(_))
        ));

        let target = GenericParamId {
            owner: GenericParamOwner::Type(TypeId::new(9)),
            position: 0,
        };
        registry.materialize_generic_parameter(source, target);
        assert_eq!(
            registry.try_get_target_for(vertex).unwrap(),
            Some(Target::GenericParameter(target))
        );
    }

    #[test]
    fn test_unregistered_generic_parameter_is_absent() {
        let mut registry = ClonerRegistry::new();
        registry.set_all_cloners_added().unwrap();
        let source = GenericParamId {
            owner: GenericParamOwner::Type(TypeId::new(0)),
            position: 3,
        };
        assert_eq!(
            registry
                .try_get_target_for(Vertex::GenericParameter(source))
                .unwrap(),
            None
        );
    }
}
