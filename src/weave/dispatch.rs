//! Vertex-kind-indexed cloner factories.
//!
//! The dispatcher is the single place where kind-specific construction
//! knowledge lives. Given a vertex in creation order, it looks up the
//! already-created target of the vertex's parent, allocates the vertex's
//! target shell attached under that parent, and registers the resulting
//! cloner(s). Every other component stays kind-agnostic.
//!
//! Creation order (parents before children, siblings in order) guarantees
//! each factory finds its parent target and appends children in declaration
//! order.

use crate::{
    graph::{IlGraph, Vertex},
    metadata::{
        EventDef, ExceptionHandler, FieldAttributes, FieldDef, GenericParamAttributes,
        GenericParamDef, GenericParamId, GenericParamOwner, HandlerId, Instruction, InstructionId,
        MethodBody, MethodDef, ParamAttributes, ParamDef, ParamId, PropertyDef, TypeDef, TypeRef,
        VariableDef, VariableId,
    },
    weave::{
        cloners::{
            Cloner, EventCloner, ExceptionHandlerCloner, FieldCloner, GenericParameterCloner,
            InstructionCloner, MethodBodyCloner, MethodSignatureCloner, ParameterCloner,
            PropertyCloner, TypeCloner, VariableCloner,
        },
        context::WeaveContext,
        registry::{ClonerRegistry, Target},
    },
    Error, Result,
};

/// Placeholder type for shell slots filled during population.
fn placeholder() -> TypeRef {
    TypeRef::core("System.Void")
}

/// Creates and registers the cloner(s) for one vertex.
///
/// The source root is skipped: its pairing is seeded by the driver before
/// the creation pass starts.
///
/// # Errors
///
/// [`Error::InvalidGraph`] when the vertex's parent has no created target,
/// which means the creation order was violated.
pub(crate) fn discover_cloners(
    vertex: Vertex,
    ctx: &mut WeaveContext<'_>,
    graph: &IlGraph,
    registry: &mut ClonerRegistry,
) -> Result<()> {
    match vertex {
        Vertex::Type(source) => {
            if source == ctx.source_root {
                return Ok(());
            }
            let parent = parent_type_target(vertex, graph, registry)?;
            let src = ctx.source.type_(source);
            let mut shell = TypeDef::new(&src.namespace, &src.name, src.attributes);
            shell.enclosing = Some(parent);
            let target = ctx.target.add_type(shell);
            registry.add(Cloner::Type(TypeCloner { source, target }))
        }
        Vertex::GenericParameter(source) => {
            create_generic_parameter(source, vertex, ctx, graph, registry)
        }
        Vertex::Field(source) => {
            let parent = parent_type_target(vertex, graph, registry)?;
            let src = ctx.source.field(source);
            let target = ctx.target.add_field(FieldDef {
                name: src.name.clone(),
                attributes: FieldAttributes::empty(),
                field_type: placeholder(),
                constant: None,
                marshal: None,
                offset: None,
                custom_attributes: Vec::new(),
                declaring: parent,
            });
            registry.add(Cloner::Field(FieldCloner { source, target }))
        }
        Vertex::Method(source) => {
            let parent = parent_type_target(vertex, graph, registry)?;
            let src = ctx.source.method(source);
            let has_body = src.body.is_some();
            let target = ctx.target.add_method(MethodDef {
                name: src.name.clone(),
                attributes: src.attributes,
                has_this: src.has_this,
                explicit_this: src.explicit_this,
                return_type: placeholder(),
                params: Vec::new(),
                generic_params: Vec::new(),
                body: has_body.then(MethodBody::default),
                custom_attributes: Vec::new(),
                declaring: parent,
            });
            registry.add(Cloner::MethodSignature(MethodSignatureCloner {
                source,
                target,
            }))?;
            if has_body {
                registry.add(Cloner::MethodBody(MethodBodyCloner { source, target }))?;
            }
            Ok(())
        }
        Vertex::Parameter(source) => {
            let parent = parent_method_target(vertex, graph, registry)?;
            let src = &ctx.source.method(source.method).params[source.index as usize];
            let shell = ParamDef {
                name: src.name.clone(),
                attributes: ParamAttributes::empty(),
                param_type: placeholder(),
                constant: None,
                marshal: None,
                custom_attributes: Vec::new(),
            };
            let method = ctx.target.method_mut(parent);
            let index = method.params.len() as u16;
            method.params.push(shell);
            registry.add(Cloner::Parameter(ParameterCloner {
                source,
                target: ParamId {
                    method: parent,
                    index,
                },
            }))
        }
        Vertex::Variable(source) => {
            let parent = parent_method_target(vertex, graph, registry)?;
            let src_pinned = match &ctx.source.method(source.method).body {
                Some(body) => body.variables[source.index as usize].pinned,
                None => false,
            };
            let body = ctx
                .target
                .method_mut(parent)
                .body
                .get_or_insert_with(MethodBody::default);
            let index = body.variables.len() as u16;
            body.variables.push(VariableDef {
                var_type: placeholder(),
                index,
                pinned: src_pinned,
            });
            registry.add(Cloner::Variable(VariableCloner {
                source,
                target: VariableId {
                    method: parent,
                    index,
                },
            }))
        }
        Vertex::Instruction(source) => {
            let parent = parent_method_target(vertex, graph, registry)?;
            let opcode = match ctx.source.instruction(source) {
                Some(instruction) => instruction.opcode,
                None => {
                    return Err(Error::InvalidGraph(format!(
                        "instruction vertex outside source body - {vertex}"
                    )))
                }
            };
            let body = ctx
                .target
                .method_mut(parent)
                .body
                .get_or_insert_with(MethodBody::default);
            let index = body.instructions.len() as u32;
            body.instructions.push(Instruction::simple(opcode));
            registry.add(Cloner::Instruction(InstructionCloner {
                source,
                target: InstructionId {
                    method: parent,
                    index,
                },
            }))
        }
        Vertex::ExceptionHandler(source) => {
            let parent = parent_method_target(vertex, graph, registry)?;
            let flags = match &ctx.source.method(source.method).body {
                Some(body) => body.handlers[source.index as usize].flags,
                None => {
                    return Err(Error::InvalidGraph(format!(
                        "handler vertex outside source body - {vertex}"
                    )))
                }
            };
            let anchor = InstructionId {
                method: parent,
                index: 0,
            };
            let body = ctx
                .target
                .method_mut(parent)
                .body
                .get_or_insert_with(MethodBody::default);
            let index = body.handlers.len() as u16;
            body.handlers.push(ExceptionHandler {
                flags,
                try_start: anchor,
                try_end: anchor,
                handler_start: anchor,
                handler_end: anchor,
                catch_type: None,
                filter_start: None,
            });
            registry.add(Cloner::ExceptionHandler(ExceptionHandlerCloner {
                source,
                target: HandlerId {
                    method: parent,
                    index,
                },
            }))
        }
        Vertex::Property(source) => {
            let parent = parent_type_target(vertex, graph, registry)?;
            let src = ctx.source.property(source);
            let target = ctx.target.add_property(PropertyDef {
                name: src.name.clone(),
                attributes: src.attributes,
                property_type: placeholder(),
                getter: None,
                setter: None,
                custom_attributes: Vec::new(),
                declaring: parent,
            });
            registry.add(Cloner::Property(PropertyCloner { source, target }))
        }
        Vertex::Event(source) => {
            let parent = parent_type_target(vertex, graph, registry)?;
            let src = ctx.source.event(source);
            let target = ctx.target.add_event(EventDef {
                name: src.name.clone(),
                attributes: src.attributes,
                event_type: placeholder(),
                add: None,
                remove: None,
                raise: None,
                custom_attributes: Vec::new(),
                declaring: parent,
            });
            registry.add(Cloner::Event(EventCloner { source, target }))
        }
    }
}

/// Creates a generic parameter shell under its owner's target.
///
/// The registry slot goes through the deferred/materialized two-step even
/// though both happen here back to back: the declared placeholder is what a
/// mis-scheduled lookup observes.
fn create_generic_parameter(
    source: GenericParamId,
    vertex: Vertex,
    ctx: &mut WeaveContext<'_>,
    graph: &IlGraph,
    registry: &mut ClonerRegistry,
) -> Result<()> {
    registry.declare_generic_parameter(source);

    let parent_vertex = graph
        .try_parent_of(vertex)
        .ok_or_else(|| Error::InvalidGraph(format!("generic parameter without owner - {vertex}")))?;
    let name = match source.owner {
        GenericParamOwner::Type(t) => {
            ctx.source.type_(t).generic_params[source.position as usize]
                .name
                .clone()
        }
        GenericParamOwner::Method(m) => {
            ctx.source.method(m).generic_params[source.position as usize]
                .name
                .clone()
        }
    };

    let owner_target = registry.target_during_discovery(parent_vertex);
    let target = match owner_target {
        Some(Target::Type(t)) => {
            let params = &mut ctx.target.type_mut(t).generic_params;
            let position = params.len() as u16;
            params.push(GenericParamDef {
                name,
                position,
                attributes: GenericParamAttributes::empty(),
                constraints: Vec::new(),
            });
            GenericParamId {
                owner: GenericParamOwner::Type(t),
                position,
            }
        }
        Some(Target::Method(m)) => {
            let params = &mut ctx.target.method_mut(m).generic_params;
            let position = params.len() as u16;
            params.push(GenericParamDef {
                name,
                position,
                attributes: GenericParamAttributes::empty(),
                constraints: Vec::new(),
            });
            GenericParamId {
                owner: GenericParamOwner::Method(m),
                position,
            }
        }
        _ => {
            return Err(Error::InvalidGraph(format!(
                "no created target for owner of {vertex}"
            )))
        }
    };

    registry.materialize_generic_parameter(source, target);
    registry.add(Cloner::GenericParameter(GenericParameterCloner { source }))
}

/// Target type of a vertex's parent.
fn parent_type_target(
    vertex: Vertex,
    graph: &IlGraph,
    registry: &ClonerRegistry,
) -> Result<crate::metadata::TypeId> {
    let parent = graph
        .try_parent_of(vertex)
        .ok_or_else(|| Error::InvalidGraph(format!("member vertex without parent - {vertex}")))?;
    match registry.target_during_discovery(parent) {
        Some(Target::Type(t)) => Ok(t),
        _ => Err(Error::InvalidGraph(format!(
            "no created target for parent of {vertex}"
        ))),
    }
}

/// Target method of a vertex's parent.
fn parent_method_target(
    vertex: Vertex,
    graph: &IlGraph,
    registry: &ClonerRegistry,
) -> Result<crate::metadata::MethodId> {
    let parent = graph
        .try_parent_of(vertex)
        .ok_or_else(|| Error::InvalidGraph(format!("member vertex without parent - {vertex}")))?;
    match registry.target_during_discovery(parent) {
        Some(Target::Method(m)) => Ok(m),
        _ => Err(Error::InvalidGraph(format!(
            "no created target for parent of {vertex}"
        ))),
    }
}
