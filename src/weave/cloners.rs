//! Per-entity-kind cloners.
//!
//! A cloner links one source entity to one target entity and performs
//! two-phase work: the *create* phase (run by the dispatcher during the
//! creation pass) allocates the target shell and attaches it under its
//! already-cloned parent; the *populate* phase (run by the driver during the
//! population pass) fills every slot of the shell, rewriting each reference
//! through the root-import engine. A cloner populates exactly once; the
//! registry enforces the transition.
//!
//! The kinds form a closed sum, so adding an entity kind forces every
//! dispatch site to be revisited at compile time.

use crate::{
    metadata::{
        AttributeArgument, CustomAttribute, EventId, FieldId, GenericParamId, GenericParamOwner,
        HandlerId, InstructionId, MethodBody, MethodId, NamedArgument, Operand, ParamId,
        PropertyId, TypeId, VariableId,
    },
    graph::Vertex,
    weave::{
        context::WeaveContext,
        registry::{ClonerRegistry, Target},
        rootimport::RootImporter,
        signature,
    },
    Error, Result,
};

/// Pairs the source root with the pre-existing target root.
///
/// The target root is never allocated by the weave; population is limited to
/// propagating the source root's non-meta custom attributes.
#[derive(Debug, Clone, Copy)]
pub struct RootTypeCloner {
    /// Source root type
    pub source: TypeId,
    /// Target root type
    pub target: TypeId,
}

/// Clones a nested type definition.
#[derive(Debug, Clone, Copy)]
pub struct TypeCloner {
    /// Source type
    pub source: TypeId,
    /// Target shell
    pub target: TypeId,
}

/// Clones a generic parameter.
///
/// The target handle lives in the registry's deferred slot table, not here:
/// it cannot exist before the owner's shell does.
#[derive(Debug, Clone, Copy)]
pub struct GenericParameterCloner {
    /// Source generic parameter
    pub source: GenericParamId,
}

/// Clones a field definition.
#[derive(Debug, Clone, Copy)]
pub struct FieldCloner {
    /// Source field
    pub source: FieldId,
    /// Target shell
    pub target: FieldId,
}

/// Clones a method's signature surface: attributes, calling convention,
/// return type. Parameters and the body have their own cloners.
#[derive(Debug, Clone, Copy)]
pub struct MethodSignatureCloner {
    /// Source method
    pub source: MethodId,
    /// Target shell
    pub target: MethodId,
}

/// Clones a method body's scalar surface: max-stack and init-locals.
#[derive(Debug, Clone, Copy)]
pub struct MethodBodyCloner {
    /// Source method
    pub source: MethodId,
    /// Target shell
    pub target: MethodId,
}

/// Clones a parameter definition.
#[derive(Debug, Clone, Copy)]
pub struct ParameterCloner {
    /// Source parameter
    pub source: ParamId,
    /// Target shell
    pub target: ParamId,
}

/// Clones a local variable slot.
#[derive(Debug, Clone, Copy)]
pub struct VariableCloner {
    /// Source variable
    pub source: VariableId,
    /// Target shell
    pub target: VariableId,
}

/// Clones an instruction, rewriting its operand by operand kind.
#[derive(Debug, Clone, Copy)]
pub struct InstructionCloner {
    /// Source instruction
    pub source: InstructionId,
    /// Target shell
    pub target: InstructionId,
}

/// Clones an exception handler clause.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionHandlerCloner {
    /// Source handler
    pub source: HandlerId,
    /// Target shell
    pub target: HandlerId,
}

/// Clones a property and attaches its cloned accessors.
#[derive(Debug, Clone, Copy)]
pub struct PropertyCloner {
    /// Source property
    pub source: PropertyId,
    /// Target shell
    pub target: PropertyId,
}

/// Clones an event and attaches its cloned accessors.
#[derive(Debug, Clone, Copy)]
pub struct EventCloner {
    /// Source event
    pub source: EventId,
    /// Target shell
    pub target: EventId,
}

/// The closed sum of cloner kinds.
#[derive(Debug, Clone, Copy)]
pub enum Cloner {
    /// Root pairing cloner
    Root(RootTypeCloner),
    /// Nested type cloner
    Type(TypeCloner),
    /// Generic parameter cloner
    GenericParameter(GenericParameterCloner),
    /// Field cloner
    Field(FieldCloner),
    /// Method signature cloner
    MethodSignature(MethodSignatureCloner),
    /// Method body cloner
    MethodBody(MethodBodyCloner),
    /// Parameter cloner
    Parameter(ParameterCloner),
    /// Variable cloner
    Variable(VariableCloner),
    /// Instruction cloner
    Instruction(InstructionCloner),
    /// Exception handler cloner
    ExceptionHandler(ExceptionHandlerCloner),
    /// Property cloner
    Property(PropertyCloner),
    /// Event cloner
    Event(EventCloner),
}

impl Cloner {
    /// The source vertex this cloner was registered for.
    #[must_use]
    pub fn source_vertex(&self) -> Vertex {
        match self {
            Cloner::Root(c) => Vertex::Type(c.source),
            Cloner::Type(c) => Vertex::Type(c.source),
            Cloner::GenericParameter(c) => Vertex::GenericParameter(c.source),
            Cloner::Field(c) => Vertex::Field(c.source),
            Cloner::MethodSignature(c) => Vertex::Method(c.source),
            Cloner::MethodBody(c) => Vertex::Method(c.source),
            Cloner::Parameter(c) => Vertex::Parameter(c.source),
            Cloner::Variable(c) => Vertex::Variable(c.source),
            Cloner::Instruction(c) => Vertex::Instruction(c.source),
            Cloner::ExceptionHandler(c) => Vertex::ExceptionHandler(c.source),
            Cloner::Property(c) => Vertex::Property(c.source),
            Cloner::Event(c) => Vertex::Event(c.source),
        }
    }

    /// The created target handle.
    ///
    /// `None` for generic parameter cloners, whose target is the registry's
    /// deferred slot.
    #[must_use]
    pub fn target(&self) -> Option<Target> {
        match self {
            Cloner::Root(c) => Some(Target::Type(c.target)),
            Cloner::Type(c) => Some(Target::Type(c.target)),
            Cloner::GenericParameter(_) => None,
            Cloner::Field(c) => Some(Target::Field(c.target)),
            Cloner::MethodSignature(c) => Some(Target::Method(c.target)),
            Cloner::MethodBody(c) => Some(Target::Method(c.target)),
            Cloner::Parameter(c) => Some(Target::Parameter(c.target)),
            Cloner::Variable(c) => Some(Target::Variable(c.target)),
            Cloner::Instruction(c) => Some(Target::Instruction(c.target)),
            Cloner::ExceptionHandler(c) => Some(Target::ExceptionHandler(c.target)),
            Cloner::Property(c) => Some(Target::Property(c.target)),
            Cloner::Event(c) => Some(Target::Event(c.target)),
        }
    }

    /// Fills the target shell from the source entity.
    ///
    /// Every reference is rewritten through the root-import engine. The
    /// registry must have closed discovery before population starts.
    pub(crate) fn populate(
        self,
        ctx: &mut WeaveContext<'_>,
        registry: &ClonerRegistry,
        importer: &mut RootImporter,
    ) -> Result<()> {
        match self {
            Cloner::Root(c) => populate_root(c, ctx, registry, importer),
            Cloner::Type(c) => populate_type(c, ctx, registry, importer),
            Cloner::GenericParameter(c) => populate_generic_param(c, ctx, registry, importer),
            Cloner::Field(c) => populate_field(c, ctx, registry, importer),
            Cloner::MethodSignature(c) => populate_method_signature(c, ctx, registry, importer),
            Cloner::MethodBody(c) => populate_method_body(c, ctx),
            Cloner::Parameter(c) => populate_parameter(c, ctx, registry, importer),
            Cloner::Variable(c) => populate_variable(c, ctx, registry, importer),
            Cloner::Instruction(c) => populate_instruction(c, ctx, registry, importer),
            Cloner::ExceptionHandler(c) => populate_handler(c, ctx, registry, importer),
            Cloner::Property(c) => populate_property(c, ctx, registry, importer),
            Cloner::Event(c) => populate_event(c, ctx, registry, importer),
        }
    }
}

fn populate_root(
    c: RootTypeCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let attributes = ctx.source.type_(c.source).custom_attributes.clone();
    let mut cloned = Vec::new();
    for attribute in &attributes {
        let type_name = ctx
            .source
            .type_ref_name(&attribute.constructor.declaring);
        if ctx.options.is_meta_attribute(&type_name) {
            continue;
        }
        cloned.push(clone_attribute(attribute, ctx, registry, importer)?);
    }
    ctx.target
        .type_mut(c.target)
        .custom_attributes
        .extend(cloned);
    Ok(())
}

fn populate_type(
    c: TypeCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.type_(c.source).clone();
    let base = match &src.base {
        Some(base) => Some(importer.import_type_ref(ctx.source, ctx.target, registry, base)?),
        None => None,
    };
    let mut interfaces = Vec::with_capacity(src.interfaces.len());
    for interface in &src.interfaces {
        interfaces.push(importer.import_type_ref(ctx.source, ctx.target, registry, interface)?);
    }
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;

    let t = ctx.target.type_mut(c.target);
    t.attributes = src.attributes;
    t.base = base;
    t.interfaces = interfaces;
    t.layout = src.layout;
    t.custom_attributes = custom_attributes;
    Ok(())
}

fn populate_generic_param(
    c: GenericParameterCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = match c.source.owner {
        GenericParamOwner::Type(t) => ctx.source.type_(t).generic_params
            [c.source.position as usize]
            .clone(),
        GenericParamOwner::Method(m) => ctx.source.method(m).generic_params
            [c.source.position as usize]
            .clone(),
    };
    let mut constraints = Vec::with_capacity(src.constraints.len());
    for constraint in &src.constraints {
        constraints.push(importer.import_type_ref(ctx.source, ctx.target, registry, constraint)?);
    }

    let target = match registry.generic_parameter_slot(c.source) {
        Some(Some(target)) => target,
        _ => {
            return Err(Error::UnmaterializedGenericParameter(format!(
                "{} at {}",
                src.name, c.source
            )))
        }
    };
    let def = match target.owner {
        GenericParamOwner::Type(t) => {
            &mut ctx.target.type_mut(t).generic_params[target.position as usize]
        }
        GenericParamOwner::Method(m) => {
            &mut ctx.target.method_mut(m).generic_params[target.position as usize]
        }
    };
    def.attributes = src.attributes;
    def.constraints = constraints;
    Ok(())
}

fn populate_field(
    c: FieldCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.field(c.source).clone();
    let field_type = importer.import_type_ref(ctx.source, ctx.target, registry, &src.field_type)?;
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;

    let t = ctx.target.field_mut(c.target);
    t.attributes = src.attributes;
    t.field_type = field_type;
    t.constant = src.constant;
    t.marshal = src.marshal;
    t.offset = src.offset;
    t.custom_attributes = custom_attributes;
    Ok(())
}

fn populate_method_signature(
    c: MethodSignatureCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.method(c.source).clone();
    let return_type =
        importer.import_type_ref(ctx.source, ctx.target, registry, &src.return_type)?;
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;

    let t = ctx.target.method_mut(c.target);
    t.attributes = src.attributes;
    t.has_this = src.has_this;
    t.explicit_this = src.explicit_this;
    t.return_type = return_type;
    t.custom_attributes = custom_attributes;
    Ok(())
}

fn populate_method_body(c: MethodBodyCloner, ctx: &mut WeaveContext<'_>) -> Result<()> {
    let (max_stack, init_locals) = match &ctx.source.method(c.source).body {
        Some(body) => (body.max_stack, body.init_locals),
        None => return Ok(()),
    };
    let body = ctx
        .target
        .method_mut(c.target)
        .body
        .get_or_insert_with(MethodBody::default);
    body.max_stack = max_stack;
    body.init_locals = init_locals;
    Ok(())
}

fn populate_parameter(
    c: ParameterCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.method(c.source.method).params[c.source.index as usize].clone();
    let param_type = importer.import_type_ref(ctx.source, ctx.target, registry, &src.param_type)?;
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;

    let t = &mut ctx.target.method_mut(c.target.method).params[c.target.index as usize];
    t.name = src.name;
    t.attributes = src.attributes;
    t.param_type = param_type;
    t.constant = src.constant;
    t.marshal = src.marshal;
    t.custom_attributes = custom_attributes;
    Ok(())
}

fn populate_variable(
    c: VariableCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = match &ctx.source.method(c.source.method).body {
        Some(body) => body.variables[c.source.index as usize].clone(),
        None => return Ok(()),
    };
    let var_type = importer.import_type_ref(ctx.source, ctx.target, registry, &src.var_type)?;

    let body = ctx
        .target
        .method_mut(c.target.method)
        .body
        .get_or_insert_with(MethodBody::default);
    let t = &mut body.variables[c.target.index as usize];
    t.var_type = var_type;
    t.index = src.index;
    t.pinned = src.pinned;
    Ok(())
}

fn populate_instruction(
    c: InstructionCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = match ctx.source.instruction(c.source) {
        Some(instruction) => instruction.clone(),
        None => return Ok(()),
    };

    let operand = match src.operand {
        Operand::Type(r) => {
            Operand::Type(importer.import_type_ref(ctx.source, ctx.target, registry, &r)?)
        }
        Operand::Field(r) => {
            Operand::Field(importer.import_field_ref(ctx.source, ctx.target, registry, &r)?)
        }
        Operand::Method(r) => {
            Operand::Method(importer.import_method_ref(ctx.source, ctx.target, registry, &r)?)
        }
        Operand::Parameter(p) => Operand::Parameter(importer.map_parameter(registry, p)?),
        Operand::Variable(v) => Operand::Variable(importer.map_variable(registry, v)?),
        Operand::Target(i) => Operand::Target(importer.map_instruction(registry, i)?),
        Operand::Switch(targets) => {
            let mut mapped = Vec::with_capacity(targets.len());
            for target in targets {
                mapped.push(importer.map_instruction(registry, target)?);
            }
            Operand::Switch(mapped)
        }
        literal => literal,
    };

    let body = ctx
        .target
        .method_mut(c.target.method)
        .body
        .get_or_insert_with(MethodBody::default);
    if let Some(slot) = body.instructions.get_mut(c.target.index as usize) {
        slot.opcode = src.opcode;
        slot.operand = operand;
    }
    Ok(())
}

fn populate_handler(
    c: ExceptionHandlerCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = match &ctx.source.method(c.source.method).body {
        Some(body) => body.handlers[c.source.index as usize].clone(),
        None => return Ok(()),
    };

    let try_start = importer.map_instruction(registry, src.try_start)?;
    let try_end = importer.map_instruction(registry, src.try_end)?;
    let handler_start = importer.map_instruction(registry, src.handler_start)?;
    let handler_end = importer.map_instruction(registry, src.handler_end)?;
    let filter_start = match src.filter_start {
        Some(filter) => Some(importer.map_instruction(registry, filter)?),
        None => None,
    };
    let catch_type = match &src.catch_type {
        Some(catch) => Some(importer.import_type_ref(ctx.source, ctx.target, registry, catch)?),
        None => None,
    };

    let body = ctx
        .target
        .method_mut(c.target.method)
        .body
        .get_or_insert_with(MethodBody::default);
    let t = &mut body.handlers[c.target.index as usize];
    t.flags = src.flags;
    t.try_start = try_start;
    t.try_end = try_end;
    t.handler_start = handler_start;
    t.handler_end = handler_end;
    t.catch_type = catch_type;
    t.filter_start = filter_start;
    Ok(())
}

fn populate_property(
    c: PropertyCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.property(c.source).clone();
    let property_type =
        importer.import_type_ref(ctx.source, ctx.target, registry, &src.property_type)?;
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;
    let declaring = ctx.target.property(c.target).declaring;

    let getter = match src.getter {
        Some(accessor) => Some(resolve_accessor(ctx, declaring, accessor)?),
        None => None,
    };
    let setter = match src.setter {
        Some(accessor) => Some(resolve_accessor(ctx, declaring, accessor)?),
        None => None,
    };

    let t = ctx.target.property_mut(c.target);
    t.attributes = src.attributes;
    t.property_type = property_type;
    t.getter = getter;
    t.setter = setter;
    t.custom_attributes = custom_attributes;
    Ok(())
}

fn populate_event(
    c: EventCloner,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<()> {
    let src = ctx.source.event(c.source).clone();
    let event_type = importer.import_type_ref(ctx.source, ctx.target, registry, &src.event_type)?;
    let custom_attributes = clone_attributes(&src.custom_attributes, ctx, registry, importer)?;
    let declaring = ctx.target.event(c.target).declaring;

    let add = match src.add {
        Some(accessor) => Some(resolve_accessor(ctx, declaring, accessor)?),
        None => None,
    };
    let remove = match src.remove {
        Some(accessor) => Some(resolve_accessor(ctx, declaring, accessor)?),
        None => None,
    };
    let raise = match src.raise {
        Some(accessor) => Some(resolve_accessor(ctx, declaring, accessor)?),
        None => None,
    };

    let t = ctx.target.event_mut(c.target);
    t.attributes = src.attributes;
    t.event_type = event_type;
    t.add = add;
    t.remove = remove;
    t.raise = raise;
    t.custom_attributes = custom_attributes;
    Ok(())
}

/// Resolves an already-cloned accessor method by name and signature inside
/// the target declaring type.
fn resolve_accessor(
    ctx: &WeaveContext<'_>,
    declaring: TypeId,
    accessor: MethodId,
) -> Result<MethodId> {
    let source_signature = ctx.source.method_full_name(accessor);
    signature::find_matching_method(
        ctx.target,
        declaring,
        &source_signature,
        &ctx.source_root_name,
        &ctx.target_root_name,
    )
    .ok_or_else(|| {
        Error::SignatureMatchMissing(
            source_signature.replace(&ctx.source_root_name, &ctx.target_root_name),
        )
    })
}

/// Clones a custom attribute list with root-imported payloads.
fn clone_attributes(
    attributes: &[CustomAttribute],
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<Vec<CustomAttribute>> {
    let mut cloned = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        cloned.push(clone_attribute(attribute, ctx, registry, importer)?);
    }
    Ok(cloned)
}

/// Clones one custom attribute: the constructor reference and every type
/// payload are root-imported, other payloads copy verbatim.
fn clone_attribute(
    attribute: &CustomAttribute,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<CustomAttribute> {
    let constructor =
        importer.import_method_ref(ctx.source, ctx.target, registry, &attribute.constructor)?;
    let mut args = Vec::with_capacity(attribute.args.len());
    for argument in &attribute.args {
        args.push(clone_argument(argument, ctx, registry, importer)?);
    }
    let mut named_args = Vec::with_capacity(attribute.named_args.len());
    for named in &attribute.named_args {
        named_args.push(NamedArgument {
            name: named.name.clone(),
            value: clone_argument(&named.value, ctx, registry, importer)?,
        });
    }
    Ok(CustomAttribute {
        constructor,
        args,
        named_args,
    })
}

fn clone_argument(
    argument: &AttributeArgument,
    ctx: &mut WeaveContext<'_>,
    registry: &ClonerRegistry,
    importer: &mut RootImporter,
) -> Result<AttributeArgument> {
    Ok(match argument {
        AttributeArgument::Type(r) => AttributeArgument::Type(importer.import_type_ref(
            ctx.source,
            ctx.target,
            registry,
            r,
        )?),
        AttributeArgument::Enum { enum_type, value } => AttributeArgument::Enum {
            enum_type: importer.import_type_ref(ctx.source, ctx.target, registry, enum_type)?,
            value: *value,
        },
        AttributeArgument::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_argument(item, ctx, registry, importer)?);
            }
            AttributeArgument::Array(cloned)
        }
        literal => literal.clone(),
    })
}
