//! Shared functionality which is used in unit- and integration-tests.

pub mod factories {
    //! Factories for building metadata fixtures.

    use crate::metadata::{
        CustomAttribute, FieldAttributes, FieldDef, FieldId, GenericParamAttributes,
        GenericParamDef, Instruction, MethodAttributes, MethodBody, MethodDef, MethodId, Module,
        MethodRef, OpCode, ParamAttributes, ParamDef, TypeAttributes, TypeDef, TypeId, TypeRef,
        VariableDef,
    };

    /// Creates a module whose assembly name matches the namespace and adds a
    /// single public root type.
    pub fn module_with_root(namespace: &str, name: &str) -> (Module, TypeId) {
        let mut module = Module::new(namespace, &format!("{namespace}.dll"));
        let root = module.add_type(TypeDef::new(namespace, name, TypeAttributes::PUBLIC));
        (module, root)
    }

    /// Adds a private instance field of the given type.
    pub fn add_field(
        module: &mut Module,
        declaring: TypeId,
        name: &str,
        field_type: TypeRef,
    ) -> FieldId {
        module.add_field(FieldDef {
            name: name.to_string(),
            attributes: FieldAttributes::PRIVATE,
            field_type,
            constant: None,
            marshal: None,
            offset: None,
            custom_attributes: Vec::new(),
            declaring,
        })
    }

    /// Adds a public instance method returning void with unnamed parameters
    /// of the given types and no body.
    pub fn add_void_method(
        module: &mut Module,
        declaring: TypeId,
        name: &str,
        param_types: &[TypeRef],
    ) -> MethodId {
        let params = param_types
            .iter()
            .enumerate()
            .map(|(i, param_type)| ParamDef {
                name: format!("arg{i}"),
                attributes: ParamAttributes::empty(),
                param_type: param_type.clone(),
                constant: None,
                marshal: None,
                custom_attributes: Vec::new(),
            })
            .collect();
        module.add_method(MethodDef {
            name: name.to_string(),
            attributes: MethodAttributes::PUBLIC,
            has_this: true,
            explicit_this: false,
            return_type: TypeRef::core("System.Void"),
            params,
            generic_params: Vec::new(),
            body: None,
            custom_attributes: Vec::new(),
            declaring,
        })
    }

    /// Adds a nested public type under the given enclosing type.
    pub fn add_nested_type(module: &mut Module, enclosing: TypeId, name: &str) -> TypeId {
        let mut def = TypeDef::new("", name, TypeAttributes::NESTED_PUBLIC);
        def.enclosing = Some(enclosing);
        module.add_type(def)
    }

    /// Declares a generic parameter on a type.
    pub fn add_generic_param(module: &mut Module, owner: TypeId, name: &str) {
        let position = module.type_(owner).generic_params.len() as u16;
        module.type_mut(owner).generic_params.push(GenericParamDef {
            name: name.to_string(),
            position,
            attributes: GenericParamAttributes::empty(),
            constraints: Vec::new(),
        });
    }

    /// Builds a marker attribute application of an external attribute type.
    pub fn marker_attribute(full_name: &str) -> CustomAttribute {
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

    /// Gives a method a trivial body with the requested number of Int32
    /// variables, a nop, and a ret.
    pub fn give_simple_body(module: &mut Module, method: MethodId, variables: u16) {
        let variables = (0..variables)
            .map(|index| VariableDef {
                var_type: TypeRef::core("System.Int32"),
                index,
                pinned: false,
            })
            .collect();
        module.method_mut(method).body = Some(MethodBody {
            max_stack: 8,
            init_locals: true,
            variables,
            instructions: vec![
                Instruction::simple(OpCode::Nop),
                Instruction::simple(OpCode::Ret),
            ],
            handlers: Vec::new(),
        });
    }

    /// Gives a method a body made of exactly the supplied instructions.
    pub fn give_body_with(module: &mut Module, method: MethodId, instructions: Vec<Instruction>) {
        module.method_mut(method).body = Some(MethodBody {
            max_stack: 8,
            init_locals: false,
            variables: Vec::new(),
            instructions,
            handlers: Vec::new(),
        });
    }
}
