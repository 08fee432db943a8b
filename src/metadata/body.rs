//! Method bodies and the instruction stream model.
//!
//! A [`MethodBody`] owns its variable table, instruction stream, and exception
//! handler table. Instructions pair an [`OpCode`] with an [`Operand`]; branch
//! targets and handler ranges are expressed by instruction identity
//! ([`crate::metadata::InstructionId`]), never by byte offset, so rewriting a
//! body does not disturb control flow when operand sizes change.

use crate::metadata::{
    flags::ExceptionHandlerFlags,
    ids::{InstructionId, ParamId, VariableId},
    member::{FieldRef, MethodRef, VariableDef},
    types::TypeRef,
};

/// CIL operation codes the object model distinguishes.
///
/// The set covers the operations the weaver rewrites operands for plus the
/// common arithmetic and stack manipulation codes. The mnemonic spelling
/// follows ECMA-335 partition III.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum OpCode {
    Nop,
    Ret,
    Dup,
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    Ceq,
    Cgt,
    Clt,
    Ldnull,
    Ldstr,
    LdcI4,
    LdcI8,
    LdcR4,
    LdcR8,
    Ldarg,
    Ldarga,
    Starg,
    Ldloc,
    Ldloca,
    Stloc,
    Ldfld,
    Ldflda,
    Stfld,
    Ldsfld,
    Ldsflda,
    Stsfld,
    Call,
    Callvirt,
    Newobj,
    Newarr,
    Ldtoken,
    Castclass,
    Isinst,
    Box,
    UnboxAny,
    Initobj,
    Br,
    Brtrue,
    Brfalse,
    Beq,
    BneUn,
    Blt,
    Bgt,
    Ble,
    Bge,
    Switch,
    Leave,
    Endfinally,
    Endfilter,
    Throw,
    Rethrow,
}

impl OpCode {
    /// Returns the ECMA-335 mnemonic.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::Ret => "ret",
            OpCode::Dup => "dup",
            OpCode::Pop => "pop",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Mul => "mul",
            OpCode::Div => "div",
            OpCode::Ceq => "ceq",
            OpCode::Cgt => "cgt",
            OpCode::Clt => "clt",
            OpCode::Ldnull => "ldnull",
            OpCode::Ldstr => "ldstr",
            OpCode::LdcI4 => "ldc.i4",
            OpCode::LdcI8 => "ldc.i8",
            OpCode::LdcR4 => "ldc.r4",
            OpCode::LdcR8 => "ldc.r8",
            OpCode::Ldarg => "ldarg",
            OpCode::Ldarga => "ldarga",
            OpCode::Starg => "starg",
            OpCode::Ldloc => "ldloc",
            OpCode::Ldloca => "ldloca",
            OpCode::Stloc => "stloc",
            OpCode::Ldfld => "ldfld",
            OpCode::Ldflda => "ldflda",
            OpCode::Stfld => "stfld",
            OpCode::Ldsfld => "ldsfld",
            OpCode::Ldsflda => "ldsflda",
            OpCode::Stsfld => "stsfld",
            OpCode::Call => "call",
            OpCode::Callvirt => "callvirt",
            OpCode::Newobj => "newobj",
            OpCode::Newarr => "newarr",
            OpCode::Ldtoken => "ldtoken",
            OpCode::Castclass => "castclass",
            OpCode::Isinst => "isinst",
            OpCode::Box => "box",
            OpCode::UnboxAny => "unbox.any",
            OpCode::Initobj => "initobj",
            OpCode::Br => "br",
            OpCode::Brtrue => "brtrue",
            OpCode::Brfalse => "brfalse",
            OpCode::Beq => "beq",
            OpCode::BneUn => "bne.un",
            OpCode::Blt => "blt",
            OpCode::Bgt => "bgt",
            OpCode::Ble => "ble",
            OpCode::Bge => "bge",
            OpCode::Switch => "switch",
            OpCode::Leave => "leave",
            OpCode::Endfinally => "endfinally",
            OpCode::Endfilter => "endfilter",
            OpCode::Throw => "throw",
            OpCode::Rethrow => "rethrow",
        }
    }

    /// Returns `true` for codes whose operand is a branch target or jump table.
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            OpCode::Br
                | OpCode::Brtrue
                | OpCode::Brfalse
                | OpCode::Beq
                | OpCode::BneUn
                | OpCode::Blt
                | OpCode::Bgt
                | OpCode::Ble
                | OpCode::Bge
                | OpCode::Switch
                | OpCode::Leave
        )
    }
}

/// The operand of an instruction.
///
/// Literal payloads are copied verbatim by cloning; reference payloads are the
/// rewrite points of the weave.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand
    None,
    /// 32-bit integer literal
    Int32(i32),
    /// 64-bit integer literal
    Int64(i64),
    /// 32-bit float literal
    Float32(f32),
    /// 64-bit float literal
    Float64(f64),
    /// String literal
    String(String),
    /// Type reference payload
    Type(TypeRef),
    /// Field reference payload
    Field(FieldRef),
    /// Method reference payload
    Method(MethodRef),
    /// Parameter of the enclosing method
    Parameter(ParamId),
    /// Variable of the enclosing method body
    Variable(VariableId),
    /// Branch target, by instruction identity
    Target(InstructionId),
    /// Switch jump table, by instruction identity
    Switch(Vec<InstructionId>),
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The operation code
    pub opcode: OpCode,
    /// The operand payload
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction with no operand.
    #[must_use]
    pub fn simple(opcode: OpCode) -> Self {
        Instruction {
            opcode,
            operand: Operand::None,
        }
    }

    /// Creates an instruction with the given operand.
    #[must_use]
    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Instruction { opcode, operand }
    }
}

/// An exception handler clause of a method body.
///
/// Try and handler ranges are half-open over instruction identity:
/// `[start, end)`, where `end` names the first instruction past the range.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Clause kind flags
    pub flags: ExceptionHandlerFlags,
    /// First instruction of the protected range
    pub try_start: InstructionId,
    /// First instruction past the protected range
    pub try_end: InstructionId,
    /// First instruction of the handler
    pub handler_start: InstructionId,
    /// First instruction past the handler
    pub handler_end: InstructionId,
    /// Caught exception type, for typed clauses
    pub catch_type: Option<TypeRef>,
    /// First instruction of the filter, for filter clauses
    pub filter_start: Option<InstructionId>,
}

/// The executable body of a method.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// Maximum evaluation stack depth
    pub max_stack: u16,
    /// Zero-initialize local variables on entry
    pub init_locals: bool,
    /// Local variable table, slot order
    pub variables: Vec<VariableDef>,
    /// Instruction stream, program order
    pub instructions: Vec<Instruction>,
    /// Exception handler table, declaration order
    pub handlers: Vec<ExceptionHandler>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ids::MethodId;

    #[test]
    fn test_mnemonics() {
        assert_eq!(OpCode::LdcI4.mnemonic(), "ldc.i4");
        assert_eq!(OpCode::UnboxAny.mnemonic(), "unbox.any");
        assert_eq!(OpCode::Callvirt.mnemonic(), "callvirt");
    }

    #[test]
    fn test_branch_classification() {
        assert!(OpCode::Br.is_branch());
        assert!(OpCode::Switch.is_branch());
        assert!(OpCode::Leave.is_branch());
        assert!(!OpCode::Call.is_branch());
        assert!(!OpCode::Ret.is_branch());
    }

    #[test]
    fn test_self_branch_operand() {
        let id = InstructionId {
            method: MethodId::new(0),
            index: 3,
        };
        let inst = Instruction::with_operand(OpCode::Br, Operand::Target(id));
        assert_eq!(inst.operand, Operand::Target(id));
    }
}
