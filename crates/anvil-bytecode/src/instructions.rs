//! Instruction IR with symbolic labels.
//!
//! Instructions reference branch targets through [`Label`]s; binding a label
//! is itself an instruction so streams stay append-only. Address assignment
//! and encoding belong to the class file assembler, not to this crate.

use std::fmt;

use crate::signature::MethodSignature;
use crate::types::RuntimeType;

/// Symbolic branch target, unique within one instruction stream.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Dispatch selection for call instructions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum InvokeKind {
    /// Virtual dispatch through the receiver's class.
    Virtual,
    /// Interface dispatch.
    Interface,
    /// Non-virtual dispatch (constructors, super calls).
    Special,
    /// Static dispatch, no receiver.
    Static,
}

impl InvokeKind {
    fn mnemonic(self) -> &'static str {
        match self {
            Self::Virtual => "invoke_virtual",
            Self::Interface => "invoke_interface",
            Self::Special => "invoke_special",
            Self::Static => "invoke_static",
        }
    }
}

/// One stack machine instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// Push a local slot onto the operand stack.
    Load { slot: u16, ty: RuntimeType },
    /// Pop the operand stack into a local slot.
    Store { slot: u16, ty: RuntimeType },
    /// Push an int constant.
    PushInt(i32),
    /// Push a long constant.
    PushLong(i64),
    /// Push the null reference.
    PushNull,
    /// Pop two ints, push their bitwise and.
    IntAnd,
    /// Allocate an uninitialized instance.
    New { class: String },
    /// Duplicate the top stack word.
    Dup,
    /// Checked reference cast; leaves the operand on the stack.
    CheckCast { ty: RuntimeType },
    /// Convert a primitive value to its wrapper object.
    Box { from: RuntimeType },
    /// Pop a receiver, push a field value.
    GetField {
        class: String,
        field: String,
        ty: RuntimeType,
    },
    /// Pop a value and a receiver, write the field.
    PutField {
        class: String,
        field: String,
        ty: RuntimeType,
    },
    /// Call a method; pops arguments (and receiver unless static), pushes
    /// the return value.
    Invoke {
        kind: InvokeKind,
        owner: String,
        signature: MethodSignature,
    },
    /// Pop an int, branch if zero.
    JumpIfZero(Label),
    /// Unconditional branch.
    Jump(Label),
    /// Bind a label to the current position.
    Bind(Label),
    /// Return from the method, popping the value for non-void types.
    Return { ty: RuntimeType },
}

impl Instruction {
    /// Net operand-stack effect in words. Peaks within a single instruction
    /// never exceed the depth before or after it, so net effects are enough
    /// for max-stack computation.
    pub fn stack_effect(&self) -> i32 {
        match self {
            Self::Load { ty, .. } => i32::from(ty.width()),
            Self::Store { ty, .. } => -i32::from(ty.width()),
            Self::PushInt(_) => 1,
            Self::PushLong(_) => 2,
            Self::PushNull => 1,
            Self::IntAnd => -1,
            Self::New { .. } => 1,
            Self::Dup => 1,
            Self::CheckCast { .. } => 0,
            Self::Box { from } => 1 - i32::from(from.width()),
            Self::GetField { ty, .. } => i32::from(ty.width()) - 1,
            Self::PutField { ty, .. } => -(1 + i32::from(ty.width())),
            Self::Invoke { kind, signature, .. } => {
                let arguments: i32 = signature
                    .parameters
                    .iter()
                    .map(|p| i32::from(p.width()))
                    .sum();
                let receiver = if *kind == InvokeKind::Static { 0 } else { 1 };
                i32::from(signature.return_type.width()) - arguments - receiver
            }
            Self::JumpIfZero(_) => -1,
            Self::Jump(_) | Self::Bind(_) => 0,
            Self::Return { ty } => -i32::from(ty.width()),
        }
    }

    /// Branch target, if this instruction has one.
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Self::JumpIfZero(label) | Self::Jump(label) => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { slot, ty } => write!(f, "load {slot} {ty}"),
            Self::Store { slot, ty } => write!(f, "store {slot} {ty}"),
            Self::PushInt(value) => write!(f, "push_int {value}"),
            Self::PushLong(value) => write!(f, "push_long {value}"),
            Self::PushNull => f.write_str("push_null"),
            Self::IntAnd => f.write_str("and_int"),
            Self::New { class } => write!(f, "new {class}"),
            Self::Dup => f.write_str("dup"),
            Self::CheckCast { ty } => write!(f, "checkcast {ty}"),
            Self::Box { from } => write!(f, "box {from}"),
            Self::GetField { class, field, ty } => {
                write!(f, "getfield {class}.{field} {ty}")
            }
            Self::PutField { class, field, ty } => {
                write!(f, "putfield {class}.{field} {ty}")
            }
            Self::Invoke {
                kind,
                owner,
                signature,
            } => write!(f, "{} {owner}.{signature}", kind.mnemonic()),
            Self::JumpIfZero(label) => write!(f, "if_zero {label}"),
            Self::Jump(label) => write!(f, "jump {label}"),
            Self::Bind(label) => write!(f, "{label}:"),
            Self::Return { ty } => write!(f, "return {ty}"),
        }
    }
}
