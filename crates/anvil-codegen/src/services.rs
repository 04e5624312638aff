//! Capabilities consumed from compiler collaborators.
//!
//! The engine owns the synthesis protocol but not type mapping or
//! expression-level code generation. Both arrive through these traits;
//! tests substitute deterministic doubles.

use anvil_bytecode::{InstructionStream, MethodSignature, RuntimeType};

use crate::descriptors::{
    BodyId, DeclaredType, FunctionDescriptor, SourceId, TypeParameter, ValueParameter,
};
use crate::error::CodegenError;
use crate::frame::FrameMap;

/// Declared-type to runtime-type mapping, plus the signature and
/// shared-storage queries that depend on it.
pub trait TypeMapper {
    /// Erase a declared type to its runtime representation.
    fn map_type(&self, ty: &DeclaredType) -> RuntimeType;

    /// Map a descriptor's erasure-original form to a full method signature
    /// (extension receiver and reified token parameters included).
    fn map_signature(&self, function: &FunctionDescriptor) -> MethodSignature;

    /// Boxed-reference cell class for a parameter whose storage is shared
    /// with a nested closure, `None` when the raw value can stay in its
    /// slot.
    fn shared_storage_type(&self, parameter: &ValueParameter) -> Option<RuntimeType>;
}

/// Expression-level code generation, driven by the emission protocol after
/// the frame is prepared.
pub trait ExpressionLowering {
    /// Lower the function body, leaving a `return` of `return_type` as the
    /// final instruction on every path.
    fn lower_body(
        &mut self,
        function: &FunctionDescriptor,
        frame: &FrameMap,
        return_type: &RuntimeType,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError>;

    /// Evaluate a delegate-target expression. The dispatch receiver is on
    /// the stack; the delegate object must replace it.
    fn lower_delegate_target(
        &mut self,
        delegate: BodyId,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError>;

    /// Evaluate one parameter's default-value expression, pushing a value
    /// of `target` type.
    fn lower_default_value(
        &mut self,
        parameter: &ValueParameter,
        target: &RuntimeType,
        frame: &FrameMap,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError>;

    /// Source declaration backing a parameter's default value. `None` for a
    /// defaulted parameter violates a resolver invariant and is fatal.
    fn default_value_source(&self, parameter: &ValueParameter) -> Option<SourceId>;

    /// Install the frame slot holding a reified type parameter's token,
    /// before any body or default-value lowering runs.
    fn bind_type_token(&mut self, type_parameter: &TypeParameter, slot: u16);
}
