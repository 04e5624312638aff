//! Default-argument trampoline synthesizer.
//!
//! A function with defaulted parameters gets one extra entry point taking
//! the full argument list plus a trailing int presence mask. Bit *i* of the
//! mask set means parameter *i* was omitted by the caller and its declared
//! default expression supplies the value; bit clear forwards the incoming
//! slot unchanged. The trampoline rebuilds the canonical frame layout
//! independently, which is why the layout must be reproducible from the
//! descriptor alone.

use anvil_bytecode::{
    ClassBuilder, Instruction, InstructionStream, InvokeKind, MethodArtifact, MethodCode,
    MethodFlags, MethodSignature, RuntimeType,
};

use crate::context::OwnerKind;
use crate::descriptors::FunctionDescriptor;
use crate::error::{ArtifactKind, CodegenError};
use crate::frame::{FrameMap, SlotKind};
use crate::services::{ExpressionLowering, TypeMapper};

/// Suffix appended to the implementation name for the trampoline.
/// Constructors keep their constructor name.
pub const DEFAULT_PARAMS_SUFFIX: &str = "$default";

/// Presence masks are a single machine int.
const MAX_MASK_BITS: usize = 32;

pub(crate) fn generate<M: TypeMapper, L: ExpressionLowering>(
    class: &mut ClassBuilder,
    types: &M,
    lowering: &mut L,
    kind: &OwnerKind,
    function: &FunctionDescriptor,
    signature: &MethodSignature,
) -> Result<(), CodegenError> {
    // Abstract-only interface declarations get no trampoline; their
    // static implementation container does.
    if matches!(kind, OwnerKind::InterfaceDeclaration) {
        return Ok(());
    }
    if !function.has_default_values() {
        return Ok(());
    }

    // The trampoline is keyed by the instance-level contract: for a static
    // trait implementation the explicit receiver parameter comes off first.
    let mut target = signature.erased();
    if matches!(kind, OwnerKind::InterfaceStaticImpl { .. }) {
        if target.parameters.is_empty() {
            return Err(CodegenError::internal(
                function.source,
                "static trait implementation signature has no receiver parameter",
            ));
        }
        target.parameters.remove(0);
    }

    let is_constructor = target.is_constructor();
    let is_namespace = matches!(kind, OwnerKind::NamespaceStatic);
    let receiver_ty = match kind {
        OwnerKind::InterfaceStaticImpl { interface } => RuntimeType::object(interface.clone()),
        _ => RuntimeType::object(class.name()),
    };

    let mut parameters = Vec::with_capacity(target.parameters.len() + 2);
    if !is_namespace && !is_constructor {
        parameters.push(receiver_ty.clone());
    }
    parameters.extend(target.parameters.iter().cloned());
    parameters.push(RuntimeType::Int);

    let name = if is_constructor {
        target.name.clone()
    } else {
        format!("{}{DEFAULT_PARAMS_SUFFIX}", target.name)
    };
    let mut flags = MethodFlags::PUBLIC;
    if !is_constructor {
        flags |= MethodFlags::STATIC;
    }
    let mut artifact = MethodArtifact::signature_only(
        flags,
        MethodSignature::new(name, parameters, target.return_type.clone()),
    );

    if class.generate_code() {
        let owner = class.name().to_string();
        generate_body(
            types, lowering, kind, function, &target, &receiver_ty, &owner, is_namespace,
            &mut artifact,
        )?;
    }
    class.push(artifact);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_body<M: TypeMapper, L: ExpressionLowering>(
    types: &M,
    lowering: &mut L,
    kind: &OwnerKind,
    function: &FunctionDescriptor,
    target: &MethodSignature,
    receiver_ty: &RuntimeType,
    owner: &str,
    is_namespace: bool,
    artifact: &mut MethodArtifact,
) -> Result<(), CodegenError> {
    let receiver = (!is_namespace).then(|| ("this", receiver_ty.clone()));
    let mut frame = FrameMap::for_method(receiver, function, types);
    // Mask lands immediately after the last ordinary parameter slot.
    let mask_slot = frame.enter_temp(RuntimeType::Int);

    let mut code = InstructionStream::new();
    code.reserve_slots(frame.total_words());

    for (index, type_parameter) in function.reified_type_parameters() {
        if let Some(slot) = frame.token_slot(index) {
            lowering.bind_type_token(type_parameter, slot);
        }
    }

    // Receiver, extension receiver, and token arguments forward unchanged.
    for entry in frame.entries() {
        match entry.kind {
            SlotKind::Receiver | SlotKind::ExtensionReceiver | SlotKind::TypeToken { .. } => {
                code.emit(Instruction::Load {
                    slot: entry.slot,
                    ty: entry.ty.clone(),
                });
            }
            _ => {}
        }
    }

    for parameter in &function.value_parameters {
        let ty = types.map_type(&parameter.declared_type);
        let Some(slot) = frame.value_slot(parameter.index) else {
            return Err(CodegenError::internal(
                function.source,
                format!("parameter `{}` missing from frame layout", parameter.name),
            ));
        };
        if !parameter.has_default_value {
            code.emit(Instruction::Load { slot, ty });
            continue;
        }

        if parameter.index >= MAX_MASK_BITS {
            return Err(CodegenError::internal(
                function.source,
                format!(
                    "defaulted parameter `{}` at index {} exceeds the presence mask",
                    parameter.name, parameter.index
                ),
            ));
        }
        if lowering.default_value_source(parameter).is_none() {
            return Err(CodegenError::internal(
                function.source,
                format!(
                    "default value for parameter `{}` has no source declaration",
                    parameter.name
                ),
            ));
        }

        code.emit(Instruction::Load {
            slot: mask_slot,
            ty: RuntimeType::Int,
        });
        code.emit(Instruction::PushInt(1 << parameter.index));
        code.emit(Instruction::IntAnd);
        let load_argument = code.new_label();
        code.emit(Instruction::JumpIfZero(load_argument));
        lowering.lower_default_value(parameter, &ty, &frame, &mut code)?;
        let done = code.new_label();
        code.emit(Instruction::Jump(done));
        code.bind(load_argument);
        code.emit(Instruction::Load {
            slot,
            ty: ty.clone(),
        });
        code.bind(done);
    }

    let (invoke_kind, invoke_owner) = match kind {
        OwnerKind::InterfaceStaticImpl { interface } => {
            (InvokeKind::Interface, interface.clone())
        }
        OwnerKind::NamespaceStatic => (InvokeKind::Static, owner.to_string()),
        _ if target.is_constructor() => (InvokeKind::Special, owner.to_string()),
        _ => (InvokeKind::Virtual, owner.to_string()),
    };
    code.emit(Instruction::Invoke {
        kind: invoke_kind,
        owner: invoke_owner,
        signature: target.clone(),
    });
    code.emit(Instruction::Return {
        ty: target.return_type.clone(),
    });

    let (instructions, limits) = code
        .finalize()
        .map_err(|e| CodegenError::finalize(ArtifactKind::DefaultMethod, function.source, e))?;
    artifact.code = Some(MethodCode {
        instructions,
        limits,
    });
    Ok(())
}
