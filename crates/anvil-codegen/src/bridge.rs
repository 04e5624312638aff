//! Bridge synthesizer.
//!
//! A function whose mapped implementation signature differs from an
//! overridden ancestor's erased signature is unreachable through that
//! ancestor's call sites. For every such mismatch a forwarding method with
//! the ancestor's exact signature is emitted: load receiver, adapt and load
//! each argument, invoke the implementation virtually, adapt the return
//! value back. Bridges sharing a final signature are emitted once.

use anvil_bytecode::{
    ClassBuilder, Instruction, InstructionStream, InvokeKind, MethodArtifact, MethodCode,
    MethodFlags, MethodSignature, RuntimeType,
};
use indexmap::IndexSet;

use crate::context::OwnerKind;
use crate::descriptors::FunctionDescriptor;
use crate::error::{ArtifactKind, CodegenError};
use crate::services::TypeMapper;

pub(crate) fn generate<M: TypeMapper>(
    class: &mut ClassBuilder,
    types: &M,
    kind: &OwnerKind,
    function: &FunctionDescriptor,
    implementation: &MethodSignature,
) -> Result<(), CodegenError> {
    // Static trait-implementation containers are never dispatched through
    // an ancestor signature.
    if matches!(kind, OwnerKind::InterfaceStaticImpl { .. }) {
        return Ok(());
    }

    let mut seen: IndexSet<MethodSignature> = IndexSet::new();
    let ancestors = function
        .overridden
        .iter()
        .map(|overridden| types.map_signature(overridden))
        .chain(std::iter::once(types.map_signature(function)));

    for ancestor in ancestors {
        let mut ancestor = ancestor.erased();
        ancestor.name = implementation.name.clone();
        if ancestor.erasure_equals(implementation) {
            continue;
        }
        if !seen.insert(ancestor.clone()) {
            continue;
        }
        emit_bridge(class, function, implementation, &ancestor)?;
    }
    Ok(())
}

fn emit_bridge(
    class: &mut ClassBuilder,
    function: &FunctionDescriptor,
    implementation: &MethodSignature,
    bridge: &MethodSignature,
) -> Result<(), CodegenError> {
    let mut code = InstructionStream::new();
    code.emit(Instruction::Load {
        slot: 0,
        ty: RuntimeType::object_root(),
    });

    let mut slot = 1u16;
    for (index, from) in bridge.parameters.iter().enumerate() {
        code.emit(Instruction::Load {
            slot,
            ty: from.clone(),
        });
        // Reference arguments may need a representation adaptation down to
        // the implementation's narrower parameter type.
        if from.is_reference()
            && let Some(target) = implementation.parameters.get(index)
            && target.is_reference()
            && target != from
        {
            code.emit(Instruction::CheckCast { ty: target.clone() });
        }
        slot += from.width();
    }
    code.reserve_slots(slot);

    code.emit(Instruction::Invoke {
        kind: InvokeKind::Virtual,
        owner: class.name().to_string(),
        signature: implementation.erased(),
    });

    let returned = &implementation.return_type;
    let expected = &bridge.return_type;
    if *returned == RuntimeType::Void && *expected != RuntimeType::Void {
        code.emit(Instruction::PushNull);
    } else if *returned != RuntimeType::Void && returned.is_primitive() && expected.is_reference()
    {
        code.emit(Instruction::Box {
            from: returned.clone(),
        });
    }
    code.emit(Instruction::Return {
        ty: expected.clone(),
    });

    let (instructions, limits) = code
        .finalize()
        .map_err(|e| CodegenError::finalize(ArtifactKind::BridgeMethod, function.source, e))?;

    let mut artifact = MethodArtifact::signature_only(MethodFlags::PUBLIC, bridge.clone());
    artifact.code = Some(MethodCode {
        instructions,
        limits,
    });
    class.push(artifact);
    Ok(())
}
