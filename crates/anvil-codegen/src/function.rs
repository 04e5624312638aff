//! Method emission protocol.
//!
//! One [`FunctionCodegen::generate`] call produces every artifact a resolved
//! function needs: the primary method, override bridges, and the
//! default-argument trampoline. Emission is strictly sequential and keeps no
//! state across calls; everything mutable lives in the output class builder.

use anvil_bytecode::{
    CONSTRUCTOR_NAME, ClassBuilder, Instruction, InstructionStream, InvokeKind, MetadataKind,
    MethodArtifact, MethodCode, MethodFlags, MethodMetadata, MethodSignature, ParameterMetadata,
    ParameterRole, RuntimeType,
};

use crate::context::OwnerKind;
use crate::descriptors::{BodyId, FunctionDescriptor, Modality};
use crate::error::{ArtifactKind, CodegenError};
use crate::frame::{FrameMap, SlotKind};
use crate::services::{ExpressionLowering, TypeMapper};
use crate::{bridge, defaults};

/// Drives artifact emission for one declaring type.
pub struct FunctionCodegen<'a, M: TypeMapper, L: ExpressionLowering> {
    class: &'a mut ClassBuilder,
    types: &'a M,
    lowering: &'a mut L,
}

impl<'a, M: TypeMapper, L: ExpressionLowering> FunctionCodegen<'a, M, L> {
    pub fn new(class: &'a mut ClassBuilder, types: &'a M, lowering: &'a mut L) -> Self {
        Self {
            class,
            types,
            lowering,
        }
    }

    /// Emit all artifacts for `function` with the given owner context and
    /// mapped implementation signature.
    pub fn generate(
        &mut self,
        kind: &OwnerKind,
        function: &FunctionDescriptor,
        signature: &MethodSignature,
    ) -> Result<(), CodegenError> {
        // A static trait implementation without a body contributes nothing
        // to the container; the interface declaration owns the signature.
        let skip_primary =
            matches!(kind, OwnerKind::InterfaceStaticImpl { .. }) && function.body.is_none();

        let mut emitted_body = false;
        if !skip_primary {
            emitted_body = self.generate_primary(kind, function, signature)?;
        }
        if emitted_body {
            bridge::generate(self.class, self.types, kind, function, signature)?;
        }
        defaults::generate(self.class, self.types, self.lowering, kind, function, signature)
    }

    /// Emit the primary artifact. Returns whether a body was generated,
    /// which gates bridge synthesis.
    fn generate_primary(
        &mut self,
        kind: &OwnerKind,
        function: &FunctionDescriptor,
        signature: &MethodSignature,
    ) -> Result<bool, CodegenError> {
        let mut flags = MethodFlags::PUBLIC;
        if function.is_vararg() {
            flags |= MethodFlags::VARARGS;
        }
        if function.modality == Modality::Final {
            flags |= MethodFlags::FINAL;
        }
        if kind.is_static() {
            flags |= MethodFlags::STATIC;
        }
        let is_abstract = !kind.is_static()
            && (function.body.is_none() || matches!(kind, OwnerKind::InterfaceDeclaration));
        if is_abstract {
            flags |= MethodFlags::ABSTRACT;
        }

        let mut artifact = MethodArtifact::signature_only(flags, signature.clone());

        if kind.writes_metadata() && self.class.generate_code() {
            artifact.metadata = Some(method_metadata(function));
            artifact.parameter_metadata = parameter_metadata(function);
        }

        let generate_body = !is_abstract && self.class.generate_code();
        if generate_body {
            self.generate_body(kind, function, signature, &mut artifact)?;
        }
        self.class.push(artifact);
        Ok(generate_body)
    }

    fn generate_body(
        &mut self,
        kind: &OwnerKind,
        function: &FunctionDescriptor,
        signature: &MethodSignature,
        artifact: &mut MethodArtifact,
    ) -> Result<(), CodegenError> {
        let receiver = self.receiver_entry(kind, function);
        let frame = FrameMap::for_method(
            receiver.as_ref().map(|(name, ty)| (name.as_str(), ty.clone())),
            function,
            self.types,
        );
        let mut code = InstructionStream::new();
        code.reserve_slots(frame.total_words());

        // Reified tokens must be visible to the lowering collaborator
        // before any expression is generated.
        for (index, type_parameter) in function.reified_type_parameters() {
            if let Some(slot) = frame.token_slot(index) {
                self.lowering.bind_type_token(type_parameter, slot);
            }
        }

        match kind {
            OwnerKind::DelegateToObject {
                delegate,
                interface,
            } => {
                self.generate_delegate_body(*delegate, interface, signature, &mut code)?;
            }
            _ => {
                self.box_shared_parameters(function, &frame, &mut code)?;
                self.lowering
                    .lower_body(function, &frame, &signature.return_type, &mut code)?;
            }
        }

        artifact.local_variables = frame
            .entries()
            .iter()
            .filter(|entry| !matches!(entry.kind, SlotKind::Temp))
            .map(|entry| anvil_bytecode::LocalVariableEntry {
                name: entry.name.clone(),
                ty: entry.ty.clone(),
                slot: entry.slot,
            })
            .collect();

        let (instructions, limits) = code
            .finalize()
            .map_err(|e| CodegenError::finalize(ArtifactKind::Method, function.source, e))?;
        artifact.code = Some(MethodCode {
            instructions,
            limits,
        });
        Ok(())
    }

    /// Slot 0 occupant for the primary method, if any.
    fn receiver_entry(
        &self,
        kind: &OwnerKind,
        function: &FunctionDescriptor,
    ) -> Option<(String, RuntimeType)> {
        match kind {
            OwnerKind::Instance | OwnerKind::DelegateToObject { .. } => {
                let ty = function
                    .dispatch_receiver
                    .as_ref()
                    .map(|receiver| self.types.map_type(&receiver.declared_type))
                    .unwrap_or_else(|| RuntimeType::object(self.class.name()));
                Some(("this".to_string(), ty))
            }
            OwnerKind::InterfaceStaticImpl { interface } => {
                Some(("$this".to_string(), RuntimeType::object(interface.clone())))
            }
            OwnerKind::NamespaceStatic | OwnerKind::InterfaceDeclaration => None,
        }
    }

    /// Replace the raw value of every closure-shared parameter with a
    /// freshly allocated boxed-reference cell. Runs strictly before body
    /// lowering, which assumes already-boxed storage.
    fn box_shared_parameters(
        &mut self,
        function: &FunctionDescriptor,
        frame: &FrameMap,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError> {
        for parameter in &function.value_parameters {
            let Some(cell) = self.types.shared_storage_type(parameter) else {
                continue;
            };
            let Some(class) = cell.internal_name().map(str::to_string) else {
                return Err(CodegenError::internal(
                    function.source,
                    format!(
                        "shared storage for parameter `{}` is not a class type",
                        parameter.name
                    ),
                ));
            };
            let Some(slot) = frame.value_slot(parameter.index) else {
                return Err(CodegenError::internal(
                    function.source,
                    format!("parameter `{}` missing from frame layout", parameter.name),
                ));
            };
            let raw = self.types.map_type(&parameter.declared_type);
            let field_ty = if raw.is_reference() {
                RuntimeType::object_root()
            } else {
                raw.clone()
            };

            code.emit(Instruction::New {
                class: class.clone(),
            });
            code.emit(Instruction::Dup);
            code.emit(Instruction::Dup);
            code.emit(Instruction::Invoke {
                kind: InvokeKind::Special,
                owner: class.clone(),
                signature: MethodSignature::new(CONSTRUCTOR_NAME, vec![], RuntimeType::Void),
            });
            code.emit(Instruction::Load {
                slot,
                ty: raw,
            });
            code.emit(Instruction::PutField {
                class,
                field: "value".to_string(),
                ty: field_ty,
            });
            code.emit(Instruction::Store { slot, ty: cell });
        }
        Ok(())
    }

    /// Delegate bodies forward every declared argument to the delegate
    /// object through interface dispatch; no boxing, no defaults.
    fn generate_delegate_body(
        &mut self,
        delegate: BodyId,
        interface: &str,
        signature: &MethodSignature,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError> {
        code.emit(Instruction::Load {
            slot: 0,
            ty: RuntimeType::object_root(),
        });
        self.lowering.lower_delegate_target(delegate, code)?;

        let mut slot = 1u16;
        for ty in &signature.parameters {
            code.emit(Instruction::Load {
                slot,
                ty: ty.clone(),
            });
            slot += ty.width();
        }
        code.emit(Instruction::Invoke {
            kind: InvokeKind::Interface,
            owner: interface.to_string(),
            signature: signature.erased(),
        });
        code.emit(Instruction::Return {
            ty: signature.return_type.clone(),
        });
        Ok(())
    }
}

fn method_metadata(function: &FunctionDescriptor) -> MethodMetadata {
    MethodMetadata {
        kind: MetadataKind::Regular,
        nullable_return: function.return_type.nullable,
        type_parameters: function
            .type_parameters
            .iter()
            .map(|tp| tp.name.clone())
            .collect(),
        return_signature: Some(function.return_type.render()),
    }
}

/// Positional parameter metadata: extension receiver, reified tokens, value
/// parameters. The order must match the frame layout exactly; consumers
/// correlate by index.
fn parameter_metadata(function: &FunctionDescriptor) -> Vec<ParameterMetadata> {
    let mut entries = Vec::new();
    if let Some(extension) = &function.receiver_parameter {
        entries.push(ParameterMetadata {
            role: ParameterRole::ExtensionReceiver,
            name: "this$receiver".to_string(),
            nullable: extension.declared_type.nullable,
            has_default: false,
            type_signature: Some(extension.declared_type.render()),
        });
    }
    for (_, type_parameter) in function.reified_type_parameters() {
        entries.push(ParameterMetadata {
            role: ParameterRole::TypeToken,
            name: type_parameter.name.clone(),
            nullable: false,
            has_default: false,
            type_signature: None,
        });
    }
    for parameter in &function.value_parameters {
        entries.push(ParameterMetadata {
            role: ParameterRole::Value,
            name: parameter.name.clone(),
            nullable: parameter.declared_type.nullable,
            has_default: parameter.has_default_value,
            type_signature: Some(parameter.declared_type.render()),
        });
    }
    entries
}
