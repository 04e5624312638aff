//! Deterministic collaborator doubles and descriptor builders for tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use anvil_bytecode::{
    Instruction, InstructionStream, InvokeKind, MethodSignature, RuntimeType,
};

use crate::descriptors::{
    BodyId, DeclaredType, FunctionDescriptor, Modality, ReceiverParameter, SourceId,
    TypeParameter, ValueParameter,
};
use crate::error::CodegenError;
use crate::frame::FrameMap;
use crate::services::{ExpressionLowering, TypeMapper};

/// Fixed-table type mapper. Well-known names map to primitives, everything
/// else becomes an `app/` class reference.
#[derive(Default)]
pub struct TestTypes {
    /// Parameter names whose storage is shared with a closure.
    pub shared: BTreeSet<String>,
}

impl TestTypes {
    pub fn with_shared(names: &[&str]) -> Self {
        Self {
            shared: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl TypeMapper for TestTypes {
    fn map_type(&self, ty: &DeclaredType) -> RuntimeType {
        match ty.name.as_str() {
            "Unit" => RuntimeType::Void,
            "Boolean" => RuntimeType::Boolean,
            "Int" => RuntimeType::Int,
            "Long" => RuntimeType::Long,
            "Double" => RuntimeType::Double,
            "String" => RuntimeType::object("rt/String"),
            "Any" => RuntimeType::object_root(),
            name => RuntimeType::object(format!("app/{name}")),
        }
    }

    fn map_signature(&self, function: &FunctionDescriptor) -> MethodSignature {
        let mut parameters = Vec::new();
        if let Some(extension) = &function.receiver_parameter {
            parameters.push(self.map_type(&extension.declared_type));
        }
        for _ in function.reified_type_parameters() {
            parameters.push(RuntimeType::type_token());
        }
        for parameter in &function.value_parameters {
            let ty = match &parameter.vararg_element {
                Some(element) => RuntimeType::array(self.map_type(element)),
                None => self.map_type(&parameter.declared_type),
            };
            parameters.push(ty);
        }
        MethodSignature::new(
            function.name.clone(),
            parameters,
            self.map_type(&function.return_type),
        )
    }

    fn shared_storage_type(&self, parameter: &ValueParameter) -> Option<RuntimeType> {
        self.shared
            .contains(&parameter.name)
            .then(|| RuntimeType::object("rt/Ref"))
    }
}

/// Canned expression lowering. Bodies and default values push a constant of
/// the expected type; every call is observable through the recorded state.
#[derive(Default)]
pub struct TestLowering {
    /// Parameter names reported as having no default-value source.
    pub missing_defaults: BTreeSet<String>,
    /// Type tokens bound before lowering, `(name, slot)` in bind order.
    pub bound_tokens: Vec<(String, u16)>,
}

impl TestLowering {
    pub fn without_default_source(names: &[&str]) -> Self {
        Self {
            missing_defaults: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

fn push_constant(ty: &RuntimeType, code: &mut InstructionStream) {
    match ty {
        RuntimeType::Void => {}
        RuntimeType::Long => code.emit(Instruction::PushLong(0)),
        ty if ty.is_reference() => code.emit(Instruction::PushNull),
        _ => code.emit(Instruction::PushInt(0)),
    }
}

impl ExpressionLowering for TestLowering {
    fn lower_body(
        &mut self,
        _function: &FunctionDescriptor,
        _frame: &FrameMap,
        return_type: &RuntimeType,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError> {
        push_constant(return_type, code);
        code.emit(Instruction::Return {
            ty: return_type.clone(),
        });
        Ok(())
    }

    fn lower_delegate_target(
        &mut self,
        delegate: BodyId,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError> {
        code.emit(Instruction::GetField {
            class: "app/Owner".to_string(),
            field: format!("$delegate{}", delegate.0),
            ty: RuntimeType::object_root(),
        });
        Ok(())
    }

    fn lower_default_value(
        &mut self,
        _parameter: &ValueParameter,
        target: &RuntimeType,
        _frame: &FrameMap,
        code: &mut InstructionStream,
    ) -> Result<(), CodegenError> {
        push_constant(target, code);
        Ok(())
    }

    fn default_value_source(&self, parameter: &ValueParameter) -> Option<SourceId> {
        (!self.missing_defaults.contains(&parameter.name)).then_some(SourceId(900))
    }

    fn bind_type_token(&mut self, type_parameter: &TypeParameter, slot: u16) {
        self.bound_tokens.push((type_parameter.name.clone(), slot));
    }
}

/// Incremental [`FunctionDescriptor`] builder for tests.
pub struct FunctionBuilder {
    descriptor: FunctionDescriptor,
}

pub fn function(name: &str) -> FunctionBuilder {
    FunctionBuilder {
        descriptor: FunctionDescriptor {
            name: name.to_string(),
            source: SourceId(1),
            modality: Modality::Open,
            return_type: DeclaredType::new("Unit"),
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            receiver_parameter: None,
            dispatch_receiver: None,
            overridden: Vec::new(),
            body: Some(BodyId(1)),
        },
    }
}

impl FunctionBuilder {
    pub fn source(mut self, id: u32) -> Self {
        self.descriptor.source = SourceId(id);
        self
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.descriptor.return_type = DeclaredType::new(ty);
        self
    }

    pub fn final_(mut self) -> Self {
        self.descriptor.modality = Modality::Final;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.descriptor.modality = Modality::Abstract;
        self.descriptor.body = None;
        self
    }

    pub fn param(mut self, name: &str, ty: &str) -> Self {
        let index = self.descriptor.value_parameters.len();
        self.descriptor.value_parameters.push(ValueParameter {
            name: name.to_string(),
            index,
            declared_type: DeclaredType::new(ty),
            has_default_value: false,
            vararg_element: None,
        });
        self
    }

    pub fn defaulted_param(mut self, name: &str, ty: &str) -> Self {
        let index = self.descriptor.value_parameters.len();
        self.descriptor.value_parameters.push(ValueParameter {
            name: name.to_string(),
            index,
            declared_type: DeclaredType::new(ty),
            has_default_value: true,
            vararg_element: None,
        });
        self
    }

    pub fn vararg_param(mut self, name: &str, element: &str) -> Self {
        let index = self.descriptor.value_parameters.len();
        self.descriptor.value_parameters.push(ValueParameter {
            name: name.to_string(),
            index,
            declared_type: DeclaredType::new("Array")
                .with_arguments(vec![DeclaredType::new(element)]),
            has_default_value: false,
            vararg_element: Some(DeclaredType::new(element)),
        });
        self
    }

    pub fn type_param(mut self, name: &str, reified: bool) -> Self {
        self.descriptor.type_parameters.push(TypeParameter {
            name: name.to_string(),
            reified,
        });
        self
    }

    pub fn extension(mut self, ty: &str) -> Self {
        self.descriptor.receiver_parameter = Some(ReceiverParameter {
            declared_type: DeclaredType::new(ty),
        });
        self
    }

    pub fn dispatch(mut self, ty: &str) -> Self {
        self.descriptor.dispatch_receiver = Some(ReceiverParameter {
            declared_type: DeclaredType::new(ty),
        });
        self
    }

    pub fn overrides(mut self, ancestor: FunctionDescriptor) -> Self {
        self.descriptor.overridden.push(Arc::new(ancestor));
        self
    }

    pub fn build(self) -> FunctionDescriptor {
        self.descriptor
    }
}

/// First invoke instruction in a stream of rendered instructions.
pub fn find_invoke(instructions: &[Instruction]) -> Option<(InvokeKind, &str, &MethodSignature)> {
    instructions.iter().find_map(|i| match i {
        Instruction::Invoke {
            kind,
            owner,
            signature,
        } => Some((*kind, owner.as_str(), signature)),
        _ => None,
    })
}
