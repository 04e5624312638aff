use crate::instructions::{Instruction, InvokeKind, Label};
use crate::signature::MethodSignature;
use crate::types::RuntimeType;

#[test]
fn load_store_effects_track_width() {
    let load_long = Instruction::Load {
        slot: 1,
        ty: RuntimeType::Long,
    };
    let store_ref = Instruction::Store {
        slot: 0,
        ty: RuntimeType::object_root(),
    };
    assert_eq!(load_long.stack_effect(), 2);
    assert_eq!(store_ref.stack_effect(), -1);
}

#[test]
fn invoke_effect_counts_receiver_and_arguments() {
    let signature = MethodSignature::new(
        "f",
        vec![RuntimeType::Int, RuntimeType::Long],
        RuntimeType::Int,
    );
    let virtual_call = Instruction::Invoke {
        kind: InvokeKind::Virtual,
        owner: "app/A".to_string(),
        signature: signature.clone(),
    };
    let static_call = Instruction::Invoke {
        kind: InvokeKind::Static,
        owner: "app/A".to_string(),
        signature,
    };
    // receiver(1) + int(1) + long(2) popped, int(1) pushed
    assert_eq!(virtual_call.stack_effect(), -3);
    assert_eq!(static_call.stack_effect(), -2);
}

#[test]
fn box_narrows_wide_primitives() {
    let box_int = Instruction::Box {
        from: RuntimeType::Int,
    };
    let box_long = Instruction::Box {
        from: RuntimeType::Long,
    };
    assert_eq!(box_int.stack_effect(), 0);
    assert_eq!(box_long.stack_effect(), -1);
}

#[test]
fn field_effects() {
    let get = Instruction::GetField {
        class: "app/A".to_string(),
        field: "x".to_string(),
        ty: RuntimeType::Long,
    };
    let put = Instruction::PutField {
        class: "app/A".to_string(),
        field: "x".to_string(),
        ty: RuntimeType::Long,
    };
    assert_eq!(get.stack_effect(), 1);
    assert_eq!(put.stack_effect(), -3);
}

#[test]
fn jump_targets() {
    assert_eq!(
        Instruction::Jump(Label(3)).jump_target(),
        Some(Label(3))
    );
    assert_eq!(
        Instruction::JumpIfZero(Label(7)).jump_target(),
        Some(Label(7))
    );
    assert_eq!(Instruction::Bind(Label(3)).jump_target(), None);
    assert_eq!(Instruction::Dup.jump_target(), None);
}

#[test]
fn display_mnemonics() {
    let invoke = Instruction::Invoke {
        kind: InvokeKind::Interface,
        owner: "app/Shape".to_string(),
        signature: MethodSignature::new("area", vec![], RuntimeType::Double),
    };
    assert_eq!(invoke.to_string(), "invoke_interface app/Shape.area()D");
    assert_eq!(Instruction::Bind(Label(2)).to_string(), "L2:");
    assert_eq!(
        Instruction::Return {
            ty: RuntimeType::Void
        }
        .to_string(),
        "return void"
    );
}
