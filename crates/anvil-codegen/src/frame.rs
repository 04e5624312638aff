//! Stack-frame slot layout.
//!
//! The positional order — dispatch receiver, extension receiver, reified
//! type tokens, value parameters — is a global invariant shared by primary
//! emission, metadata, the local-variable table, and the default-argument
//! trampoline. Every path builds its layout through [`FrameMap::for_method`]
//! so the orders cannot drift, and the result is reproducible from the
//! descriptor alone: independent computations yield identical slots.

use anvil_bytecode::RuntimeType;

use crate::descriptors::FunctionDescriptor;
use crate::services::TypeMapper;

/// What a frame slot holds.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SlotKind {
    /// Dispatch receiver, or the explicit leading receiver of a trait's
    /// static implementation.
    Receiver,
    /// Extension receiver parameter.
    ExtensionReceiver,
    /// Reified type token for the type parameter at `index`.
    TypeToken { index: usize },
    /// Ordinary value parameter at declaration `index`.
    Value { index: usize },
    /// Compiler temporary (presence mask, scratch values).
    Temp,
}

/// One allocated slot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FrameEntry {
    pub kind: SlotKind,
    pub name: String,
    pub ty: RuntimeType,
    pub slot: u16,
}

/// Incremental slot allocator for one method body.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FrameMap {
    entries: Vec<FrameEntry>,
    next_slot: u16,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical layout for a method of `function`. `receiver` is the slot 0
    /// occupant, if any: the implicit dispatch receiver, the explicit
    /// interface receiver of a static trait implementation, or the owner
    /// receiver of a default-argument trampoline.
    pub fn for_method(
        receiver: Option<(&str, RuntimeType)>,
        function: &FunctionDescriptor,
        types: &dyn TypeMapper,
    ) -> Self {
        let mut frame = Self::new();
        if let Some((name, ty)) = receiver {
            frame.enter(SlotKind::Receiver, name, ty);
        }
        if let Some(extension) = &function.receiver_parameter {
            frame.enter(
                SlotKind::ExtensionReceiver,
                "this$receiver",
                types.map_type(&extension.declared_type),
            );
        }
        for (index, type_parameter) in function.reified_type_parameters() {
            frame.enter(
                SlotKind::TypeToken { index },
                &type_parameter.name,
                RuntimeType::type_token(),
            );
        }
        for parameter in &function.value_parameters {
            frame.enter(
                SlotKind::Value {
                    index: parameter.index,
                },
                &parameter.name,
                types.map_type(&parameter.declared_type),
            );
        }
        frame
    }

    /// Allocate the next slot; wide types consume two words.
    pub fn enter(&mut self, kind: SlotKind, name: &str, ty: RuntimeType) -> u16 {
        let slot = self.next_slot;
        self.next_slot += ty.width();
        self.entries.push(FrameEntry {
            kind,
            name: name.to_string(),
            ty,
            slot,
        });
        slot
    }

    /// Allocate an unnamed temporary.
    pub fn enter_temp(&mut self, ty: RuntimeType) -> u16 {
        let name = format!("$tmp{}", self.next_slot);
        self.enter(SlotKind::Temp, &name, ty)
    }

    /// Slot of the value parameter with the given declaration index.
    pub fn value_slot(&self, index: usize) -> Option<u16> {
        self.entry(&SlotKind::Value { index }).map(|e| e.slot)
    }

    /// Slot of the reified type token for the type parameter at `index`.
    pub fn token_slot(&self, index: usize) -> Option<u16> {
        self.entry(&SlotKind::TypeToken { index }).map(|e| e.slot)
    }

    fn entry(&self, kind: &SlotKind) -> Option<&FrameEntry> {
        self.entries.iter().find(|e| e.kind == *kind)
    }

    pub fn entries(&self) -> &[FrameEntry] {
        &self.entries
    }

    /// Total frame words allocated so far.
    pub fn total_words(&self) -> u16 {
        self.next_slot
    }
}
