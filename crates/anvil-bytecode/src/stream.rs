//! Instruction stream builder and frame-limit finalization.
//!
//! The stream is append-only; labels are allocated fresh and bound exactly
//! once. [`InstructionStream::finalize`] computes max-stack/max-locals by
//! abstract stack simulation. On correctly generated code it cannot fail:
//! any [`FinalizeError`] indicates a bug in the emitting engine, never in
//! the compiled program.

use std::collections::{BTreeMap, BTreeSet};

use crate::instructions::{Instruction, Label};

/// Frame-size limits recorded in a finalized method body.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FrameLimits {
    pub max_stack: u16,
    pub max_locals: u16,
}

/// Frame-limit computation failure on malformed instruction streams.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error("jump to unbound label L{0}")]
    UnboundLabel(u32),
    #[error("label L{0} bound more than once")]
    DuplicateLabel(u32),
    #[error("operand stack underflow at instruction {0}")]
    StackUnderflow(usize),
}

/// Append-only builder for one method body.
#[derive(Clone, Debug, Default)]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
    next_label: u32,
    reserved_slots: u16,
}

impl InstructionStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Allocate a fresh, still-unbound label.
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    /// Bind a label at the current position.
    pub fn bind(&mut self, label: Label) {
        self.emit(Instruction::Bind(label));
    }

    /// Reserve frame words for declared locals, whether or not the body
    /// touches them. Parameters must be reserved even when unused.
    pub fn reserve_slots(&mut self, words: u16) {
        self.reserved_slots = self.reserved_slots.max(words);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compute frame limits and hand back the instruction list.
    ///
    /// Branch targets carry the operand depth recorded at the jump site;
    /// fallthrough and branch depths merge by maximum.
    pub fn finalize(self) -> Result<(Vec<Instruction>, FrameLimits), FinalizeError> {
        let mut bound: BTreeSet<u32> = BTreeSet::new();
        for instruction in &self.instructions {
            if let Instruction::Bind(label) = instruction
                && !bound.insert(label.0)
            {
                return Err(FinalizeError::DuplicateLabel(label.0));
            }
        }
        for instruction in &self.instructions {
            if let Some(target) = instruction.jump_target()
                && !bound.contains(&target.0)
            {
                return Err(FinalizeError::UnboundLabel(target.0));
            }
        }

        let mut depth: i32 = 0;
        let mut max_stack: i32 = 0;
        let mut max_locals = self.reserved_slots;
        let mut reachable = true;
        // Deepest operand stack recorded at each branch target.
        let mut at_label: BTreeMap<u32, i32> = BTreeMap::new();

        for (index, instruction) in self.instructions.iter().enumerate() {
            if let Instruction::Bind(label) = instruction {
                let incoming = at_label.get(&label.0).copied();
                depth = match (reachable, incoming) {
                    (true, Some(recorded)) => depth.max(recorded),
                    (true, None) => depth,
                    (false, Some(recorded)) => recorded,
                    (false, None) => 0,
                };
                reachable = true;
                continue;
            }
            if !reachable {
                continue;
            }

            depth += instruction.stack_effect();
            if depth < 0 {
                return Err(FinalizeError::StackUnderflow(index));
            }
            max_stack = max_stack.max(depth);

            match instruction {
                Instruction::Load { slot, ty } | Instruction::Store { slot, ty } => {
                    max_locals = max_locals.max(slot + ty.width());
                }
                Instruction::Jump(target) => {
                    let entry = at_label.entry(target.0).or_insert(depth);
                    *entry = (*entry).max(depth);
                    reachable = false;
                }
                Instruction::JumpIfZero(target) => {
                    let entry = at_label.entry(target.0).or_insert(depth);
                    *entry = (*entry).max(depth);
                }
                Instruction::Return { .. } => {
                    reachable = false;
                }
                _ => {}
            }
        }

        let limits = FrameLimits {
            max_stack: max_stack as u16,
            max_locals,
        };
        Ok((self.instructions, limits))
    }
}
