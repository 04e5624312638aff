#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Method artifact model for the Anvil stack machine.
//!
//! This crate defines everything the lowering engine emits into:
//! - `types` - erased runtime types and frame widths
//! - `signature` - method signatures and erasure comparison
//! - `flags` - method access flags
//! - `instructions` - instruction IR with symbolic labels
//! - `stream` - append-only body builder with frame-limit finalization
//! - `method` - generated method artifacts and metadata records
//! - `class` - the per-type output target
//! - `dump` - human-readable artifact rendering
//!
//! Class file encoding and disk output live downstream; this crate stops at
//! in-memory artifacts so synthesis stays testable in isolation.

pub mod class;
pub mod dump;
pub mod flags;
pub mod instructions;
pub mod method;
pub mod signature;
pub mod stream;
pub mod types;

#[cfg(test)]
mod flags_tests;
#[cfg(test)]
mod instructions_tests;

pub use class::{ClassBuilder, EmitMode};
pub use dump::dump;
pub use flags::MethodFlags;
pub use instructions::{Instruction, InvokeKind, Label};
pub use method::{
    LocalVariableEntry, MetadataKind, MethodArtifact, MethodCode, MethodMetadata,
    ParameterMetadata, ParameterRole,
};
pub use signature::{CONSTRUCTOR_NAME, MethodSignature};
pub use stream::{FinalizeError, FrameLimits, InstructionStream};
pub use types::{OBJECT_CLASS, RuntimeType, TYPE_TOKEN_CLASS};
