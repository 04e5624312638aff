#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Method lowering and synthesis for the Anvil class file backend.
//!
//! Given a resolved function descriptor, an owner context, and a mapped
//! implementation signature, this crate emits every method artifact the
//! target machine needs to call that function:
//! - `function` - the method emission protocol (flags, metadata, frame
//!   layout, body lowering, debug tables)
//! - `bridge` - forwarding methods for erasure-mismatched overrides
//! - `defaults` - default-argument trampolines with a presence mask
//! - `frame` - deterministic stack-frame slot layout
//! - `descriptors` - the read-only resolved-function model
//! - `services` - capabilities consumed from compiler collaborators
//!
//! Emission is synchronous and single-threaded per function; every detected
//! inconsistency is fatal and propagated as [`CodegenError`].

pub mod context;
pub mod descriptors;
pub mod error;
pub mod frame;
pub mod function;
pub mod services;

mod bridge;
mod defaults;

#[cfg(test)]
pub mod test_utils;


pub use context::OwnerKind;
pub use defaults::DEFAULT_PARAMS_SUFFIX;
pub use descriptors::{
    BodyId, DeclaredType, FunctionDescriptor, Modality, ReceiverParameter, SourceId,
    TypeParameter, ValueParameter,
};
pub use error::{ArtifactKind, CodegenError};
pub use frame::{FrameEntry, FrameMap, SlotKind};
pub use function::FunctionCodegen;
pub use services::{ExpressionLowering, TypeMapper};
