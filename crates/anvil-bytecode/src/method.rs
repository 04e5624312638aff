//! Generated method artifacts.
//!
//! One resolved function yields exactly one primary artifact, zero or more
//! bridge artifacts, and at most one default-argument trampoline. Artifacts
//! compare by value so re-emission can be checked for byte-identical output.

use crate::flags::MethodFlags;
use crate::instructions::Instruction;
use crate::signature::MethodSignature;
use crate::stream::FrameLimits;
use crate::types::RuntimeType;

/// Method-level descriptive metadata.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MethodMetadata {
    pub kind: MetadataKind,
    pub nullable_return: bool,
    /// Type parameter names, in declaration order.
    pub type_parameters: Vec<String>,
    /// Encoded source-level return type.
    pub return_signature: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MetadataKind {
    Regular,
}

/// Role of one positional parameter metadata entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterRole {
    /// Synthetic extension receiver parameter.
    ExtensionReceiver,
    /// Hidden reified type token.
    TypeToken,
    /// Ordinary value parameter.
    Value,
}

/// Per-parameter descriptive metadata. Entries are positional and must match
/// the frame slot order exactly; consumers correlate by index.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParameterMetadata {
    pub role: ParameterRole,
    pub name: String,
    pub nullable: bool,
    pub has_default: bool,
    /// Encoded source-level type, absent for type tokens.
    pub type_signature: Option<String>,
}

/// Local-variable debug table entry, spanning the whole method.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LocalVariableEntry {
    pub name: String,
    pub ty: RuntimeType,
    pub slot: u16,
}

/// Finalized method body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MethodCode {
    pub instructions: Vec<Instruction>,
    pub limits: FrameLimits,
}

/// One emitted method: the unit the class assembler consumes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MethodArtifact {
    pub flags: MethodFlags,
    pub signature: MethodSignature,
    /// Absent for abstract methods and signature-only emission.
    pub code: Option<MethodCode>,
    pub metadata: Option<MethodMetadata>,
    pub parameter_metadata: Vec<ParameterMetadata>,
    pub local_variables: Vec<LocalVariableEntry>,
}

impl MethodArtifact {
    /// A bodyless artifact carrying only flags and signature.
    pub fn signature_only(flags: MethodFlags, signature: MethodSignature) -> Self {
        Self {
            flags,
            signature,
            code: None,
            metadata: None,
            parameter_metadata: Vec::new(),
            local_variables: Vec::new(),
        }
    }
}
