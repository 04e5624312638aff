//! Class output target.
//!
//! Accumulates method artifacts through ordered appends. One builder per
//! declaring type; concurrent emission into the same builder is not
//! supported because append order is part of the output.

use crate::method::MethodArtifact;
use crate::signature::MethodSignature;

/// Whether method bodies are actually generated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EmitMode {
    /// Full emission: bodies, metadata, debug tables.
    Full,
    /// Declarations only, for interface declarations and previews.
    SignatureOnly,
}

/// Builder for one declaring type's method artifacts.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClassBuilder {
    name: String,
    mode: EmitMode,
    methods: Vec<MethodArtifact>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>, mode: EmitMode) -> Self {
        Self {
            name: name.into(),
            mode,
            methods: Vec::new(),
        }
    }

    /// Internal name of the type being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when instruction-level code should be generated.
    pub fn generate_code(&self) -> bool {
        self.mode == EmitMode::Full
    }

    /// Append an artifact. Ordering is significant and preserved.
    pub fn push(&mut self, method: MethodArtifact) {
        self.methods.push(method);
    }

    pub fn methods(&self) -> &[MethodArtifact] {
        &self.methods
    }

    /// Find an artifact by exact erased signature.
    pub fn method_by_signature(&self, signature: &MethodSignature) -> Option<&MethodArtifact> {
        self.methods
            .iter()
            .find(|m| m.signature.erasure_equals(signature))
    }

    pub fn into_methods(self) -> Vec<MethodArtifact> {
        self.methods
    }
}
