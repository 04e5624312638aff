//! Fatal lowering failures.
//!
//! Both variants abort compilation of the enclosing unit; nothing here is
//! retried or recovered. Partial artifacts for the offending declaration
//! must be discarded by the orchestrator.

use std::fmt;

use anvil_bytecode::FinalizeError;

use crate::descriptors::SourceId;

/// Which synthesized artifact failed, for error context.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArtifactKind {
    Method,
    BridgeMethod,
    DefaultMethod,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method => f.write_str("method"),
            Self::BridgeMethod => f.write_str("bridge method"),
            Self::DefaultMethod => f.write_str("default method"),
        }
    }
}

/// Fatal failure inside the lowering engine.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// An invariant guaranteed by the resolver or by this engine was
    /// violated. Signals a compiler bug, not a user error.
    #[error("internal error at {element}: {message}")]
    Internal {
        element: SourceId,
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Frame-limit computation failed on emitted instructions: the engine
    /// produced malformed code.
    #[error("wrong code generated for {artifact} at {element}")]
    Finalize {
        artifact: ArtifactKind,
        element: SourceId,
        #[source]
        source: FinalizeError,
    },
}

impl CodegenError {
    pub fn internal(element: SourceId, message: impl Into<String>) -> Self {
        Self::Internal {
            element,
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn finalize(
        artifact: ArtifactKind,
        element: SourceId,
        source: FinalizeError,
    ) -> Self {
        Self::Finalize {
            artifact,
            element,
            source,
        }
    }
}
