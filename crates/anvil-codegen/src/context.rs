//! Owner contexts for method emission.
//!
//! The owner kind decides staticness, metadata, dispatch selection, and
//! which synthetic methods may be produced. Each variant carries exactly
//! the data its emission paths need.

use crate::descriptors::BodyId;

/// Where a function lives, from the target machine's point of view.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OwnerKind {
    /// Namespace-level function container; methods are static.
    NamespaceStatic,
    /// Ordinary instance method of a class.
    Instance,
    /// Interface declaration without implementation; signature-only.
    InterfaceDeclaration,
    /// Static container holding a trait's implementation bodies. The
    /// receiver is passed explicitly as the leading parameter of the
    /// named interface.
    InterfaceStaticImpl { interface: String },
    /// The body forwards every call to a delegate object implementing
    /// `interface`; `delegate` evaluates to that object.
    DelegateToObject { delegate: BodyId, interface: String },
}

impl OwnerKind {
    /// Methods in this context get the STATIC flag.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Self::NamespaceStatic | Self::InterfaceStaticImpl { .. }
        )
    }

    /// Whether slot 0 holds an implicit dispatch receiver.
    pub fn has_dispatch_receiver(&self) -> bool {
        matches!(
            self,
            Self::Instance | Self::InterfaceDeclaration | Self::DelegateToObject { .. }
        )
    }

    /// Descriptive metadata is suppressed for interface declarations and for
    /// static trait-implementation containers; the concrete instance-side
    /// artifact carries it.
    pub fn writes_metadata(&self) -> bool {
        !matches!(
            self,
            Self::InterfaceDeclaration | Self::InterfaceStaticImpl { .. }
        )
    }
}
