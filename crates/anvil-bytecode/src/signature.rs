//! Method signatures and erasure comparison.

use std::fmt;

use crate::types::RuntimeType;

/// Name given to constructors by the target machine.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A mapped method signature: name, erased parameter types, erased return
/// type, and an optional generic signature string.
///
/// The generic signature only feeds metadata; it never participates in
/// erasure comparison or dispatch.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<RuntimeType>,
    pub return_type: RuntimeType,
    pub generic: Option<String>,
}

impl MethodSignature {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<RuntimeType>,
        return_type: RuntimeType,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            generic: None,
        }
    }

    /// Attach a generic signature string.
    pub fn with_generic(mut self, generic: impl Into<String>) -> Self {
        self.generic = Some(generic.into());
        self
    }

    /// Copy with the generic signature dropped, for erased call sites.
    pub fn erased(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            return_type: self.return_type.clone(),
            generic: None,
        }
    }

    /// True when a constructor signature.
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// Erasure equality: name, arity, each parameter type, and return type.
    /// The generic signature is ignored.
    pub fn erasure_equals(&self, other: &Self) -> bool {
        self.name == other.name
            && self.return_type == other.return_type
            && self.parameters == other.parameters
    }

    /// Erased descriptor string, `(ILapp/Point;)V` style.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for parameter in &self.parameters {
            out.push_str(&parameter.descriptor());
        }
        out.push(')');
        out.push_str(&self.return_type.descriptor());
        out
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor())
    }
}
