//! Resolved function descriptors.
//!
//! Descriptors are produced by the upstream resolver and are immutable here.
//! The engine only reads them; any inconsistency inside one (a defaulted
//! parameter without a resolvable declaration, a vararg in non-tail
//! position) is an upstream bug surfaced as a fatal internal error.

use std::fmt;
use std::sync::Arc;

/// Opaque id of a source declaration, for error reporting and metadata
/// back-references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

/// Opaque id of a resolved expression body, evaluated by the expression
/// lowering collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BodyId(pub u32);

/// Declared function modality.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Modality {
    Open,
    Final,
    Abstract,
}

/// A source-level type before mapping to a runtime type. Carries exactly
/// what metadata and type mapping need: name, nullability, type arguments.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeclaredType {
    pub name: String,
    pub nullable: bool,
    pub arguments: Vec<DeclaredType>,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            arguments: Vec::new(),
        }
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<DeclaredType>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Encoded form written into metadata, `List<Int?>?` style.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (index, argument) in self.arguments.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                argument.fmt(f)?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Declared type parameter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeParameter {
    pub name: String,
    /// Reified parameters receive a runtime type token as a hidden argument.
    pub reified: bool,
}

/// Declared value parameter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ValueParameter {
    pub name: String,
    /// Zero-based declaration index; also the presence-mask bit index.
    pub index: usize,
    pub declared_type: DeclaredType,
    pub has_default_value: bool,
    /// Element type when this is a vararg parameter. Only the last value
    /// parameter may carry one.
    pub vararg_element: Option<DeclaredType>,
}

/// Extension or dispatch receiver parameter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReceiverParameter {
    pub declared_type: DeclaredType,
}

/// A fully resolved function, ready for lowering.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionDescriptor {
    pub name: String,
    pub source: SourceId,
    pub modality: Modality,
    pub return_type: DeclaredType,
    pub type_parameters: Vec<TypeParameter>,
    pub value_parameters: Vec<ValueParameter>,
    /// Extension receiver, logically before ordinary parameters.
    pub receiver_parameter: Option<ReceiverParameter>,
    /// Dispatch receiver ("self"); absent for namespace functions.
    pub dispatch_receiver: Option<ReceiverParameter>,
    /// Functions this one overrides, in their erasure-original form.
    pub overridden: Vec<Arc<FunctionDescriptor>>,
    /// Resolved body expression; `None` for abstract declarations.
    pub body: Option<BodyId>,
}

impl FunctionDescriptor {
    /// True when the last value parameter is a vararg.
    pub fn is_vararg(&self) -> bool {
        self.value_parameters
            .last()
            .is_some_and(|p| p.vararg_element.is_some())
    }

    /// True when any value parameter carries a default value.
    pub fn has_default_values(&self) -> bool {
        self.value_parameters.iter().any(|p| p.has_default_value)
    }

    /// Reified type parameters with their declaration indices.
    pub fn reified_type_parameters(&self) -> impl Iterator<Item = (usize, &TypeParameter)> {
        self.type_parameters
            .iter()
            .enumerate()
            .filter(|(_, tp)| tp.reified)
    }
}
