//! Runtime types of the target machine.
//!
//! Every value the machine manipulates has a [`RuntimeType`]. Primitives occupy
//! one frame word (two for `long` and `double`); references always occupy one.
//! Widths drive both slot allocation and operand-stack accounting, so they must
//! never diverge between the two.

use std::fmt;

/// Internal name of the root object class.
pub const OBJECT_CLASS: &str = "rt/Object";

/// Internal name of the reified type token class.
///
/// Functions with reified type parameters receive one token instance per
/// parameter as a hidden argument.
pub const TYPE_TOKEN_CLASS: &str = "rt/TypeToken";

/// A type as the target machine sees it, after erasure.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RuntimeType {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    /// Class reference, by internal name (`rt/Object`, `app/Point`).
    Object(String),
    /// Array reference over an element type.
    Array(Box<RuntimeType>),
}

impl RuntimeType {
    /// Class reference by internal name.
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    /// Array over the given element type.
    pub fn array(element: RuntimeType) -> Self {
        Self::Array(Box::new(element))
    }

    /// The root object class.
    pub fn object_root() -> Self {
        Self::Object(OBJECT_CLASS.to_string())
    }

    /// The reified type token class.
    pub fn type_token() -> Self {
        Self::Object(TYPE_TOKEN_CLASS.to_string())
    }

    /// Width in frame words. `void` is zero, `long` and `double` are two,
    /// everything else (references included) is one.
    pub fn width(&self) -> u16 {
        match self {
            Self::Void => 0,
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }

    /// True for class and array references.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    /// True for non-reference types, `void` included.
    pub fn is_primitive(&self) -> bool {
        !self.is_reference()
    }

    /// Wrapper class for a primitive value type, `None` for `void` and
    /// references.
    pub fn boxed_class(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("rt/Boolean"),
            Self::Byte => Some("rt/Byte"),
            Self::Short => Some("rt/Short"),
            Self::Char => Some("rt/Char"),
            Self::Int => Some("rt/Int"),
            Self::Long => Some("rt/Long"),
            Self::Float => Some("rt/Float"),
            Self::Double => Some("rt/Double"),
            _ => None,
        }
    }

    /// Internal class name for object references.
    pub fn internal_name(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Erased descriptor string.
    pub fn descriptor(&self) -> String {
        match self {
            Self::Void => "V".to_string(),
            Self::Boolean => "Z".to_string(),
            Self::Byte => "B".to_string(),
            Self::Short => "S".to_string(),
            Self::Char => "C".to_string(),
            Self::Int => "I".to_string(),
            Self::Long => "J".to_string(),
            Self::Float => "F".to_string(),
            Self::Double => "D".to_string(),
            Self::Object(name) => format!("L{name};"),
            Self::Array(element) => format!("[{}", element.descriptor()),
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Boolean => f.write_str("boolean"),
            Self::Byte => f.write_str("byte"),
            Self::Short => f.write_str("short"),
            Self::Char => f.write_str("char"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Object(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}
