//! Values handed over by the configuration layer
//!
//! Provides [`ConfigValue`], the heterogeneous element type of a
//! configuration-built pipeline list.

use crate::function::ConfigFunction;
use revmig_transform::{DynTransformation, Transformation};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// One configuration value
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// Transformation built by the configuration layer
    Transformation(DynTransformation),
    /// Bare callable, convertible to a transformation
    Function(ConfigFunction),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// List literal
    List(Vec<ConfigValue>),
    /// Absent value
    None,
}

impl ConfigValue {
    /// Wrap a transformation
    #[inline]
    #[must_use]
    pub fn transformation(t: impl Transformation) -> Self {
        Self::Transformation(Arc::new(t))
    }

    /// Kind name used in type errors
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transformation(_) => "transformation",
            Self::Function(_) => "function",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::None => "none",
        }
    }
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transformation(t) => f.write_str(&t.describe()),
            Self::Function(func) => write!(f, "<function {}>", func.name()),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::None => f.write_str("None"),
        }
    }
}

impl From<DynTransformation> for ConfigValue {
    fn from(value: DynTransformation) -> Self {
        Self::Transformation(value)
    }
}

impl From<ConfigFunction> for ConfigValue {
    fn from(value: ConfigFunction) -> Self {
        Self::Function(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        Self::List(value)
    }
}
