//! Experimental cell values.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single value in the experimental representation.
///
/// Numerical parameters hold `Float` values, label-like parameters
/// (categorical, substance, custom) hold `Label` values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// A numerical value.
    Float(f64),
    /// A label, compared by exact string equality.
    Label(String),
}

impl ParamValue {
    /// Returns the numerical value, or `None` for labels.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Label(_) => None,
        }
    }

    /// Returns the label, or `None` for numerical values.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Float(_) => None,
            Self::Label(s) => Some(s),
        }
    }

    /// Returns `true` for `Float` values.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Number of bytes this value occupies in a frame column: eight for a
    /// number, the byte length for a label.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Float(_) => core::mem::size_of::<f64>(),
            Self::Label(s) => s.len(),
        }
    }

    /// Key used for grouping rows by value. Floats are keyed by their bit pattern.
    pub(crate) fn group_key(&self) -> ValueKey {
        match self {
            Self::Float(v) => ValueKey::Float(v.to_bits()),
            Self::Label(s) => ValueKey::Label(s.clone()),
        }
    }
}

/// Hashable stand-in for [`ParamValue`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Float(u64),
    Label(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Label(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}
