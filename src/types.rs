//! Core types shared across the search-space layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of a search space by the kinds of parameters it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchSpaceType {
    /// Only discrete parameters.
    Discrete,
    /// Only continuous parameters.
    Continuous,
    /// Both discrete and continuous parameters.
    Hybrid,
}

impl core::fmt::Display for SearchSpaceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Discrete => f.write_str("DISCRETE"),
            Self::Continuous => f.write_str("CONTINUOUS"),
            Self::Hybrid => f.write_str("HYBRID"),
        }
    }
}

/// Predicted size of a materialized discrete product space.
///
/// Shapes are `(rows, columns)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemorySize {
    /// Bytes of the experimental representation.
    pub exp_rep_bytes: f64,
    /// Shape of the experimental representation.
    pub exp_rep_shape: (u128, usize),
    /// Bytes of the computational representation.
    pub comp_rep_bytes: f64,
    /// Shape of the computational representation.
    pub comp_rep_shape: (u128, usize),
}
