#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Search-space construction for sequential experimental design. Declare
//! discrete, continuous and label-like parameters with their encodings, add
//! constraints, and get an enumerated discrete space with its experimental and
//! computational representations, a box-shaped continuous space with sampling,
//! and fuzzy matching of measurements back onto search-space rows.
//!
//! # Getting Started
//!
//! ```
//! use searchspace::prelude::*;
//!
//! let mut space = SearchSpace::builder()
//!     .parameter(CategoricalParameter::new("solvent", ["water", "thf", "dmf"]))
//!     .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0, 60.0]).tolerance(2.0))
//!     .parameter(NumericalContinuousParameter::new("time", 0.5, 4.0))
//!     .build()
//!     .unwrap();
//! assert_eq!(space.search_space_type(), SearchSpaceType::Hybrid);
//! assert_eq!(space.discrete().n_rows(), 9);
//!
//! // A measurement at 41 degrees lies within tolerance of 40.
//! let measured = Frame::from_rows(&["solvent", "temp"], vec![vec!["thf".into(), 41.0.into()]]).unwrap();
//! let rows = space.discrete_mut().mark_as_measured(&measured, true).unwrap();
//! assert_eq!(rows, vec![4]);
//! assert_eq!(space.discrete().get_candidates(false, false).unwrap().len(), 8);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Parameter`](parameter::Parameter) | One experiment dimension with its value domain and encoding. |
//! | [`Constraint`](constraint::Constraint) | Restricts valid combinations, applied while enumerating (discrete) or on candidates (continuous). |
//! | [`SubspaceDiscrete`] | The enumerated discrete space with per-row bookkeeping. |
//! | [`SubspaceContinuous`] | The continuous box with random and full-factorial sampling. |
//! | [`SearchSpace`] | Both subspaces combined, discrete columns first. |
//! | [`Surrogate`](surrogate::Surrogate), [`AcquisitionFunction`](acquisition::AcquisitionFunction) | Contracts of the modelling collaborators. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public types, [`SearchSpace::save`]/[`SearchSpace::load`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) during construction and matching | on |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
pub mod constraint;
mod error;
mod frame;
mod param;
pub mod parameter;
mod rng_util;
mod searchspace;
pub mod surrogate;
mod types;

pub use error::{Error, Result};
pub use frame::{CompFrame, Frame};
pub use param::ParamValue;
#[cfg(feature = "serde")]
pub use searchspace::{SNAPSHOT_VERSION, SearchSpaceSnapshot};
pub use searchspace::{
    Candidates, ContinuousSampler, INF_BOUNDS_REPLACEMENT, Metadata, SearchSpace,
    SearchSpaceBuilder, SubspaceContinuous, SubspaceDiscrete,
};
pub use types::{MemorySize, SearchSpaceType};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use searchspace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{AcquisitionFunction, PosteriorMean};
    pub use crate::constraint::{Combiner, Condition, Constraint, ThresholdOperator};
    pub use crate::error::{Error, Result};
    pub use crate::frame::{CompFrame, Frame};
    pub use crate::param::ParamValue;
    pub use crate::parameter::{
        CategoricalEncoding, CategoricalParameter, CustomDiscreteParameter, Encoding,
        NumericalContinuousParameter, NumericalDiscreteParameter, Parameter, SubstanceEncoding,
        SubstanceParameter,
    };
    #[cfg(feature = "serde")]
    pub use crate::searchspace::SearchSpaceSnapshot;
    pub use crate::searchspace::{
        Candidates, ContinuousSampler, SearchSpace, SearchSpaceBuilder, SubspaceContinuous,
        SubspaceDiscrete,
    };
    pub use crate::surrogate::{MeanPredictionSurrogate, Surrogate};
    pub use crate::types::{MemorySize, SearchSpaceType};
}
