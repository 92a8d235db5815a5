#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a search space is built without any parameters.
    #[error("search space must contain at least one parameter")]
    EmptySearchSpace,

    /// Returned when a discrete parameter declares no values.
    #[error("parameter '{name}' must declare at least one value")]
    EmptyValues {
        /// The name of the parameter.
        name: String,
    },

    /// Returned when a discrete parameter declares the same value twice.
    #[error("parameter '{name}' declares duplicate values")]
    DuplicateValues {
        /// The name of the parameter.
        name: String,
    },

    /// Returned when two parameters of one search space share a name.
    #[error("parameter name '{name}' is used more than once")]
    DuplicateParameterName {
        /// The duplicated name.
        name: String,
    },

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds for '{name}': lower ({low}) must be less than or equal to upper ({high})")]
    InvalidBounds {
        /// The name of the parameter.
        name: String,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a numerical tolerance is negative or makes values ambiguous.
    #[error("invalid tolerance for '{name}': {tolerance} must be in [0, {max})")]
    InvalidTolerance {
        /// The name of the parameter.
        name: String,
        /// The requested tolerance.
        tolerance: f64,
        /// Half of the smallest gap between two declared values.
        max: f64,
    },

    /// Returned when a descriptor table or substance definition is unusable.
    #[error("invalid descriptors for '{name}': {reason}")]
    InvalidDescriptors {
        /// The name of the parameter.
        name: String,
        /// Why the descriptors were rejected.
        reason: String,
    },

    /// Returned when a subspace receives a parameter of the other kind.
    #[error("parameter '{name}' is not {expected}")]
    UnexpectedParameterKind {
        /// The name of the parameter.
        name: String,
        /// The kind the subspace accepts.
        expected: &'static str,
    },

    /// Returned when a constraint references a parameter that is not part of the space.
    #[error("constraint {constraint} references unknown parameter '{name}'")]
    UnknownParameter {
        /// The kind of the offending constraint.
        constraint: &'static str,
        /// The unknown parameter name.
        name: String,
    },

    /// Returned when a constraint mixes discrete and continuous parameters.
    #[error("constraint {constraint} mixes discrete and continuous parameters")]
    MixedConstraintParameters {
        /// The kind of the offending constraint.
        constraint: &'static str,
    },

    /// Returned when an arithmetic constraint references a non-numerical parameter.
    #[error("constraint {constraint} requires numerical parameters but '{name}' is not")]
    NonNumericalConstraintParameter {
        /// The kind of the offending constraint.
        constraint: &'static str,
        /// The non-numerical parameter name.
        name: String,
    },

    /// Returned when two cardinality constraints share parameters.
    #[error("cardinality constraints must not share parameters, overlap: {names:?}")]
    OverlappingCardinalityConstraints {
        /// The shared parameter names.
        names: Vec<String>,
    },

    /// Returned when more than one dependencies constraint is supplied.
    #[error("at most one discrete dependencies constraint is allowed")]
    DuplicateDependenciesConstraint,

    /// Returned when a constraint is malformed on its own.
    #[error("invalid constraint {constraint}: {reason}")]
    InvalidConstraint {
        /// The kind of the offending constraint.
        constraint: &'static str,
        /// Why the constraint was rejected.
        reason: String,
    },

    /// Returned when more full-factorial samples are requested than corners exist.
    #[error(
        "requested {requested} full-factorial samples but the continuous space only has {available} corners"
    )]
    TooManyFactorialSamples {
        /// The number of requested points.
        requested: usize,
        /// The number of available corner points.
        available: u128,
    },

    /// Returned when input data lacks a column for a parameter.
    #[error("values for parameter '{name}' must be specified in the given data")]
    MissingColumn {
        /// The missing column name.
        name: String,
    },

    /// Returned when a measurement lies outside a parameter's domain.
    #[error(
        "input data on row {row} has invalid values in parameter '{parameter}': categorical values must match a declared choice, numerical values must lie within the tolerance"
    )]
    InvalidMeasurement {
        /// The positional index of the offending row.
        row: usize,
        /// The offending parameter name.
        parameter: String,
    },

    /// Returned when a numerical column holds a label.
    #[error("column '{column}' holds a non-numeric value on row {row}")]
    NonNumericValue {
        /// The column name.
        column: String,
        /// The positional index of the offending row.
        row: usize,
    },

    /// Returned when a transformation does not reproduce the frozen column set.
    #[error("computational columns do not match the frozen set: expected {expected:?}, got {got:?}")]
    ColumnMismatch {
        /// The frozen column names.
        expected: Vec<String>,
        /// The column names that were produced.
        got: Vec<String>,
    },

    /// Returned when two parameters encode to the same computational column.
    #[error("computational column '{column}' is produced by more than one parameter")]
    DuplicateCompColumn {
        /// The repeated column name.
        column: String,
    },

    /// Returned when frames of different lengths are combined.
    #[error("row count mismatch: expected {expected} rows but got {got}")]
    RowCountMismatch {
        /// The expected number of rows.
        expected: usize,
        /// The actual number of rows.
        got: usize,
    },

    /// Returned when a positional row index does not exist.
    #[error("row index {index} is out of range for {len} rows")]
    RowOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of rows available.
        len: usize,
    },

    /// Returned when the estimated Cartesian product exceeds the configured limit.
    #[error("product space would have {rows} rows, exceeding the limit of {limit}")]
    ProductSpaceTooLarge {
        /// The estimated row count.
        rows: u128,
        /// The configured row limit.
        limit: usize,
    },

    /// Returned when a surrogate is fitted without training data.
    #[error("surrogate requires at least one training point")]
    EmptyTrainingData,

    /// Returned when a surrogate is queried before it was fitted.
    #[error("surrogate must be fitted before computing a posterior")]
    NotFitted,

    /// Returned when a polars operation on an experimental frame fails.
    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// Returned when (de)serialization or snapshot I/O fails.
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
