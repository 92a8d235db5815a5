//! Conditions evaluated on single values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::param::ParamValue;

/// Tolerance applied to `Eq` and `Ne` thresholds when none is given.
pub const DEFAULT_EQUALITY_TOLERANCE: f64 = 1e-8;

/// Comparison used by a threshold condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThresholdOperator {
    /// `value < threshold`
    Lt,
    /// `value <= threshold`
    Le,
    /// `|value - threshold| <= tolerance`
    Eq,
    /// `|value - threshold| > tolerance`
    Ne,
    /// `value > threshold`
    Gt,
    /// `value >= threshold`
    Ge,
}

/// A predicate on one experimental value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Condition {
    /// Numerical comparison against a threshold. Labels never satisfy it.
    Threshold {
        /// The value compared against.
        threshold: f64,
        /// The comparison.
        operator: ThresholdOperator,
        /// Absolute tolerance, only meaningful for `Eq` and `Ne`.
        tolerance: Option<f64>,
    },
    /// Membership in a fixed set of values.
    SubSelection {
        /// The accepted values.
        selection: Vec<ParamValue>,
    },
}

impl Condition {
    /// Creates a threshold condition without explicit tolerance.
    #[must_use]
    pub fn threshold(threshold: f64, operator: ThresholdOperator) -> Self {
        Self::Threshold {
            threshold,
            operator,
            tolerance: None,
        }
    }

    /// Creates a sub-selection condition.
    #[must_use]
    pub fn sub_selection<V: Into<ParamValue>>(selection: impl IntoIterator<Item = V>) -> Self {
        Self::SubSelection {
            selection: selection.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the tolerance of a threshold condition. Has no effect on
    /// sub-selections.
    #[must_use]
    pub fn with_tolerance(mut self, value: f64) -> Self {
        if let Self::Threshold { tolerance, .. } = &mut self {
            *tolerance = Some(value);
        }
        self
    }

    /// Checks the condition definition.
    pub(crate) fn validate(&self, constraint: &'static str) -> Result<()> {
        match self {
            Self::Threshold {
                threshold,
                operator,
                tolerance,
            } => {
                if threshold.is_nan() {
                    return Err(Error::InvalidConstraint {
                        constraint,
                        reason: "threshold must not be NaN".to_owned(),
                    });
                }
                if let Some(tol) = tolerance {
                    if !matches!(operator, ThresholdOperator::Eq | ThresholdOperator::Ne) {
                        return Err(Error::InvalidConstraint {
                            constraint,
                            reason: format!("tolerance is only allowed for Eq and Ne, not {operator:?}"),
                        });
                    }
                    if tol.is_nan() || *tol < 0.0 {
                        return Err(Error::InvalidConstraint {
                            constraint,
                            reason: format!("tolerance {tol} must be non-negative"),
                        });
                    }
                }
                Ok(())
            }
            Self::SubSelection { selection } => {
                if selection.is_empty() {
                    return Err(Error::InvalidConstraint {
                        constraint,
                        reason: "sub-selection must not be empty".to_owned(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Whether `value` satisfies the condition.
    #[must_use]
    pub fn evaluate(&self, value: &ParamValue) -> bool {
        match self {
            Self::Threshold { .. } => value.as_f64().is_some_and(|v| self.evaluate_f64(v)),
            Self::SubSelection { selection } => selection.contains(value),
        }
    }

    /// Whether a number satisfies the condition.
    #[must_use]
    pub fn evaluate_f64(&self, value: f64) -> bool {
        match self {
            Self::Threshold {
                threshold,
                operator,
                tolerance,
            } => {
                let tol = tolerance.unwrap_or(DEFAULT_EQUALITY_TOLERANCE);
                match operator {
                    ThresholdOperator::Lt => value < *threshold,
                    ThresholdOperator::Le => value <= *threshold,
                    ThresholdOperator::Eq => (value - threshold).abs() <= tol,
                    ThresholdOperator::Ne => (value - threshold).abs() > tol,
                    ThresholdOperator::Gt => value > *threshold,
                    ThresholdOperator::Ge => value >= *threshold,
                }
            }
            Self::SubSelection { selection } => selection.contains(&ParamValue::Float(value)),
        }
    }
}
