//! Label parameters encoded through a user-provided descriptor table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CompTable, all_unique};
use crate::error::{Error, Result};

/// A parameter whose labels are encoded by a table of numeric descriptors.
///
/// Each label owns one row of the table; the descriptor names become the
/// computational columns `{name}_{descriptor}`.
///
/// # Example
///
/// ```
/// use searchspace::parameter::CustomDiscreteParameter;
///
/// let catalyst = CustomDiscreteParameter::new("catalyst", ["mw", "charge"])
///     .label("pd", [106.4, 2.0])
///     .label("ni", [58.7, 2.0])
///     .label("cu", [63.5, 1.0]);
/// assert!(catalyst.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomDiscreteParameter {
    name: String,
    descriptor_names: Vec<String>,
    labels: Vec<String>,
    descriptors: Vec<Vec<f64>>,
}

impl CustomDiscreteParameter {
    /// Creates a parameter with the given descriptor names and no labels.
    #[must_use]
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        descriptor_names: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor_names: descriptor_names.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    /// Adds a label together with its descriptor row.
    #[must_use]
    pub fn label(
        mut self,
        label: impl Into<String>,
        descriptors: impl IntoIterator<Item = f64>,
    ) -> Self {
        self.labels.push(label.into());
        self.descriptors.push(descriptors.into_iter().collect());
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared labels, in declaration order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The descriptor names.
    #[must_use]
    pub fn descriptor_names(&self) -> &[String] {
        &self.descriptor_names
    }

    /// The descriptor row of the given label.
    #[must_use]
    pub fn descriptors(&self, label: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.descriptors[i].as_slice())
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] without labels, [`Error::DuplicateValues`]
    /// for repeated labels and [`Error::InvalidDescriptors`] for a table that has
    /// no descriptors, incomplete or non-finite rows, repeated descriptor names
    /// or a descriptor that is constant across all labels.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidDescriptors {
            name: self.name.clone(),
            reason: reason.to_owned(),
        };
        if self.labels.is_empty() {
            return Err(Error::EmptyValues {
                name: self.name.clone(),
            });
        }
        if !all_unique(self.labels.iter().map(String::as_str)) {
            return Err(Error::DuplicateValues {
                name: self.name.clone(),
            });
        }
        if self.descriptor_names.is_empty() {
            return Err(invalid("at least one descriptor is required"));
        }
        if !all_unique(self.descriptor_names.iter().map(String::as_str)) {
            return Err(invalid("descriptor names must be unique"));
        }
        let width = self.descriptor_names.len();
        if self
            .descriptors
            .iter()
            .any(|row| row.len() != width || row.iter().any(|v| !v.is_finite()))
        {
            return Err(invalid("every label needs one finite value per descriptor"));
        }
        if self.labels.len() > 1 {
            #[allow(clippy::float_cmp)]
            let constant = (0..width).find(|&j| {
                self.descriptors
                    .iter()
                    .all(|row| row[j] == self.descriptors[0][j])
            });
            if let Some(j) = constant {
                return Err(invalid(&format!(
                    "descriptor '{}' has the same value for every label",
                    self.descriptor_names[j]
                )));
            }
        }
        Ok(())
    }

    pub(super) fn comp_table(&self) -> CompTable {
        CompTable {
            columns: self
                .descriptor_names
                .iter()
                .map(|d| format!("{}_{d}", self.name))
                .collect(),
            rows: self.descriptors.clone(),
        }
    }
}
