//! Categorical parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CompTable, Encoding, all_unique};
use crate::error::{Error, Result};

/// How a [`CategoricalParameter`] is encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CategoricalEncoding {
    /// One 0/1 column per value, named `{name}_{value}`.
    #[default]
    OneHot,
    /// One column named `{name}` holding the value's declared position.
    Integer,
    /// One column named `{name}` holding the declared position scaled to `[0, 1]`.
    Ordinal,
}

impl From<CategoricalEncoding> for Encoding {
    fn from(e: CategoricalEncoding) -> Self {
        match e {
            CategoricalEncoding::OneHot => Self::OneHot,
            CategoricalEncoding::Integer => Self::Integer,
            CategoricalEncoding::Ordinal => Self::Ordinal,
        }
    }
}

/// A parameter taking one of a finite set of labels.
///
/// # Example
///
/// ```
/// use searchspace::parameter::{CategoricalEncoding, CategoricalParameter};
///
/// let speed = CategoricalParameter::new("speed", ["slow", "normal", "fast"])
///     .encoding(CategoricalEncoding::Ordinal);
/// assert!(speed.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalParameter {
    name: String,
    values: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    encoding: CategoricalEncoding,
}

impl CategoricalParameter {
    /// Creates a one-hot encoded categorical parameter.
    #[must_use]
    pub fn new<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            encoding: CategoricalEncoding::OneHot,
        }
    }

    /// Sets the encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: CategoricalEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared labels, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The configured encoding.
    #[must_use]
    pub fn encoding_kind(&self) -> CategoricalEncoding {
        self.encoding
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] without labels and
    /// [`Error::DuplicateValues`] for repeated labels.
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(Error::EmptyValues {
                name: self.name.clone(),
            });
        }
        if !all_unique(self.values.iter().map(String::as_str)) {
            return Err(Error::DuplicateValues {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    pub(super) fn comp_table(&self) -> CompTable {
        let n = self.values.len();
        match self.encoding {
            CategoricalEncoding::OneHot => CompTable {
                columns: self
                    .values
                    .iter()
                    .map(|v| format!("{}_{v}", self.name))
                    .collect(),
                rows: (0..n)
                    .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
                    .collect(),
            },
            CategoricalEncoding::Integer => CompTable {
                columns: vec![self.name.clone()],
                rows: (0..n).map(|i| vec![i as f64]).collect(),
            },
            CategoricalEncoding::Ordinal => CompTable {
                columns: vec![self.name.clone()],
                rows: (0..n)
                    .map(|i| {
                        if n > 1 {
                            vec![i as f64 / (n - 1) as f64]
                        } else {
                            vec![0.0]
                        }
                    })
                    .collect(),
            },
        }
    }
}
