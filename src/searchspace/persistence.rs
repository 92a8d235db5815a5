#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use super::{SearchSpace, SubspaceContinuous, SubspaceDiscrete};
#[cfg(feature = "serde")]
use crate::constraint::Constraint;
#[cfg(feature = "serde")]
use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use crate::frame::Frame;
#[cfg(feature = "serde")]
use crate::parameter::Parameter;

/// Schema version written by [`SearchSpace::to_snapshot`].
#[cfg(feature = "serde")]
pub const SNAPSHOT_VERSION: u32 = 1;

/// A serializable snapshot of a search space.
///
/// The computational representation and the metadata are derived state and
/// are not part of the snapshot. On load the computational representation is
/// recomputed from `exp_rep` and restricted to `comp_columns`; all metadata
/// flags start out cleared.
///
/// # Schema versioning
///
/// The `version` field enables future schema evolution without breaking existing files.
/// The current version is `1`.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchSpaceSnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// All parameters, in the order supplied.
    pub parameters: Vec<Parameter>,
    /// Discrete and continuous constraints.
    pub constraints: Vec<Constraint>,
    /// The experimental representation of the discrete subspace.
    pub exp_rep: Frame,
    /// The frozen computational columns of the discrete subspace.
    pub comp_columns: Vec<String>,
    /// Whether the discrete subspace has no computational representation.
    pub empty_encoding: bool,
}

#[cfg(feature = "serde")]
fn serialization(e: impl core::fmt::Display) -> Error {
    Error::Serialization(e.to_string())
}

#[cfg(feature = "serde")]
impl SearchSpace {
    /// Captures the persistent state of the search space.
    #[must_use]
    pub fn to_snapshot(&self) -> SearchSpaceSnapshot {
        SearchSpaceSnapshot {
            version: SNAPSHOT_VERSION,
            parameters: self.parameters.clone(),
            constraints: self
                .discrete
                .constraints()
                .iter()
                .chain(self.continuous.constraints())
                .cloned()
                .collect(),
            exp_rep: self.discrete.exp_rep().clone(),
            comp_columns: self.discrete.comp_columns().to_vec(),
            empty_encoding: self.discrete.empty_encoding(),
        }
    }

    /// Restores a search space from a snapshot.
    ///
    /// The stored rows are used as they are; constraints are not re-applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for an unknown schema version,
    /// [`Error::ColumnMismatch`] if a stored computational column cannot be
    /// reproduced, and any parameter or constraint validation error.
    pub fn from_snapshot(snapshot: SearchSpaceSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        super::check_names(&snapshot.parameters)?;
        crate::constraint::validate_constraints(&snapshot.constraints, &snapshot.parameters)?;

        let (discrete_params, continuous_params): (Vec<Parameter>, Vec<Parameter>) = snapshot
            .parameters
            .iter()
            .cloned()
            .partition(Parameter::is_discrete);
        let (discrete_constraints, continuous_constraints): (Vec<Constraint>, Vec<Constraint>) =
            snapshot.constraints.into_iter().partition(Constraint::is_discrete);

        let discrete = SubspaceDiscrete::restore(
            discrete_params,
            discrete_constraints,
            snapshot.exp_rep,
            snapshot.comp_columns,
            snapshot.empty_encoding,
        )?;
        let continuous =
            SubspaceContinuous::new(continuous_params)?.with_constraints(continuous_constraints)?;
        Ok(Self {
            parameters: snapshot.parameters,
            discrete,
            continuous,
        })
    }

    /// Serializes the snapshot to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_snapshot()).map_err(serialization)
    }

    /// Restores a search space from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON and any error of
    /// [`from_snapshot`](Self::from_snapshot).
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SearchSpaceSnapshot = serde_json::from_str(json).map_err(serialization)?;
        Self::from_snapshot(snapshot)
    }

    /// Save the search space to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.to_snapshot();

        // Write to a temp file in the same directory, then rename.
        let parent = path.parent().unwrap_or(Path::new("."));
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
        let file = std::fs::File::create(&tmp_path).map_err(serialization)?;
        serde_json::to_writer_pretty(file, &snapshot).map_err(serialization)?;
        std::fs::rename(&tmp_path, path).map_err(serialization)
    }

    /// Load a search space from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the file cannot be read or parsed,
    /// and any error of [`from_snapshot`](Self::from_snapshot).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(serialization)?;
        let snapshot: SearchSpaceSnapshot =
            serde_json::from_reader(std::io::BufReader::new(file)).map_err(serialization)?;
        Self::from_snapshot(snapshot)
    }
}
