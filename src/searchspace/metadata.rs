use crate::error::{Error, Result};

/// Per-row bookkeeping flags of a discrete subspace.
///
/// Flags start out `false` and can only be set, never cleared. The row count
/// is fixed at construction and always equals the subspace's row count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    was_recommended: Vec<bool>,
    was_measured: Vec<bool>,
    dont_recommend: Vec<bool>,
}

impl Metadata {
    /// All flags cleared for `n_rows` rows.
    #[must_use]
    pub fn new(n_rows: usize) -> Self {
        Self {
            was_recommended: vec![false; n_rows],
            was_measured: vec![false; n_rows],
            dont_recommend: vec![false; n_rows],
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.was_recommended.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.was_recommended.is_empty()
    }

    /// Whether the row was recommended before. `false` for unknown rows.
    #[must_use]
    pub fn was_recommended(&self, row: usize) -> bool {
        self.was_recommended.get(row).copied().unwrap_or(false)
    }

    /// Whether the row was measured before. `false` for unknown rows.
    #[must_use]
    pub fn was_measured(&self, row: usize) -> bool {
        self.was_measured.get(row).copied().unwrap_or(false)
    }

    /// Whether the row is excluded from recommendation. `false` for unknown rows.
    #[must_use]
    pub fn dont_recommend(&self, row: usize) -> bool {
        self.dont_recommend.get(row).copied().unwrap_or(false)
    }

    /// Number of rows flagged as recommended.
    #[must_use]
    pub fn n_recommended(&self) -> usize {
        self.was_recommended.iter().filter(|&&f| f).count()
    }

    /// Number of rows flagged as measured.
    #[must_use]
    pub fn n_measured(&self) -> usize {
        self.was_measured.iter().filter(|&&f| f).count()
    }

    /// Number of rows excluded from recommendation.
    #[must_use]
    pub fn n_dont_recommend(&self) -> usize {
        self.dont_recommend.iter().filter(|&&f| f).count()
    }

    pub(crate) fn set_recommended(&mut self, rows: &[usize]) -> Result<()> {
        set_flags(&mut self.was_recommended, rows)
    }

    pub(crate) fn set_measured(&mut self, rows: &[usize]) -> Result<()> {
        set_flags(&mut self.was_measured, rows)
    }

    pub(crate) fn set_dont_recommend(&mut self, rows: &[usize]) -> Result<()> {
        set_flags(&mut self.dont_recommend, rows)
    }
}

/// Sets every listed flag, or none if any index is out of range.
fn set_flags(flags: &mut [bool], rows: &[usize]) -> Result<()> {
    let len = flags.len();
    if let Some(&index) = rows.iter().find(|&&r| r >= len) {
        return Err(Error::RowOutOfRange { index, len });
    }
    for &row in rows {
        flags[row] = true;
    }
    Ok(())
}
