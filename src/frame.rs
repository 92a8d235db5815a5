//! Tabular containers for the experimental and computational representations.
//!
//! [`Frame`] wraps a polars [`DataFrame`] and is used for search-space rows,
//! measurements and continuous samples. [`CompFrame`] holds named numeric
//! columns backed by a dense [`DMatrix`]. Rows in both are identified by
//! position only.

use std::collections::HashSet;

use nalgebra::DMatrix;
use polars::prelude::{Column, DataFrame, DataType, IdxCa, IdxSize, NamedFrom, Series};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::param::ParamValue;

/// A table of experimental values.
///
/// A column holding only numbers is stored as `Float64`. A column holding any
/// label is stored as `String`, with its numbers written in their display
/// form, so it reads back as labels only.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    data: DataFrame,
    // a frame without columns still carries its row count
    n_rows: usize,
}

impl Frame {
    /// Creates a frame without columns holding `n_rows` empty rows.
    #[must_use]
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            data: DataFrame::default(),
            n_rows,
        }
    }

    /// Creates a frame from named columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if the columns differ in length and
    /// [`Error::DuplicateParameterName`] if a column name repeats.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<ParamValue>)>,
    ) -> Result<Self> {
        let mut frame: Option<Self> = None;
        for (name, values) in columns {
            let f = frame.get_or_insert_with(|| Self::with_rows(values.len()));
            f.push_column(name, values)?;
        }
        Ok(frame.unwrap_or_default())
    }

    /// Creates a frame from row records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if a row does not have one value per
    /// column and [`Error::DuplicateParameterName`] if a column name repeats.
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<ParamValue>>) -> Result<Self> {
        let n_rows = rows.len();
        let mut columns: Vec<Vec<ParamValue>> = vec![Vec::with_capacity(n_rows); names.len()];
        for row in rows {
            if row.len() != names.len() {
                return Err(Error::RowCountMismatch {
                    expected: names.len(),
                    got: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        let mut frame = Self::with_rows(if names.is_empty() { 0 } else { n_rows });
        for (name, values) in names.iter().zip(columns) {
            frame.push_column(name.as_ref(), values)?;
        }
        Ok(frame)
    }

    /// Creates a frame of `Float64` columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if the columns differ in length and
    /// [`Error::DuplicateParameterName`] if a column name repeats.
    pub fn from_numeric_columns<S: AsRef<str>>(names: &[S], columns: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Vec::len);
        let mut frame = Self::with_rows(n_rows);
        for (name, values) in names.iter().zip(columns) {
            frame.insert(name.as_ref(), values.len(), Series::new(name.as_ref().into(), values))?;
        }
        Ok(frame)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if the column length differs from the
    /// frame's row count and [`Error::DuplicateParameterName`] if the name exists.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<ParamValue>) -> Result<()> {
        let name = name.into();
        let len = values.len();
        let series = to_series(&name, &values);
        self.insert(&name, len, series)
    }

    fn insert(&mut self, name: &str, len: usize, series: Series) -> Result<()> {
        if self.contains_column(name) {
            return Err(Error::DuplicateParameterName {
                name: name.to_owned(),
            });
        }
        if len != self.n_rows {
            return Err(Error::RowCountMismatch {
                expected: self.n_rows,
                got: len,
            });
        }
        self.data.with_column(series)?;
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.data.width()
    }

    /// Returns `true` if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.data.get_column_names_str()
    }

    /// Returns `true` if a column with the given name exists.
    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.data.get_column_index(name).is_some()
    }

    /// The underlying polars frame.
    #[must_use]
    pub fn as_polars(&self) -> &DataFrame {
        &self.data
    }

    fn polars_column(&self, name: &str) -> Result<&Column> {
        if !self.contains_column(name) {
            return Err(Error::MissingColumn {
                name: name.to_owned(),
            });
        }
        Ok(self.data.column(name)?)
    }

    /// Returns the values of the named column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if the column does not exist.
    pub fn column(&self, name: &str) -> Result<Vec<ParamValue>> {
        column_values(self.polars_column(name)?)
    }

    /// Returns the value at the given row of the named column.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<ParamValue> {
        let column = self.polars_column(name).ok()?;
        if row >= column.len() {
            return None;
        }
        if column.dtype() == &DataType::Float64 {
            column.f64().ok()?.get(row).map(ParamValue::Float)
        } else {
            column.str().ok()?.get(row).map(ParamValue::from)
        }
    }

    /// Returns the numeric values of the named column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if the column does not exist and
    /// [`Error::NonNumericValue`] if it contains a label. The reported row is
    /// the first one that does not read as a number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.polars_column(name)?;
        if column.dtype() == &DataType::Float64 {
            return Ok(column
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect());
        }
        let row = column
            .str()?
            .into_iter()
            .position(|v| v.is_none_or(|s| s.parse::<f64>().is_err()))
            .unwrap_or(0);
        Err(Error::NonNumericValue {
            column: name.to_owned(),
            row,
        })
    }

    /// Returns a new frame holding the given rows, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if an index does not exist.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let positions = indices
            .iter()
            .map(|&index| {
                IdxSize::try_from(index)
                    .ok()
                    .filter(|_| index < self.n_rows)
                    .ok_or(Error::RowOutOfRange {
                        index,
                        len: self.n_rows,
                    })
            })
            .collect::<Result<Vec<IdxSize>>>()?;
        if self.n_cols() == 0 {
            return Ok(Self::with_rows(indices.len()));
        }
        Ok(Self {
            data: self.data.take(&IdxCa::new("row".into(), positions))?,
            n_rows: indices.len(),
        })
    }

    /// Removes the given rows and renumbers the remaining ones contiguously.
    pub(crate) fn drop_rows(&mut self, indices: &[usize]) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }
        let drop: HashSet<usize> = indices.iter().copied().collect();
        let keep: Vec<usize> = (0..self.n_rows).filter(|i| !drop.contains(i)).collect();
        *self = self.select_rows(&keep)?;
        Ok(())
    }

    /// Returns a frame with only the named columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for the first name that does not exist
    /// and [`Error::DuplicateParameterName`] for a repeated name.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if !self.contains_column(name) {
                return Err(Error::MissingColumn {
                    name: name.to_owned(),
                });
            }
            if !seen.insert(name) {
                return Err(Error::DuplicateParameterName {
                    name: name.to_owned(),
                });
            }
        }
        if names.is_empty() {
            return Ok(Self::with_rows(self.n_rows));
        }
        let selection: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        Ok(Self {
            data: self.data.select(selection)?,
            n_rows: self.n_rows,
        })
    }

    /// Bytes held by all cells as reported by polars: eight per number and the
    /// byte length of each label.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.data.estimated_size()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.n_rows == other.n_rows
            && self.column_names() == other.column_names()
            && self.data == other.data
    }
}

fn to_series(name: &str, values: &[ParamValue]) -> Series {
    if values.iter().all(ParamValue::is_numeric) {
        let numbers: Vec<f64> = values.iter().filter_map(ParamValue::as_f64).collect();
        Series::new(name.into(), numbers)
    } else {
        let labels: Vec<String> = values.iter().map(ToString::to_string).collect();
        Series::new(name.into(), labels)
    }
}

fn column_values(column: &Column) -> Result<Vec<ParamValue>> {
    if column.dtype() == &DataType::Float64 {
        Ok(column
            .f64()?
            .into_iter()
            .map(|v| ParamValue::Float(v.unwrap_or(f64::NAN)))
            .collect())
    } else {
        Ok(column
            .str()?
            .into_iter()
            .map(|v| ParamValue::from(v.unwrap_or_default()))
            .collect())
    }
}

/// Serialized form of a [`Frame`]: column names with their values.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct FrameRecord {
    names: Vec<String>,
    columns: Vec<Vec<ParamValue>>,
    n_rows: usize,
}

#[cfg(feature = "serde")]
impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let names = self.column_names();
        let columns = names
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()
            .map_err(serde::ser::Error::custom)?;
        FrameRecord {
            names: names.into_iter().map(str::to_owned).collect(),
            columns,
            n_rows: self.n_rows,
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Frame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let record = FrameRecord::deserialize(deserializer)?;
        let mut frame = Self::with_rows(record.n_rows);
        for (name, values) in record.names.into_iter().zip(record.columns) {
            frame
                .push_column(name, values)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(frame)
    }
}
/// A numeric table: ordered column names and a rows × columns matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CompFrame {
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl CompFrame {
    /// Creates a frame without columns holding `n_rows` rows.
    #[must_use]
    pub fn empty(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            values: DMatrix::zeros(n_rows, 0),
        }
    }

    /// Creates a frame from column names and a matching matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnMismatch`] if the number of names differs from the
    /// number of matrix columns.
    pub fn new(columns: Vec<String>, values: DMatrix<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(Error::ColumnMismatch {
                expected: columns,
                got: (0..values.ncols()).map(|j| j.to_string()).collect(),
            });
        }
        Ok(Self { columns, values })
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The underlying matrix.
    #[must_use]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Consumes the frame, returning the underlying matrix.
    #[must_use]
    pub fn into_values(self) -> DMatrix<f64> {
        self.values
    }

    /// Returns a copy of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(j).iter().copied().collect())
    }

    /// Concatenates two frames column-wise, `self` first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] if the row counts differ and
    /// [`Error::DuplicateCompColumn`] if both frames hold a column of the same
    /// name.
    pub fn hstack(&self, other: &Self) -> Result<Self> {
        if self.n_rows() != other.n_rows() {
            return Err(Error::RowCountMismatch {
                expected: self.n_rows(),
                got: other.n_rows(),
            });
        }
        if let Some(column) = other.columns.iter().find(|c| self.columns.contains(c)) {
            return Err(Error::DuplicateCompColumn {
                column: column.clone(),
            });
        }
        let left = self.n_cols();
        let values = DMatrix::from_fn(self.n_rows(), left + other.n_cols(), |i, j| {
            if j < left {
                self.values[(i, j)]
            } else {
                other.values[(i, j - left)]
            }
        });
        let columns = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect();
        Ok(Self { columns, values })
    }

    /// Returns a frame holding exactly the given columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnMismatch`] if any requested column is missing.
    pub fn select_columns(&self, names: &[String]) -> Result<Self> {
        let positions: Option<Vec<usize>> = names
            .iter()
            .map(|n| self.columns.iter().position(|c| c == n))
            .collect();
        let Some(positions) = positions else {
            return Err(Error::ColumnMismatch {
                expected: names.to_vec(),
                got: self.columns.clone(),
            });
        };
        let values = DMatrix::from_fn(self.n_rows(), positions.len(), |i, j| {
            self.values[(i, positions[j])]
        });
        Ok(Self {
            columns: names.to_vec(),
            values,
        })
    }

    /// Returns a frame holding the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let values = DMatrix::from_fn(indices.len(), self.n_cols(), |i, j| {
            self.values[(indices[i], j)]
        });
        Self {
            columns: self.columns.clone(),
            values,
        }
    }

    /// Drops every column that does not hold at least two distinct values.
    ///
    /// Returns the pruned frame and the names of the dropped columns.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn drop_constant_columns(&self) -> (Self, Vec<String>) {
        let mut keep = Vec::new();
        let mut dropped = Vec::new();
        for (j, name) in self.columns.iter().enumerate() {
            let column = self.values.column(j);
            let varies = column
                .iter()
                .next()
                .is_some_and(|first| column.iter().any(|v| v != first));
            if varies {
                keep.push(name.clone());
            } else {
                dropped.push(name.clone());
            }
        }
        let pruned = self
            .select_columns(&keep)
            .unwrap_or_else(|_| Self::empty(self.n_rows()));
        (pruned, dropped)
    }

    /// Bytes held by all cells.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.values.len() * core::mem::size_of::<f64>()
    }
}
