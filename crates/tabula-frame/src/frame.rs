//! Columnar frame representation
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::value::Value;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// A named column of cell values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Cell values, one per row
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column from anything convertible into values
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of rows in the column
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row index
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Count null cells
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// An ordered set of equally sized, uniquely named columns
///
/// The row count is tracked separately from the columns so that a frame
/// narrowed down to zero columns still reports the height of its source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
    height: usize,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from columns, rejecting ragged or duplicate columns
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] when two columns share a name and
    /// [`Error::LengthMismatch`] when column lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, Column::len);
        Self::with_height(columns, height)
    }

    /// Build a frame with an explicit row count
    ///
    /// # Errors
    ///
    /// Same conditions as [`Frame::from_columns`], with every column checked
    /// against `height`.
    pub fn with_height(columns: Vec<Column>, height: usize) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::duplicate_column(&column.name));
            }
            if column.len() != height {
                return Err(Error::LengthMismatch {
                    column: column.name.clone(),
                    expected: height,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    /// Append a column
    ///
    /// # Errors
    ///
    /// Same conditions as [`Frame::from_columns`].
    pub fn with_column(self, column: Column) -> Result<Self> {
        let height = if self.columns.is_empty() && self.height == 0 {
            column.len()
        } else {
            self.height
        };
        let mut columns = self.columns;
        columns.push(column);
        Self::with_height(columns, height)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.columns.len())
    }

    /// Column names in frame order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All columns in frame order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.height {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Project the frame onto `names`, in the given order
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] for the first absent name and
    /// [`Error::DuplicateColumn`] if a name is requested twice.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| Error::column_not_found(*name))
            })
            .collect::<Result<Vec<_>>>()?;
        trace!(selected = names.len(), dropped = self.width().saturating_sub(names.len()), "Selected frame columns");
        Self::with_height(columns, self.height)
    }

    /// Keep only the rows whose mask entry is `true`
    ///
    /// Mask entries beyond the frame height are ignored; rows without a mask
    /// entry are kept.
    pub fn filter_rows(&self, keep: &[bool]) -> Self {
        let retained = (0..self.height)
            .filter(|row| keep.get(*row).copied().unwrap_or(true))
            .collect::<Vec<_>>();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: retained.iter().map(|row| c.values[*row].clone()).collect(),
            })
            .collect();
        Self {
            columns,
            height: retained.len(),
        }
    }

    /// Consume the frame and return its columns
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
