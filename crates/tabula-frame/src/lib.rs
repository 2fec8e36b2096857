#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # tabula-frame
//!
//! In-memory columnar frames for tabula.
//!
//! A [`Frame`] is an ordered set of equally sized, uniquely named columns.
//! It is the unit of data handed to the validation engine and produced by
//! the CSV adapter. Only the operations validation needs are provided:
//! shape measurement, column selection and row filtering.

/// Ordered, equally sized columns and their shape.
pub mod frame;
/// Cell values stored in frame columns.
pub mod value;

/// Primary frame types.
pub use frame::{Column, Frame};
/// Cell value type.
pub use value::Value;

use thiserror::Error;

/// Errors that can occur when building or reshaping frames
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Duplicate column: {name}")]
    DuplicateColumn { name: String },

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

impl Error {
    /// Build a column-not-found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Build a duplicate-column error.
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }
}

/// Crate-local result type for frame operations.
pub type Result<T> = std::result::Result<T, Error>;
