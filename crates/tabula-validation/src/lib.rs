#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # tabula-validation
//!
//! Validation engine applying declared schemas to frames.
//!
//! Validation checks that every declared column is present, that values
//! have the declared type, respect nullability and uniqueness, and pass the
//! declared checks. Columns the schema does not declare are filtered out by
//! default, so validating with a subset schema yields exactly the subset's
//! columns.
//!
//! ## Example Usage
//!
//! ```rust
//! use tabula_frame::{Column, Frame};
//! use tabula_schema::{ColumnDef, Schema};
//! use tabula_validation::ValidationEngine;
//!
//! let users = Schema::define(
//!     "Users",
//!     vec![ColumnDef::integer("user_id").ge(1.0), ColumnDef::string("name")],
//! )
//! .unwrap();
//! let ids = Schema::project("Ids", &users, &["user_id"]).unwrap();
//!
//! let frame = Frame::from_columns(vec![
//!     Column::new("user_id", [1_i64, 2]),
//!     Column::new("name", ["Alice", "Bob"]),
//! ])
//! .unwrap();
//!
//! let filtered = ValidationEngine::new().validate(&ids, &frame).unwrap();
//! assert_eq!(filtered.column_names(), vec!["user_id"]);
//! assert_eq!(filtered.height(), 2);
//! ```

pub mod engine;
pub mod rules;

// Re-export main types
pub use engine::{
    DataValidationError, ExtraColumns, FailureCase, FailureKind, ValidationConfig,
    ValidationEngine,
};
pub use rules::{ColumnRules, matches_type};

use tabula_frame::Frame;
use tabula_schema::Schema;
use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataValidationError),

    #[error("Invalid check on column '{column}': {message}")]
    InvalidCheck { column: String, message: String },

    #[error("Frame error: {0}")]
    Frame(#[from] tabula_frame::Error),
}

impl Error {
    pub(crate) fn invalid_check(column: &str, message: impl Into<String>) -> Self {
        Self::InvalidCheck {
            column: column.to_string(),
            message: message.into(),
        }
    }

    /// The data failures, when the error came from the data itself
    #[must_use]
    pub fn data(&self) -> Option<&DataValidationError> {
        match self {
            Self::Data(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to validate a frame with default settings
///
/// # Errors
///
/// Returns an error when the frame fails the schema.
pub fn validate(schema: &Schema, frame: &Frame) -> Result<Frame> {
    ValidationEngine::new().validate(schema, frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_frame::Column;
    use tabula_schema::ColumnDef;

    #[test]
    fn test_convenience_validate() {
        let schema = Schema::define("S", vec![ColumnDef::boolean("in_stock")]).unwrap();
        let frame = Frame::from_columns(vec![
            Column::new("in_stock", [true, false]),
            Column::new("sku", ["a", "b"]),
        ])
        .unwrap();

        let result = validate(&schema, &frame).unwrap();
        assert_eq!(result.shape(), (2, 1));
    }

    #[test]
    fn test_error_accessor() {
        let schema = Schema::define("S", vec![ColumnDef::boolean("in_stock")]).unwrap();
        let err = validate(&schema, &Frame::new()).unwrap_err();
        assert_eq!(err.data().map(|d| d.failures.len()), Some(1));
        assert!(err.to_string().contains("column 'in_stock': column missing"));
    }
}
