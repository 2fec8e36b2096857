//! Subset/superset compatibility checking
//!
//! The checker compares two column-name to type mappings. It runs two
//! independent passes and always runs both:
//!
//! 1. missing columns: names the subset declares that the superset lacks;
//! 2. type mismatches: names declared by both with different types.
//!
//! Results are sorted by column name so reports are deterministic.

use crate::Error;
use crate::model::ColumnType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Column name to declared type
pub type ColumnTypes = BTreeMap<String, ColumnType>;

/// A column declared with different types in subset and superset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMismatch {
    pub column: String,
    pub subset_type: ColumnType,
    pub superset_type: ColumnType,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: subset has {}, superset has {}",
            self.column, self.subset_type, self.superset_type
        )
    }
}

/// Outcome of a failed compatibility check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncompatibilityReport {
    /// Subset columns absent from the superset, sorted
    pub missing: Vec<String>,
    /// All superset column names, sorted
    pub available: Vec<String>,
    /// Shared columns with differing types, sorted by column
    pub mismatches: Vec<TypeMismatch>,
}

impl IncompatibilityReport {
    /// True when neither pass found a problem
    pub fn is_compatible(&self) -> bool {
        self.missing.is_empty() && self.mismatches.is_empty()
    }

    /// Turn the report into the declaration error for `subset`
    ///
    /// Missing columns take precedence: when any are present the error is
    /// [`Error::MissingColumns`], still carrying the type mismatches found
    /// among the shared columns. Otherwise it is [`Error::TypeMismatch`].
    pub fn into_error(self, subset: &str, superset: &str) -> Error {
        if self.missing.is_empty() {
            Error::TypeMismatch {
                subset: subset.to_string(),
                superset: superset.to_string(),
                mismatches: self.mismatches,
            }
        } else {
            Error::MissingColumns {
                subset: subset.to_string(),
                superset: superset.to_string(),
                missing: self.missing,
                available: self.available,
                mismatches: self.mismatches,
            }
        }
    }
}

/// Columns in `subset` that `superset` does not declare
pub fn missing_columns(subset: &ColumnTypes, superset: &ColumnTypes) -> Vec<String> {
    subset
        .keys()
        .filter(|name| !superset.contains_key(*name))
        .cloned()
        .collect()
}

/// Columns present in both with differing declared types
pub fn type_mismatches(subset: &ColumnTypes, superset: &ColumnTypes) -> Vec<TypeMismatch> {
    subset
        .iter()
        .filter_map(|(name, subset_type)| {
            let superset_type = superset.get(name)?;
            (subset_type != superset_type).then(|| TypeMismatch {
                column: name.clone(),
                subset_type: *subset_type,
                superset_type: *superset_type,
            })
        })
        .collect()
}

/// Check that `subset` is a type-compatible subset of `superset`
///
/// An empty subset is always compatible.
pub fn check(subset: &ColumnTypes, superset: &ColumnTypes) -> Result<(), IncompatibilityReport> {
    let report = IncompatibilityReport {
        missing: missing_columns(subset, superset),
        available: superset.keys().cloned().collect(),
        mismatches: type_mismatches(subset, superset),
    };

    if report.is_compatible() {
        Ok(())
    } else {
        Err(report)
    }
}
