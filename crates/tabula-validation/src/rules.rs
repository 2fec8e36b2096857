//! Value-level validation rules

use crate::{Error, Result};
use regex::Regex;
use tabula_frame::Value;
use tabula_schema::{Check, ColumnDef, ColumnType};

/// Check whether a non-null value has exactly the declared type
#[must_use]
pub fn matches_type(column_type: ColumnType, value: &Value) -> bool {
    matches!(
        (column_type, value),
        (ColumnType::Integer, Value::Integer(_))
            | (ColumnType::Float, Value::Float(_))
            | (ColumnType::String, Value::String(_))
            | (ColumnType::Boolean, Value::Boolean(_))
    )
}

/// Key used to detect duplicates in unique columns
#[must_use]
pub fn unique_key(value: &Value) -> Option<String> {
    value
        .as_string()
        .map(|text| format!("{}:{text}", value.kind_name()))
}

/// Evaluate a numeric bound against a numeric value
#[must_use]
pub fn validate_bound(check: &Check, number: f64) -> bool {
    match check {
        Check::GreaterThanOrEqual(bound) => number >= *bound,
        Check::LessThanOrEqual(bound) => number <= *bound,
        Check::GreaterThan(bound) => number > *bound,
        Check::LessThan(bound) => number < *bound,
        Check::InRange { min, max } => number >= *min && number <= *max,
        _ => true,
    }
}

/// Evaluate a string length bound
#[must_use]
pub fn validate_length(text: &str, min: Option<usize>, max: Option<usize>) -> bool {
    let len = text.chars().count();
    min.is_none_or(|min| len >= min) && max.is_none_or(|max| len <= max)
}

/// A column definition with its checks prepared for evaluation
#[derive(Debug)]
pub struct ColumnRules<'a> {
    def: &'a ColumnDef,
    patterns: Vec<Option<Regex>>,
}

impl<'a> ColumnRules<'a> {
    /// Prepare the checks of `def`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCheck`] when a pattern does not compile or a
    /// check cannot apply to the declared type.
    pub fn compile(def: &'a ColumnDef) -> Result<Self> {
        let mut patterns = Vec::with_capacity(def.checks.len());
        for check in &def.checks {
            if let Some(reason) = check.type_conflict(def.column_type) {
                return Err(Error::invalid_check(&def.name, reason));
            }

            let pattern = match check {
                Check::StrMatches(pattern) => Some(
                    Regex::new(pattern)
                        .map_err(|e| Error::invalid_check(&def.name, e.to_string()))?,
                ),
                _ => None,
            };
            patterns.push(pattern);
        }
        Ok(Self { def, patterns })
    }

    #[must_use]
    pub fn def(&self) -> &'a ColumnDef {
        self.def
    }

    /// Checks that `value` fails; nulls pass every check
    pub fn failed_checks<'s>(&'s self, value: &'s Value) -> impl Iterator<Item = &'a Check> + 's {
        self.def
            .checks
            .iter()
            .zip(&self.patterns)
            .filter(move |(check, pattern)| !value.is_null() && !passes(check, pattern.as_ref(), value))
            .map(|(check, _)| check)
    }
}

fn passes(check: &Check, pattern: Option<&Regex>, value: &Value) -> bool {
    match check {
        Check::IsIn(allowed) => value
            .as_string()
            .is_some_and(|text| allowed.iter().any(|a| *a == text)),
        Check::StrLength { min, max } => value
            .as_str()
            .is_some_and(|text| validate_length(text, *min, *max)),
        Check::StrMatches(_) => value
            .as_str()
            .zip(pattern)
            .is_some_and(|(text, re)| re.is_match(text)),
        Check::NotEmpty => value.as_str().is_some_and(|text| !text.is_empty()),
        bound => value
            .as_f64()
            .is_some_and(|number| validate_bound(bound, number)),
    }
}
