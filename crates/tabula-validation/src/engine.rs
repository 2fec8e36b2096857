//! Validation engine

use crate::rules::{ColumnRules, matches_type, unique_key};
use crate::Result;
use std::collections::HashSet;
use std::fmt;
use tabula_frame::{Column, Frame, Value};
use tabula_schema::{Check, ColumnType, Schema};
use thiserror::Error;
use tracing::{debug, trace};

/// What to do with frame columns the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraColumns {
    /// Drop undeclared columns from the output
    #[default]
    Filter,
    /// Fail validation when undeclared columns are present
    Reject,
    /// Keep undeclared columns after the declared ones
    Keep,
}

/// Validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Handling of undeclared columns
    pub extra_columns: ExtraColumns,
    /// Collect every failure instead of stopping at the first
    pub lazy: bool,
    /// Maximum failures collected before stopping (0 = unlimited)
    pub max_failures: usize,
    /// Remove rows with row-level failures instead of failing
    pub drop_invalid_rows: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            extra_columns: ExtraColumns::Filter,
            lazy: true,
            max_failures: 0,
            drop_invalid_rows: false,
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn extra_columns(mut self, extra_columns: ExtraColumns) -> Self {
        self.extra_columns = extra_columns;
        self
    }

    #[must_use]
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    #[must_use]
    pub fn max_failures(mut self, max_failures: usize) -> Self {
        self.max_failures = max_failures;
        self
    }

    #[must_use]
    pub fn drop_invalid_rows(mut self, drop_invalid_rows: bool) -> Self {
        self.drop_invalid_rows = drop_invalid_rows;
        self
    }
}

/// Why a value or column failed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// A declared column is absent from the frame
    ColumnMissing,
    /// The frame has a column the schema does not declare
    UnexpectedColumn,
    /// A value does not have the declared type
    WrongType {
        expected: ColumnType,
        found: &'static str,
    },
    /// Null in a non-nullable column
    NullNotAllowed,
    /// Repeated value in a unique column
    Duplicate,
    /// A declared check failed
    CheckFailed(Check),
}

impl FailureKind {
    /// Whether the failure is tied to a single row
    #[must_use]
    pub fn is_row_level(&self) -> bool {
        !matches!(self, Self::ColumnMissing | Self::UnexpectedColumn)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnMissing => write!(f, "column missing"),
            Self::UnexpectedColumn => write!(f, "column not in schema"),
            Self::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::NullNotAllowed => write!(f, "null not allowed"),
            Self::Duplicate => write!(f, "duplicate value"),
            Self::CheckFailed(check) => write!(f, "check {check} failed"),
        }
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct FailureCase {
    pub column: String,
    pub row: Option<usize>,
    pub kind: FailureKind,
    pub value: Option<Value>,
}

impl FailureCase {
    fn column(column: &str, kind: FailureKind) -> Self {
        Self {
            column: column.to_string(),
            row: None,
            kind,
            value: None,
        }
    }

    fn cell(column: &str, row: usize, kind: FailureKind, value: &Value) -> Self {
        Self {
            column: column.to_string(),
            row: Some(row),
            kind,
            value: Some(value.clone()),
        }
    }
}

impl fmt::Display for FailureCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}'", self.column)?;
        if let Some(row) = self.row {
            write!(f, " row {row}")?;
        }
        write!(f, ": {}", self.kind)?;
        if let Some(value) = &self.value {
            write!(f, " (value {value})")?;
        }
        Ok(())
    }
}

/// Data failed validation against a schema
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Schema '{schema}' failed validation with {} failure(s): {}", .failures.len(), render_failures(.failures))]
pub struct DataValidationError {
    pub schema: String,
    pub failures: Vec<FailureCase>,
}

impl DataValidationError {
    /// Failures for one column
    pub fn failures_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a FailureCase> + 'a {
        self.failures.iter().filter(move |f| f.column == column)
    }
}

fn render_failures(failures: &[FailureCase]) -> String {
    const SHOWN: usize = 5;
    let mut rendered = failures
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if failures.len() > SHOWN {
        rendered.push_str(&format!("; and {} more", failures.len() - SHOWN));
    }
    rendered
}

/// Accumulates failures and decides when to stop
struct Failures<'c> {
    config: &'c ValidationConfig,
    fatal: Vec<FailureCase>,
    invalid_rows: Vec<bool>,
    dropped: usize,
}

impl<'c> Failures<'c> {
    fn new(config: &'c ValidationConfig, height: usize) -> Self {
        Self {
            config,
            fatal: Vec::new(),
            invalid_rows: vec![false; height],
            dropped: 0,
        }
    }

    fn push(&mut self, case: FailureCase) {
        if self.is_full() {
            return;
        }
        if self.config.drop_invalid_rows && case.kind.is_row_level() {
            if let Some(row) = case.row {
                trace!(%case, "Marking row for removal");
                if !self.invalid_rows[row] {
                    self.invalid_rows[row] = true;
                    self.dropped += 1;
                }
                return;
            }
        }
        trace!(%case, "Validation failure");
        self.fatal.push(case);
    }

    fn is_full(&self) -> bool {
        if self.fatal.is_empty() {
            return false;
        }
        !self.config.lazy
            || (self.config.max_failures > 0 && self.fatal.len() >= self.config.max_failures)
    }
}

/// Main validation engine
#[derive(Debug, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create a new validation engine
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `frame` against `schema` and return the filtered frame
    ///
    /// The output holds the declared columns in declaration order (followed
    /// by undeclared columns under [`ExtraColumns::Keep`]) and, unless
    /// invalid rows are dropped, every input row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Data`] when the data fails the schema.
    pub fn validate(&self, schema: &Schema, frame: &Frame) -> Result<Frame> {
        let rules = schema
            .columns()
            .iter()
            .map(ColumnRules::compile)
            .collect::<Result<Vec<_>>>()?;

        let mut failures = Failures::new(&self.config, frame.height());

        for def in schema.columns() {
            if !frame.contains(&def.name) {
                failures.push(FailureCase::column(&def.name, FailureKind::ColumnMissing));
            }
        }

        let extras: Vec<&str> = frame
            .column_names()
            .into_iter()
            .filter(|name| schema.column(name).is_none())
            .collect();
        if self.config.extra_columns == ExtraColumns::Reject {
            for name in &extras {
                failures.push(FailureCase::column(name, FailureKind::UnexpectedColumn));
            }
        }

        for column_rules in &rules {
            if failures.is_full() {
                break;
            }
            if let Some(column) = frame.column(&column_rules.def().name) {
                validate_column(column_rules, column, &mut failures);
            }
        }

        if !failures.fatal.is_empty() {
            debug!(
                schema = %schema.name(),
                failures = failures.fatal.len(),
                "Frame failed validation"
            );
            return Err(DataValidationError {
                schema: schema.name().to_string(),
                failures: failures.fatal,
            }
            .into());
        }

        let mut keep = schema.columns_of();
        if self.config.extra_columns == ExtraColumns::Keep {
            keep.extend(extras.iter().copied());
        }
        let mut output = frame.select(&keep)?;

        if failures.dropped > 0 {
            let mask: Vec<bool> = failures.invalid_rows.iter().map(|invalid| !invalid).collect();
            output = output.filter_rows(&mask);
        }

        debug!(
            schema = %schema.name(),
            rows = output.height(),
            columns = output.width(),
            filtered_columns = extras.len(),
            dropped_rows = failures.dropped,
            "Validated frame"
        );
        Ok(output)
    }
}

fn validate_column(rules: &ColumnRules<'_>, column: &Column, failures: &mut Failures<'_>) {
    let def = rules.def();
    let mut seen = HashSet::new();

    for (row, value) in column.values.iter().enumerate() {
        if failures.is_full() {
            return;
        }

        if value.is_null() {
            if !def.nullable {
                failures.push(FailureCase::cell(&def.name, row, FailureKind::NullNotAllowed, value));
            }
            continue;
        }

        if !matches_type(def.column_type, value) {
            failures.push(FailureCase::cell(
                &def.name,
                row,
                FailureKind::WrongType {
                    expected: def.column_type,
                    found: value.kind_name(),
                },
                value,
            ));
            continue;
        }

        if def.unique {
            if let Some(key) = unique_key(value) {
                if !seen.insert(key) {
                    failures.push(FailureCase::cell(&def.name, row, FailureKind::Duplicate, value));
                }
            }
        }

        for check in rules.failed_checks(value) {
            failures.push(FailureCase::cell(
                &def.name,
                row,
                FailureKind::CheckFailed(check.clone()),
                value,
            ));
        }
    }
}
