//! Column model definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a column
///
/// Compatibility between a subset and its superset is exact equality on
/// this type; there is no widening between `Integer` and `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Integer type (64-bit)
    #[serde(alias = "int")]
    Integer,
    /// Floating-point type
    Float,
    /// String type
    #[serde(alias = "str")]
    String,
    /// Boolean type
    #[serde(alias = "bool")]
    Boolean,
}

impl ColumnType {
    /// Whether values of this type are numbers
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Per-column value constraint, evaluated by the validation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Value >= bound
    #[serde(rename = "ge")]
    GreaterThanOrEqual(f64),
    /// Value <= bound
    #[serde(rename = "le")]
    LessThanOrEqual(f64),
    /// Value > bound
    #[serde(rename = "gt")]
    GreaterThan(f64),
    /// Value < bound
    #[serde(rename = "lt")]
    LessThan(f64),
    /// min <= value <= max
    InRange { min: f64, max: f64 },
    /// Textual value is one of the allowed values
    #[serde(rename = "isin")]
    IsIn(Vec<String>),
    /// String length bounds (characters)
    StrLength {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    /// String matches a regular expression
    StrMatches(String),
    /// String is not empty
    NotEmpty,
}

impl Check {
    /// Whether the check compares numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Check::GreaterThanOrEqual(_)
                | Check::LessThanOrEqual(_)
                | Check::GreaterThan(_)
                | Check::LessThan(_)
                | Check::InRange { .. }
        )
    }

    /// Whether the check inspects string contents
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Check::StrLength { .. } | Check::StrMatches(_) | Check::NotEmpty
        )
    }

    /// Why this check cannot apply to a column of `column_type`, if it cannot
    pub fn type_conflict(&self, column_type: ColumnType) -> Option<String> {
        if self.is_numeric() && !column_type.is_numeric() {
            Some(format!("{self} requires a numeric column, found {column_type}"))
        } else if self.is_string() && column_type != ColumnType::String {
            Some(format!("{self} requires a string column, found {column_type}"))
        } else {
            None
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::GreaterThanOrEqual(v) => write!(f, "ge({v})"),
            Check::LessThanOrEqual(v) => write!(f, "le({v})"),
            Check::GreaterThan(v) => write!(f, "gt({v})"),
            Check::LessThan(v) => write!(f, "lt({v})"),
            Check::InRange { min, max } => write!(f, "in_range({min}, {max})"),
            Check::IsIn(values) => write!(f, "isin({})", values.join(", ")),
            Check::StrLength { min, max } => {
                let bound = |b: &Option<usize>| b.map_or_else(|| "_".to_string(), |v| v.to_string());
                write!(f, "str_length({}, {})", bound(min), bound(max))
            }
            Check::StrMatches(pattern) => write!(f, "str_matches('{pattern}')"),
            Check::NotEmpty => write!(f, "not_empty"),
        }
    }
}

/// Definition of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name, unique within a schema
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether null cells are allowed
    #[serde(default)]
    pub nullable: bool,
    /// Whether values must be unique within the column
    #[serde(default)]
    pub unique: bool,
    /// Value constraints
    #[serde(default)]
    pub checks: Vec<Check>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnDef {
    /// Create a new non-nullable column definition
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            unique: false,
            checks: Vec::new(),
            description: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Allow null cells
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Require unique values
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add a value check
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Shorthand for a `>=` bound
    pub fn ge(self, bound: f64) -> Self {
        self.check(Check::GreaterThanOrEqual(bound))
    }

    /// Shorthand for a `<=` bound
    pub fn le(self, bound: f64) -> Self {
        self.check(Check::LessThanOrEqual(bound))
    }

    /// Set description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
