//! Schema declarations and subset binding
//!
//! Schemas are created through [`Schema::define`], [`Schema::define_subset`],
//! [`Schema::project`] or the [`SchemaBuilder`]. A subset declaration runs the
//! compatibility check before the schema value exists, so a rejected subset
//! never comes into being. Declared schemas are immutable and shared via
//! [`Arc`].

use crate::compat::{self, ColumnTypes, IncompatibilityReport};
use crate::model::{Check, ColumnDef};
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a declared schema
///
/// Two declarations with identical structure still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

impl SchemaId {
    fn next() -> Self {
        Self(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared column schema, optionally bound to a superset
#[derive(Debug)]
pub struct Schema {
    id: SchemaId,
    name: String,
    description: Option<String>,
    columns: Vec<ColumnDef>,
    superset: Option<Arc<Schema>>,
}

impl Schema {
    /// Start a fluent declaration
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Declare a schema that is not bound to any superset
    pub fn define(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Arc<Self>> {
        Self::declare(name.into(), None, columns)
    }

    /// Declare a subset of `superset`
    ///
    /// Fails with [`Error::MissingColumns`] when a column is absent from the
    /// superset and with [`Error::TypeMismatch`] when a shared column is
    /// declared with a different type.
    pub fn define_subset(
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        superset: &Arc<Schema>,
    ) -> Result<Arc<Self>> {
        Self::declare_subset(name.into(), None, columns, superset)
    }

    /// Declare a subset by copying the named columns, checks included, from
    /// `superset`
    pub fn project(
        name: impl Into<String>,
        superset: &Arc<Schema>,
        columns: &[&str],
    ) -> Result<Arc<Self>> {
        let name = name.into();
        let mut missing = Vec::new();
        let mut picked = Vec::with_capacity(columns.len());
        for column in columns {
            match superset.column(column) {
                Some(def) => picked.push(def.clone()),
                None => missing.push((*column).to_string()),
            }
        }

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            let report = IncompatibilityReport {
                missing,
                available: superset.column_types().into_keys().collect(),
                mismatches: Vec::new(),
            };
            warn!(subset = %name, superset = %superset.name, "Rejected projected subset");
            return Err(report.into_error(&name, &superset.name));
        }

        Self::declare_subset(name, None, picked, superset)
    }

    fn declare(name: String, description: Option<String>, columns: Vec<ColumnDef>) -> Result<Arc<Self>> {
        validate_declaration(&name, &columns)?;

        let schema = Self::new(name, description, columns, None);
        debug!(schema = %schema.name, id = %schema.id, columns = schema.columns.len(), "Declared schema");
        Ok(Arc::new(schema))
    }

    fn declare_subset(
        name: String,
        description: Option<String>,
        columns: Vec<ColumnDef>,
        superset: &Arc<Schema>,
    ) -> Result<Arc<Self>> {
        validate_declaration(&name, &columns)?;

        let subset_types = column_types(&columns);
        if let Err(report) = compat::check(&subset_types, &superset.column_types()) {
            warn!(
                subset = %name,
                superset = %superset.name,
                missing = ?report.missing,
                mismatches = report.mismatches.len(),
                "Rejected subset declaration"
            );
            return Err(report.into_error(&name, &superset.name));
        }

        let schema = Self::new(name, description, columns, Some(Arc::clone(superset)));
        debug!(
            schema = %schema.name,
            id = %schema.id,
            superset = %superset.name,
            columns = schema.columns.len(),
            "Declared subset schema"
        );
        Ok(Arc::new(schema))
    }

    fn new(
        name: String,
        description: Option<String>,
        columns: Vec<ColumnDef>,
        superset: Option<Arc<Schema>>,
    ) -> Self {
        Self {
            id: SchemaId::next(),
            name,
            description,
            columns,
            superset,
        }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Column definitions in declaration order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Get column definition by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Declared column names, in declaration order
    pub fn columns_of(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The superset this schema is bound to, `None` for unbound schemas
    ///
    /// Returns the same handle that was passed at declaration time.
    pub fn superset_of(&self) -> Option<&Arc<Schema>> {
        self.superset.as_ref()
    }

    pub fn is_subset(&self) -> bool {
        self.superset.is_some()
    }

    /// Column name to declared type
    pub fn column_types(&self) -> ColumnTypes {
        column_types(&self.columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column.name, column.column_type)?;
            if column.nullable {
                write!(f, "?")?;
            }
        }
        write!(f, "]")?;
        if let Some(superset) = &self.superset {
            write!(f, " <= {}", superset.name)?;
        }
        Ok(())
    }
}

fn column_types(columns: &[ColumnDef]) -> ColumnTypes {
    columns
        .iter()
        .map(|c| (c.name.clone(), c.column_type))
        .collect()
}

fn validate_declaration(name: &str, columns: &[ColumnDef]) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidDeclaration(
            "schema name must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for column in columns {
        if column.name.is_empty() {
            return Err(Error::InvalidDeclaration(format!(
                "schema '{name}' declares a column with an empty name"
            )));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(Error::DuplicateColumn {
                schema: name.to_string(),
                column: column.name.clone(),
            });
        }
        for check in &column.checks {
            validate_check(name, column, check)?;
        }
    }
    Ok(())
}

fn validate_check(schema: &str, column: &ColumnDef, check: &Check) -> Result<()> {
    if let Some(reason) = check.type_conflict(column.column_type) {
        return Err(Error::InvalidDeclaration(format!(
            "schema '{schema}' column '{}': {reason}",
            column.name
        )));
    }
    if let Check::StrMatches(pattern) = check {
        Regex::new(pattern).map_err(|e| {
            Error::InvalidDeclaration(format!(
                "schema '{schema}' column '{}': invalid pattern: {e}",
                column.name
            ))
        })?;
    }
    Ok(())
}

/// Fluent schema declaration
///
/// `build` dispatches to [`Schema::define`] or, when a superset was given,
/// to the checked subset path.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    columns: Vec<ColumnDef>,
    superset: Option<Arc<Schema>>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns: Vec::new(),
            superset: None,
        }
    }

    /// Add a column definition
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add several column definitions
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Bind the declaration to a superset
    pub fn subset_of(mut self, superset: &Arc<Schema>) -> Self {
        self.superset = Some(Arc::clone(superset));
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Result<Arc<Schema>> {
        match self.superset {
            Some(superset) => {
                Schema::declare_subset(self.name, self.description, self.columns, &superset)
            }
            None => Schema::declare(self.name, self.description, self.columns),
        }
    }
}
