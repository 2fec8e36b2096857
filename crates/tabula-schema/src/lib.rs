//! # tabula-schema
//!
//! Column schemas with declaration-time subset checking.
//!
//! A superset schema is the authoritative column universe of an entity.
//! Subset schemas name a superset when they are declared; the declaration
//! only succeeds when every subset column exists in the superset with the
//! same declared type. A subset that exists is therefore always valid
//! against its superset, and it keeps a handle to that superset for its
//! whole lifetime.
//!
//! ```rust
//! use tabula_schema::{ColumnDef, Schema};
//!
//! let users = Schema::builder("Users")
//!     .column(ColumnDef::integer("user_id").ge(1.0))
//!     .column(ColumnDef::string("name"))
//!     .column(ColumnDef::string("email"))
//!     .build()
//!     .unwrap();
//!
//! let contact = Schema::builder("Contact")
//!     .column(ColumnDef::integer("user_id"))
//!     .column(ColumnDef::string("email"))
//!     .subset_of(&users)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(contact.columns_of(), vec!["user_id", "email"]);
//! assert!(contact.superset_of().is_some_and(|s| s.id() == users.id()));
//! ```

pub mod compat;
pub mod loader;
pub mod model;
pub mod registry;
pub mod schema;

pub use compat::{ColumnTypes, IncompatibilityReport, TypeMismatch};
pub use loader::CatalogLoader;
pub use model::{Check, ColumnDef, ColumnType};
pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaBuilder, SchemaId};

use thiserror::Error;

fn render_mismatches(mismatches: &[TypeMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_also_mismatched(mismatches: &[TypeMismatch]) -> String {
    if mismatches.is_empty() {
        String::new()
    } else {
        format!("; type mismatches: {}", render_mismatches(mismatches))
    }
}

/// Errors that can occur when declaring or loading schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Subset schema '{subset}' declares columns not in superset '{superset}': missing {missing:?}, available {available:?}{}",
        render_also_mismatched(.mismatches)
    )]
    MissingColumns {
        subset: String,
        superset: String,
        missing: Vec<String>,
        available: Vec<String>,
        mismatches: Vec<TypeMismatch>,
    },

    #[error(
        "Subset schema '{subset}' has type mismatches with superset '{superset}': {}",
        render_mismatches(.mismatches)
    )]
    TypeMismatch {
        subset: String,
        superset: String,
        mismatches: Vec<TypeMismatch>,
    },

    #[error("Schema '{schema}' declares column '{column}' more than once")]
    DuplicateColumn { schema: String, column: String },

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Schema already declared: {0}")]
    AlreadyDeclared(String),

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Superset reference cycle: {0}")]
    Cycle(String),

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the two declaration-time incompatibility kinds
    pub fn is_incompatibility(&self) -> bool {
        matches!(self, Self::MissingColumns { .. } | Self::TypeMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
