#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

//! # tabula-adapter-csv
//!
//! CSV adapter for reading and writing frames.
//!
//! Reading can be guided by a schema: declared columns are parsed as their
//! declared type and undeclared columns are type-inferred, so a CSV file can
//! go straight into validation.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use tabula_adapter_csv::{CsvConfig, CsvReader, CsvWriter};
//! use tabula_schema::{ColumnDef, Schema};
//!
//! let schema = Schema::define("People", vec![ColumnDef::integer("age")]).unwrap();
//! let reader = CsvReader::new().with_config(CsvConfig::new().delimiter(','));
//! let frame = reader
//!     .read(Cursor::new("name,age\nJohn,30\nJane,25"), Some(schema.as_ref()))
//!     .unwrap();
//! assert_eq!(frame.shape(), (2, 2));
//!
//! let mut output = Vec::new();
//! CsvWriter::new().write(&mut output, &frame).unwrap();
//! assert!(String::from_utf8(output).unwrap().contains("John,30"));
//! ```

pub mod config;
pub mod errors;
pub mod reader;
pub mod writer;

// Re-export main types
pub use config::{CsvConfig, NullRepresentation, RecordTerminator};
pub use errors::{CsvError, CsvResult, RowLengthMismatchKind};
pub use reader::CsvReader;
pub use writer::CsvWriter;

pub type Result<T> = CsvResult<T>;
