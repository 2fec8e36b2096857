//! CSV reader producing frames

use crate::config::CsvConfig;
use crate::{CsvError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tabula_frame::{Column, Frame, Value};
use tabula_schema::{ColumnType, Schema};
use tracing::{debug, trace};

/// Reader for CSV files
///
/// Columns declared by the schema passed to [`CsvReader::read`] are parsed as
/// their declared type. A cell that does not parse is kept as a string so
/// validation reports it as a wrong-type failure instead of the read failing.
/// Undeclared columns get the narrowest type every cell parses as, trying
/// integer, float, boolean and finally string.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvConfig,
}

impl CsvReader {
    /// Create a new CSV reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Read a CSV file into a frame
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be opened, otherwise the
    /// same errors as [`CsvReader::read`].
    pub fn read_path(&self, path: &Path, schema: Option<&Schema>) -> Result<Frame> {
        debug!(path = %path.display(), "Reading CSV file");
        let file = File::open(path)?;
        self.read(file, schema)
    }

    /// Read CSV data into a frame
    ///
    /// Without a header row, columns are named after the schema's declared
    /// columns in order, then `column_N` for any beyond them.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed CSV, rows whose width differs from the
    /// header, or duplicate header names.
    pub fn read<R: Read>(&self, reader: R, schema: Option<&Schema>) -> Result<Frame> {
        self.config.validate()?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter_u8())
            .quote(self.config.quote_char_u8())
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut headers: Option<Vec<String>> = if self.config.has_header {
            Some(csv_reader.headers()?.iter().map(str::to_string).collect())
        } else {
            None
        };

        let mut cells: Vec<Vec<String>> = Vec::new();
        let mut height = 0;

        for result in csv_reader.records() {
            let record = result?;
            let line = record
                .position()
                .and_then(|p| usize::try_from(p.line()).ok())
                .unwrap_or(0);

            let names = headers.get_or_insert_with(|| generated_names(record.len(), schema));
            if record.len() != names.len() {
                return Err(CsvError::row_length_mismatch(line, names.len(), record.len()));
            }
            if cells.is_empty() {
                cells = vec![Vec::new(); names.len()];
            }

            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
            height += 1;
            trace!(line, "Read CSV row");
        }

        let headers = headers.unwrap_or_default();
        if cells.is_empty() {
            cells = vec![Vec::new(); headers.len()];
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| {
                let declared = schema
                    .and_then(|s| s.column(&name))
                    .map(|def| def.column_type);
                let values = self.convert(&raw, declared);
                Column { name, values }
            })
            .collect();

        let frame = Frame::with_height(columns, height)?;
        debug!(rows = frame.height(), columns = frame.width(), "Finished reading CSV");
        Ok(frame)
    }

    fn convert(&self, raw: &[String], declared: Option<ColumnType>) -> Vec<Value> {
        let column_type = declared.unwrap_or_else(|| self.infer_type(raw));
        raw.iter()
            .map(|cell| {
                if self.config.is_null(cell) {
                    Value::Null
                } else {
                    parse_as(column_type, cell)
                }
            })
            .collect()
    }

    /// Narrowest type every non-null cell parses as
    fn infer_type(&self, raw: &[String]) -> ColumnType {
        let present: Vec<&str> = raw
            .iter()
            .map(String::as_str)
            .filter(|cell| !self.config.is_null(cell))
            .collect();
        if present.is_empty() {
            return ColumnType::String;
        }

        [ColumnType::Integer, ColumnType::Float, ColumnType::Boolean]
            .into_iter()
            .find(|ty| {
                present
                    .iter()
                    .all(|cell| !matches!(parse_as(*ty, cell), Value::String(_)))
            })
            .unwrap_or(ColumnType::String)
    }
}

fn generated_names(width: usize, schema: Option<&Schema>) -> Vec<String> {
    let declared = schema.map(Schema::columns_of).unwrap_or_default();
    (0..width)
        .map(|i| {
            declared
                .get(i)
                .map_or_else(|| format!("column_{}", i + 1), |name| (*name).to_string())
        })
        .collect()
}

/// Parse a raw cell as the given type, falling back to the raw string
pub(crate) fn parse_as(column_type: ColumnType, cell: &str) -> Value {
    let text = cell.trim();
    let parsed = match column_type {
        ColumnType::Integer => text.parse::<i64>().ok().map(Value::Integer),
        ColumnType::Float => text.parse::<f64>().ok().map(Value::Float),
        ColumnType::Boolean => parse_bool(text).map(Value::Boolean),
        ColumnType::String => None,
    };
    parsed.unwrap_or_else(|| Value::String(cell.to_string()))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
