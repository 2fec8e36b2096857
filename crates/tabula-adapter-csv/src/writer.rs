//! CSV writer

use crate::config::{CsvConfig, RecordTerminator};
use crate::{CsvError, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tabula_frame::{Frame, Value};
use tracing::{debug, trace, warn};

/// Writer for CSV files
///
/// CSV has no null marker, and the reader cannot see whether a field was
/// quoted. A string cell equal to one of the configured `null_values` (the
/// empty string and `NA` by default) therefore reads back as `Null`. To keep
/// such strings, write nulls with a dedicated
/// [`NullRepresentation`](crate::NullRepresentation) and read with
/// `null_values` set to that token alone.
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    config: CsvConfig,
}

impl CsvWriter {
    /// Create a new CSV writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Write a frame to a file, replacing any existing content
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be created, otherwise the
    /// same errors as [`CsvWriter::write`].
    pub fn write_path(&self, path: &Path, frame: &Frame) -> Result<()> {
        debug!(path = %path.display(), "Writing CSV file");
        let file = File::create(path)?;
        self.write(file, frame)
    }

    /// Write a frame, header first when configured
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Write`] when a record cannot be written.
    pub fn write<W: Write>(&self, writer: W, frame: &Frame) -> Result<()> {
        self.config.validate()?;
        if frame.width() == 0 {
            debug!("Frame has no columns, nothing to write");
            return Ok(());
        }

        let terminator = match self.config.record_terminator {
            RecordTerminator::CRLF => csv::Terminator::CRLF,
            RecordTerminator::LF => csv::Terminator::Any(b'\n'),
        };
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter_u8())
            .quote(self.config.quote_char_u8())
            .terminator(terminator)
            .from_writer(writer);

        if self.config.has_header {
            csv_writer
                .write_record(frame.column_names())
                .map_err(|e| CsvError::write(e.to_string()))?;
        }

        let ambiguous = self.ambiguous_cells(frame);
        if ambiguous > 0 {
            warn!(
                cells = ambiguous,
                "String cells match a null token and will read back as null"
            );
        }

        for index in 0..frame.height() {
            let row: Vec<String> = frame
                .columns()
                .iter()
                .map(|column| self.format_value(&column.values[index]))
                .collect();
            csv_writer
                .write_record(&row)
                .map_err(|e| CsvError::write(e.to_string()))?;
            trace!(?row, "Wrote CSV row");
        }

        csv_writer
            .flush()
            .map_err(|e| CsvError::write(e.to_string()))?;
        debug!(record_count = frame.height(), "Finished writing CSV");
        Ok(())
    }

    /// String cells that a reader with the same config would take for null
    fn ambiguous_cells(&self, frame: &Frame) -> usize {
        frame
            .columns()
            .iter()
            .flat_map(|column| &column.values)
            .filter(|value| value.as_str().is_some_and(|s| self.config.is_null(s)))
            .count()
    }

    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Null => self.config.null_representation.as_str().to_string(),
            // keep a fractional part so the column reads back as float
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
            other => other.to_string(),
        }
    }
}
