//! CSV configuration options

/// Configuration for CSV reading and writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Field delimiter character (default: comma)
    pub delimiter: char,
    /// Quote character for fields containing special characters (default: double quote)
    pub quote_char: char,
    /// Whether the CSV has a header row (default: true)
    pub has_header: bool,
    /// Cell contents read as null (default: empty, `NA`, `NULL`, `null`)
    pub null_values: Vec<String>,
    /// How to represent null values in output (default: empty string)
    pub null_representation: NullRepresentation,
    /// Record terminator for writing (default: LF)
    pub record_terminator: RecordTerminator,
}

/// How to represent null values in CSV output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullRepresentation {
    /// Empty string (default)
    EmptyString,
    /// The string "NULL"
    NullString,
    /// The string "\\N"
    BackslashN,
    /// Custom string representation
    Custom(String),
}

impl NullRepresentation {
    /// Text written for a null cell
    pub fn as_str(&self) -> &str {
        match self {
            NullRepresentation::EmptyString => "",
            NullRepresentation::NullString => "NULL",
            NullRepresentation::BackslashN => "\\N",
            NullRepresentation::Custom(s) => s,
        }
    }
}

/// Record terminator for writing CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTerminator {
    /// CRLF (Windows-style, RFC 4180)
    CRLF,
    /// LF (Unix-style)
    LF,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            has_header: true,
            null_values: ["", "NA", "NULL", "null"]
                .into_iter()
                .map(String::from)
                .collect(),
            null_representation: NullRepresentation::EmptyString,
            record_terminator: RecordTerminator::LF,
        }
    }
}

impl CsvConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter character
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Configure header presence
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Disable header row
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Replace the tokens read as null
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set null representation
    pub fn null_representation(mut self, null_rep: NullRepresentation) -> Self {
        self.null_representation = null_rep;
        self
    }

    /// Set record terminator
    pub fn record_terminator(mut self, terminator: RecordTerminator) -> Self {
        self.record_terminator = terminator;
        self
    }

    /// Check whether a raw cell reads as null
    pub fn is_null(&self, cell: &str) -> bool {
        self.null_values.iter().any(|n| n == cell)
    }

    /// Convert delimiter to u8 for csv crate
    pub fn delimiter_u8(&self) -> u8 {
        self.delimiter as u8
    }

    /// Convert quote char to u8 for csv crate
    pub fn quote_char_u8(&self) -> u8 {
        self.quote_char as u8
    }

    /// Check that delimiter and quote are single-byte characters
    pub fn validate(&self) -> crate::Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(crate::CsvError::config(format!(
                "delimiter must be ASCII, got '{}'",
                self.delimiter
            )));
        }
        if !self.quote_char.is_ascii() {
            return Err(crate::CsvError::config(format!(
                "quote character must be ASCII, got '{}'",
                self.quote_char
            )));
        }
        if self.delimiter == self.quote_char {
            return Err(crate::CsvError::config(
                "delimiter and quote character must differ",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote_char, '"');
        assert!(config.has_header);
        assert_eq!(config.null_representation, NullRepresentation::EmptyString);
        assert_eq!(config.record_terminator, RecordTerminator::LF);
        assert!(config.is_null(""));
        assert!(config.is_null("NA"));
        assert!(!config.is_null("n/a"));
    }

    #[test]
    fn test_config_builder() {
        let config = CsvConfig::new()
            .delimiter(';')
            .quote_char('\'')
            .without_header()
            .null_values(["-"])
            .null_representation(NullRepresentation::NullString)
            .record_terminator(RecordTerminator::CRLF);

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quote_char, '\'');
        assert!(!config.has_header);
        assert!(config.is_null("-"));
        assert!(!config.is_null(""));
        assert_eq!(config.null_representation, NullRepresentation::NullString);
        assert_eq!(config.record_terminator, RecordTerminator::CRLF);
    }

    #[test]
    fn test_null_representation() {
        assert_eq!(NullRepresentation::EmptyString.as_str(), "");
        assert_eq!(NullRepresentation::NullString.as_str(), "NULL");
        assert_eq!(NullRepresentation::BackslashN.as_str(), "\\N");
        assert_eq!(NullRepresentation::Custom("N/A".to_string()).as_str(), "N/A");
    }

    #[test]
    fn test_config_conversions() {
        let config = CsvConfig::new().delimiter('\t').quote_char('\'');
        assert_eq!(config.delimiter_u8(), b'\t');
        assert_eq!(config.quote_char_u8(), b'\'');
    }

    #[test]
    fn test_config_validation() {
        assert!(CsvConfig::new().validate().is_ok());
        assert!(CsvConfig::new().delimiter('§').validate().is_err());
        assert!(CsvConfig::new().delimiter('"').validate().is_err());
    }
}
