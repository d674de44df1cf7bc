//! RIS and EndNote tagged-text tokenizer.
//!
//! Splits a tagged export into records on blank lines and extracts the
//! title, abstract, source, year and type of each. Two tag conventions are
//! recognized from the first non-empty line:
//!
//! - RIS: `TY  - JOUR`, values follow a 6-character prefix such as `TI  - `
//! - EndNote tagged: `%0 Journal Article`, values follow a 3-character prefix such as `%T `
//!
//! # Example
//!
//! ```
//! use refscores::{RecordParser, RisParser};
//!
//! let input = "TY  - JOUR\nTI  - Example Title\nT2  - Example Journal\nER  - \n";
//!
//! let records = RisParser::new().parse(input).unwrap();
//! assert_eq!(records[0].title.as_deref(), Some("Example Title"));
//! assert_eq!(records[0].source.as_deref(), Some("Example Journal"));
//! ```

mod parse;
mod structure;
mod tags;

pub use tags::{EndNoteTag, RisTag, TagConvention};

use crate::{Record, RecordParser, Result};
use parse::ris_parse;

/// Parser for RIS and EndNote tagged citations.
#[derive(Debug, Clone, Default)]
pub struct RisParser;

impl RisParser {
    /// Creates a new RIS parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use refscores::RisParser;
    /// let parser = RisParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordParser for RisParser {
    /// Parses a string containing one or more tagged records.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::UnrecognizedRisFormat` if the first non-empty
    /// line starts with neither `TY  -` nor `%0`.
    fn parse(&self, input: &str) -> Result<Vec<Record>> {
        let raw_records = ris_parse(input)?;
        Ok(raw_records.into_iter().map(Record::from).collect())
    }
}
