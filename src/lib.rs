//! Convert citation database exports into scores and corpus files for bibliometric mapping.
//!
//! `refscores` reads bibliographic exports from Web of Science, Scopus,
//! ProQuest and RIS/EndNote, normalizes them into one [`Dataset`], and
//! produces the two flat text files a term-map visualization tool consumes:
//!
//! - a **scores** file: one binary indicator column per distinct value of a
//!   chosen metadata field (source title, publisher or publication year)
//! - a **corpus** file: `title + " " + abstract` per reference, for text mining
//!
//! # Key Features
//!
//! - **Multiple Export Formats**: a static [`schema`] registry describes the
//!   delimiter, encoding, quoting and column names of each database
//! - **Format Detection**: [`detect::detect_schema`] guesses the schema from a
//!   file name and its leading line
//! - **RIS and EndNote tagged text**: both tag conventions are tokenized by
//!   [`RisParser`]
//! - **Year buckets**: publication years can be coarsened into fixed-width
//!   intervals before scoring
//!
//! # Basic Usage
//!
//! ```rust
//! use refscores::{RecordParser, RisParser};
//! use refscores::scores::ScoresMatrix;
//! use refscores::{Dataset, FieldRole};
//!
//! let input = "TY  - JOUR\nTI  - Example Article\nPY  - 2021\n\nTY  - JOUR\nTI  - Another\nPY  - 2020\n";
//! let records = RisParser::new().parse(input).unwrap();
//! let dataset = Dataset::new(records, FieldRole::Year);
//!
//! let scores = ScoresMatrix::build(&dataset).unwrap();
//! assert_eq!(scores.header(), vec!["score<2020>", "score<2021>"]);
//! ```
//!
//! # Running a Whole Conversion
//!
//! ```rust,no_run
//! use refscores::convert::{ConvertConfig, Converter};
//!
//! let config = ConvertConfig {
//!     output_name: "review".to_string(),
//!     ..Default::default()
//! };
//! let summary = Converter::new(config).run(&["savedrecs.txt".into()]).unwrap();
//! println!("{summary}");
//! ```
//!
//! # Error Handling
//!
//! All operations return the crate [`Result`] type wrapping [`ConvertError`].
//! Every error is fatal for the run; nothing is retried or silently skipped.

use serde::{Deserialize, Serialize};

pub mod bucket;
pub mod convert;
pub mod corpus;
pub mod detect;
pub mod error;
pub mod ris;
pub mod schema;
pub mod scores;
pub mod table;

mod encoding;
mod regex;
mod sheet;
mod utils;

// Reexports
pub use error::{ConvertError, Result};
pub use ris::RisParser;
pub use schema::{FieldRole, SchemaEntry, SchemaId};
pub use table::TableLoader;

/// One bibliographic reference, reduced to the fields the outputs need.
///
/// Fields absent from the export stay `None`; an empty cell in a delimited
/// export is also treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Title of the work
    pub title: Option<String>,
    /// Abstract text
    pub abstract_text: Option<String>,
    /// Source title (journal, book, proceedings)
    pub source: Option<String>,
    /// Publication year, as written in the export
    pub year: Option<String>,
    /// Publisher
    pub publisher: Option<String>,
    /// Document type
    pub kind: Option<String>,
}

impl Record {
    pub fn get(&self, role: FieldRole) -> Option<&str> {
        match role {
            FieldRole::Title => self.title.as_deref(),
            FieldRole::Abstract => self.abstract_text.as_deref(),
            FieldRole::Source => self.source.as_deref(),
            FieldRole::Year => self.year.as_deref(),
            FieldRole::Publisher => self.publisher.as_deref(),
            FieldRole::Type => self.kind.as_deref(),
        }
    }

    /// Overwrites the value stored for `role`.
    pub fn set(&mut self, role: FieldRole, value: Option<String>) {
        let slot = match role {
            FieldRole::Title => &mut self.title,
            FieldRole::Abstract => &mut self.abstract_text,
            FieldRole::Source => &mut self.source,
            FieldRole::Year => &mut self.year,
            FieldRole::Publisher => &mut self.publisher,
            FieldRole::Type => &mut self.kind,
        };
        *slot = value;
    }
}

/// An ordered sequence of records plus the field chosen for scoring.
///
/// Row `i` of the scores output and row `i` of the corpus output both come
/// from `records()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
    scoring: FieldRole,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>, scoring: FieldRole) -> Self {
        Self { records, scoring }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The field that will be one-hot encoded.
    pub fn scoring(&self) -> FieldRole {
        self.scoring
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of the scoring field, in row order.
    pub fn scoring_values(&self) -> impl Iterator<Item = Option<&str>> {
        self.records.iter().map(|r| r.get(self.scoring))
    }

    /// Replaces the year column with interval labels of width `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidBucketField`] if the scoring field is not
    /// the year, or [`ConvertError::InvalidBucketInterval`] if `interval <= 1`.
    pub fn bucketize_years(&mut self, interval: i64) -> Result<()> {
        if self.scoring != FieldRole::Year {
            return Err(ConvertError::InvalidBucketField(self.scoring));
        }
        let years: Vec<Option<i64>> = self
            .records
            .iter()
            .map(|r| r.year.as_deref().and_then(utils::parse_year))
            .collect();
        let labels = bucket::bucketize(&years, interval)?;
        for (record, label) in self.records.iter_mut().zip(labels) {
            record.year = Some(label);
        }
        Ok(())
    }
}

/// Trait for implementing record parsers.
pub trait RecordParser {
    /// Parse a decoded string containing one or more bibliographic records.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError` if the input is malformed
    fn parse(&self, input: &str) -> Result<Vec<Record>>;
}
