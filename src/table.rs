//! Loading of export files into one unified [`Dataset`].
//!
//! Delimited exports are read with the schema's delimiter, encoding and
//! quoting rules, keeping only the title, abstract and scoring columns.
//! Files with a spreadsheet extension are read from their first worksheet
//! instead, and tagged exports are handed to the [`RisParser`]. Rows from
//! several files are concatenated in the order the files are given.
//!
//! # Example
//!
//! ```
//! use refscores::table::DelimitedParser;
//! use refscores::{FieldRole, RecordParser, SchemaId};
//!
//! let input = "\"Title\",\"Abstract\",\"Year\"\n\"Example Paper\",\"Text\",\"2023\"";
//!
//! let parser = DelimitedParser::new(SchemaId::Scopus.entry(), FieldRole::Year).unwrap();
//! let records = parser.parse(input).unwrap();
//! assert_eq!(records[0].year.as_deref(), Some("2023"));
//! ```

use csv::ReaderBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::encoding::decode;
use crate::schema::{FieldRole, QuotingMode, SchemaEntry};
use crate::sheet::{is_spreadsheet, read_first_sheet};
use crate::{ConvertError, Dataset, Record, RecordParser, Result, RisParser};

/// Configuration for loading a set of export files.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Whether to read and parse files on the rayon thread pool.
    /// Row order follows the file list either way.
    pub run_in_parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            run_in_parallel: cfg!(feature = "parallel"),
        }
    }
}

/// Parser for one decoded delimited export, restricted to three columns.
#[derive(Debug, Clone)]
pub struct DelimitedParser {
    schema: &'static SchemaEntry,
    columns: [(FieldRole, &'static str); 3],
    path: Option<PathBuf>,
}

impl DelimitedParser {
    /// Creates a parser extracting title, abstract and the `scoring` column.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownFieldRole`] if the schema has no column
    /// for `scoring`.
    pub fn new(schema: &'static SchemaEntry, scoring: FieldRole) -> Result<Self> {
        Ok(Self {
            schema,
            columns: requested_columns(schema, scoring)?,
            path: None,
        })
    }

    /// Names the file being parsed, for error messages.
    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    fn column_index(&self, headers: &csv::StringRecord, column: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| ConvertError::ColumnNotFound {
                path: self.path.clone().unwrap_or_default(),
                column: column.to_string(),
            })
    }
}

impl RecordParser for DelimitedParser {
    fn parse(&self, input: &str) -> Result<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.schema.delimiter.unwrap_or(b','))
            .quoting(self.schema.quoting == QuotingMode::All)
            .flexible(true)
            .has_headers(true)
            .from_reader(input.as_bytes());

        let headers = reader.headers()?.clone();
        let positions = self
            .columns
            .iter()
            .map(|(role, column)| Ok((*role, self.column_index(&headers, column)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = Record::default();
            for (role, index) in &positions {
                let value = row.get(*index).filter(|v| !v.is_empty()).map(String::from);
                record.set(*role, value);
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Raw names of the title, abstract and `scoring` columns of `schema`.
fn requested_columns(
    schema: &SchemaEntry,
    scoring: FieldRole,
) -> Result<[(FieldRole, &'static str); 3]> {
    Ok([
        (FieldRole::Title, schema.field(FieldRole::Title)?),
        (FieldRole::Abstract, schema.field(FieldRole::Abstract)?),
        (scoring, schema.field(scoring)?),
    ])
}

/// Loads export files of one schema into a [`Dataset`].
///
/// # Examples
///
/// ```no_run
/// use refscores::{FieldRole, SchemaId, TableLoader};
///
/// let dataset = TableLoader::new()
///     .load(&["savedrecs.txt".into()], SchemaId::Wos.entry(), FieldRole::Source)
///     .unwrap();
/// println!("{} references", dataset.len());
/// ```
#[derive(Debug, Default, Clone)]
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads every file in `files` and concatenates their rows in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read, decoded or that lacks a
    /// requested column; no partial dataset is returned.
    pub fn load(
        &self,
        files: &[PathBuf],
        schema: &'static SchemaEntry,
        scoring: FieldRole,
    ) -> Result<Dataset> {
        schema.field(scoring)?;

        let per_file = self.load_all(files, schema, scoring)?;
        let records: Vec<Record> = per_file.into_iter().flatten().collect();

        info!(
            files = files.len(),
            rows = records.len(),
            schema = %schema.id,
            "loaded dataset"
        );
        Ok(Dataset::new(records, scoring))
    }

    #[cfg(feature = "parallel")]
    fn load_all(
        &self,
        files: &[PathBuf],
        schema: &'static SchemaEntry,
        scoring: FieldRole,
    ) -> Result<Vec<Vec<Record>>> {
        if self.config.run_in_parallel {
            use rayon::prelude::*;

            files
                .par_iter()
                .map(|path| load_file(path, schema, scoring))
                .collect()
        } else {
            files
                .iter()
                .map(|path| load_file(path, schema, scoring))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn load_all(
        &self,
        files: &[PathBuf],
        schema: &'static SchemaEntry,
        scoring: FieldRole,
    ) -> Result<Vec<Vec<Record>>> {
        files
            .iter()
            .map(|path| load_file(path, schema, scoring))
            .collect()
    }
}

fn load_file(path: &Path, schema: &'static SchemaEntry, scoring: FieldRole) -> Result<Vec<Record>> {
    if !schema.is_tagged() && is_spreadsheet(path) {
        let records = read_first_sheet(path, &requested_columns(schema, scoring)?)?;
        debug!(path = %path.display(), rows = records.len(), "read worksheet");
        return Ok(records);
    }

    let bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    let text = decode(&bytes, schema.encoding, path)?;

    let records = if schema.is_tagged() {
        RisParser::new().parse(&text)?
    } else {
        DelimitedParser::new(schema, scoring)?
            .with_path(path)
            .parse(&text)?
    };

    debug!(path = %path.display(), rows = records.len(), "parsed file");
    Ok(records)
}
