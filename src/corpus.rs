//! Title and abstract text per reference, for text mining.

use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::utils::create_new_file;
use crate::{Dataset, Result};

/// Placeholder substituted for a missing abstract.
pub const MISSING_ABSTRACT: &str = "-";

/// One `title + " " + abstract` line per dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
    missing_abstracts: usize,
}

impl Corpus {
    /// Builds the corpus in dataset row order.
    ///
    /// A missing abstract is replaced by `-` and counted; a missing title is
    /// written as an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use refscores::corpus::Corpus;
    /// use refscores::{Dataset, FieldRole, Record};
    ///
    /// let record = Record { title: Some("Foo".into()), ..Default::default() };
    /// let corpus = Corpus::build(&Dataset::new(vec![record], FieldRole::Year));
    /// assert_eq!(corpus.lines(), &["Foo -".to_string()]);
    /// assert_eq!(corpus.missing_abstracts(), 1);
    /// ```
    pub fn build(dataset: &Dataset) -> Self {
        let mut missing_abstracts = 0;
        let lines = dataset
            .records()
            .iter()
            .map(|record| {
                let abstract_text = record.abstract_text.as_deref().unwrap_or_else(|| {
                    missing_abstracts += 1;
                    MISSING_ABSTRACT
                });
                format!(
                    "{} {}",
                    record.title.as_deref().unwrap_or_default(),
                    abstract_text
                )
            })
            .collect();

        if missing_abstracts > 0 {
            warn!(missing_abstracts, rows = dataset.len(), "references without abstract");
        }
        Self {
            lines,
            missing_abstracts,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of rows whose abstract was missing.
    pub fn missing_abstracts(&self) -> usize {
        self.missing_abstracts
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Writes one line per row, no header.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Necessary)
            .has_headers(false)
            .from_writer(writer);
        for line in &self.lines {
            writer.write_record([line])?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the corpus to a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConvertError::OutputAlreadyExists`] if `path` exists.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let file = create_new_file(path)?;
        self.write_to(file)?;
        info!(path = %path.display(), "wrote corpus file");
        Ok(())
    }
}
