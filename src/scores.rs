//! One-hot scores matrix over the scoring field.
//!
//! Every distinct value of the scoring field becomes one indicator column.
//! Values are lowercased, missing values become `N/A`, and the characters
//! `[`, `]`, `<`, `>` and `_` are stripped before values are compared, so
//! each row sets exactly one column. Columns are sorted lexicographically and
//! written as `score<value>` headers.
//!
//! # Example
//!
//! ```
//! use refscores::scores::ScoresMatrix;
//! use refscores::{Dataset, FieldRole, Record};
//!
//! let records = vec![
//!     Record { source: Some("Nature".into()), ..Default::default() },
//!     Record { source: Some("NATURE".into()), ..Default::default() },
//!     Record::default(),
//! ];
//! let scores = ScoresMatrix::build(&Dataset::new(records, FieldRole::Source)).unwrap();
//!
//! assert_eq!(scores.header(), vec!["score<n/a>", "score<nature>"]);
//! assert_eq!(scores.row(2).collect::<Vec<_>>(), vec![1, 0]);
//! ```

use csv::WriterBuilder;
use itertools::Itertools;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::bucket::MISSING_LABEL;
use crate::schema::FieldRole;
use crate::utils::{create_new_file, sanitize_header};
use crate::{ConvertError, Dataset, Result};

/// Binary indicator matrix with one column per distinct scoring value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoresMatrix {
    /// Sanitized, lowercased category names in sorted order
    columns: Vec<String>,
    /// Index into `columns` of the active category, per dataset row
    active: Vec<usize>,
}

impl ScoresMatrix {
    /// Builds the matrix over the dataset's scoring field.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::EmptyDataset`] if the dataset has no rows.
    pub fn build(dataset: &Dataset) -> Result<Self> {
        Self::build_field(dataset, dataset.scoring())
    }

    /// Builds the matrix over an arbitrary field of the dataset.
    pub fn build_field(dataset: &Dataset, field: FieldRole) -> Result<Self> {
        if dataset.is_empty() {
            return Err(ConvertError::EmptyDataset);
        }

        let categories: Vec<String> = dataset
            .records()
            .iter()
            .map(|record| normalize(record.get(field)))
            .collect();

        let columns: Vec<String> = categories.iter().cloned().sorted().dedup().collect();
        let active: Vec<usize> = categories
            .iter()
            .map(|category| columns.partition_point(|c| c < category))
            .collect();

        info!(
            %field,
            columns = columns.len(),
            rows = active.len(),
            "built scores matrix"
        );
        Ok(Self { columns, active })
    }

    /// Category names in output order, without the `score<...>` wrapping.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Header row: each category wrapped as `score<name>`.
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|name| format!("score<{name}>"))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.active.len()
    }

    /// Indicator values of one row, in column order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: usize) -> impl Iterator<Item = u8> + '_ {
        let active = self.active[index];
        (0..self.columns.len()).map(move |col| u8::from(col == active))
    }

    /// Writes the matrix as tab-separated text with a header row.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        writer.write_record(self.header())?;
        for index in 0..self.row_count() {
            writer.write_record(self.row(index).map(|v| v.to_string()))?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the matrix to a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::OutputAlreadyExists`] if `path` exists; the
    /// existing file is left untouched.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let file = create_new_file(path)?;
        self.write_to(file)?;
        info!(path = %path.display(), "wrote scores file");
        Ok(())
    }
}

fn normalize(value: Option<&str>) -> String {
    sanitize_header(&value.unwrap_or(MISSING_LABEL).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn dataset(values: &[Option<&str>]) -> Dataset {
        let records = values
            .iter()
            .map(|v| Record {
                publisher: v.map(String::from),
                ..Default::default()
            })
            .collect();
        Dataset::new(records, FieldRole::Publisher)
    }

    #[test]
    fn test_case_folding_collapses_columns() {
        let scores = ScoresMatrix::build(&dataset(&[Some("USA"), Some("usa"), Some("Uk")])).unwrap();
        assert_eq!(scores.columns(), &["uk".to_string(), "usa".to_string()]);
        assert_eq!(scores.row(0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(scores.row(1).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(scores.row(2).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_one_hot_per_row() {
        let scores = ScoresMatrix::build(&dataset(&[
            Some("Elsevier"),
            None,
            Some("Wiley"),
            Some("elsevier"),
            Some("IEEE_<press>"),
        ]))
        .unwrap();
        assert_eq!(scores.row_count(), 5);
        for index in 0..scores.row_count() {
            assert_eq!(scores.row(index).map(u32::from).sum::<u32>(), 1);
        }
    }

    #[test]
    fn test_header_sanitization() {
        let scores = ScoresMatrix::build(&dataset(&[Some("a_b<c>d[e]")])).unwrap();
        assert_eq!(scores.header(), vec!["score<abcde>"]);
    }

    #[test]
    fn test_columns_sorted_after_sanitization() {
        let scores = ScoresMatrix::build(&dataset(&[Some("_zeta"), Some("beta"), Some("[alpha]")])).unwrap();
        assert_eq!(
            scores.header(),
            vec!["score<alpha>", "score<beta>", "score<zeta>"]
        );
    }

    #[test]
    fn test_missing_values_are_na() {
        let scores = ScoresMatrix::build(&dataset(&[None, Some("ACM")])).unwrap();
        assert_eq!(scores.header(), vec!["score<acm>", "score<n/a>"]);
    }

    #[test]
    fn test_empty_dataset() {
        let result = ScoresMatrix::build(&dataset(&[]));
        assert!(matches!(result, Err(ConvertError::EmptyDataset)));
    }

    #[test]
    fn test_write_to_tsv() {
        let scores = ScoresMatrix::build(&dataset(&[Some("b"), Some("a")])).unwrap();
        let mut out = Vec::new();
        scores.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "score<a>\tscore<b>\n0\t1\n1\t0\n"
        );
    }

    #[test]
    fn test_write_twice_fails_and_keeps_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review_source_scores.txt");

        let first = ScoresMatrix::build(&dataset(&[Some("a")])).unwrap();
        first.write_tsv(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();

        let second = ScoresMatrix::build(&dataset(&[Some("b"), Some("c")])).unwrap();
        let result = second.write_tsv(&path);
        assert!(matches!(result, Err(ConvertError::OutputAlreadyExists(p)) if p == path));
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }
}
