//! End-to-end conversion of export files into scores and corpus files.
//!
//! A run detects (or takes) the schema, loads every input file into one
//! dataset, optionally buckets the year column, then builds and writes the
//! scores and corpus files. Any failure aborts the whole run.
//!
//! ## Output files
//!
//! - `{output_dir}/{output_name}_{field}_scores.txt`, where `field` is
//!   `buckets` when year bucketing is active
//! - `{output_dir}/{output_name}_corpus.txt`
//!
//! Both targets are checked before either is written, so a name clash never
//! leaves one half of the output behind.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

use crate::corpus::Corpus;
use crate::detect::detect_schema;
use crate::scores::ScoresMatrix;
use crate::table::{LoaderConfig, TableLoader};
use crate::utils::ensure_absent;
use crate::{ConvertError, FieldRole, Result, SchemaId};

/// Options for one conversion run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Export format; detected from the first input file when `None`
    pub schema: Option<SchemaId>,
    /// Field to one-hot encode
    pub scoring: FieldRole,
    /// Year bucket width; only valid with `scoring = year`
    pub buckets: Option<i64>,
    /// Produce only the scores file
    pub skip_corpus: bool,
    /// Build everything and run every check, but write nothing
    pub dry_run: bool,
    pub output_dir: PathBuf,
    pub output_name: String,
    pub loader: LoaderConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            schema: None,
            scoring: FieldRole::Source,
            buckets: None,
            skip_corpus: false,
            dry_run: false,
            output_dir: PathBuf::from("."),
            output_name: "refscores".to_string(),
            loader: LoaderConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Path of the scores file this configuration produces.
    pub fn scores_path(&self) -> PathBuf {
        let field = if self.buckets.is_some() {
            "buckets"
        } else {
            self.scoring.as_str()
        };
        self.output_dir
            .join(format!("{}_{}_scores.txt", self.output_name, field))
    }

    /// Path of the corpus file this configuration produces.
    pub fn corpus_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_corpus.txt", self.output_name))
    }
}

/// Figures reported after a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub schema: SchemaId,
    /// Number of score columns
    pub columns: usize,
    /// Number of references
    pub rows: usize,
    /// References without abstract; `None` when the corpus was skipped
    pub missing_abstracts: Option<usize>,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (missing, share) = match self.missing_abstracts {
            Some(count) if self.rows > 0 => (
                count.to_string(),
                format!("{:.2}%", count as f64 / self.rows as f64 * 100.0),
            ),
            Some(count) => (count.to_string(), "N/A".to_string()),
            None => ("N/A".to_string(), "N/A".to_string()),
        };
        writeln!(f, "*** SUMMARY ***")?;
        writeln!(f, "Number of scores values: {}", self.columns)?;
        writeln!(f, "Number of references: {}", self.rows)?;
        writeln!(f, "Abstracts not available: {missing} ({share})")?;
        write!(f, "Time elapsed: {:.3?}", self.elapsed)
    }
}

/// Runs conversions with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    #[must_use]
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Converts `files` into the scores and corpus files.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage. Configuration errors surface
    /// before any input is read; existing outputs are detected before
    /// anything is written.
    pub fn run(&self, files: &[PathBuf]) -> Result<RunSummary> {
        let start = Instant::now();
        let config = &self.config;

        let first = files.first().ok_or(ConvertError::NoInputFiles)?;
        let schema = match config.schema {
            Some(schema) => schema,
            None => detect_schema(first)?,
        };
        let entry = schema.entry();
        entry.field(config.scoring)?;
        if config.buckets.is_some() && config.scoring != FieldRole::Year {
            return Err(ConvertError::InvalidBucketField(config.scoring));
        }

        let scores_path = config.scores_path();
        let corpus_path = config.corpus_path();
        self.prepare_outputs(&scores_path, &corpus_path)?;

        info!(%schema, files = files.len(), scoring = %config.scoring, "starting conversion");
        let mut dataset = TableLoader::new()
            .with_config(config.loader)
            .load(files, entry, config.scoring)?;

        // Corpus text does not depend on the scoring column, so it can be built first.
        let corpus = (!config.skip_corpus).then(|| Corpus::build(&dataset));

        if let Some(interval) = config.buckets {
            dataset.bucketize_years(interval)?;
            info!(interval, "bucketed publication years");
        }
        let scores = ScoresMatrix::build(&dataset)?;

        if !config.dry_run {
            scores.write_tsv(&scores_path)?;
            if let Some(corpus) = &corpus {
                corpus.write_tsv(&corpus_path)?;
            }
        }

        let summary = RunSummary {
            schema,
            columns: scores.column_count(),
            rows: scores.row_count(),
            missing_abstracts: corpus.as_ref().map(Corpus::missing_abstracts),
            elapsed: start.elapsed(),
        };
        info!(
            columns = summary.columns,
            rows = summary.rows,
            dry_run = config.dry_run,
            "conversion finished"
        );
        Ok(summary)
    }

    /// Creates the output directory and checks that no target exists yet.
    fn prepare_outputs(&self, scores_path: &Path, corpus_path: &Path) -> Result<()> {
        let dir = &self.config.output_dir;
        if !self.config.dry_run && !dir.exists() {
            info!(path = %dir.display(), "creating output directory");
            fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))?;
        }
        ensure_absent(scores_path)?;
        if !self.config.skip_corpus {
            ensure_absent(corpus_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const RIS: &str = "TY  - JOUR\nTI  - Foo\nAB  - Bar\nT2  - Nature\nPY  - 1990\n\n\
TY  - JOUR\nTI  - Baz\nT2  - Science\nPY  - 2001\n";

    fn setup() -> (TempDir, PathBuf, ConvertConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("refs.ris");
        fs::write(&input, RIS).unwrap();
        let config = ConvertConfig {
            output_dir: dir.path().join("out"),
            output_name: "review".to_string(),
            ..Default::default()
        };
        (dir, input, config)
    }

    #[test]
    fn test_output_paths() {
        let mut config = ConvertConfig {
            output_dir: PathBuf::from("out"),
            output_name: "review".to_string(),
            scoring: FieldRole::Year,
            ..Default::default()
        };
        assert_eq!(config.scores_path(), PathBuf::from("out/review_year_scores.txt"));
        config.scoring = FieldRole::Source;
        assert_eq!(config.scores_path(), PathBuf::from("out/review_source_scores.txt"));
        config.scoring = FieldRole::Year;
        config.buckets = Some(5);
        assert_eq!(config.scores_path(), PathBuf::from("out/review_buckets_scores.txt"));
        assert_eq!(config.corpus_path(), PathBuf::from("out/review_corpus.txt"));
    }

    #[test]
    fn test_run_writes_both_files() {
        let (_dir, input, config) = setup();
        let converter = Converter::new(config.clone());
        let summary = converter.run(&[input]).unwrap();

        assert_eq!(summary.schema, SchemaId::Ris);
        assert_eq!(summary.columns, 2);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.missing_abstracts, Some(1));
        assert_eq!(
            fs::read_to_string(config.scores_path()).unwrap(),
            "score<nature>\tscore<science>\n1\t0\n0\t1\n"
        );
        assert_eq!(
            fs::read_to_string(config.corpus_path()).unwrap(),
            "Foo Bar\nBaz -\n"
        );
    }

    #[test]
    fn test_run_with_buckets() {
        let (_dir, input, mut config) = setup();
        config.scoring = FieldRole::Year;
        config.buckets = Some(5);
        config.skip_corpus = true;
        let summary = Converter::new(config.clone()).run(&[input]).unwrap();

        assert_eq!(summary.missing_abstracts, None);
        assert_eq!(
            fs::read_to_string(config.scores_path()).unwrap(),
            "score<1990-1995>\tscore<2000-2005>\n1\t0\n0\t1\n"
        );
        assert!(!config.corpus_path().exists());
    }

    #[test]
    fn test_run_refuses_existing_corpus_before_writing_scores() {
        let (_dir, input, config) = setup();
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.corpus_path(), "old").unwrap();

        let result = Converter::new(config.clone()).run(&[input]);
        assert!(matches!(result, Err(ConvertError::OutputAlreadyExists(_))));
        assert!(!config.scores_path().exists());
        assert_eq!(fs::read_to_string(config.corpus_path()).unwrap(), "old");
    }

    #[test]
    fn test_second_run_fails() {
        let (_dir, input, config) = setup();
        let converter = Converter::new(config);
        converter.run(std::slice::from_ref(&input)).unwrap();
        assert!(matches!(
            converter.run(&[input]),
            Err(ConvertError::OutputAlreadyExists(_))
        ));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, input, mut config) = setup();
        config.dry_run = true;
        let summary = Converter::new(config.clone()).run(&[input]).unwrap();
        assert_eq!(summary.rows, 2);
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_bucket_on_non_year_field_fails_before_io() {
        let config = ConvertConfig {
            schema: Some(SchemaId::Scopus),
            buckets: Some(5),
            ..Default::default()
        };
        let result = Converter::new(config).run(&[PathBuf::from("missing.csv")]);
        assert!(matches!(
            result,
            Err(ConvertError::InvalidBucketField(FieldRole::Source))
        ));
    }

    #[test]
    fn test_no_input_files() {
        let result = Converter::default().run(&[]);
        assert!(matches!(result, Err(ConvertError::NoInputFiles)));
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            schema: SchemaId::Wos,
            columns: 3,
            rows: 8,
            missing_abstracts: Some(2),
            elapsed: Duration::from_millis(1500),
        };
        let text = summary.to_string();
        assert!(text.contains("Number of scores values: 3"));
        assert!(text.contains("Number of references: 8"));
        assert!(text.contains("Abstracts not available: 2 (25.00%)"));

        let skipped = RunSummary {
            missing_abstracts: None,
            ..summary
        };
        assert!(skipped.to_string().contains("Abstracts not available: N/A (N/A)"));
    }
}
