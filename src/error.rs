//! Error types for the conversion pipeline.
//!
//! Every failure is fatal for the run: nothing is retried and there is no
//! partial-success mode. Variants are grouped by the stage that raises them.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{FieldRole, SchemaId};

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Represents errors that can occur while converting citation exports.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("citation database not recognised: '{0}' (supported: wos, scopus, proquest, ris)")]
    UnknownSchema(String),

    #[error("scores value not recognised: '{0}' (supported: so, py, pu, ti, ab, ty or their long names)")]
    UnknownScoringField(String),

    #[error("field '{role}' is not available for the {schema} schema")]
    UnknownFieldRole { schema: SchemaId, role: String },

    #[error("could not detect the export format of {path}: {reason}; specify the schema explicitly")]
    FormatDetection { path: PathBuf, reason: String },

    #[error("unrecognised RIS/EndNote content: first line is '{first_line}'")]
    UnrecognizedRisFormat { first_line: String },

    #[error("column '{column}' not found in {path}")]
    ColumnNotFound { path: PathBuf, column: String },

    #[error("failed to decode {path} as {encoding}")]
    FileDecode { path: PathBuf, encoding: &'static str },

    #[error("dataset is empty: no rows to score")]
    EmptyDataset,

    #[error("bucketing only applies to the year field, not '{0}'")]
    InvalidBucketField(FieldRole),

    #[error("bucket interval must be greater than 1, got {0}")]
    InvalidBucketInterval(i64),

    #[error("year {0} is too large to bucket")]
    YearOutOfRange(i64),

    #[error("output file already exists: {0}")]
    OutputAlreadyExists(PathBuf),

    #[error("no input files selected")]
    NoInputFiles,

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ConvertError::UnknownFieldRole {
            schema: SchemaId::Ris,
            role: "publisher".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "field 'publisher' is not available for the ris schema"
        );
        assert_eq!(
            ConvertError::InvalidBucketField(FieldRole::Source).to_string(),
            "bucketing only applies to the year field, not 'source'"
        );
    }
}
