// Error types for every stage of the pipeline.
//
// Row-level problems are `ValidationError`s and never abort a load; the
// caller gets them back next to the accepted records. `EmptyResult` is the
// soft "no data" signal of the query layer.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("row {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("row {line}: {field} is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {line}: edition {value:?} is not a whole year")]
    FractionalEdition { line: usize, value: String },

    #[error("row {line}: edition {edition} outside 1900..=9999")]
    EditionOutOfRange { line: usize, edition: i64 },

    #[error("row {line}: percentage {value} outside 0..=100")]
    PercentageOutOfRange { line: usize, value: f64 },
}

impl ValidationError {
    pub fn line(&self) -> usize {
        match self {
            ValidationError::MissingField { line, .. }
            | ValidationError::InvalidNumber { line, .. }
            | ValidationError::FractionalEdition { line, .. }
            | ValidationError::EditionOutOfRange { line, .. }
            | ValidationError::PercentageOutOfRange { line, .. } => *line,
        }
    }
}

/// No records matched the query. Not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptyResult {
    #[error("no results for school {0}")]
    School(String),
    #[error("no results for edition {0}")]
    Edition(i32),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("branding asset not found: {}", .0.display())]
    MissingBranding(PathBuf),

    #[error("unsupported branding asset type: {}", .0.display())]
    UnsupportedBranding(PathBuf),

    #[error("ranking entry for edition {found} in a report for edition {expected}")]
    MixedEditions { expected: i32, found: i32 },

    #[error("layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column {0:?} not found in header")]
    MissingColumn(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("access code not recognised")]
    UnknownCode,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("school {0:?} is not visible to this session")]
    Forbidden(String),

    #[error("school {0:?} not found")]
    UnknownSchool(String),
}

/// Failure of a session-scoped query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Empty(#[from] EmptyResult),
}
