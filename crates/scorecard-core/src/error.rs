//! Error taxonomy for scorecard actions.
//!
//! Three user-facing families (validation, storage, import) plus an umbrella
//! [`ScorecardError`] that the session controller converts into a visible
//! message at the action boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// User-fixable problems with candidate or session metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Candidate name is blank after trimming.
    #[error("candidate name is required")]
    EmptyName,

    /// Candidate name exceeds the allowed length.
    #[error("candidate name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    /// Interview date was not provided.
    #[error("interview date is required")]
    MissingDate,

    /// Interview date could not be parsed.
    #[error("invalid interview date: {0}")]
    InvalidDate(String),

    /// Interview date lies after today.
    #[error("interview date {0} cannot be in the future")]
    FutureDate(NaiveDate),

    /// Notes exceed the allowed length.
    #[error("notes must be at most {max} characters (got {len})")]
    NotesTooLong { len: usize, max: usize },
}

/// Failures of the durable key-value medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium is disabled or cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the medium's capacity.
    #[error("storage quota exceeded writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// A stored value could not be decoded.
    #[error("stored data under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with an uploaded document.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("invalid file type '{0}', expected a JSON file")]
    InvalidFileType(String),

    #[error("file too large: {size} bytes (maximum {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("failed to parse JSON: {0}")]
    ParseError(String),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid score structure: {0}")]
    BadScoreStructure(String),

    #[error("document was produced by '{found}', not '{expected}'")]
    WrongApp { found: String, expected: String },

    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
}

/// The broad family an error belongs to, used to pick how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Storage,
    Import,
    Internal,
}

/// Any failure an action can produce.
#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("{}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("score record not found: {0}")]
    RecordNotFound(String),

    #[error("failed to encode export document: {0}")]
    Export(#[source] serde_json::Error),
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationError> for ScorecardError {
    fn from(err: ValidationError) -> Self {
        ScorecardError::Validation(vec![err])
    }
}

impl ScorecardError {
    /// Classify this error into its taxonomy family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScorecardError::Validation(_) | ScorecardError::RecordNotFound(_) => {
                ErrorKind::Validation
            }
            ScorecardError::Storage(_) => ErrorKind::Storage,
            ScorecardError::Import(_) => ErrorKind::Import,
            ScorecardError::Export(_) => ErrorKind::Internal,
        }
    }

    /// Message shown to the user. Internal failures are reduced to a generic text.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "operation failed".to_string(),
            _ => self.to_string(),
        }
    }
}
