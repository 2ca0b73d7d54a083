//! Error types for `cum-tracker`

use std::path::PathBuf;

/// Field-level violations caught before a mutation is applied
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A numeric field is NaN or infinite
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Offending field
        field: &'static str,
    },

    /// Activity percentage outside (0, 100]
    #[error("percentage must be greater than 0 and at most 100 (got {0})")]
    PercentageOutOfRange(f64),

    /// Grade outside [0, 10]
    #[error("grade must be between 0 and 10 (got {0})")]
    GradeOutOfRange(f64),

    /// The course's activity percentages would exceed 100
    #[error("activity percentages would add up to {total}%, above 100%")]
    PercentageOverflow {
        /// Sum the change would produce
        total: f64,
    },

    /// Course declared with zero UVs
    #[error("UVs must be greater than 0")]
    NonPositiveUvs,

    /// Attempt number other than 1-4
    #[error("enrollment must be 1, 2, 3 or 4 (got '{0}')")]
    InvalidEnrollment(String),

    /// Year that does not parse as a number
    #[error("year must be a number (got '{0}')")]
    InvalidYear(String),

    /// Two records of the same kind share an id
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Record kind ("course" or "term")
        kind: &'static str,
        /// Repeated id
        id: String,
    },

    /// A violation inside a specific course
    #[error("course '{course}': {source}")]
    InCourse {
        /// Course code
        course: String,
        /// Underlying violation
        #[source]
        source: Box<ValidationError>,
    },
}

/// Failures of the key-value store backing the academic records
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem read or write failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Stored text could not be (de)serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Reasons an import is rejected; existing state is never touched
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The import file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Import file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The text is not JSON
    #[error("the file does not contain valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document lacks the expected top-level shape
    #[error("malformed snapshot: {0}")]
    Malformed(&'static str),

    /// A course or term entry does not match the record layout
    #[error("invalid {kind} record: {source}")]
    Record {
        /// Record kind ("course" or "term")
        kind: &'static str,
        /// Decoding error
        #[source]
        source: serde_json::Error,
    },

    /// Records decoded but broke a collection rule
    #[error("imported data failed validation: {0}")]
    Invalid(#[from] ValidationError),
}

/// Failures writing an export snapshot
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The export file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// Export file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
