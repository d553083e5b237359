//! Error types for mcat-ras.

use thiserror::Error;

/// Result type alias using RasError.
pub type RasResult<T> = Result<T, RasError>;

/// Primary error type for model extraction.
#[derive(Debug, Error)]
pub enum RasError {
    // === Object Store Errors ===
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    // === Format Errors ===
    #[error("Malformed {path} (line {line}): {message}")]
    Format {
        path: String,
        line: usize,
        message: String,
    },

    // === Validation Errors ===
    #[error("{0} is not a valid RAS prj file")]
    NotAModel(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Multiple projection files identified, cannot determine coordinate reference system: {}", .0.join(", "))]
    MultipleProjections(Vec<String>),

    #[error("Model units '{model_units}' are inconsistent with projection units '{crs_units}'")]
    UnitMismatch {
        model_units: String,
        crs_units: String,
    },

    // === Unimplemented ===
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    // === Geometry Errors ===
    #[error("Projection error: {0}")]
    ProjectionError(String),

    #[error("Geometry error: {0}")]
    GeometryError(String),

    // === Infrastructure Errors ===
    #[error("Worker task failed: {0}")]
    TaskFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification of a [`RasError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Object store lookup or transport failure.
    Io,
    /// Unexpected file structure.
    Format,
    /// The inputs parse but do not describe a usable model.
    Validation,
    /// A recognized input this crate does not extract yet.
    Unimplemented,
    Internal,
}

impl RasError {
    /// Build a format error for a specific line of a file.
    pub fn format(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        RasError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Get the taxonomy bucket for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RasError::NotFound(_) | RasError::StorageError(_) => ErrorCategory::Io,
            RasError::Format { .. } => ErrorCategory::Format,
            RasError::NotAModel(_)
            | RasError::InvalidProjection(_)
            | RasError::MultipleProjections(_)
            | RasError::UnitMismatch { .. } => ErrorCategory::Validation,
            RasError::NotImplemented(_) => ErrorCategory::Unimplemented,
            RasError::ProjectionError(_)
            | RasError::GeometryError(_)
            | RasError::TaskFailed(_)
            | RasError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Get the HTTP status code a caller should report for this error.
    pub fn http_status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Io if matches!(self, RasError::NotFound(_)) => 404,
            ErrorCategory::Unimplemented => 501,
            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for RasError {
    fn from(err: std::io::Error) -> Self {
        RasError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for RasError {
    fn from(err: serde_json::Error) -> Self {
        RasError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message_names_file_and_line() {
        let err = RasError::format("models/a/a.g01", 12, "expected 'Reach XY='");
        assert_eq!(
            err.to_string(),
            "Malformed models/a/a.g01 (line 12): expected 'Reach XY='"
        );
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_categories() {
        assert_eq!(RasError::NotFound("x".into()).category(), ErrorCategory::Io);
        assert_eq!(
            RasError::MultipleProjections(vec!["a.prj".into(), "b.prj".into()]).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            RasError::NotImplemented("q01".into()).category(),
            ErrorCategory::Unimplemented
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(RasError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(RasError::StorageError("x".into()).http_status_code(), 500);
        assert_eq!(RasError::NotAModel("x".into()).http_status_code(), 400);
    }

    #[test]
    fn test_multiple_projections_lists_files() {
        let err = RasError::MultipleProjections(vec!["a.prj".into(), "b.proj".into()]);
        assert!(err.to_string().ends_with("a.prj, b.proj"));
    }
}
