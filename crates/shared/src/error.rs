//! Application-wide error types.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Coarse classification shared by every domain error.
///
/// None of these is fatal: the caller can always fix the input or take a
/// different action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input is malformed or violates an invariant.
    Validation,
    /// The input is fine but the current state forbids the operation.
    State,
    /// An unknown id was referenced.
    NotFound,
    /// A concurrent writer got there first.
    Conflict,
    /// Unexpected failure inside the engine.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code used for errors of this kind.
    #[must_use]
    pub const fn http_status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::State => 422,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Stable machine-readable error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Stable machine-readable error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Business rule violation.
    #[error("Business rule violation: {message}")]
    BusinessRule {
        /// Stable machine-readable error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Conflict (e.g., stale version).
    #[error("Conflict: {message}")]
    Conflict {
        /// Stable machine-readable error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an error from a domain error's classification.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, code: &'static str, message: String) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation { code, message },
            ErrorKind::State => Self::BusinessRule { code, message },
            ErrorKind::NotFound => Self::NotFound { code, message },
            ErrorKind::Conflict => Self::Conflict { code, message },
            ErrorKind::Internal => Self::Internal(message),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::BusinessRule { .. } => ErrorKind::State,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { code, .. }
            | Self::Validation { code, .. }
            | Self::BusinessRule { code, .. }
            | Self::Conflict { code, .. } => code,
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::Validation { message, .. }
            | Self::BusinessRule { message, .. }
            | Self::Conflict { message, .. }
            | Self::Internal(message) => message,
        }
    }
}
