//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation (bad amount, malformed month key, missing field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mutation attempted by a non-admin actor, or with no actor at all.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Operation referenced an unprovisioned lot or unknown record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying persistence/communication failure. Always surfaced,
    /// never swallowed.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Permission(_) => "PERMISSION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the operation could succeed.
    ///
    /// Retries themselves belong to the caller or the store collaborator;
    /// the core never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
