//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy surfaced at the engine boundary.
///
/// Per-module errors in `saral-core` carry the precise context; they are
/// mapped into this taxonomy before crossing the crate boundary so the
/// external API layer can render a status code without knowing domain
/// internals.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input (negative quantity, empty name, bad dates).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal state-machine move.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Lost update detected on a versioned resource; retryable.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Payment exceeds the outstanding balance without an override.
    #[error("Overpayment rejected: {0}")]
    Overpayment(String),

    /// Document number could not be issued; the creation was aborted.
    #[error("Numbering failure: {0}")]
    Numbering(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence store unreachable or timed out.
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InvalidTransition(_) | Self::Overpayment(_) => 422,
            Self::Numbering(_) | Self::Internal(_) => 500,
            Self::Unavailable(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Conflict(_) => "CONFLICT",
            Self::Overpayment(_) => "OVERPAYMENT",
            Self::Numbering(_) => "NUMBERING_FAILURE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unavailable(_) => "PERSISTENCE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry the whole operation as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Unavailable(_))
    }
}
