//! # Register Errors
//!
//! [`RegisterError`] is what commands return; [`ApiError`] is its
//! serialisable form for the browser front-end.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Command                                                                │
//! │  Result<T, RegisterError>                                              │
//! │         │                                                               │
//! │         ├── ValidationError ──► VALIDATION_ERROR     (inline message)  │
//! │         ├── StoreError::Persistence ──► PERSISTENCE_ERROR + step       │
//! │         ├── StoreError::Configuration ──► CONFIGURATION_ERROR (banner) │
//! │         ├── StoreError::Timeout ──► TIMEOUT + step                     │
//! │         └── Busy ──► BUSY (pay button stays disabled)                  │
//! │                                                                         │
//! │  try { await checkout() } catch (e) {                                   │
//! │    // e.code = "PERSISTENCE_ERROR", e.step = "payment"                  │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use harvest_core::{CoreError, ValidationError};
use harvest_store::{PersistStep, StoreError};

/// Errors returned by register commands.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A checkout is in flight for this ticket.
    #[error("A checkout is already in progress for this ticket")]
    Busy,

    /// The checkout task panicked or was cancelled by the runtime.
    #[error("Checkout task failed: {0}")]
    Internal(String),
}

impl RegisterError {
    /// The backend step that failed, if this is a backend error.
    pub fn failed_step(&self) -> Option<PersistStep> {
        match self {
            RegisterError::Store(e) => e.step(),
            _ => None,
        }
    }
}

/// Result type for register commands.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// Error shape the front-end receives.
///
/// ```json
/// {
///   "code": "PERSISTENCE_ERROR",
///   "message": "payment step failed: HTTP 500: ...",
///   "step": "payment"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Which backend step failed, for persistence and timeout errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<PersistStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad operator input or empty ticket; no backend call was made
    ValidationError,

    /// Ticket line does not exist
    NotFound,

    /// Backend rejected a write or read
    PersistenceError,

    /// Backend not configured; shown as a persistent banner
    ConfigurationError,

    /// Backend call exceeded its time bound
    Timeout,

    /// Checkout already in flight
    Busy,

    /// Unexpected failure
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            step: None,
        }
    }

    fn with_step(mut self, step: PersistStep) -> Self {
        self.step = Some(step);
        self
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Persistence { step, message } => {
                tracing::error!(step = %step, "Backend step failed: {}", message);
                ApiError::new(ErrorCode::PersistenceError, err.to_string()).with_step(*step)
            }
            StoreError::Configuration(_) => {
                ApiError::new(ErrorCode::ConfigurationError, err.to_string())
            }
            StoreError::Timeout { step, .. } => {
                tracing::error!(step = %step, "Backend step timed out");
                ApiError::new(ErrorCode::Timeout, err.to_string()).with_step(*step)
            }
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
            RegisterError::Core(CoreError::Validation(e)) => {
                ApiError::new(ErrorCode::ValidationError, e.to_string())
            }
            RegisterError::Core(e @ CoreError::LineNotFound(_)) => {
                ApiError::new(ErrorCode::NotFound, e.to_string())
            }
            RegisterError::Store(e) => ApiError::from(e),
            RegisterError::Busy => ApiError::new(ErrorCode::Busy, RegisterError::Busy.to_string()),
            RegisterError::Internal(e) => {
                tracing::error!("Internal register error: {}", e);
                ApiError::new(ErrorCode::Internal, "Checkout could not be completed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_carries_step() {
        let err: ApiError =
            RegisterError::from(StoreError::persistence(PersistStep::Payment, "HTTP 500")).into();
        assert_eq!(err.code, ErrorCode::PersistenceError);
        assert_eq!(err.step, Some(PersistStep::Payment));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PERSISTENCE_ERROR");
        assert_eq!(json["step"], "payment");
    }

    #[test]
    fn test_validation_and_busy_codes() {
        let err: ApiError = RegisterError::from(ValidationError::EmptyTicket).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(serde_json::to_value(&err).unwrap().get("step").is_none());

        let err: ApiError = RegisterError::Busy.into();
        assert_eq!(err.code, ErrorCode::Busy);
    }

    #[test]
    fn test_configuration_and_timeout_codes() {
        let err: ApiError = StoreError::Configuration("not set".into()).into();
        assert_eq!(err.code, ErrorCode::ConfigurationError);

        let err: ApiError = StoreError::Timeout {
            step: PersistStep::Order,
            after_ms: 10,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.step, Some(PersistStep::Order));
    }

    #[test]
    fn test_missing_line_is_not_found() {
        let err: ApiError = RegisterError::from(CoreError::LineNotFound("latte".into())).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
