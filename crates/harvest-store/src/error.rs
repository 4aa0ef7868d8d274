//! # Store Error Types
//!
//! Error types for backend operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  HTTP / backend rejection (reqwest, status codes)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Names the step that failed                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RegisterError → ApiError (in the register) ← Serialized for the UI    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator sees "payment step failed: ..." and retries                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The backend operation an error came from.
///
/// Checkout failures must tell the operator whether the order, its items or
/// the payment was rejected, so every error carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistStep {
    /// Order creation.
    Order,
    /// Line-item batch for an order.
    OrderItems,
    /// Payment creation.
    Payment,
    /// Compensating order delete.
    DeleteOrder,
    /// Menu reads and writes.
    Menu,
    /// Recent orders list.
    Orders,
    /// Sales aggregation.
    Summary,
}

impl PersistStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PersistStep::Order => "order",
            PersistStep::OrderItems => "order_items",
            PersistStep::Payment => "payment",
            PersistStep::DeleteOrder => "delete_order",
            PersistStep::Menu => "menu",
            PersistStep::Orders => "orders",
            PersistStep::Summary => "summary",
        }
    }
}

impl fmt::Display for PersistStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend rejected or failed a create/read/update/delete.
    ///
    /// ## When This Occurs
    /// - Non-2xx response from the hosted backend
    /// - Transport failure (DNS, TLS, connection reset)
    /// - Response body not in the expected shape
    #[error("{step} step failed: {message}")]
    Persistence { step: PersistStep, message: String },

    /// No backend is configured, or its configuration is unusable.
    ///
    /// Reads degrade to local data; writes are rejected with this error.
    #[error("Backend not configured: {0}")]
    Configuration(String),

    /// A call did not complete within the configured bound.
    #[error("{step} step timed out after {after_ms} ms")]
    Timeout { step: PersistStep, after_ms: u64 },
}

impl StoreError {
    /// Creates a Persistence error for the given step.
    pub fn persistence(step: PersistStep, message: impl Into<String>) -> Self {
        StoreError::Persistence {
            step,
            message: message.into(),
        }
    }

    /// The step that failed, when the error is tied to one.
    pub fn step(&self) -> Option<PersistStep> {
        match self {
            StoreError::Persistence { step, .. } | StoreError::Timeout { step, .. } => Some(*step),
            StoreError::Configuration(_) => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, StoreError::Configuration(_))
    }
}

/// Result type for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;
