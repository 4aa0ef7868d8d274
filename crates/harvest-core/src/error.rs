//! # Error Types
//!
//! Domain-specific error types for harvest-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  harvest-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Operator input / checkout preconditions        │
//! │                                                                         │
//! │  harvest-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence / configuration / timeout          │
//! │                                                                         │
//! │  register errors (app)                                                 │
//! │  ├── RegisterError    - Checkout attempt outcome                       │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → RegisterError → ApiError → inline message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors never cause a backend call. They are recovered locally
//! and shown next to the input that caused them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line referenced by id is not on the ticket.
    #[error("Item {0} is not on the ticket")]
    LineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Checkout was attempted on a ticket with no lines.
    #[error("Ticket is empty: add at least one item before checkout")]
    EmptyTicket,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Input could not be read as a number.
    #[error("{field} must be a number, got '{value}'")]
    NotNumeric { field: String, value: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Input with more fraction digits than can be held exactly.
    #[error("{field} has more than {places} decimal places")]
    TooPrecise { field: String, places: usize },

    /// Value outside the accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value is not one of the accepted options.
    #[error("{field} '{value}' is not recognised")]
    Unrecognised { field: String, value: String },

    /// Cash tendered does not cover the total.
    #[error("Tendered {tendered} is less than total {total}")]
    InsufficientTender { total: String, tendered: String },
}

impl ValidationError {
    /// Creates a NotNumeric error for a field and the raw input.
    pub fn not_numeric(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::NotNumeric {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
