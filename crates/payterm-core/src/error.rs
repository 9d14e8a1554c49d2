//! # Error Types
//!
//! Domain-specific error types for payterm-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  payterm-core errors (this file)                                       │
//! │  ├── CoreError        - Calculation / domain errors                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  payterm-engine errors (separate crate)                                │
//! │  ├── ConfigError      - Config file / environment problems             │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Not An Error: Invalid Card Numbers
//! A malformed or checksum-failing card number is an ordinary answer, carried
//! in `CardValidationOutcome { is_valid: false, .. }`. Nothing here models it.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the calculation routines.
///
/// All of them are local and recoverable by the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Channel index outside the closed `PaymentChannel` set.
    #[error("Unknown payment channel index: {0}")]
    UnknownChannel(i32),

    /// Channel name that matches no alias.
    #[error("Unrecognized payment channel: '{0}'")]
    UnrecognizedChannel(String),

    /// Aggregation was asked to summarise zero amounts.
    ///
    /// ## Why Not Zeros?
    /// A zero-filled result is indistinguishable from a batch of zero-value
    /// sales, so the empty case is surfaced explicitly.
    #[error("empty batch")]
    EmptyBatch,

    /// Batch total does not fit in the money representation.
    #[error("Amount overflow while aggregating batch")]
    AmountOverflow,

    /// Text that does not follow the `TXN-<seconds>-<sequence>` format.
    #[error("Invalid transaction id: '{0}'")]
    InvalidTransactionId(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early checks on amounts before any arithmetic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
