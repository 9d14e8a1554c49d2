//! # Boundary Error Types
//!
//! What a caller of the engine sees when something goes wrong.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in payterm                                │
//! │                                                                         │
//! │  Host (C ABI / CLI)              Rust engine                            │
//! │  ──────────────────              ───────────                            │
//! │                                                                         │
//! │  payterm_aggregate_batch(ptr, 0)                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Engine::aggregate_batch                                         │  │
//! │  │  Result<BatchSummaryDto, ApiError>                               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  CoreError::EmptyBatch ──────────────► ApiError(EMPTY_BATCH) ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────► BatchSummaryDto ───────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  {"error":"empty batch","code":"EMPTY_BATCH"}                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use payterm_core::CoreError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// API Error
// =============================================================================

/// Error returned across the engine boundary.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Unknown payment channel index: 7",
///   "code": "UNKNOWN_CHANNEL"
/// }
/// ```
/// `error` is always present so hosts can test for it without knowing codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Human-readable error message for display
    #[serde(rename = "error")]
    pub message: String,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,
}

/// Error codes for boundary responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Amount or tip failed a domain rule
    ValidationError,

    /// Channel index or name outside the closed set
    UnknownChannel,

    /// Aggregation over zero amounts
    EmptyBatch,

    /// Engine used before `payterm_init` / `EngineHandle::init`
    UninitializedEngine,

    /// Malformed boundary input (null pointer, bad UTF-8, NaN, ...)
    InvalidInput,

    /// Configuration could not be loaded or is inconsistent
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// The wire spelling of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UnknownChannel => "UNKNOWN_CHANNEL",
            ErrorCode::EmptyBatch => "EMPTY_BATCH",
            ErrorCode::UninitializedEngine => "UNINITIALIZED_ENGINE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code,
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates the error returned before the engine is initialized.
    pub fn uninitialized() -> Self {
        ApiError::new(
            ErrorCode::UninitializedEngine,
            "Engine not initialized; call payterm_init first",
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::UnknownChannel(_) | CoreError::UnrecognizedChannel(_) => {
                ErrorCode::UnknownChannel
            }
            CoreError::EmptyBatch => ErrorCode::EmptyBatch,
            CoreError::AmountOverflow | CoreError::InvalidTransactionId(_) => {
                ErrorCode::InvalidInput
            }
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Convenience alias for boundary results.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// File is not valid TOML for the expected shape.
    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    /// Terminal id is empty.
    #[error("Terminal ID not configured")]
    MissingTerminalId,

    /// A value is outside its allowed range.
    #[error("Invalid engine configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use payterm_core::ValidationError;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (CoreError::UnknownChannel(9), ErrorCode::UnknownChannel),
            (CoreError::UnrecognizedChannel("wave".into()), ErrorCode::UnknownChannel),
            (CoreError::EmptyBatch, ErrorCode::EmptyBatch),
            (CoreError::AmountOverflow, ErrorCode::InvalidInput),
            (
                CoreError::Validation(ValidationError::MustBePositive {
                    field: "payment amount".into(),
                }),
                ErrorCode::ValidationError,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(ApiError::from(core).code, code);
        }
    }

    #[test]
    fn test_empty_batch_wire_shape() {
        let err = ApiError::from(CoreError::EmptyBatch);
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"error":"empty batch","code":"EMPTY_BATCH"}"#);
    }

    #[test]
    fn test_code_spelling_matches_serde() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::UnknownChannel,
            ErrorCode::EmptyBatch,
            ErrorCode::UninitializedEngine,
            ErrorCode::InvalidInput,
            ErrorCode::ConfigError,
            ErrorCode::Internal,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_display() {
        let err = ApiError::uninitialized();
        assert!(err.to_string().starts_with("[UNINITIALIZED_ENGINE]"));
    }
}
