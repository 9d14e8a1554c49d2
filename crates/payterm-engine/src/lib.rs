//! # payterm-engine: Boundary Layer for the Payment Terminal
//!
//! Everything between payterm-core and its callers: configuration, logging,
//! the wire contract and the C ABI consumed by the terminal UI.
//!
//! ## Module Organization
//! ```text
//! payterm_engine/
//! ├── lib.rs       ◄─── You are here (exports)
//! ├── config.rs    ◄─── EngineConfig: defaults → payterm.toml → PAYTERM_* env
//! ├── logging.rs   ◄─── tracing subscriber setup
//! ├── engine.rs    ◄─── Engine + EngineHandle (process slot)
//! ├── dto.rs       ◄─── JSON wire shapes
//! ├── ffi.rs       ◄─── extern "C" surface
//! └── error.rs     ◄─── ApiError / ConfigError
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use payterm_engine::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let fees = engine.calculate_fees(1000.0, 1).unwrap();
//! assert_eq!(fees.total_fee, 29.15);
//!
//! let err = engine.aggregate_batch(&[]).unwrap_err();
//! assert_eq!(err.code.as_str(), "EMPTY_BATCH");
//! ```

pub mod config;
pub mod dto;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod logging;

pub use config::{EngineConfig, RiskPolicy};
pub use engine::{amount_to_money, Engine, EngineHandle};
pub use error::{ApiError, ApiResult, ConfigError, ErrorCode};
pub use logging::init_tracing;
