//! # payterm-core: Pure Calculation Engine for the Payment Terminal
//!
//! Everything the terminal decides, as pure functions: card checks, fees,
//! transaction ids, batch statistics and the authorization step.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        payterm Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Terminal UI (foreign host) / `payterm` CLI         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ C ABI + JSON                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    payterm-engine                               │   │
//! │  │    config, logging, DTOs, engine handle, extern "C" surface     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ payterm-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐    │   │
//! │  │   │ validation │ │   fees   │ │  txn_id  │ │ batch / risk │    │   │
//! │  │   │ Luhn, BIN  │ │ per-chan │ │ atomic   │ │ stats, trait │    │   │
//! │  │   └────────────┘ └──────────┘ └──────────┘ └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Channels, brands and the per-call result records
//! - [`money`] - Money type with integer arithmetic (cents)
//! - [`error`] - Domain error types
//! - [`validation`] - Card number checks and amount guards
//! - [`fees`] - Per-channel fee breakdown
//! - [`txn_id`] - Process-wide transaction id sequence
//! - [`batch`] - End-of-shift statistics
//! - [`risk`] - Pluggable authorization strategies
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: amounts are cents (i64); rates are basis points
//! 2. **No I/O**: apart from the wall clock stamped on transaction ids
//! 3. **Explicit Errors**: bad input is a typed error, never a panic
//! 4. **Sensitive Data**: card numbers are inspected, never stored
//!
//! ## Example Usage
//!
//! ```rust
//! use payterm_core::fees::calculate_fees;
//! use payterm_core::validation::validate_card;
//! use payterm_core::{CardBrand, Money, PaymentChannel};
//!
//! let card = validate_card("4111 1111 1111 1111");
//! assert!(card.is_valid);
//! assert_eq!(card.brand, CardBrand::Visa);
//!
//! let fees = calculate_fees(Money::from_cents(10_000), PaymentChannel::ContactlessTap).unwrap();
//! assert_eq!(fees.total_fee.cents(), 260); // 2.50% + $0.10
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod error;
pub mod fees;
pub mod money;
pub mod risk;
pub mod txn_id;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use risk::{RandomRiskAssessor, RiskAssessor, WeightedRiskAssessor};
pub use txn_id::{next_transaction_id, TransactionId};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest card number accepted after normalization.
pub const MIN_CARD_DIGITS: usize = 13;

/// Longest card number accepted after normalization.
pub const MAX_CARD_DIGITS: usize = 19;
