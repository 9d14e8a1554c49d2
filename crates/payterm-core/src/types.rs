//! # Domain Types
//!
//! Value types exchanged between the engine and its callers.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │ CardValidationOutcome│ │    FeeBreakdown     │  │ BatchStatistics│  │
//! │  │  ─────────────────  │  │  ─────────────────  │  │  ────────────  │  │
//! │  │  is_valid           │  │  fixed_fee          │  │  total         │  │
//! │  │  brand (CardBrand)  │  │  percentage_fee     │  │  average       │  │
//! │  │  message            │  │  total_fee          │  │  max / min     │  │
//! │  └─────────────────────┘  │  net_amount         │  │  count         │  │
//! │                           └─────────────────────┘  └────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │  PaymentChannel     │  │       Rate          │  │ Authorization  │  │
//! │  │  ─────────────────  │  │  ─────────────────  │  │    Outcome     │  │
//! │  │  ContactlessTap (0) │  │  bps (u32)          │  │  approved      │  │
//! │  │  ChipEmv        (1) │  │  290 = 2.90%        │  │  risk_score    │  │
//! │  │  MagneticStripe (2) │  └─────────────────────┘  │  message       │  │
//! │  │  ManualEntry    (3) │                           └────────────────┘  │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are created per call and handed to the caller; the engine
//! keeps no reference to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate in basis points (bps).
///
/// 1 basis point = 0.01%, so 290 bps = 2.90%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Payment Channel
// =============================================================================

/// How the card data was captured at the terminal.
///
/// ## Closed Set
/// The wire contract identifies channels by index `0..=3`. Conversion from a
/// raw index goes through `TryFrom<i32>`, so an out-of-range index becomes
/// `CoreError::UnknownChannel` instead of silently picking a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChannel {
    /// NFC tap.
    ContactlessTap,
    /// Chip inserted (EMV).
    ChipEmv,
    /// Magnetic stripe swipe.
    MagneticStripe,
    /// Card number keyed in by the operator.
    ManualEntry,
}

impl PaymentChannel {
    /// Every channel, in wire-index order.
    pub const ALL: [PaymentChannel; 4] = [
        PaymentChannel::ContactlessTap,
        PaymentChannel::ChipEmv,
        PaymentChannel::MagneticStripe,
        PaymentChannel::ManualEntry,
    ];

    /// Returns the wire index of this channel.
    #[inline]
    pub const fn index(&self) -> i32 {
        match self {
            PaymentChannel::ContactlessTap => 0,
            PaymentChannel::ChipEmv => 1,
            PaymentChannel::MagneticStripe => 2,
            PaymentChannel::ManualEntry => 3,
        }
    }

    /// Human-readable label shown on the terminal.
    pub const fn description(&self) -> &'static str {
        match self {
            PaymentChannel::ContactlessTap => "Contactless (NFC)",
            PaymentChannel::ChipEmv => "Chip (EMV)",
            PaymentChannel::MagneticStripe => "Magnetic stripe",
            PaymentChannel::ManualEntry => "Manual entry",
        }
    }
}

impl TryFrom<i32> for PaymentChannel {
    type Error = CoreError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(PaymentChannel::ContactlessTap),
            1 => Ok(PaymentChannel::ChipEmv),
            2 => Ok(PaymentChannel::MagneticStripe),
            3 => Ok(PaymentChannel::ManualEntry),
            other => Err(CoreError::UnknownChannel(other)),
        }
    }
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentChannel::ContactlessTap => write!(f, "contactless_tap"),
            PaymentChannel::ChipEmv => write!(f, "chip_emv"),
            PaymentChannel::MagneticStripe => write!(f, "magnetic_stripe"),
            PaymentChannel::ManualEntry => write!(f, "manual_entry"),
        }
    }
}

impl FromStr for PaymentChannel {
    type Err = CoreError;

    /// Accepts the snake_case name, a short alias, or the wire index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "contactless_tap" | "contactless" | "tap" | "nfc" => Ok(PaymentChannel::ContactlessTap),
            "chip_emv" | "chip" | "emv" => Ok(PaymentChannel::ChipEmv),
            "magnetic_stripe" | "stripe" | "swipe" => Ok(PaymentChannel::MagneticStripe),
            "manual_entry" | "manual" | "keyed" => Ok(PaymentChannel::ManualEntry),
            other => match other.parse::<i32>() {
                Ok(index) => PaymentChannel::try_from(index),
                Err(_) => Err(CoreError::UnrecognizedChannel(s.to_string())),
            },
        }
    }
}

// =============================================================================
// Card Brand
// =============================================================================

/// Card network identified from the number's leading digits (BIN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    /// Brazilian domestic scheme.
    Elo,
    /// Brazilian domestic scheme.
    Hipercard,
    Unknown,
}

impl CardBrand {
    /// The label reported to callers.
    pub const fn label(&self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::Amex => "Amex",
            CardBrand::Elo => "Elo",
            CardBrand::Hipercard => "Hipercard",
            CardBrand::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Card Validation Outcome
// =============================================================================

/// Result of a structural card number check.
///
/// Every input produces one of these; format and length problems are
/// reported here with `is_valid = false`, never as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CardValidationOutcome {
    /// Luhn result, or `false` when the format/length precondition failed.
    pub is_valid: bool,

    /// Brand from the prefix table; reported even when the checksum fails.
    pub brand: CardBrand,

    /// Human-readable, distinct per outcome.
    pub message: String,
}

// =============================================================================
// Fee Breakdown
// =============================================================================

/// Fees charged on a single transaction.
///
/// ## Invariants
/// - `total_fee == fixed_fee + percentage_fee`
/// - `net_amount == gross_amount - total_fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeeBreakdown {
    pub fixed_fee: Money,
    pub percentage_fee: Money,
    pub total_fee: Money,
    pub net_amount: Money,
}

impl FeeBreakdown {
    /// Total fee as a percentage of `gross_amount`.
    ///
    /// Reports `0.0` when `gross_amount <= 0`, where the ratio is undefined.
    pub fn effective_rate_percent(&self, gross_amount: Money) -> f64 {
        if !gross_amount.is_positive() {
            return 0.0;
        }
        self.total_fee.cents() as f64 / gross_amount.cents() as f64 * 100.0
    }
}

// =============================================================================
// Batch Statistics
// =============================================================================

/// Aggregate figures over a batch of transaction amounts.
///
/// Only produced for non-empty batches, so `count >= 1` and
/// `min <= average <= max` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchStatistics {
    pub total: Money,
    /// Mean rounded to the nearest cent.
    pub average: Money,
    pub max: Money,
    pub min: Money,
    pub count: u64,
}

// =============================================================================
// Authorization Outcome
// =============================================================================

/// Decision returned by the (placeholder) authorization step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthorizationOutcome {
    pub approved: bool,

    /// Always within `[0, 1]`.
    pub risk_score: f64,

    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
