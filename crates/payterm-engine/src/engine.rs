//! # Engine
//!
//! The boundary-facing surface over payterm-core.
//!
//! Takes raw host inputs (`f64` amounts, `i32` channel indices), converts
//! them into core types, runs the calculation and returns wire DTOs.
//!
//! ## Process Slot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EngineHandle                                     │
//! │                                                                         │
//! │   before init:  get() ──► Err(UNINITIALIZED_ENGINE)                     │
//! │                                                                         │
//! │   init(engine)  ──► OnceLock::get_or_init ──► &'static Engine           │
//! │                                                                         │
//! │   after init:   get() ──► Ok(&Engine)   (shared, read-only)             │
//! │   init again:   keeps the first engine, logs a warning                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine itself is immutable; the only shared mutable state behind it
//! is the transaction id counter in the core.

use payterm_core::batch::aggregate;
use payterm_core::fees::calculate_fees;
use payterm_core::risk::authorize;
use payterm_core::txn_id::next_transaction_id;
use payterm_core::validation::{normalize_card_number, validate_card};
use payterm_core::{CoreError, Money, PaymentChannel, RiskAssessor, ValidationError};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::dto::{
    AuthorizationDto, BatchSummaryDto, CardValidationDto, ChannelDto, FeeBreakdownDto,
    TransactionIdDto,
};
use crate::error::{ApiError, ApiResult};

/// Largest magnitude (in cents) an `f64` amount may carry across the
/// boundary while still converting to an exact integer.
const MAX_BOUNDARY_CENTS: f64 = 9_007_199_254_740_992.0; // 2^53

/// How far `value * 100` may sit from a whole cent and still count as one.
const SUB_CENT_TOLERANCE: f64 = 1e-6;

/// Process-wide engine slot used by the C ABI.
static GLOBAL_ENGINE: EngineHandle = EngineHandle::new();

/// Converts a host-supplied amount in major units to `Money`.
///
/// The value must already be a whole number of cents. NaN, infinities,
/// magnitudes beyond exact float integer range and sub-cent precision are
/// `INVALID_INPUT`; nothing is rounded away.
pub fn amount_to_money(field: &str, value: f64) -> ApiResult<Money> {
    if !value.is_finite() {
        return Err(ApiError::invalid_input(format!(
            "{} must be a finite number",
            field
        )));
    }

    let scaled = value * 100.0;
    let cents = scaled.round();
    if cents.abs() > MAX_BOUNDARY_CENTS {
        return Err(ApiError::invalid_input(format!("{} is out of range", field)));
    }

    // Decimal inputs like 75.30 land a few ulps off the integer.
    let tolerance = SUB_CENT_TOLERANCE.max(scaled.abs() * f64::EPSILON * 4.0);
    if (scaled - cents).abs() > tolerance {
        return Err(ApiError::invalid_input(format!(
            "{} has sub-cent precision: {}",
            field, value
        )));
    }

    Ok(Money::from_cents(cents as i64))
}

/// Rejects a negative raw amount before it is converted.
fn ensure_not_negative(field: &str, value: f64) -> ApiResult<()> {
    if value.is_finite() && value < 0.0 {
        return Err(CoreError::from(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        })
        .into());
    }
    Ok(())
}

/// Rejects a raw amount that is zero or negative before it is converted.
fn ensure_positive(field: &str, value: f64) -> ApiResult<()> {
    if value.is_finite() && value <= 0.0 {
        return Err(CoreError::from(ValidationError::MustBePositive {
            field: field.to_string(),
        })
        .into());
    }
    Ok(())
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    risk: Box<dyn RiskAssessor>,
}

impl Engine {
    /// Creates an engine with the risk strategy the config selects.
    pub fn new(config: EngineConfig) -> Self {
        let risk = config.risk.build_assessor();
        Self::with_assessor(config, risk)
    }

    /// Creates an engine with an explicit risk strategy.
    pub fn with_assessor(config: EngineConfig, risk: Box<dyn RiskAssessor>) -> Self {
        info!(
            terminal = %config.terminal.id,
            name = %config.terminal.name,
            strategy = risk.name(),
            "Engine created"
        );
        Engine { config, risk }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the active risk strategy.
    pub fn risk_strategy(&self) -> &'static str {
        self.risk.name()
    }

    /// Structural card check. Never fails; problems are in the DTO.
    pub fn validate_card(&self, card_number: &str) -> CardValidationDto {
        let outcome = validate_card(card_number);

        // Never log the number itself
        debug!(
            length = normalize_card_number(card_number).len(),
            brand = %outcome.brand,
            valid = outcome.is_valid,
            "validate_card"
        );

        outcome.into()
    }

    /// Fee breakdown for `amount` (major units) on channel index `channel`.
    pub fn calculate_fees(&self, amount: f64, channel: i32) -> ApiResult<FeeBreakdownDto> {
        let channel = PaymentChannel::try_from(channel)?;
        ensure_not_negative("gross amount", amount)?;
        let gross = amount_to_money("amount", amount)?;
        let fees = calculate_fees(gross, channel)?;

        debug!(%channel, gross = %gross, total_fee = %fees.total_fee, "calculate_fees");

        Ok(FeeBreakdownDto::new(&fees, gross))
    }

    /// Next id from the process-wide sequence.
    pub fn next_transaction_id(&self) -> TransactionIdDto {
        let id = next_transaction_id();
        info!(terminal = %self.config.terminal.id, transaction_id = %id, "Transaction id issued");
        id.into()
    }

    /// End-of-shift statistics over `amounts` (major units).
    pub fn aggregate_batch(&self, amounts: &[f64]) -> ApiResult<BatchSummaryDto> {
        let amounts = amounts
            .iter()
            .map(|value| amount_to_money("batch amount", *value))
            .collect::<ApiResult<Vec<_>>>()?;

        let stats = aggregate(&amounts)?;
        debug!(count = stats.count, total = %stats.total, "aggregate_batch");

        Ok(stats.into())
    }

    /// Placeholder authorization through the configured risk strategy.
    pub fn authorize(&self, amount: f64, tip: f64, channel: i32) -> ApiResult<AuthorizationDto> {
        let channel = PaymentChannel::try_from(channel)?;
        ensure_positive("payment amount", amount)?;
        ensure_not_negative("tip", tip)?;
        let amount = amount_to_money("amount", amount)?;
        let tip = amount_to_money("tip", tip)?;

        let outcome = authorize(self.risk.as_ref(), amount, tip, channel)?;
        info!(
            terminal = %self.config.terminal.id,
            strategy = self.risk.name(),
            %channel,
            approved = outcome.approved,
            risk_score = outcome.risk_score,
            "Payment authorization decided"
        );

        Ok(outcome.into())
    }

    /// Label and rates for one channel index.
    pub fn describe_channel(&self, channel: i32) -> ApiResult<ChannelDto> {
        Ok(PaymentChannel::try_from(channel)?.into())
    }

    /// Every channel, in index order.
    pub fn channels(&self) -> Vec<ChannelDto> {
        PaymentChannel::ALL.into_iter().map(ChannelDto::from).collect()
    }
}

// =============================================================================
// Engine Handle
// =============================================================================

/// A set-once slot holding the engine.
#[derive(Debug)]
pub struct EngineHandle {
    cell: OnceLock<Engine>,
}

impl EngineHandle {
    pub const fn new() -> Self {
        EngineHandle {
            cell: OnceLock::new(),
        }
    }

    /// The process-wide slot.
    pub fn global() -> &'static EngineHandle {
        &GLOBAL_ENGINE
    }

    /// Installs `engine` unless one is already present.
    ///
    /// Returns whichever engine ends up in the slot.
    pub fn init(&self, engine: Engine) -> &Engine {
        let mut installed = false;
        let current = self.cell.get_or_init(|| {
            installed = true;
            engine
        });

        if installed {
            info!(terminal = %current.config.terminal.id, "Engine initialized");
        } else {
            warn!("Engine already initialized; keeping the existing configuration");
        }
        current
    }

    /// The engine, or `UNINITIALIZED_ENGINE`.
    pub fn get(&self) -> ApiResult<&Engine> {
        self.cell.get().ok_or_else(ApiError::uninitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
