//! # Wire DTOs
//!
//! JSON shapes handed to the terminal UI. Keys are snake_case; amounts are
//! decimal numbers in major units (dollars), rounded to 2 places.
//!
//! ## Shapes
//! ```text
//! validate_card        {"is_valid":true,"brand":"Visa","message":"..."}
//! calculate_fees       {"fixed_fee":0.15,"percentage_fee":29.0,"total_fee":29.15,
//!                       "net_amount":970.85,"effective_rate":2.92}
//! next_transaction_id  {"transaction_id":"TXN-1760000000-000042"}
//! aggregate_batch      {"total":1076.05,"average":215.21,"max":500.0,"min":75.3,"count":5}
//! authorize            {"approved":true,"risk_score":0.87,"message":"..."}
//! describe_channel     {"index":1,"name":"chip_emv","description":"Chip (EMV)",...}
//! any failure          {"error":"empty batch","code":"EMPTY_BATCH"}
//! ```

use payterm_core::fees::channel_rates;
use payterm_core::{
    AuthorizationOutcome, BatchStatistics, CardValidationOutcome, FeeBreakdown, Money,
    PaymentChannel, TransactionId,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Rendered when even the error object cannot be serialized.
const FALLBACK_ERROR_JSON: &str = r#"{"error":"failed to serialize response","code":"INTERNAL"}"#;

/// Rounds to 2 decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn major(amount: Money) -> f64 {
    round2(amount.to_major())
}

// =============================================================================
// Card Validation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardValidationDto {
    pub is_valid: bool,
    pub brand: String,
    pub message: String,
}

impl From<CardValidationOutcome> for CardValidationDto {
    fn from(outcome: CardValidationOutcome) -> Self {
        CardValidationDto {
            is_valid: outcome.is_valid,
            brand: outcome.brand.label().to_string(),
            message: outcome.message,
        }
    }
}

// =============================================================================
// Fees
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdownDto {
    pub fixed_fee: f64,
    pub percentage_fee: f64,
    pub total_fee: f64,
    pub net_amount: f64,
    /// `total_fee / gross * 100`, or 0 when the gross amount is not positive.
    pub effective_rate: f64,
}

impl FeeBreakdownDto {
    pub fn new(fees: &FeeBreakdown, gross_amount: Money) -> Self {
        FeeBreakdownDto {
            fixed_fee: major(fees.fixed_fee),
            percentage_fee: major(fees.percentage_fee),
            total_fee: major(fees.total_fee),
            net_amount: major(fees.net_amount),
            effective_rate: round2(fees.effective_rate_percent(gross_amount)),
        }
    }
}

// =============================================================================
// Transaction Id
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIdDto {
    pub transaction_id: String,
}

impl From<TransactionId> for TransactionIdDto {
    fn from(id: TransactionId) -> Self {
        TransactionIdDto {
            transaction_id: id.into(),
        }
    }
}

// =============================================================================
// Batch Summary
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummaryDto {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: u64,
}

impl From<BatchStatistics> for BatchSummaryDto {
    fn from(stats: BatchStatistics) -> Self {
        BatchSummaryDto {
            total: major(stats.total),
            average: major(stats.average),
            max: major(stats.max),
            min: major(stats.min),
            count: stats.count,
        }
    }
}

// =============================================================================
// Authorization
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationDto {
    pub approved: bool,
    pub risk_score: f64,
    pub message: String,
}

impl From<AuthorizationOutcome> for AuthorizationDto {
    fn from(outcome: AuthorizationOutcome) -> Self {
        AuthorizationDto {
            approved: outcome.approved,
            risk_score: outcome.risk_score,
            message: outcome.message,
        }
    }
}

// =============================================================================
// Channel Description
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDto {
    pub index: i32,
    pub name: String,
    pub description: String,
    /// Percentage rate, e.g. 2.9 for 2.90%.
    pub percentage_rate: f64,
    pub fixed_fee: f64,
}

impl From<PaymentChannel> for ChannelDto {
    fn from(channel: PaymentChannel) -> Self {
        let rates = channel_rates(channel);
        ChannelDto {
            index: channel.index(),
            name: channel.to_string(),
            description: channel.description().to_string(),
            percentage_rate: rates.percentage.percentage(),
            fixed_fee: major(rates.fixed),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Serializes a success value, or the error object when that fails.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(&ApiError::internal(format!("serialization failed: {}", e))))
}

/// Serializes an error object.
pub fn error_json(error: &ApiError) -> String {
    serde_json::to_string(error).unwrap_or_else(|_| FALLBACK_ERROR_JSON.to_string())
}

/// Renders either side of a boundary result.
pub fn render<T: Serialize>(result: ApiResult<T>) -> String {
    match result {
        Ok(value) => to_json(&value),
        Err(error) => error_json(&error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payterm_core::batch::aggregate;
    use payterm_core::fees::calculate_fees;
    use payterm_core::validation::validate_card;
    use payterm_core::CoreError;

    #[test]
    fn test_batch_summary_wire_shape() {
        let amounts: Vec<Money> = [10_000, 25_050, 7_530, 50_000, 15_025]
            .into_iter()
            .map(Money::from_cents)
            .collect();
        let dto = BatchSummaryDto::from(aggregate(&amounts).unwrap());

        assert_eq!(
            to_json(&dto),
            r#"{"total":1076.05,"average":215.21,"max":500.0,"min":75.3,"count":5}"#
        );
    }

    #[test]
    fn test_fee_dto_carries_effective_rate() {
        let gross = Money::from_cents(100_000);
        let fees = calculate_fees(gross, PaymentChannel::ChipEmv).unwrap();
        let dto = FeeBreakdownDto::new(&fees, gross);

        assert_eq!(dto.fixed_fee, 0.15);
        assert_eq!(dto.percentage_fee, 29.0);
        assert_eq!(dto.total_fee, 29.15);
        assert_eq!(dto.net_amount, 970.85);
        assert_eq!(dto.effective_rate, 2.92);
    }

    #[test]
    fn test_card_dto_uses_brand_label() {
        let dto = CardValidationDto::from(validate_card("4532015112830366"));
        let json: serde_json::Value = serde_json::from_str(&to_json(&dto)).unwrap();
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["brand"], "Visa");
    }

    #[test]
    fn test_render_error_side() {
        let rendered = render::<BatchSummaryDto>(Err(CoreError::EmptyBatch.into()));
        assert_eq!(rendered, r#"{"error":"empty batch","code":"EMPTY_BATCH"}"#);
    }

    #[test]
    fn test_channel_dto() {
        let dto = ChannelDto::from(PaymentChannel::ManualEntry);
        assert_eq!(dto.index, 3);
        assert_eq!(dto.name, "manual_entry");
        assert_eq!(dto.description, "Manual entry");
        assert_eq!(dto.percentage_rate, 4.5);
        assert_eq!(dto.fixed_fee, 0.3);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.915), 2.92);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(0.0), 0.0);
    }
}
