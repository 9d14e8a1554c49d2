//! # Fee Calculation
//!
//! Merchant fees per capture channel.
//!
//! ## Rate Table
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Channel           │ Percentage │ Fixed      │
//! │  ──────────────────┼────────────┼──────────  │
//! │  ContactlessTap    │   2.50%    │ $0.10      │
//! │  ChipEmv           │   2.90%    │ $0.15      │
//! │  MagneticStripe    │   3.50%    │ $0.20      │
//! │  ManualEntry       │   4.50%    │ $0.30      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Arithmetic
//! ```text
//! percentage_fee = gross × rate          (rounded half away from zero)
//! total_fee      = percentage_fee + fixed_fee
//! net_amount     = gross − total_fee
//! ```
//!
//! ## Usage
//! ```rust
//! use payterm_core::fees::calculate_fees;
//! use payterm_core::{Money, PaymentChannel};
//!
//! let fees = calculate_fees(Money::from_cents(100_000), PaymentChannel::ChipEmv).unwrap();
//! assert_eq!(fees.percentage_fee.cents(), 2_900); // $29.00
//! assert_eq!(fees.total_fee.cents(), 2_915);      // $29.15
//! assert_eq!(fees.net_amount.cents(), 97_085);    // $970.85
//! ```

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{FeeBreakdown, PaymentChannel, Rate};
use crate::validation::validate_gross_amount;

/// The (percentage, fixed) pair charged for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRates {
    pub percentage: Rate,
    pub fixed: Money,
}

/// Returns the static rates for a channel.
///
/// A `match` over the closed enum: adding a channel without a rate is a
/// compile error, not a runtime fallback.
pub const fn channel_rates(channel: PaymentChannel) -> ChannelRates {
    match channel {
        PaymentChannel::ContactlessTap => ChannelRates {
            percentage: Rate::from_bps(250),
            fixed: Money::from_cents(10),
        },
        PaymentChannel::ChipEmv => ChannelRates {
            percentage: Rate::from_bps(290),
            fixed: Money::from_cents(15),
        },
        PaymentChannel::MagneticStripe => ChannelRates {
            percentage: Rate::from_bps(350),
            fixed: Money::from_cents(20),
        },
        PaymentChannel::ManualEntry => ChannelRates {
            percentage: Rate::from_bps(450),
            fixed: Money::from_cents(30),
        },
    }
}

/// Computes the fee breakdown for a gross amount captured on `channel`.
///
/// ## Errors
/// - `CoreError::Validation` when `gross_amount` is negative.
///
/// A zero gross amount is accepted: the fixed fee still applies and the net
/// amount comes out negative.
pub fn calculate_fees(gross_amount: Money, channel: PaymentChannel) -> CoreResult<FeeBreakdown> {
    validate_gross_amount(gross_amount)?;

    let rates = channel_rates(channel);
    let percentage_fee = gross_amount.apply_rate(rates.percentage);
    let total_fee = percentage_fee + rates.fixed;

    Ok(FeeBreakdown {
        fixed_fee: rates.fixed,
        percentage_fee,
        total_fee,
        net_amount: gross_amount - total_fee,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use proptest::prelude::*;

    #[test]
    fn test_chip_emv_reference_case() {
        let fees = calculate_fees(Money::from_cents(100_000), PaymentChannel::ChipEmv).unwrap();
        assert_eq!(fees.fixed_fee, Money::from_cents(15));
        assert_eq!(fees.percentage_fee, Money::from_cents(2_900));
        assert_eq!(fees.total_fee, Money::from_cents(2_915));
        assert_eq!(fees.net_amount, Money::from_cents(97_085));
    }

    #[test]
    fn test_every_channel_on_one_hundred() {
        let gross = Money::from_cents(10_000); // $100.00
        let expected = [
            (PaymentChannel::ContactlessTap, 250, 10),
            (PaymentChannel::ChipEmv, 290, 15),
            (PaymentChannel::MagneticStripe, 350, 20),
            (PaymentChannel::ManualEntry, 450, 30),
        ];

        for (channel, percentage_cents, fixed_cents) in expected {
            let fees = calculate_fees(gross, channel).unwrap();
            assert_eq!(fees.percentage_fee.cents(), percentage_cents, "{channel}");
            assert_eq!(fees.fixed_fee.cents(), fixed_cents, "{channel}");
        }
    }

    #[test]
    fn test_fees_grow_with_channel_risk() {
        let gross = Money::from_cents(5_000);
        let totals: Vec<i64> = PaymentChannel::ALL
            .iter()
            .map(|c| calculate_fees(gross, *c).unwrap().total_fee.cents())
            .collect();
        assert!(totals.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_amount_charges_fixed_fee() {
        let fees = calculate_fees(Money::zero(), PaymentChannel::ContactlessTap).unwrap();
        assert_eq!(fees.percentage_fee, Money::zero());
        assert_eq!(fees.total_fee, Money::from_cents(10));
        assert_eq!(fees.net_amount, Money::from_cents(-10));
        assert_eq!(fees.effective_rate_percent(Money::zero()), 0.0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = calculate_fees(Money::from_cents(-100), PaymentChannel::ChipEmv);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_rounding_of_percentage_fee() {
        // $12.34 at 3.50% = $0.4319 → $0.43
        let fees = calculate_fees(Money::from_cents(1_234), PaymentChannel::MagneticStripe).unwrap();
        assert_eq!(fees.percentage_fee.cents(), 43);
        // $0.90 at 2.50% = $0.0225 → $0.02
        let fees = calculate_fees(Money::from_cents(90), PaymentChannel::ContactlessTap).unwrap();
        assert_eq!(fees.percentage_fee.cents(), 2);
    }

    #[test]
    fn test_idempotent() {
        let a = calculate_fees(Money::from_cents(4_321), PaymentChannel::ManualEntry).unwrap();
        let b = calculate_fees(Money::from_cents(4_321), PaymentChannel::ManualEntry).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_breakdown_invariants(cents in 1i64..100_000_000_000, index in 0i32..4) {
            let channel = PaymentChannel::try_from(index).unwrap();
            let gross = Money::from_cents(cents);
            let fees = calculate_fees(gross, channel).unwrap();

            prop_assert_eq!(fees.total_fee, fees.percentage_fee + fees.fixed_fee);
            prop_assert_eq!(fees.net_amount, gross - fees.total_fee);
            prop_assert_eq!(fees.fixed_fee, channel_rates(channel).fixed);
        }
    }
}
