//! # Authorization Risk Strategies
//!
//! The terminal's authorization step is a placeholder: nothing here is a
//! fraud model. The decision is delegated to a [`RiskAssessor`] so that a
//! real scorer can replace the stand-ins without touching call sites.
//!
//! ## Strategies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   authorize(&dyn RiskAssessor, amount, tip, channel)                    │
//! │        │                                                                │
//! │        ├── RandomRiskAssessor    r ~ U[0,1)                             │
//! │        │                         approved   = r >= decline_p(channel)   │
//! │        │                         risk_score = 1 - r                     │
//! │        │                                                                │
//! │        └── WeightedRiskAssessor  base  = |amount / (amount + tip + 1)|  │
//! │                                  score = base × weight(channel)         │
//! │                                  approved = score >= threshold          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contract for any strategy: `risk_score` stays within `[0, 1]`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{AuthorizationOutcome, PaymentChannel};
use crate::validation::{validate_payment_amount, validate_tip};

// =============================================================================
// Strategy Interface
// =============================================================================

/// What a risk strategy gets to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub amount: Money,
    pub tip: Money,
    pub channel: PaymentChannel,
}

/// A strategy's verdict on one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub approved: bool,
    /// Within `[0, 1]`.
    pub risk_score: f64,
}

/// Pluggable authorization policy.
pub trait RiskAssessor: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn assess(&self, request: &AuthorizationRequest) -> RiskAssessment;
}

// =============================================================================
// Random Strategy
// =============================================================================

/// Per-channel probability of declining, each within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclineProbabilities {
    #[serde(default = "default_tap_decline")]
    pub tap: f64,
    #[serde(default = "default_chip_decline")]
    pub chip: f64,
    #[serde(default = "default_swipe_decline")]
    pub swipe: f64,
    #[serde(default = "default_manual_decline")]
    pub manual: f64,
}

fn default_tap_decline() -> f64 {
    0.05
}

fn default_chip_decline() -> f64 {
    0.03
}

fn default_swipe_decline() -> f64 {
    0.10
}

fn default_manual_decline() -> f64 {
    0.20
}

impl Default for DeclineProbabilities {
    fn default() -> Self {
        DeclineProbabilities {
            tap: default_tap_decline(),
            chip: default_chip_decline(),
            swipe: default_swipe_decline(),
            manual: default_manual_decline(),
        }
    }
}

impl DeclineProbabilities {
    pub fn for_channel(&self, channel: PaymentChannel) -> f64 {
        match channel {
            PaymentChannel::ContactlessTap => self.tap,
            PaymentChannel::ChipEmv => self.chip,
            PaymentChannel::MagneticStripe => self.swipe,
            PaymentChannel::ManualEntry => self.manual,
        }
    }

    /// Iterates `(channel, probability)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PaymentChannel, f64)> + '_ {
        PaymentChannel::ALL
            .into_iter()
            .map(move |channel| (channel, self.for_channel(channel)))
    }
}

/// Coin-flip strategy: a uniform draw against a channel threshold.
///
/// Uses the thread-local RNG by default; [`RandomRiskAssessor::seeded`] pins
/// the sequence for reproducible runs.
#[derive(Debug)]
pub struct RandomRiskAssessor {
    decline: DeclineProbabilities,
    seeded: Option<Mutex<StdRng>>,
}

impl RandomRiskAssessor {
    pub fn new(decline: DeclineProbabilities) -> Self {
        RandomRiskAssessor {
            decline,
            seeded: None,
        }
    }

    pub fn seeded(decline: DeclineProbabilities, seed: u64) -> Self {
        RandomRiskAssessor {
            decline,
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw(&self) -> f64 {
        match &self.seeded {
            Some(rng) => {
                // A panic elsewhere cannot leave an RNG half-updated
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                rng.gen::<f64>()
            }
            None => rand::thread_rng().gen::<f64>(),
        }
    }
}

impl Default for RandomRiskAssessor {
    fn default() -> Self {
        Self::new(DeclineProbabilities::default())
    }
}

impl RiskAssessor for RandomRiskAssessor {
    fn name(&self) -> &'static str {
        "random"
    }

    fn assess(&self, request: &AuthorizationRequest) -> RiskAssessment {
        let draw = self.draw();
        RiskAssessment {
            approved: draw >= self.decline.for_channel(request.channel),
            risk_score: (1.0 - draw).clamp(0.0, 1.0),
        }
    }
}

// =============================================================================
// Weighted Strategy
// =============================================================================

/// Deterministic score from the tip ratio and a channel weight.
///
/// Higher scores approve; a large tip relative to the amount drags the
/// score down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRiskAssessor {
    threshold: f64,
}

/// Default minimum score for approval.
pub const DEFAULT_APPROVAL_THRESHOLD: f64 = 0.35;

impl WeightedRiskAssessor {
    pub fn new(threshold: f64) -> Self {
        WeightedRiskAssessor {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub const fn channel_weight(channel: PaymentChannel) -> f64 {
        match channel {
            PaymentChannel::ContactlessTap => 0.85,
            PaymentChannel::ChipEmv => 0.90,
            PaymentChannel::MagneticStripe => 0.70,
            PaymentChannel::ManualEntry => 0.60,
        }
    }
}

impl Default for WeightedRiskAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_APPROVAL_THRESHOLD)
    }
}

impl RiskAssessor for WeightedRiskAssessor {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn assess(&self, request: &AuthorizationRequest) -> RiskAssessment {
        let amount = request.amount.to_major();
        let total = amount + request.tip.to_major();

        let base = (amount / (total + 1.0)).abs().min(1.0);
        let risk_score = (base * Self::channel_weight(request.channel)).clamp(0.0, 1.0);

        RiskAssessment {
            approved: risk_score >= self.threshold,
            risk_score,
        }
    }
}

// =============================================================================
// Authorization
// =============================================================================

/// Runs the authorization step through `assessor`.
///
/// ## Errors
/// - `CoreError::Validation` when `amount <= 0` or `tip < 0`.
pub fn authorize(
    assessor: &dyn RiskAssessor,
    amount: Money,
    tip: Money,
    channel: PaymentChannel,
) -> CoreResult<AuthorizationOutcome> {
    validate_payment_amount(amount)?;
    validate_tip(tip)?;

    let request = AuthorizationRequest {
        amount,
        tip,
        channel,
    };
    let assessment = assessor.assess(&request);
    let risk_score = assessment.risk_score.clamp(0.0, 1.0);

    let message = if assessment.approved {
        format!("Approved (risk score {:.2}%)", risk_score * 100.0)
    } else {
        format!("Declined by risk engine (risk score {:.2}%)", risk_score * 100.0)
    };

    Ok(AuthorizationOutcome {
        approved: assessment.approved,
        risk_score,
        message,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
