//! # Batch Statistics
//!
//! End-of-shift summary over a list of transaction amounts.
//!
//! One linear pass keeps a running sum, max, min and count; the average is
//! derived at the end. Amounts are integer cents and the running sum is
//! i128, so a batch of a million $999,999,999.99 sales is still exact.
//!
//! ## Usage
//! ```rust
//! use payterm_core::batch::aggregate;
//! use payterm_core::Money;
//!
//! let amounts = [Money::from_cents(10_000), Money::from_cents(25_050)];
//! let stats = aggregate(&amounts).unwrap();
//! assert_eq!(stats.total.cents(), 35_050);
//! assert_eq!(stats.average.cents(), 17_525);
//!
//! assert!(aggregate(&[]).is_err());
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::{round_div_i128, Money};
use crate::types::BatchStatistics;

/// Summarises `amounts` in a single pass.
///
/// ## Errors
/// - `CoreError::EmptyBatch` for an empty slice (never a zero-filled result)
/// - `CoreError::AmountOverflow` when the total does not fit in `Money`
pub fn aggregate(amounts: &[Money]) -> CoreResult<BatchStatistics> {
    let mut iter = amounts.iter().copied();
    let first = iter.next().ok_or(CoreError::EmptyBatch)?;

    let mut sum = first.cents() as i128;
    let mut max = first;
    let mut min = first;
    let mut count: u64 = 1;

    for amount in iter {
        sum += amount.cents() as i128;
        max = max.max(amount);
        min = min.min(amount);
        count += 1;
    }

    let total = i64::try_from(sum).map_err(|_| CoreError::AmountOverflow)?;
    let average = round_div_i128(sum, count as i128) as i64;

    Ok(BatchStatistics {
        total: Money::from_cents(total),
        average: Money::from_cents(average),
        max,
        min,
        count,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
