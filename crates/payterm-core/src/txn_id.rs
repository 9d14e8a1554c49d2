//! # Transaction Identifiers
//!
//! Generates `TXN-<unix_seconds>-<sequence>` tokens that are unique for the
//! lifetime of the process.
//!
//! ## Sequencing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One counter, many callers                            │
//! │                                                                         │
//! │   thread A ──┐                                                          │
//! │   thread B ──┼──► fetch_add(1) ──► 42 ──► "TXN-1760000000-000042"       │
//! │   thread C ──┘    (indivisible)                                         │
//! │                                                                         │
//! │  • Sequence starts at 1 and is never reset (not per second, not ever)   │
//! │  • Zero-padded to 6 digits, grows past 999999 without truncation        │
//! │  • Not persisted: a restarted process starts again at 1                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use payterm_core::txn_id::TransactionIdGenerator;
//!
//! let generator = TransactionIdGenerator::new();
//! let first = generator.next_id_at(1_700_000_000);
//! assert_eq!(first.as_str(), "TXN-1700000000-000001");
//! assert_eq!(first.sequence(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CoreError;

const PREFIX: &str = "TXN";

/// Process-wide generator behind [`next_transaction_id`].
static GLOBAL_GENERATOR: TransactionIdGenerator = TransactionIdGenerator::new();

// =============================================================================
// Transaction Id
// =============================================================================

/// An opaque transaction token: `TXN-<unix_seconds>-<sequence>`.
///
/// Serializes as the plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId {
    timestamp: i64,
    sequence: u64,
    rendered: String,
}

impl TransactionId {
    fn new(timestamp: i64, sequence: u64) -> Self {
        TransactionId {
            timestamp,
            sequence,
            rendered: format!("{}-{}-{:06}", PREFIX, timestamp, sequence),
        }
    }

    /// Unix seconds at generation time.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Position in the process-wide sequence.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl FromStr for TransactionId {
    type Err = CoreError;

    /// Parses a token produced by this module.
    ///
    /// ```rust
    /// use payterm_core::txn_id::TransactionId;
    ///
    /// let id: TransactionId = "TXN-1700000000-1234567".parse().unwrap();
    /// assert_eq!(id.timestamp(), 1_700_000_000);
    /// assert_eq!(id.sequence(), 1_234_567);
    /// assert!("TXN-17-12".parse::<TransactionId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidTransactionId(s.to_string());

        let mut parts = s.splitn(3, '-');
        let (Some(prefix), Some(timestamp), Some(sequence)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if prefix != PREFIX || !all_digits(timestamp) || !all_digits(sequence) || sequence.len() < 6 {
            return Err(invalid());
        }

        let timestamp = timestamp.parse::<i64>().map_err(|_| invalid())?;
        let sequence = sequence.parse::<u64>().map_err(|_| invalid())?;
        let id = TransactionId::new(timestamp, sequence);

        // Reject spellings this module would never emit (e.g. extra padding)
        if id.rendered != s {
            return Err(invalid());
        }

        Ok(id)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.rendered
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Lock-free sequence source for transaction ids.
///
/// `next_id*` is O(1): one atomic increment plus formatting. Usable as a
/// `static` thanks to the `const` constructor.
#[derive(Debug)]
pub struct TransactionIdGenerator {
    counter: AtomicU64,
}

impl TransactionIdGenerator {
    pub const fn new() -> Self {
        TransactionIdGenerator {
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the next id stamped with the current wall-clock second.
    pub fn next_id(&self) -> TransactionId {
        self.next_id_at(chrono::Utc::now().timestamp())
    }

    /// Returns the next id stamped with `unix_seconds`.
    ///
    /// Uniqueness comes from the sequence alone; the timestamp is only for
    /// tracing an id back to when it was issued.
    pub fn next_id_at(&self, unix_seconds: i64) -> TransactionId {
        // Relaxed is enough: callers only need distinct values, not ordering
        // with other memory.
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        TransactionId::new(unix_seconds, sequence)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the next id from the process-wide generator.
pub fn next_transaction_id() -> TransactionId {
    GLOBAL_GENERATOR.next_id()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_format_and_padding() {
        let generator = TransactionIdGenerator::new();
        assert_eq!(generator.next_id_at(1_760_000_000).as_str(), "TXN-1760000000-000001");
        assert_eq!(generator.next_id_at(1_760_000_000).as_str(), "TXN-1760000000-000002");
        assert_eq!(generator.issued(), 2);
    }

    #[test]
    fn test_sequence_not_reset_across_timestamps() {
        let generator = TransactionIdGenerator::new();
        let a = generator.next_id_at(100);
        let b = generator.next_id_at(101);
        let c = generator.next_id_at(100);
        assert_eq!((a.sequence(), b.sequence(), c.sequence()), (1, 2, 3));
    }

    #[test]
    fn test_sequence_grows_past_six_digits() {
        let generator = TransactionIdGenerator {
            counter: AtomicU64::new(999_999),
        };
        let id = generator.next_id_at(5);
        assert_eq!(id.as_str(), "TXN-5-1000000");
        assert_eq!(id.sequence(), 1_000_000);
    }

    #[test]
    fn test_wall_clock_timestamp() {
        let before = chrono::Utc::now().timestamp();
        let id = TransactionIdGenerator::new().next_id();
        let after = chrono::Utc::now().timestamp();
        assert!(id.timestamp() >= before && id.timestamp() <= after);
        assert!(id.as_str().starts_with("TXN-"));
    }

    #[test]
    fn test_global_generator_is_monotonic() {
        let first = next_transaction_id();
        let second = next_transaction_id();
        assert!(second.sequence() > first.sequence());
    }

    #[test]
    fn test_concurrent_callers_never_collide() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let generator = Arc::new(TransactionIdGenerator::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| generator.next_id().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate transaction id");
            }
        }
        assert_eq!(seen.len(), THREADS * PER_THREAD);
        assert_eq!(generator.issued(), (THREADS * PER_THREAD) as u64);
    }

    #[test]
    fn test_parse_round_trip() {
        let id = TransactionIdGenerator::new().next_id_at(1_700_000_000);
        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_foreign_formats() {
        for bad in [
            "",
            "TXN",
            "TXN-1700000000",
            "TXN-1700000000-12",
            "TXN-1700000000-0000012",
            "TXN--000001",
            "ABC-1700000000-000001",
            "TXN-17000x0000-000001",
            "TXN-1700000000-000001-extra",
        ] {
            assert!(bad.parse::<TransactionId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = TransactionIdGenerator::new().next_id_at(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"TXN-42-000001\"");

        let back: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<TransactionId>("\"nope\"").is_err());
    }
}
