//! # Logging
//!
//! Installs the process-wide `tracing` subscriber.
//!
//! ## Filter Selection
//! ```text
//! RUST_LOG set and valid?  ──yes──►  RUST_LOG
//!          │ no
//!          ▼
//! configured filter valid? ──yes──►  [logging] filter / PAYTERM_LOG
//!          │ no
//!          ▼
//!   "info,payterm=debug"
//! ```
//!
//! Output goes to stderr so JSON printed on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_LOG_FILTER: &str = "info,payterm=debug";

/// Picks the filter from `RUST_LOG`, then `configured`, then the default.
pub fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(configured))
}

fn configured_filter(configured: Option<&str>) -> EnvFilter {
    configured
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Safe to call more than once: only the first call installs a subscriber.
/// Returns `true` when this call did the installing.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=payterm_engine=trace` - Trace the engine only
pub fn init_tracing(configured: Option<&str>) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(configured))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_filter_is_used() {
        assert_eq!(configured_filter(Some("warn")).to_string(), "warn");
    }

    #[test]
    fn test_invalid_or_missing_filter_falls_back() {
        let expected = EnvFilter::new(DEFAULT_LOG_FILTER).to_string();
        assert_eq!(configured_filter(None).to_string(), expected);
        assert_eq!(configured_filter(Some("payterm=loud")).to_string(), expected);
    }

    #[test]
    fn test_second_init_is_a_no_op() {
        init_tracing(None);
        assert!(!init_tracing(Some("trace")));
    }
}
