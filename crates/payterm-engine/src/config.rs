//! # Engine Configuration
//!
//! Configuration management for the terminal engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PAYTERM_RISK_POLICY=weighted                                       │
//! │     PAYTERM_TERMINAL_ID=register-07                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/payterm/payterm.toml (Linux)                             │
//! │     ~/Library/Application Support/com.payterm.payterm/payterm.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     random risk policy, auto-generated terminal id                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # payterm.toml
//! [terminal]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Front Counter"
//!
//! [risk]
//! policy = "weighted"          # random | weighted
//! approval_threshold = 0.35    # weighted policy only
//!
//! [risk.decline_probability]   # random policy only
//! tap = 0.05
//! chip = 0.03
//! swipe = 0.10
//! manual = 0.20
//!
//! [logging]
//! filter = "info,payterm=debug"
//! ```

use payterm_core::risk::{DeclineProbabilities, DEFAULT_APPROVAL_THRESHOLD};
use payterm_core::{RandomRiskAssessor, RiskAssessor, WeightedRiskAssessor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ConfigError, ConfigResult};
use crate::logging::DEFAULT_LOG_FILTER;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "payterm.toml";

// =============================================================================
// Risk Policy
// =============================================================================

/// Which authorization strategy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// Uniform draw against per-channel decline probabilities.
    #[default]
    Random,

    /// Deterministic tip-ratio score against a threshold.
    Weighted,
}

impl std::fmt::Display for RiskPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskPolicy::Random => write!(f, "random"),
            RiskPolicy::Weighted => write!(f, "weighted"),
        }
    }
}

impl std::str::FromStr for RiskPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(RiskPolicy::Random),
            "weighted" | "score" => Ok(RiskPolicy::Weighted),
            other => Err(ConfigError::Invalid(format!(
                "Unknown risk policy: '{}'. Valid options: random, weighted",
                other
            ))),
        }
    }
}

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Identity of this terminal, stamped on log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Unique terminal identifier.
    /// Auto-generated (UUID v4) when not provided.
    #[serde(default = "default_terminal_id")]
    pub id: String,

    /// Human-readable terminal name.
    #[serde(default = "default_terminal_name")]
    pub name: String,
}

fn default_terminal_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_terminal_name() -> String {
    "Payment Terminal".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            id: default_terminal_id(),
            name: default_terminal_name(),
        }
    }
}

// =============================================================================
// Risk Settings
// =============================================================================

/// Authorization strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub policy: RiskPolicy,

    /// Minimum score approved by the weighted policy.
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: f64,

    /// Per-channel decline probability for the random policy.
    #[serde(default)]
    pub decline_probability: DeclineProbabilities,

    /// Fixed seed for the random policy (reproducible demos).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_approval_threshold() -> f64 {
    DEFAULT_APPROVAL_THRESHOLD
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            policy: RiskPolicy::default(),
            approval_threshold: default_approval_threshold(),
            decline_probability: DeclineProbabilities::default(),
            seed: None,
        }
    }
}

impl RiskConfig {
    /// Builds the strategy these settings describe.
    pub fn build_assessor(&self) -> Box<dyn RiskAssessor> {
        match self.policy {
            RiskPolicy::Random => match self.seed {
                Some(seed) => Box::new(RandomRiskAssessor::seeded(self.decline_probability, seed)),
                None => Box::new(RandomRiskAssessor::new(self.decline_probability)),
            },
            RiskPolicy::Weighted => Box::new(WeightedRiskAssessor::new(self.approval_threshold)),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string. `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub terminal: TerminalConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Creates a new config with defaults and a generated terminal ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else `payterm.toml` in the config dir)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing file at
    /// the default location just means "use defaults".
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::LoadFailed(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading engine config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.terminal.id.trim().is_empty() {
            return Err(ConfigError::MissingTerminalId);
        }

        check_probability("risk.approval_threshold", self.risk.approval_threshold)?;
        for (channel, probability) in self.risk.decline_probability.iter() {
            check_probability(&format!("risk.decline_probability.{}", channel), probability)?;
        }

        Ok(())
    }

    /// Applies `PAYTERM_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("PAYTERM_TERMINAL_ID") {
            debug!(terminal_id = %id, "Overriding terminal ID from environment");
            self.terminal.id = id;
        }

        if let Some(name) = lookup("PAYTERM_TERMINAL_NAME") {
            self.terminal.name = name;
        }

        if let Some(policy) = lookup("PAYTERM_RISK_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding risk policy from environment");
                    self.risk.policy = parsed;
                }
                Err(_) => warn!(policy = %policy, "Unknown risk policy in environment"),
            }
        }

        if let Some(threshold) = lookup("PAYTERM_APPROVAL_THRESHOLD") {
            match threshold.parse::<f64>() {
                Ok(t) => self.risk.approval_threshold = t,
                Err(_) => warn!(threshold = %threshold, "Unparseable approval threshold in environment"),
            }
        }

        if let Some(filter) = lookup("PAYTERM_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "payterm", "payterm")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the terminal ID.
    pub fn terminal_id(&self) -> &str {
        &self.terminal.id
    }

    /// Returns the risk policy.
    pub fn policy(&self) -> RiskPolicy {
        self.risk.policy
    }
}

fn check_probability(name: &str, value: f64) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_risk_policy_parsing() {
        assert_eq!("random".parse::<RiskPolicy>().unwrap(), RiskPolicy::Random);
        assert_eq!("Weighted".parse::<RiskPolicy>().unwrap(), RiskPolicy::Weighted);
        assert!("coin".parse::<RiskPolicy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(!config.terminal.id.is_empty());
        assert_eq!(config.policy(), RiskPolicy::Random);
        assert_eq!(config.risk.approval_threshold, 0.35);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.terminal.id = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingTerminalId)));

        config.terminal.id = "register-1".to_string();
        config.risk.approval_threshold = 1.5;
        assert!(config.validate().is_err());

        config.risk.approval_threshold = 0.5;
        config.risk.decline_probability.manual = -0.1;
        assert!(config.validate().is_err());

        config.risk.decline_probability.manual = 0.2;
        config.risk.approval_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[terminal]
id = "register-7"

[risk]
policy = "weighted"
approval_threshold = 0.5

[risk.decline_probability]
manual = 0.4
"#
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.terminal_id(), "register-7");
        assert_eq!(config.terminal.name, "Payment Terminal");
        assert_eq!(config.policy(), RiskPolicy::Weighted);
        assert_eq!(config.risk.approval_threshold, 0.5);
        assert_eq!(config.risk.decline_probability.manual, 0.4);
        assert_eq!(config.risk.decline_probability.chip, 0.03);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::LoadFailed(_))));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[risk]\npolicy = 42").unwrap();
        let result = EngineConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_or_default(Some(dir.path().join("absent.toml")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[
            ("PAYTERM_TERMINAL_ID", "lane-3"),
            ("PAYTERM_TERMINAL_NAME", "Lane 3"),
            ("PAYTERM_RISK_POLICY", "weighted"),
            ("PAYTERM_APPROVAL_THRESHOLD", "0.6"),
            ("PAYTERM_LOG", "warn"),
        ]));

        assert_eq!(config.terminal_id(), "lane-3");
        assert_eq!(config.terminal.name, "Lane 3");
        assert_eq!(config.policy(), RiskPolicy::Weighted);
        assert_eq!(config.risk.approval_threshold, 0.6);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[
            ("PAYTERM_RISK_POLICY", "coin"),
            ("PAYTERM_APPROVAL_THRESHOLD", "high"),
        ]));
        assert_eq!(config.policy(), RiskPolicy::Random);
        assert_eq!(config.risk.approval_threshold, 0.35);
    }

    #[test]
    fn test_build_assessor_follows_policy() {
        let mut risk = RiskConfig::default();
        assert_eq!(risk.build_assessor().name(), "random");

        risk.policy = RiskPolicy::Weighted;
        assert_eq!(risk.build_assessor().name(), "weighted");
    }

    #[test]
    fn test_toml_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[terminal]"));
        assert!(toml_str.contains("[risk]"));
    }
}
