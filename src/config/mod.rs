//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with an environment variable
//! override for the database URL (`WAGERBOOK_DATABASE_URL`). Every section
//! has working defaults, so an absent file yields a runnable configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, Result};

mod logging;

pub use logging::LoggingConfig;

/// Durable-store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL or path.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "wagerbook.db".into(),
        }
    }
}

/// Betting engine limits and timeouts.
#[derive(Debug, Clone, Deserialize)]
pub struct BettingConfig {
    /// Smallest accepted stake.
    pub min_stake: Decimal,
    /// Largest accepted stake.
    pub max_stake: Decimal,
    /// Bound on the market-status lookup gating placement; lookups that
    /// run longer fail closed.
    pub market_gate_timeout_ms: u64,
    /// How long a placement hold reserves funds before self-healing.
    pub hold_ttl_secs: i64,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            min_stake: dec!(10),
            max_stake: dec!(10000),
            market_gate_timeout_ms: 3000,
            hold_ttl_secs: 120,
        }
    }
}

/// Ledger query limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Hard cap on transaction-history page size.
    pub max_history_limit: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_history_limit: 200,
        }
    }
}

/// Fixed-odds pricing parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Decimal odds used when ingestion supplies none.
    pub fallback_odds: Decimal,
    /// Fraction of fair value withheld on early sales.
    pub sale_haircut: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_odds: dec!(1.9),
            sale_haircut: dec!(0.05),
        }
    }
}

/// Skip-record TTL.
#[derive(Debug, Clone, Deserialize)]
pub struct SkipConfig {
    /// Days a skip excludes a market before expiring.
    pub ttl_days: i64,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self { ttl_days: 3 }
    }
}

/// Background job intervals.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Seconds between leaderboard reconciliation cycles.
    pub leaderboard_sync_interval_secs: u64,
    /// Seconds between maintenance sweeps (expired skips and holds).
    pub maintenance_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            leaderboard_sync_interval_secs: 300,
            maintenance_interval_secs: 3600,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub betting: BettingConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub skips: SkipConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WAGERBOOK_DATABASE_URL") {
            self.database.url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.url",
            }
            .into());
        }
        if self.betting.min_stake <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "betting.min_stake",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.betting.max_stake < self.betting.min_stake {
            return Err(ConfigError::InvalidValue {
                field: "betting.max_stake",
                reason: "must be at least min_stake".into(),
            }
            .into());
        }
        if self.betting.market_gate_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "betting.market_gate_timeout_ms",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.betting.hold_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "betting.hold_ttl_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.ledger.max_history_limit <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.max_history_limit",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.pricing.fallback_odds <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "pricing.fallback_odds",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.pricing.sale_haircut < Decimal::ZERO || self.pricing.sale_haircut >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "pricing.sale_haircut",
                reason: "must be in [0, 1)".into(),
            }
            .into());
        }
        if self.skips.ttl_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "skips.ttl_days",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.jobs.leaderboard_sync_interval_secs == 0
            || self.jobs.maintenance_interval_secs == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "jobs",
                reason: "intervals must be positive".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
