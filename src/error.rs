use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Ledger errors for balance mutations and history queries.
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("unknown user: {user_id}")]
    UnknownUser { user_id: String },

    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: rust_decimal::Decimal },

    #[error("page limit must be positive, got {limit}")]
    NonPositiveLimit { limit: i64 },

    #[error("page limit {limit} exceeds maximum {max}")]
    LimitTooLarge { limit: i64, max: i64 },

    #[error("offset must be non-negative, got {offset}")]
    NegativeOffset { offset: i64 },
}

/// Bet placement, sale, and settlement errors.
#[derive(Error, Debug, Clone)]
pub enum BetError {
    #[error("stake {amount} outside allowed range {min}..={max}")]
    StakeOutOfRange {
        amount: rust_decimal::Decimal,
        min: rust_decimal::Decimal,
        max: rust_decimal::Decimal,
    },

    #[error("market {market_id} not open for wagering: {reason}")]
    MarketNotOpen { market_id: String, reason: String },

    #[error("market lookup did not complete within {timeout_ms}ms")]
    MarketUnavailable { timeout_ms: u64 },

    #[error("unknown bet: {bet_id}")]
    UnknownBet { bet_id: String },

    #[error("bet {bet_id} is not open (status: {status})")]
    BetNotOpen { bet_id: String, status: String },

    #[error("sale amount {requested} exceeds remaining stake {stake}")]
    SaleExceedsStake {
        requested: rust_decimal::Decimal,
        stake: rust_decimal::Decimal,
    },

    /// Raised by the store when an idempotency key collides for a user.
    /// The betting engine resolves it by returning the prior bet.
    #[error("duplicate request for idempotency key {key}")]
    DuplicateRequest { key: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Bet(#[from] BetError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}
