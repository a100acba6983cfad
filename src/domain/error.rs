//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors and by parsers that
//! rebuild domain enums from their persisted text forms.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Stakes and sale portions must be strictly positive.
    #[error("stake must be positive, got {stake}")]
    NonPositiveStake {
        /// The invalid stake that was provided.
        stake: rust_decimal::Decimal,
    },

    /// Decimal odds must exceed zero to price a payout.
    #[error("odds must be positive, got {odds}")]
    NonPositiveOdds {
        /// The invalid odds that were provided.
        odds: rust_decimal::Decimal,
    },

    /// A sale haircut is a fraction of value withheld; it cannot consume
    /// the whole position or be negative.
    #[error("sale haircut must be in [0, 1), got {haircut}")]
    InvalidHaircut {
        /// The invalid haircut that was provided.
        haircut: rust_decimal::Decimal,
    },

    /// A bet side must be one of the two binary outcomes.
    #[error("invalid bet side: {value}")]
    InvalidSide { value: String },

    /// A bet status read from storage was not a known lifecycle state.
    #[error("invalid bet status: {value}")]
    InvalidStatus { value: String },

    /// A transaction kind read from storage was not recognized.
    #[error("invalid transaction kind: {value}")]
    InvalidKind { value: String },

    /// A market resolution must be a winning side or invalid.
    #[error("invalid market resolution: {value}")]
    InvalidResolution { value: String },

    /// A market status read from ingestion was not recognized.
    #[error("invalid market status: {value}")]
    InvalidMarketStatus { value: String },
}
