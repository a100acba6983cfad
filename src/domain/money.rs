//! Monetary types for credit amounts.
//!
//! All ledger arithmetic uses fixed-precision decimals. Binary floating
//! point is never used for balances, stakes, or payouts.

use rust_decimal::Decimal;

/// Credit amount represented as a Decimal for precision.
pub type Credits = Decimal;

/// Leaderboard score represented as a Decimal for precision.
pub type Score = Decimal;
