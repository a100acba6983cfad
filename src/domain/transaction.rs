//! Immutable credit transaction records.
//!
//! Every balance mutation appends one of these rows. For a user, replaying
//! the log ordered by creation time from zero must reconstruct the stored
//! balance; `balance_after` is denormalized for fast history reads and any
//! divergence from the running sum is a corruption signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{TransactionId, UserId};
use super::money::Credits;

/// Why a balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Opening balance or top-up from the account collaborator.
    Grant,
    /// Stake debit at bet placement.
    Bet,
    /// Winning credit at settlement.
    Payout,
    /// Stake returned for a voided market.
    Refund,
    /// Proceeds of an early position sale.
    Sell,
}

impl TransactionKind {
    /// Canonical text form, as persisted.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Bet => "bet",
            Self::Payout => "payout",
            Self::Refund => "refund",
            Self::Sell => "sell",
        }
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "grant" => Ok(Self::Grant),
            "bet" => Ok(Self::Bet),
            "payout" => Ok(Self::Payout),
            "refund" => Ok(Self::Refund),
            "sell" => Ok(Self::Sell),
            other => Err(DomainError::InvalidKind {
                value: other.to_string(),
            }),
        }
    }
}

/// One appended ledger row. `amount` is signed: debits are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount: Credits,
    pub kind: TransactionKind,
    /// What the mutation refers to (bet id, hold id, sale, ...), if anything.
    pub reference_id: Option<String>,
    /// Balance immediately after this row was applied.
    pub balance_after: Credits,
    pub created_at: DateTime<Utc>,
}

impl CreditTransaction {
    /// Whether this row took credits from the balance.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount < Credits::ZERO
    }
}
