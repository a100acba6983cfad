//! Bet lifecycle types.
//!
//! A bet is a user's stake on one side of a binary market. It is created
//! `pending` by the betting engine and moves to exactly one terminal state:
//! `won` or `lost` at settlement, or `cancelled` on refund or full sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BetId, MarketId, UserId};
use super::money::Credits;
use super::transaction::TransactionKind;

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetSide {
    This,
    That,
}

impl BetSide {
    /// Canonical text form, as persisted.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::This => "this",
            Self::That => "that",
        }
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "this" => Ok(Self::This),
            "that" => Ok(Self::That),
            other => Err(DomainError::InvalidSide {
                value: other.to_string(),
            }),
        }
    }

    /// The opposing side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::This => Self::That,
            Self::That => Self::This,
        }
    }
}

/// Lifecycle state of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Open position awaiting settlement.
    Pending,
    /// Settled on the winning side; payout credited.
    Won,
    /// Settled on the losing side; stake forfeited.
    Lost,
    /// Refunded (voided market) or closed by a full early sale.
    Cancelled,
}

impl BetStatus {
    /// Canonical text form, as persisted.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "pending" => Ok(Self::Pending),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }

    /// Terminal states are never left once entered.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A user's stake on one side of a binary market.
///
/// Fields are private; mutation happens in the store under a write
/// transaction, and entities read back are immutable snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Bet {
    id: BetId,
    user_id: UserId,
    market_id: MarketId,
    side: BetSide,
    amount: Credits,
    idempotency_key: Option<String>,
    status: BetStatus,
    created_at: DateTime<Utc>,
    settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    /// Reconstruct a bet from its parts, validating the stake.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositiveStake`] when the amount is not
    /// strictly positive.
    pub fn try_new(
        id: BetId,
        user_id: UserId,
        market_id: MarketId,
        side: BetSide,
        amount: Credits,
        idempotency_key: Option<String>,
        status: BetStatus,
        created_at: DateTime<Utc>,
        settled_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if amount <= Credits::ZERO {
            return Err(DomainError::NonPositiveStake { stake: amount });
        }
        Ok(Self {
            id,
            user_id,
            market_id,
            side,
            amount,
            idempotency_key,
            status,
            created_at,
            settled_at,
        })
    }

    /// Create a fresh pending bet with the given identifier.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositiveStake`] when the amount is not
    /// strictly positive.
    pub fn place(
        id: BetId,
        user_id: UserId,
        market_id: MarketId,
        side: BetSide,
        amount: Credits,
        idempotency_key: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::try_new(
            id,
            user_id,
            market_id,
            side,
            amount,
            idempotency_key,
            BetStatus::Pending,
            Utc::now(),
            None,
        )
    }

    /// Get the bet ID.
    #[must_use]
    pub fn id(&self) -> &BetId {
        &self.id
    }

    /// Get the owning user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the market this bet is placed on.
    #[must_use]
    pub fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    /// Get the chosen side.
    #[must_use]
    pub fn side(&self) -> BetSide {
        self.side
    }

    /// Get the remaining stake.
    #[must_use]
    pub fn amount(&self) -> Credits {
        self.amount
    }

    /// Get the client-supplied idempotency key, if any.
    #[must_use]
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Get the lifecycle status.
    #[must_use]
    pub fn status(&self) -> BetStatus {
        self.status
    }

    /// Get the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the time the bet entered a terminal state, if it has.
    #[must_use]
    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    /// Whether the bet is still awaiting settlement.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == BetStatus::Pending
    }
}

/// How a single pending bet resolves at settlement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettlementOutcome {
    /// The bet was on the winning side; credit the payout.
    Won { payout: Credits },
    /// The bet was on the losing side; no credit.
    Lost,
    /// The market was voided; return the stake.
    Refunded { amount: Credits },
}

impl SettlementOutcome {
    /// The terminal status this outcome transitions the bet into.
    #[must_use]
    pub const fn final_status(&self) -> BetStatus {
        match self {
            Self::Won { .. } => BetStatus::Won,
            Self::Lost => BetStatus::Lost,
            Self::Refunded { .. } => BetStatus::Cancelled,
        }
    }

    /// The ledger credit this outcome produces, if any.
    #[must_use]
    pub const fn credit(&self) -> Option<(TransactionKind, Credits)> {
        match self {
            Self::Won { payout } => Some((TransactionKind::Payout, *payout)),
            Self::Lost => None,
            Self::Refunded { amount } => Some((TransactionKind::Refund, *amount)),
        }
    }
}
