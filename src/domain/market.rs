//! Market snapshot types consumed from the ingestion collaborator.
//!
//! The core never creates or mutates markets. Ingestion supplies read-only
//! snapshots with identifiers, status, and optional decimal odds; the core
//! reacts to status and resolution when gating bets and settling positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bet::BetSide;
use super::error::DomainError;
use super::id::MarketId;
use super::money::Credits;

/// Lifecycle status of a market as reported by ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Accepting new wagers.
    Open,
    /// No longer accepting wagers; not yet resolved.
    Closed,
    /// Resolved to a winning side.
    Resolved,
    /// Voided; pending bets are refunded.
    Invalid,
}

impl MarketStatus {
    /// Canonical text form, as stored and exchanged with collaborators.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Resolved => "resolved",
            Self::Invalid => "invalid",
        }
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "resolved" => Ok(Self::Resolved),
            "invalid" => Ok(Self::Invalid),
            other => Err(DomainError::InvalidMarketStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of a resolved market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketResolution {
    /// The "this" side won.
    This,
    /// The "that" side won.
    That,
    /// The market was voided; stakes are refunded.
    Invalid,
}

impl MarketResolution {
    /// Canonical text form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::This => "this",
            Self::That => "that",
            Self::Invalid => "invalid",
        }
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "this" => Ok(Self::This),
            "that" => Ok(Self::That),
            "invalid" => Ok(Self::Invalid),
            other => Err(DomainError::InvalidResolution {
                value: other.to_string(),
            }),
        }
    }

    /// The winning side, or `None` for a voided market.
    #[must_use]
    pub const fn winning_side(&self) -> Option<BetSide> {
        match self {
            Self::This => Some(BetSide::This),
            Self::That => Some(BetSide::That),
            Self::Invalid => None,
        }
    }
}

/// Read-only market record supplied by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Canonical market identifier.
    pub id: MarketId,
    /// Upstream correlation identifier, when the market came from an
    /// external feed.
    pub external_id: Option<String>,
    /// Current lifecycle status.
    pub status: MarketStatus,
    /// Wagering cutoff. Markets past this instant reject new bets even
    /// while still reported as open.
    pub expires_at: Option<DateTime<Utc>>,
    /// Resolution outcome, present once the market settles.
    pub resolution: Option<MarketResolution>,
    /// Decimal odds for the "this" side, when ingestion prices it.
    pub this_odds: Option<Credits>,
    /// Decimal odds for the "that" side, when ingestion prices it.
    pub that_odds: Option<Credits>,
}

impl MarketSnapshot {
    /// Create an open snapshot with no expiry or pricing.
    pub fn open(id: impl Into<MarketId>) -> Self {
        Self {
            id: id.into(),
            external_id: None,
            status: MarketStatus::Open,
            expires_at: None,
            resolution: None,
            this_odds: None,
            that_odds: None,
        }
    }

    /// Whether the market accepts new wagers at `now`.
    #[must_use]
    pub fn accepts_bets(&self, now: DateTime<Utc>) -> bool {
        if self.status != MarketStatus::Open {
            return false;
        }
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }

    /// Why the market rejects wagers at `now`, for error reporting.
    #[must_use]
    pub fn rejection_reason(&self, now: DateTime<Utc>) -> &'static str {
        if self.status != MarketStatus::Open {
            return self.status.as_str();
        }
        if matches!(self.expires_at, Some(expiry) if now >= expiry) {
            return "expired";
        }
        "open"
    }

    /// Decimal odds for one side, when ingestion supplied them.
    #[must_use]
    pub const fn odds_for(&self, side: BetSide) -> Option<Credits> {
        match side {
            BetSide::This => self.this_odds,
            BetSide::That => self.that_odds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_roundtrips_through_text() {
        for status in [
            MarketStatus::Open,
            MarketStatus::Closed,
            MarketStatus::Resolved,
            MarketStatus::Invalid,
        ] {
            assert_eq!(MarketStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert!(matches!(
            MarketStatus::parse("halted"),
            Err(DomainError::InvalidMarketStatus { .. })
        ));
    }

    #[test]
    fn resolution_winning_side() {
        assert_eq!(
            MarketResolution::This.winning_side(),
            Some(BetSide::This)
        );
        assert_eq!(
            MarketResolution::That.winning_side(),
            Some(BetSide::That)
        );
        assert_eq!(MarketResolution::Invalid.winning_side(), None);
    }

    #[test]
    fn open_snapshot_accepts_bets() {
        let market = MarketSnapshot::open("m1");
        assert!(market.accepts_bets(Utc::now()));
    }

    #[test]
    fn closed_snapshot_rejects_bets() {
        let mut market = MarketSnapshot::open("m1");
        market.status = MarketStatus::Closed;

        assert!(!market.accepts_bets(Utc::now()));
        assert_eq!(market.rejection_reason(Utc::now()), "closed");
    }

    #[test]
    fn expired_snapshot_rejects_bets() {
        let mut market = MarketSnapshot::open("m1");
        market.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));

        assert!(!market.accepts_bets(Utc::now()));
        assert_eq!(market.rejection_reason(Utc::now()), "expired");
    }

    #[test]
    fn odds_lookup_per_side() {
        let mut market = MarketSnapshot::open("m1");
        market.this_odds = Some(dec!(1.8));
        market.that_odds = Some(dec!(2.1));

        assert_eq!(market.odds_for(BetSide::This), Some(dec!(1.8)));
        assert_eq!(market.odds_for(BetSide::That), Some(dec!(2.1)));
    }
}
