//! User account and balance views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::money::Credits;

/// Durable per-user account row.
///
/// `credit_balance` is authoritative; availability is derived by subtracting
/// active holds and is reported through [`BalanceSnapshot`]. Rank fields are
/// periodic snapshots written by the leaderboard reconciler and may lag the
/// ranked store by up to one sync interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub credit_balance: Credits,
    pub rank_by_pnl: Option<i64>,
    pub rank_by_volume: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Point-in-time balance view. Invariant: `available <= balance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Authoritative stored balance.
    pub balance: Credits,
    /// Balance minus the sum of unexpired holds.
    pub available: Credits,
}

/// Result of replaying a user's transaction log against the stored balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerAudit {
    /// Balance currently stored on the account row.
    pub stored: Credits,
    /// Cumulative sum of the full ordered transaction log from zero.
    pub replayed: Credits,
}

impl LedgerAudit {
    /// A mismatch here is a corruption signal, never expected in operation.
    #[must_use]
    pub fn consistent(&self) -> bool {
        self.stored == self.replayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn audit_flags_divergence() {
        let ok = LedgerAudit {
            stored: dec!(100),
            replayed: dec!(100),
        };
        assert!(ok.consistent());

        let bad = LedgerAudit {
            stored: dec!(100),
            replayed: dec!(99.5),
        };
        assert!(!bad.consistent());
    }
}
