//! Leaderboard types shared between the ranked store and the reconciler.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::money::Score;

/// One member of a descending ranked set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub user_id: UserId,
    pub score: Score,
}

/// Durable ranks to apply to one user. `None` leaves a dimension untouched
/// (the user is absent from that ranking).
#[derive(Debug, Clone, PartialEq)]
pub struct RankAssignment {
    pub user_id: UserId,
    pub rank_by_pnl: Option<i64>,
    pub rank_by_volume: Option<i64>,
}

/// What a reconciliation cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Ranks were read and applied.
    Completed {
        /// Users whose durable ranks were written.
        updated: usize,
        /// Entries referencing users absent from the durable store.
        missing: usize,
    },
    /// Both rankings were empty; nothing to do (cold start).
    Empty,
    /// A cycle was already in flight; this trigger was dropped, not queued.
    SkippedInFlight,
}
