//! Leaderboard reconciler: copies ranked-store standings into durable
//! per-user rank fields.
//!
//! Runs at most one cycle at a time; overlapping triggers are dropped,
//! not queued. The ranked store stays authoritative for ordering, the
//! durable fields are a denormalized snapshot for profile reads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::id::UserId;
use crate::domain::leaderboard::{RankAssignment, RankedEntry, SyncOutcome};
use crate::error::Result;
use crate::port::outbound::ranking::RankedStore;
use crate::port::outbound::store::AccountStore;

/// Leaderboard reconciliation service.
#[derive(Clone)]
pub struct LeaderboardSync {
    ranked: Arc<dyn RankedStore>,
    accounts: Arc<dyn AccountStore>,
    in_flight: Arc<AtomicBool>,
}

impl LeaderboardSync {
    /// Create a reconciler over the ranked and durable stores.
    pub fn new(ranked: Arc<dyn RankedStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            ranked,
            accounts,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run one reconciliation cycle, single-flight.
    pub async fn sync_to_db(&self) -> Result<SyncOutcome> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("Leaderboard sync already in flight; dropping trigger");
            return Ok(SyncOutcome::SkippedInFlight);
        }
        let result = self.run_cycle().await;
        self.in_flight.store(false, Ordering::Release);
        result
    }

    async fn run_cycle(&self) -> Result<SyncOutcome> {
        let by_pnl = self.ranked.pnl_ranking().await?;
        let by_volume = self.ranked.volume_ranking().await?;

        if by_pnl.is_empty() && by_volume.is_empty() {
            info!("Both rankings empty; nothing to reconcile");
            return Ok(SyncOutcome::Empty);
        }

        let assignments = merge_rankings(&by_pnl, &by_volume);
        let mut updated = 0usize;
        let mut missing = 0usize;
        for assignment in assignments.values() {
            match self.accounts.apply_rank(assignment).await {
                Ok(true) => updated += 1,
                Ok(false) => {
                    // Ranked entry for a user the durable store never saw.
                    debug!(user = %assignment.user_id, "Skipping rank for unknown user");
                    missing += 1;
                }
                Err(e) => {
                    warn!(user = %assignment.user_id, error = %e, "Failed to apply rank");
                }
            }
        }

        info!(updated, missing, "Leaderboard sync complete");
        Ok(SyncOutcome::Completed { updated, missing })
    }
}

/// Merge the two descending rankings into 1-based per-user assignments.
fn merge_rankings(
    by_pnl: &[RankedEntry],
    by_volume: &[RankedEntry],
) -> HashMap<UserId, RankAssignment> {
    let mut merged: HashMap<UserId, RankAssignment> = HashMap::new();
    for (idx, entry) in by_pnl.iter().enumerate() {
        merged
            .entry(entry.user_id.clone())
            .or_insert_with(|| blank(entry.user_id.clone()))
            .rank_by_pnl = Some(idx as i64 + 1);
    }
    for (idx, entry) in by_volume.iter().enumerate() {
        merged
            .entry(entry.user_id.clone())
            .or_insert_with(|| blank(entry.user_id.clone()))
            .rank_by_volume = Some(idx as i64 + 1);
    }
    merged
}

fn blank(user_id: UserId) -> RankAssignment {
    RankAssignment {
        user_id,
        rank_by_pnl: None,
        rank_by_volume: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(user: &str, score: rust_decimal::Decimal) -> RankedEntry {
        RankedEntry {
            user_id: UserId::new(user),
            score,
        }
    }

    #[test]
    fn merge_assigns_one_based_ranks_per_dimension() {
        let by_pnl = vec![entry("alice", dec!(120)), entry("bob", dec!(80))];
        let by_volume = vec![entry("bob", dec!(500)), entry("carol", dec!(300))];

        let merged = merge_rankings(&by_pnl, &by_volume);

        let alice = &merged[&UserId::new("alice")];
        assert_eq!(alice.rank_by_pnl, Some(1));
        assert_eq!(alice.rank_by_volume, None);

        let bob = &merged[&UserId::new("bob")];
        assert_eq!(bob.rank_by_pnl, Some(2));
        assert_eq!(bob.rank_by_volume, Some(1));

        let carol = &merged[&UserId::new("carol")];
        assert_eq!(carol.rank_by_pnl, None);
        assert_eq!(carol.rank_by_volume, Some(2));
    }

    #[test]
    fn merge_of_empty_rankings_is_empty() {
        assert!(merge_rankings(&[], &[]).is_empty());
    }
}
