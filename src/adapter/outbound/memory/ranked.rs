//! In-memory ranked store.
//!
//! Stand-in for the external leaderboard cache: two independent score
//! maps read back in descending order. Scores are written by whatever
//! computes PnL and volume (external to this core); the reconciler only
//! reads.

use dashmap::DashMap;

use async_trait::async_trait;

use crate::domain::id::UserId;
use crate::domain::leaderboard::RankedEntry;
use crate::domain::money::Score;
use crate::error::Result;
use crate::port::outbound::ranking::RankedStore;

/// DashMap-backed ranked store with PnL and volume dimensions.
#[derive(Default)]
pub struct InMemoryRankedStore {
    pnl: DashMap<UserId, Score>,
    volume: DashMap<UserId, Score>,
}

impl InMemoryRankedStore {
    /// Create an empty ranked store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user's PnL score.
    pub fn set_pnl(&self, user_id: UserId, score: Score) {
        self.pnl.insert(user_id, score);
    }

    /// Set a user's volume score.
    pub fn set_volume(&self, user_id: UserId, score: Score) {
        self.volume.insert(user_id, score);
    }

    /// Drop a user from both rankings.
    pub fn clear_user(&self, user_id: &UserId) {
        self.pnl.remove(user_id);
        self.volume.remove(user_id);
    }

    fn ranking(map: &DashMap<UserId, Score>) -> Vec<RankedEntry> {
        let mut entries: Vec<RankedEntry> = map
            .iter()
            .map(|e| RankedEntry {
                user_id: e.key().clone(),
                score: *e.value(),
            })
            .collect();
        // Descending by score; user id breaks ties deterministically.
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.user_id.as_str().cmp(b.user_id.as_str()))
        });
        entries
    }
}

#[async_trait]
impl RankedStore for InMemoryRankedStore {
    async fn pnl_ranking(&self) -> Result<Vec<RankedEntry>> {
        Ok(Self::ranking(&self.pnl))
    }

    async fn volume_ranking(&self) -> Result<Vec<RankedEntry>> {
        Ok(Self::ranking(&self.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn rankings_read_descending() {
        let store = InMemoryRankedStore::new();
        store.set_pnl(UserId::new("alice"), dec!(120));
        store.set_pnl(UserId::new("bob"), dec!(300));
        store.set_pnl(UserId::new("carol"), dec!(-40));

        let ranking = store.pnl_ranking().await.unwrap();
        let order: Vec<&str> = ranking.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, ["bob", "alice", "carol"]);
    }

    #[tokio::test]
    async fn dimensions_are_independent() {
        let store = InMemoryRankedStore::new();
        store.set_pnl(UserId::new("alice"), dec!(10));
        store.set_volume(UserId::new("bob"), dec!(500));

        assert_eq!(store.pnl_ranking().await.unwrap().len(), 1);
        assert_eq!(store.volume_ranking().await.unwrap().len(), 1);

        store.clear_user(&UserId::new("alice"));
        assert!(store.pnl_ranking().await.unwrap().is_empty());
    }
}
