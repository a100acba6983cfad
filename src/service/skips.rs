//! Skip tracker: per-user market exclusions with a TTL.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::id::{MarketId, UserId};
use crate::domain::interaction::SkipRecord;
use crate::error::Result;
use crate::port::outbound::store::InteractionStore;

/// Confirmation of a recorded skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipReceipt {
    /// When the exclusion lapses.
    pub expires_at: DateTime<Utc>,
}

/// Skip-tracking application service.
#[derive(Clone)]
pub struct SkipTracker {
    interactions: Arc<dyn InteractionStore>,
    ttl: Duration,
}

impl SkipTracker {
    /// Create a tracker with the configured skip TTL.
    pub fn new(interactions: Arc<dyn InteractionStore>, ttl_days: i64) -> Self {
        Self {
            interactions,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Record (or refresh) a skip. Re-skipping restarts the TTL window.
    pub async fn skip(&self, user_id: &UserId, market_id: &MarketId) -> Result<SkipReceipt> {
        let record = SkipRecord::new(user_id.clone(), market_id.clone(), self.ttl);
        self.interactions.upsert_skip(&record).await?;
        debug!(user = %user_id, market = %market_id, expires_at = %record.expires_at, "Recorded skip");
        Ok(SkipReceipt {
            expires_at: record.expires_at,
        })
    }

    /// Markets the user is currently excluding.
    pub async fn list_skipped(&self, user_id: &UserId) -> Result<Vec<MarketId>> {
        self.interactions.list_active(user_id, Utc::now()).await
    }

    /// Drop a skip early. Returns `false` when none existed.
    pub async fn remove_skip(&self, user_id: &UserId, market_id: &MarketId) -> Result<bool> {
        self.interactions.remove(user_id, market_id).await
    }

    /// Delete expired skip rows. Returns count deleted.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let pruned = self.interactions.prune_expired(Utc::now()).await?;
        if pruned > 0 {
            info!(pruned, "Pruned expired skips");
        }
        Ok(pruned)
    }
}
