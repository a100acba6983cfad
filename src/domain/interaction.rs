//! Per-user-per-market skip records with a TTL.
//!
//! A skip is an exclusion hint for market selection, never authoritative
//! state. Re-skipping refreshes the window; reads filter by expiry so a
//! late cleanup sweep only costs staleness, not correctness.

use chrono::{DateTime, Duration, Utc};

use super::id::{MarketId, UserId};

/// Recorded interaction kind. Only skips are tracked today.
pub const SKIP_ACTION: &str = "skip";

/// One skip record; upserted on `(user_id, market_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipRecord {
    pub user_id: UserId,
    pub market_id: MarketId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SkipRecord {
    /// Create a skip expiring `ttl` from now.
    #[must_use]
    pub fn new(user_id: UserId, market_id: MarketId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            market_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Expired skips no longer exclude the market.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
