//! Credit holds: TTL-bounded reservations against a balance.
//!
//! A hold subtracts from available credits without touching the balance.
//! The betting engine places one for the stake before its market gate and
//! captures it inside the debit transaction; holds that are never captured
//! stop counting once expired and are deleted by the maintenance sweep.

use chrono::{DateTime, Duration, Utc};

use super::id::{HoldId, UserId};
use super::money::Credits;

/// One active reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct Hold {
    pub id: HoldId,
    pub user_id: UserId,
    pub amount: Credits,
    /// What the reservation is for (a bet placement, a pending sale).
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Hold {
    /// Create a fresh hold expiring `ttl` from now.
    #[must_use]
    pub fn reserve(
        user_id: UserId,
        amount: Credits,
        reference_id: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: HoldId::new(),
            user_id,
            amount,
            reference_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Expired holds no longer count against availability.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
