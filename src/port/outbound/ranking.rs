//! Ranked store port: the fast leaderboard cache.

use async_trait::async_trait;

use crate::domain::leaderboard::RankedEntry;
use crate::error::Result;

/// Read access to the two live rankings.
///
/// The store is an opaque cache rebuilt independently of this core; its
/// loss costs rank staleness only, never balances.
#[async_trait]
pub trait RankedStore: Send + Sync {
    /// Full PnL ranking, best first.
    async fn pnl_ranking(&self) -> Result<Vec<RankedEntry>>;

    /// Full volume ranking, best first.
    async fn volume_ranking(&self) -> Result<Vec<RankedEntry>>;
}
