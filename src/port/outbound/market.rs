//! Market directory port: read-only lookups against ingested markets.

use async_trait::async_trait;

use crate::domain::market::MarketSnapshot;
use crate::error::Result;

/// Lookup into the ingestion collaborator's market records.
///
/// The core never writes through this port. Callers gating bet placement
/// must wrap lookups in a bounded timeout and fail closed.
#[async_trait]
pub trait MarketDirectory: Send + Sync {
    /// Resolve a market by canonical id or external correlation id.
    async fn resolve(&self, market_ref: &str) -> Result<Option<MarketSnapshot>>;
}
