//! In-memory market directory.
//!
//! Stand-in for the ingestion collaborator: holds snapshots keyed by
//! canonical id with a secondary index on the external correlation id.
//! Production deployments replace this with an adapter over ingestion's
//! actual feed; the port contract is identical.

use dashmap::DashMap;

use async_trait::async_trait;

use crate::domain::market::MarketSnapshot;
use crate::error::Result;
use crate::port::outbound::market::MarketDirectory;

/// DashMap-backed market directory.
#[derive(Default)]
pub struct InMemoryMarketDirectory {
    by_id: DashMap<String, MarketSnapshot>,
    external_to_id: DashMap<String, String>,
}

impl InMemoryMarketDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a snapshot, indexing its external id if present.
    pub fn upsert(&self, snapshot: MarketSnapshot) {
        if let Some(external) = &snapshot.external_id {
            self.external_to_id
                .insert(external.clone(), snapshot.id.to_string());
        }
        self.by_id.insert(snapshot.id.to_string(), snapshot);
    }

    /// Remove a snapshot by canonical id.
    pub fn remove(&self, market_id: &str) {
        if let Some((_, snapshot)) = self.by_id.remove(market_id) {
            if let Some(external) = snapshot.external_id {
                self.external_to_id.remove(&external);
            }
        }
    }

    /// Number of tracked markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no markets are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl MarketDirectory for InMemoryMarketDirectory {
    async fn resolve(&self, market_ref: &str) -> Result<Option<MarketSnapshot>> {
        if let Some(snapshot) = self.by_id.get(market_ref) {
            return Ok(Some(snapshot.clone()));
        }
        if let Some(id) = self.external_to_id.get(market_ref) {
            return Ok(self.by_id.get(id.value()).map(|s| s.clone()));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::MarketId;

    #[tokio::test]
    async fn resolves_by_canonical_and_external_id() {
        let directory = InMemoryMarketDirectory::new();
        let mut snapshot = MarketSnapshot::open("m1");
        snapshot.external_id = Some("ext-42".into());
        directory.upsert(snapshot);

        let by_id = directory.resolve("m1").await.unwrap().unwrap();
        assert_eq!(by_id.id, MarketId::new("m1"));

        let by_external = directory.resolve("ext-42").await.unwrap().unwrap();
        assert_eq!(by_external.id, MarketId::new("m1"));

        assert!(directory.resolve("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_drops_both_indexes() {
        let directory = InMemoryMarketDirectory::new();
        let mut snapshot = MarketSnapshot::open("m1");
        snapshot.external_id = Some("ext-42".into());
        directory.upsert(snapshot);

        directory.remove("m1");
        assert!(directory.resolve("m1").await.unwrap().is_none());
        assert!(directory.resolve("ext-42").await.unwrap().is_none());
    }
}
