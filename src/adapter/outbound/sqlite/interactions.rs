//! SQLite skip-record store.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::database::connection::{
    configure_sqlite_connection, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::InteractionRow;
use crate::adapter::outbound::sqlite::database::schema::user_market_interactions as interactions;
use crate::domain::id::{MarketId, UserId};
use crate::domain::interaction::SkipRecord;
use crate::error::{Error, Result};
use crate::port::outbound::store::InteractionStore;

/// SQLite-backed skip store.
pub struct SqliteInteractionStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteInteractionStore {
    /// Create a new interaction store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;
        Ok(conn)
    }
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn upsert_skip(&self, record: &SkipRecord) -> Result<()> {
        let mut conn = self.conn()?;

        // Replace on the (user, market) key resets the TTL window.
        diesel::replace_into(interactions::table)
            .values(InteractionRow::from_domain(record))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn list_active(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<Vec<MarketId>> {
        let mut conn = self.conn()?;

        let ids: Vec<String> = interactions::table
            .filter(interactions::user_id.eq(user_id.as_str()))
            .filter(interactions::expires_at.gt(now.to_rfc3339()))
            .select(interactions::market_id)
            .load(&mut conn)?;

        Ok(ids.into_iter().map(MarketId::from).collect())
    }

    async fn remove(&self, user_id: &UserId, market_id: &MarketId) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            interactions::table
                .filter(interactions::user_id.eq(user_id.as_str()))
                .filter(interactions::market_id.eq(market_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            interactions::table.filter(interactions::expires_at.le(now.to_rfc3339())),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}
