//! SQLite account store.

use chrono::Utc;
use diesel::prelude::*;

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::database::connection::{
    configure_sqlite_connection, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::{TransactionRow, UserRow};
use crate::adapter::outbound::sqlite::database::schema::{credit_transactions, users};
use crate::domain::account::UserAccount;
use crate::domain::id::{TransactionId, UserId};
use crate::domain::leaderboard::RankAssignment;
use crate::domain::money::Credits;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::{Error, Result};
use crate::port::outbound::store::AccountStore;

/// SQLite-backed account store.
pub struct SqliteAccountStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteAccountStore {
    /// Create a new account store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn open_account(
        &self,
        user_id: &UserId,
        opening_balance: Credits,
    ) -> Result<UserAccount> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;

        let now = Utc::now();
        let row = UserRow {
            id: user_id.to_string(),
            credit_balance: opening_balance.to_string(),
            rank_by_pnl: None,
            rank_by_volume: None,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        conn.immediate_transaction(|conn| {
            diesel::insert_into(users::table).values(&row).execute(conn)?;

            // Opening grant keeps the replay-from-zero invariant intact.
            if opening_balance > Credits::ZERO {
                let grant = CreditTransaction {
                    id: TransactionId::new(),
                    user_id: user_id.clone(),
                    amount: opening_balance,
                    kind: TransactionKind::Grant,
                    reference_id: None,
                    balance_after: opening_balance,
                    created_at: now,
                };
                diesel::insert_into(credit_transactions::table)
                    .values(TransactionRow::from_domain(&grant))
                    .execute(conn)?;
            }
            Ok::<(), Error>(())
        })?;

        row.into_domain()
    }

    async fn get_account(&self, user_id: &UserId) -> Result<Option<UserAccount>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<UserRow> = users::table
            .find(user_id.as_str())
            .first(&mut conn)
            .optional()?;

        row.map(UserRow::into_domain).transpose()
    }

    async fn apply_rank(&self, assignment: &RankAssignment) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;

        let now = Utc::now().to_rfc3339();
        let target = users::table.find(assignment.user_id.as_str());

        let updated = match (assignment.rank_by_pnl, assignment.rank_by_volume) {
            (Some(pnl), Some(volume)) => diesel::update(target)
                .set((
                    users::rank_by_pnl.eq(Some(pnl)),
                    users::rank_by_volume.eq(Some(volume)),
                    users::updated_at.eq(now.clone()),
                ))
                .execute(&mut conn)?,
            (Some(pnl), None) => diesel::update(target)
                .set((
                    users::rank_by_pnl.eq(Some(pnl)),
                    users::updated_at.eq(now.clone()),
                ))
                .execute(&mut conn)?,
            (None, Some(volume)) => diesel::update(target)
                .set((
                    users::rank_by_volume.eq(Some(volume)),
                    users::updated_at.eq(now.clone()),
                ))
                .execute(&mut conn)?,
            (None, None) => return Ok(true),
        };

        Ok(updated > 0)
    }
}
