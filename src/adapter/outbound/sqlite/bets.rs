//! SQLite bet store.
//!
//! Bets and their ledger effects commit together: placement is one
//! transaction (capture hold, debit stake, insert row), settlement is a
//! compare-and-set on `pending` plus the credit, and sales adjust the
//! stake and credit proceeds in one unit. A rollback therefore never
//! leaves an orphaned debit or a paid-but-pending bet.

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::database::connection::{
    configure_sqlite_connection, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::{parse_decimal, BetRow};
use crate::adapter::outbound::sqlite::database::schema::{bets, holds};
use crate::adapter::outbound::sqlite::ledger::apply_with_conn;
use crate::domain::bet::{Bet, BetStatus, SettlementOutcome};
use crate::domain::id::{BetId, HoldId, MarketId, UserId};
use crate::domain::money::Credits;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::{BetError, Error, Result};
use crate::port::outbound::store::BetStore;

/// SQLite-backed bet store.
pub struct SqliteBetStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteBetStore {
    /// Create a new bet store with the given connection pool.
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
impl BetStore for SqliteBetStore {
    async fn insert_with_debit(&self, bet: &Bet, hold_id: &HoldId) -> Result<CreditTransaction> {
        let mut conn = self.conn()?;
        let row = BetRow::from_domain(bet);

        conn.immediate_transaction(|conn| {
            // The unique index on (user_id, idempotency_key) turns a keyed
            // replay into a rollback; the engine resolves it to the prior
            // bet. Insert first so the debit never survives a duplicate.
            diesel::insert_into(bets::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => Error::Bet(BetError::DuplicateRequest {
                        key: bet.idempotency_key().unwrap_or_default().to_string(),
                    }),
                    other => Error::from(other),
                })?;

            // Capture the covering hold so the stake is not counted twice
            // by the availability check inside the debit.
            diesel::delete(holds::table.find(hold_id.as_str())).execute(conn)?;

            apply_with_conn(
                conn,
                bet.user_id(),
                -bet.amount(),
                TransactionKind::Bet,
                Some(bet.id().to_string()),
            )
        })
    }

    async fn get(&self, bet_id: &BetId) -> Result<Option<Bet>> {
        let mut conn = self.conn()?;
        let row: Option<BetRow> = bets::table
            .find(bet_id.as_str())
            .first(&mut conn)
            .optional()?;
        row.map(BetRow::into_domain).transpose()
    }

    async fn find_by_idempotency_key(&self, user_id: &UserId, key: &str) -> Result<Option<Bet>> {
        let mut conn = self.conn()?;
        let row: Option<BetRow> = bets::table
            .filter(bets::user_id.eq(user_id.as_str()))
            .filter(bets::idempotency_key.eq(key))
            .first(&mut conn)
            .optional()?;
        row.map(BetRow::into_domain).transpose()
    }

    async fn pending_for_market(&self, market_id: &MarketId) -> Result<Vec<Bet>> {
        let mut conn = self.conn()?;
        let rows: Vec<BetRow> = bets::table
            .filter(bets::market_id.eq(market_id.as_str()))
            .filter(bets::status.eq(BetStatus::Pending.as_str()))
            .order(bets::created_at.asc())
            .load(&mut conn)?;
        rows.into_iter().map(BetRow::into_domain).collect()
    }

    async fn settle(&self, bet_id: &BetId, outcome: &SettlementOutcome) -> Result<bool> {
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        conn.immediate_transaction(|conn| {
            // Compare-and-set: only a still-pending bet transitions, which
            // makes resettlement and resume-after-failure no-ops per bet.
            let transitioned = diesel::update(
                bets::table
                    .find(bet_id.as_str())
                    .filter(bets::status.eq(BetStatus::Pending.as_str())),
            )
            .set((
                bets::status.eq(outcome.final_status().as_str()),
                bets::settled_at.eq(Some(now.clone())),
            ))
            .execute(conn)?;

            if transitioned == 0 {
                return Ok(false);
            }

            if let Some((kind, amount)) = outcome.credit() {
                let user_id: String = bets::table
                    .find(bet_id.as_str())
                    .select(bets::user_id)
                    .first(conn)?;
                apply_with_conn(
                    conn,
                    &UserId::from(user_id),
                    amount,
                    kind,
                    Some(bet_id.to_string()),
                )?;
            }

            Ok(true)
        })
    }

    async fn sell(&self, bet_id: &BetId, portion: Credits, proceeds: Credits) -> Result<Bet> {
        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row: Option<BetRow> = bets::table
                .find(bet_id.as_str())
                .first(conn)
                .optional()?;
            let row = row.ok_or_else(|| {
                Error::Bet(BetError::UnknownBet {
                    bet_id: bet_id.to_string(),
                })
            })?;

            // Re-checked under the write lock; the service's earlier read
            // may have raced a settlement.
            if row.status != BetStatus::Pending.as_str() {
                return Err(Error::Bet(BetError::BetNotOpen {
                    bet_id: bet_id.to_string(),
                    status: row.status,
                }));
            }

            let stake = parse_decimal(&row.amount)?;
            if portion > stake {
                return Err(Error::Bet(BetError::SaleExceedsStake {
                    requested: portion,
                    stake,
                }));
            }

            if portion == stake {
                diesel::update(bets::table.find(bet_id.as_str()))
                    .set((
                        bets::status.eq(BetStatus::Cancelled.as_str()),
                        bets::settled_at.eq(Some(Utc::now().to_rfc3339())),
                    ))
                    .execute(conn)?;
            } else {
                diesel::update(bets::table.find(bet_id.as_str()))
                    .set(bets::amount.eq((stake - portion).to_string()))
                    .execute(conn)?;
            }

            apply_with_conn(
                conn,
                &UserId::from(row.user_id.clone()),
                proceeds,
                TransactionKind::Sell,
                Some(bet_id.to_string()),
            )?;

            let updated: BetRow = bets::table.find(bet_id.as_str()).first(conn)?;
            updated.into_domain()
        })
    }
}
