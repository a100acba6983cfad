//! SQLite ledger store.
//!
//! Every balance mutation runs inside an immediate (write-locking) SQLite
//! transaction: read the stored balance, check availability against
//! unexpired holds, append the transaction row, update the balance. The
//! DB-level lock serializes concurrent mutations for a user across
//! processes; no process-local mutex is involved.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::{
    configure_sqlite_connection, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::{
    parse_decimal, HoldRow, TransactionRow,
};
use crate::adapter::outbound::sqlite::database::schema::{credit_transactions, holds, users};
use crate::domain::account::BalanceSnapshot;
use crate::domain::hold::Hold;
use crate::domain::id::{HoldId, TransactionId, UserId};
use crate::domain::money::Credits;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::{Error, LedgerError, Result};
use crate::port::outbound::store::{HistoryQuery, LedgerStore};

/// Page size applied when a history query names none.
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// SQLite-backed ledger store.
pub struct SqliteLedgerStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteLedgerStore {
    /// Create a new ledger store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;
        Ok(conn)
    }
}

/// Stored balance for a user, or `UnknownUser`.
pub(crate) fn stored_balance_with_conn(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Credits> {
    let raw: Option<String> = users::table
        .find(user_id.as_str())
        .select(users::credit_balance)
        .first(conn)
        .optional()?;
    match raw {
        Some(raw) => parse_decimal(&raw),
        None => Err(LedgerError::UnknownUser {
            user_id: user_id.to_string(),
        }
        .into()),
    }
}

/// Sum of the user's unexpired holds at `now`.
pub(crate) fn holds_sum_with_conn(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    now: DateTime<Utc>,
) -> Result<Credits> {
    let amounts: Vec<String> = holds::table
        .filter(holds::user_id.eq(user_id.as_str()))
        .filter(holds::expires_at.gt(now.to_rfc3339()))
        .select(holds::amount)
        .load(conn)?;

    let mut sum = Decimal::ZERO;
    for raw in amounts {
        sum += parse_decimal(&raw)?;
    }
    Ok(sum)
}

/// Apply a signed delta to the user's balance and append the transaction
/// row. Must run inside a write transaction; this is the single point
/// every mutation (grant, bet, payout, refund, sell) funnels through.
pub(crate) fn apply_with_conn(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    amount: Credits,
    kind: TransactionKind,
    reference_id: Option<String>,
) -> Result<CreditTransaction> {
    let now = Utc::now();
    let balance = stored_balance_with_conn(conn, user_id)?;

    if amount < Credits::ZERO {
        let held = holds_sum_with_conn(conn, user_id, now)?;
        let available = balance - held;
        if -amount > available {
            return Err(LedgerError::InsufficientFunds {
                requested: -amount,
                available,
            }
            .into());
        }
    }

    let balance_after = balance + amount;
    let tx = CreditTransaction {
        id: TransactionId::new(),
        user_id: user_id.clone(),
        amount,
        kind,
        reference_id,
        balance_after,
        created_at: now,
    };

    diesel::insert_into(credit_transactions::table)
        .values(TransactionRow::from_domain(&tx))
        .execute(conn)?;

    diesel::update(users::table.find(user_id.as_str()))
        .set((
            users::credit_balance.eq(balance_after.to_string()),
            users::updated_at.eq(now.to_rfc3339()),
        ))
        .execute(conn)?;

    Ok(tx)
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn apply(
        &self,
        user_id: &UserId,
        amount: Credits,
        kind: TransactionKind,
        reference_id: Option<String>,
    ) -> Result<CreditTransaction> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            apply_with_conn(conn, user_id, amount, kind, reference_id)
        })
    }

    async fn balance(&self, user_id: &UserId) -> Result<BalanceSnapshot> {
        let mut conn = self.conn()?;
        let now = Utc::now();
        let balance = stored_balance_with_conn(&mut conn, user_id)?;
        let held = holds_sum_with_conn(&mut conn, user_id, now)?;
        Ok(BalanceSnapshot {
            balance,
            available: balance - held,
        })
    }

    async fn transactions(
        &self,
        user_id: &UserId,
        query: &HistoryQuery,
    ) -> Result<Vec<CreditTransaction>> {
        let mut conn = self.conn()?;

        let mut stmt = credit_transactions::table
            .filter(credit_transactions::user_id.eq(user_id.as_str()))
            .order(credit_transactions::created_at.desc())
            .into_boxed();

        if let Some(kind) = query.kind {
            stmt = stmt.filter(credit_transactions::kind.eq(kind.as_str()));
        }

        let rows: Vec<TransactionRow> = stmt
            .limit(query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .offset(query.offset.unwrap_or(0))
            .load(&mut conn)?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn replay_balance(&self, user_id: &UserId) -> Result<Credits> {
        let mut conn = self.conn()?;
        let amounts: Vec<String> = credit_transactions::table
            .filter(credit_transactions::user_id.eq(user_id.as_str()))
            .order(credit_transactions::created_at.asc())
            .select(credit_transactions::amount)
            .load(&mut conn)?;

        let mut sum = Decimal::ZERO;
        for raw in amounts {
            sum += parse_decimal(&raw)?;
        }
        Ok(sum)
    }

    async fn place_hold(&self, hold: &Hold) -> Result<()> {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let balance = stored_balance_with_conn(conn, &hold.user_id)?;
            let held = holds_sum_with_conn(conn, &hold.user_id, hold.created_at)?;
            let available = balance - held;
            if hold.amount > available {
                return Err(LedgerError::InsufficientFunds {
                    requested: hold.amount,
                    available,
                }
                .into());
            }

            diesel::insert_into(holds::table)
                .values(HoldRow::from_domain(hold))
                .execute(conn)?;
            Ok(())
        })
    }

    async fn release_hold(&self, hold_id: &HoldId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(holds::table.find(hold_id.as_str())).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    async fn prune_expired_holds(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(holds::table.filter(holds::expires_at.le(now.to_rfc3339())))
                .execute(&mut conn)?;
        Ok(deleted)
    }
}
