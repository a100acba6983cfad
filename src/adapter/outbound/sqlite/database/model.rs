//! Database model types for Diesel ORM.
//!
//! Rows store decimals and timestamps as TEXT (canonical decimal string,
//! RFC 3339) and reparse on read; amounts never pass through binary
//! floating point.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{bets, credit_transactions, holds, user_market_interactions, users};
use crate::domain::account::UserAccount;
use crate::domain::bet::{Bet, BetSide, BetStatus};
use crate::domain::hold::Hold;
use crate::domain::id::{BetId, HoldId, MarketId, TransactionId, UserId};
use crate::domain::interaction::SkipRecord;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::{Error, Result};

/// Parse a TEXT decimal column.
pub fn parse_decimal(value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| Error::Parse(format!("decimal '{value}': {e}")))
}

/// Parse a TEXT RFC 3339 timestamp column.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("timestamp '{value}': {e}")))
}

/// Database row for a user account.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub credit_balance: String,
    pub rank_by_pnl: Option<i64>,
    pub rank_by_volume: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub fn into_domain(self) -> Result<UserAccount> {
        Ok(UserAccount {
            id: UserId::from(self.id),
            credit_balance: parse_decimal(&self.credit_balance)?,
            rank_by_pnl: self.rank_by_pnl,
            rank_by_volume: self.rank_by_volume,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Database row for a credit transaction.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = credit_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRow {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub kind: String,
    pub reference_id: Option<String>,
    pub balance_after: String,
    pub created_at: String,
}

impl TransactionRow {
    pub fn from_domain(tx: &CreditTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            user_id: tx.user_id.to_string(),
            amount: tx.amount.to_string(),
            kind: tx.kind.as_str().to_string(),
            reference_id: tx.reference_id.clone(),
            balance_after: tx.balance_after.to_string(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }

    pub fn into_domain(self) -> Result<CreditTransaction> {
        Ok(CreditTransaction {
            id: TransactionId::from(self.id),
            user_id: UserId::from(self.user_id),
            amount: parse_decimal(&self.amount)?,
            kind: TransactionKind::parse(&self.kind)?,
            reference_id: self.reference_id,
            balance_after: parse_decimal(&self.balance_after)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Database row for a bet.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = bets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BetRow {
    pub id: String,
    pub user_id: String,
    pub market_id: String,
    pub side: String,
    pub amount: String,
    pub idempotency_key: Option<String>,
    pub status: String,
    pub created_at: String,
    pub settled_at: Option<String>,
}

impl BetRow {
    pub fn from_domain(bet: &Bet) -> Self {
        Self {
            id: bet.id().to_string(),
            user_id: bet.user_id().to_string(),
            market_id: bet.market_id().to_string(),
            side: bet.side().as_str().to_string(),
            amount: bet.amount().to_string(),
            idempotency_key: bet.idempotency_key().map(ToString::to_string),
            status: bet.status().as_str().to_string(),
            created_at: bet.created_at().to_rfc3339(),
            settled_at: bet.settled_at().map(|t| t.to_rfc3339()),
        }
    }

    pub fn into_domain(self) -> Result<Bet> {
        let settled_at = self.settled_at.as_deref().map(parse_timestamp).transpose()?;
        Bet::try_new(
            BetId::from(self.id),
            UserId::from(self.user_id),
            MarketId::from(self.market_id),
            BetSide::parse(&self.side)?,
            parse_decimal(&self.amount)?,
            self.idempotency_key,
            BetStatus::parse(&self.status)?,
            parse_timestamp(&self.created_at)?,
            settled_at,
        )
        .map_err(Error::from)
    }
}

/// Database row for a credit hold.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = holds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldRow {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub reference_id: Option<String>,
    pub created_at: String,
    pub expires_at: String,
}

impl HoldRow {
    pub fn from_domain(hold: &Hold) -> Self {
        Self {
            id: hold.id.to_string(),
            user_id: hold.user_id.to_string(),
            amount: hold.amount.to_string(),
            reference_id: hold.reference_id.clone(),
            created_at: hold.created_at.to_rfc3339(),
            expires_at: hold.expires_at.to_rfc3339(),
        }
    }

    pub fn into_domain(self) -> Result<Hold> {
        Ok(Hold {
            id: HoldId::from(self.id),
            user_id: UserId::from(self.user_id),
            amount: parse_decimal(&self.amount)?,
            reference_id: self.reference_id,
            created_at: parse_timestamp(&self.created_at)?,
            expires_at: parse_timestamp(&self.expires_at)?,
        })
    }
}

/// Database row for a skip record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = user_market_interactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InteractionRow {
    pub user_id: String,
    pub market_id: String,
    pub action: String,
    pub created_at: String,
    pub expires_at: String,
}

impl InteractionRow {
    pub fn from_domain(record: &SkipRecord) -> Self {
        Self {
            user_id: record.user_id.to_string(),
            market_id: record.market_id.to_string(),
            action: crate::domain::interaction::SKIP_ACTION.to_string(),
            created_at: record.created_at.to_rfc3339(),
            expires_at: record.expires_at.to_rfc3339(),
        }
    }

    pub fn into_domain(self) -> Result<SkipRecord> {
        Ok(SkipRecord {
            user_id: UserId::from(self.user_id),
            market_id: MarketId::from(self.market_id),
            created_at: parse_timestamp(&self.created_at)?,
            expires_at: parse_timestamp(&self.expires_at)?,
        })
    }
}
