//! Persistence ports for accounts, the ledger, bets, and skip records.
//!
//! All traits are object safe and held as `Arc<dyn …>` by the services.
//! Implementations must serialize per-user balance mutations at the store
//! level (a write-locking transaction), not with process-local mutexes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::account::{BalanceSnapshot, UserAccount};
use crate::domain::bet::{Bet, SettlementOutcome};
use crate::domain::hold::Hold;
use crate::domain::id::{BetId, HoldId, MarketId, UserId};
use crate::domain::interaction::SkipRecord;
use crate::domain::leaderboard::RankAssignment;
use crate::domain::money::Credits;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::Result;

/// Filter and page for transaction-history reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Restrict to one transaction kind.
    pub kind: Option<TransactionKind>,
    /// Page size; the ledger service caps this at its configured maximum.
    pub limit: Option<i64>,
    /// Rows to skip, newest first.
    pub offset: Option<i64>,
}

/// Account rows and durable rank fields.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the account row and its opening `grant` transaction in one
    /// unit, so the replay invariant holds from zero.
    async fn open_account(&self, user_id: &UserId, opening_balance: Credits)
        -> Result<UserAccount>;

    /// Fetch an account by id.
    async fn get_account(&self, user_id: &UserId) -> Result<Option<UserAccount>>;

    /// Write durable rank fields for one user. Returns `false` when the
    /// user row does not exist (stale ranked-store entry).
    async fn apply_rank(&self, assignment: &RankAssignment) -> Result<bool>;
}

/// Balance mutations, history, holds, and the replay audit.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Atomically read the balance, apply the signed delta, and append the
    /// transaction row. Debits fail with `InsufficientFunds` when the
    /// delta exceeds available credits (balance minus unexpired holds);
    /// nothing is written on failure.
    async fn apply(
        &self,
        user_id: &UserId,
        amount: Credits,
        kind: TransactionKind,
        reference_id: Option<String>,
    ) -> Result<CreditTransaction>;

    /// Current balance and availability for one user.
    async fn balance(&self, user_id: &UserId) -> Result<BalanceSnapshot>;

    /// Transaction history, newest first.
    async fn transactions(
        &self,
        user_id: &UserId,
        query: &HistoryQuery,
    ) -> Result<Vec<CreditTransaction>>;

    /// Cumulative sum of the full ordered log from zero, for auditing.
    async fn replay_balance(&self, user_id: &UserId) -> Result<Credits>;

    /// Record a reservation. Fails with `InsufficientFunds` when the
    /// amount exceeds what is currently available.
    async fn place_hold(&self, hold: &Hold) -> Result<()>;

    /// Drop a reservation. Returns `false` when it no longer exists.
    async fn release_hold(&self, hold_id: &HoldId) -> Result<bool>;

    /// Delete holds past their expiry. Returns count deleted.
    async fn prune_expired_holds(&self, now: DateTime<Utc>) -> Result<usize>;
}

/// Bet rows and their compound transactions with the ledger.
#[async_trait]
pub trait BetStore: Send + Sync {
    /// Insert the bet, debit its stake, and capture (delete) the covering
    /// hold in one transaction. A unique-index collision on the bet's
    /// idempotency key fails with `DuplicateRequest` and writes nothing.
    async fn insert_with_debit(&self, bet: &Bet, hold_id: &HoldId) -> Result<CreditTransaction>;

    /// Fetch a bet by id.
    async fn get(&self, bet_id: &BetId) -> Result<Option<Bet>>;

    /// Fetch a user's prior bet for an idempotency key, if any.
    async fn find_by_idempotency_key(&self, user_id: &UserId, key: &str) -> Result<Option<Bet>>;

    /// All bets still `pending` on one market, oldest first.
    async fn pending_for_market(&self, market_id: &MarketId) -> Result<Vec<Bet>>;

    /// Transition one bet per the outcome and credit any payout or refund,
    /// one transaction, only if the bet is still `pending`. Returns
    /// `false` (writing nothing) when it no longer is.
    async fn settle(&self, bet_id: &BetId, outcome: &SettlementOutcome) -> Result<bool>;

    /// Sell `portion` of the bet's stake for `proceeds`: reduce the stake
    /// (or cancel the bet when the portion covers it) and credit the
    /// proceeds, one transaction. Fails with `BetNotOpen` when the bet is
    /// no longer `pending`. Returns the updated bet.
    async fn sell(&self, bet_id: &BetId, portion: Credits, proceeds: Credits) -> Result<Bet>;
}

/// Skip records with TTL semantics.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Insert or refresh a skip on `(user, market)`.
    async fn upsert_skip(&self, record: &SkipRecord) -> Result<()>;

    /// Markets the user has skipped and whose skips are unexpired at `now`.
    async fn list_active(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<Vec<MarketId>>;

    /// Delete one skip. Returns `false` when no record existed.
    async fn remove(&self, user_id: &UserId, market_id: &MarketId) -> Result<bool>;

    /// Delete skips past their expiry. Returns count deleted.
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
