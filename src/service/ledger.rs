//! Ledger service: the single entry point for balance mutations.
//!
//! Validates inputs, delegates atomicity to the store (immediate
//! transactions serialize per-user mutations), and exposes balance,
//! history, hold, and audit operations to the API layer.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error, info};

use crate::config::LedgerConfig;
use crate::domain::account::{BalanceSnapshot, LedgerAudit, UserAccount};
use crate::domain::hold::Hold;
use crate::domain::id::{HoldId, UserId};
use crate::domain::money::Credits;
use crate::domain::transaction::{CreditTransaction, TransactionKind};
use crate::error::{LedgerError, Result};
use crate::port::outbound::store::{AccountStore, HistoryQuery, LedgerStore};

/// Ledger application service.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    accounts: Arc<dyn AccountStore>,
    config: LedgerConfig,
    hold_ttl: Duration,
}

impl Ledger {
    /// Create a ledger service over the given stores.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        accounts: Arc<dyn AccountStore>,
        config: LedgerConfig,
        hold_ttl_secs: i64,
    ) -> Self {
        Self {
            store,
            accounts,
            config,
            hold_ttl: Duration::seconds(hold_ttl_secs),
        }
    }

    /// Open an account with the given opening balance (zero allowed).
    pub async fn open_account(
        &self,
        user_id: &UserId,
        opening_balance: Credits,
    ) -> Result<UserAccount> {
        if opening_balance < Credits::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                amount: opening_balance,
            }
            .into());
        }
        let account = self.accounts.open_account(user_id, opening_balance).await?;
        info!(user = %user_id, balance = %opening_balance, "Opened account");
        Ok(account)
    }

    /// Fetch an account by id.
    pub async fn account(&self, user_id: &UserId) -> Result<Option<UserAccount>> {
        self.accounts.get_account(user_id).await
    }

    /// Add credits to a balance.
    pub async fn credit(
        &self,
        user_id: &UserId,
        amount: Credits,
        kind: TransactionKind,
        reference_id: Option<String>,
    ) -> Result<CreditTransaction> {
        require_positive(amount)?;
        let tx = self.store.apply(user_id, amount, kind, reference_id).await?;
        debug!(user = %user_id, amount = %amount, kind = kind.as_str(), "Credited");
        Ok(tx)
    }

    /// Remove credits from a balance. Fails with `InsufficientFunds` when
    /// the amount exceeds available credits; nothing is written then.
    pub async fn debit(
        &self,
        user_id: &UserId,
        amount: Credits,
        kind: TransactionKind,
        reference_id: Option<String>,
    ) -> Result<CreditTransaction> {
        require_positive(amount)?;
        let tx = self
            .store
            .apply(user_id, -amount, kind, reference_id)
            .await?;
        debug!(user = %user_id, amount = %amount, kind = kind.as_str(), "Debited");
        Ok(tx)
    }

    /// Current balance and availability.
    pub async fn balance(&self, user_id: &UserId) -> Result<BalanceSnapshot> {
        self.store.balance(user_id).await
    }

    /// Paginated transaction history, newest first.
    pub async fn transactions(
        &self,
        user_id: &UserId,
        query: &HistoryQuery,
    ) -> Result<Vec<CreditTransaction>> {
        if let Some(limit) = query.limit {
            if limit <= 0 {
                return Err(LedgerError::NonPositiveLimit { limit }.into());
            }
            if limit > self.config.max_history_limit {
                return Err(LedgerError::LimitTooLarge {
                    limit,
                    max: self.config.max_history_limit,
                }
                .into());
            }
        }
        if let Some(offset) = query.offset {
            if offset < 0 {
                return Err(LedgerError::NegativeOffset { offset }.into());
            }
        }
        self.store.transactions(user_id, query).await
    }

    /// Replay the full transaction log and compare with the stored balance.
    pub async fn audit(&self, user_id: &UserId) -> Result<LedgerAudit> {
        let stored = self.store.balance(user_id).await?.balance;
        let replayed = self.store.replay_balance(user_id).await?;
        let audit = LedgerAudit { stored, replayed };
        if !audit.consistent() {
            error!(
                user = %user_id,
                stored = %stored,
                replayed = %replayed,
                "Ledger replay diverged from stored balance"
            );
        }
        Ok(audit)
    }

    /// Reserve funds with the configured TTL. Fails with
    /// `InsufficientFunds` when availability cannot cover the amount.
    pub async fn place_hold(
        &self,
        user_id: &UserId,
        amount: Credits,
        reference_id: Option<String>,
    ) -> Result<Hold> {
        require_positive(amount)?;
        let hold = Hold::reserve(user_id.clone(), amount, reference_id, self.hold_ttl);
        self.store.place_hold(&hold).await?;
        debug!(user = %user_id, amount = %amount, hold = %hold.id, "Placed hold");
        Ok(hold)
    }

    /// Drop a reservation. Returns `false` when it no longer exists.
    pub async fn release_hold(&self, hold_id: &HoldId) -> Result<bool> {
        self.store.release_hold(hold_id).await
    }

    /// Delete expired holds. Returns count deleted.
    pub async fn prune_expired_holds(&self) -> Result<usize> {
        self.store.prune_expired_holds(Utc::now()).await
    }
}

fn require_positive(amount: Credits) -> Result<()> {
    if amount <= Credits::ZERO {
        return Err(LedgerError::NonPositiveAmount { amount }.into());
    }
    Ok(())
}
