//! Betting engine: validated, idempotent bet placement and early sales.
//!
//! Placement reserves the stake with a TTL hold, gates on the market
//! directory under a bounded timeout (failing closed), then commits the
//! bet and its debit as one store transaction. A keyed retry returns the
//! prior bet instead of double-charging, whether it is caught by the
//! upfront lookup or by the store's unique index.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::BettingConfig;
use crate::domain::bet::{Bet, BetSide};
use crate::domain::id::{BetId, UserId};
use crate::domain::market::MarketSnapshot;
use crate::domain::money::Credits;
use crate::domain::transaction::CreditTransaction;
use crate::error::{BetError, Error, Result};
use crate::port::outbound::market::MarketDirectory;
use crate::port::outbound::pricing::PayoutPricer;
use crate::port::outbound::store::{BetStore, InteractionStore};
use crate::service::ledger::Ledger;

/// Result of a placement request.
#[derive(Debug, Clone)]
pub enum BetPlacement {
    /// A fresh bet was created and its stake debited.
    Placed {
        bet: Bet,
        debit: CreditTransaction,
    },
    /// The idempotency key matched a prior bet; nothing was charged.
    Replayed { bet: Bet },
}

impl BetPlacement {
    /// The bet this placement refers to, fresh or replayed.
    #[must_use]
    pub fn bet(&self) -> &Bet {
        match self {
            Self::Placed { bet, .. } | Self::Replayed { bet } => bet,
        }
    }

    /// Whether the request was a keyed replay.
    #[must_use]
    pub fn is_replayed(&self) -> bool {
        matches!(self, Self::Replayed { .. })
    }
}

/// Result of selling part or all of an open position.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    /// The bet after the sale: reduced stake, or cancelled when fully sold.
    pub bet: Bet,
    /// Stake portion sold.
    pub sold: Credits,
    /// Credits received for it.
    pub proceeds: Credits,
}

impl SaleReceipt {
    /// Whether the sale closed the position entirely.
    #[must_use]
    pub fn closed(&self) -> bool {
        !self.bet.is_open()
    }
}

/// Betting application service.
#[derive(Clone)]
pub struct BettingEngine {
    bets: Arc<dyn BetStore>,
    ledger: Ledger,
    markets: Arc<dyn MarketDirectory>,
    interactions: Arc<dyn InteractionStore>,
    pricer: Arc<dyn PayoutPricer>,
    config: BettingConfig,
}

impl BettingEngine {
    /// Create a betting engine over its collaborators.
    pub fn new(
        bets: Arc<dyn BetStore>,
        ledger: Ledger,
        markets: Arc<dyn MarketDirectory>,
        interactions: Arc<dyn InteractionStore>,
        pricer: Arc<dyn PayoutPricer>,
        config: BettingConfig,
    ) -> Self {
        Self {
            bets,
            ledger,
            markets,
            interactions,
            pricer,
            config,
        }
    }

    /// Place a bet of `amount` on `side` of the market named by
    /// `market_ref` (canonical or external id).
    pub async fn place_bet(
        &self,
        user_id: &UserId,
        market_ref: &str,
        side: BetSide,
        amount: Credits,
        idempotency_key: Option<String>,
    ) -> Result<BetPlacement> {
        if amount < self.config.min_stake || amount > self.config.max_stake {
            return Err(BetError::StakeOutOfRange {
                amount,
                min: self.config.min_stake,
                max: self.config.max_stake,
            }
            .into());
        }

        if let Some(key) = idempotency_key.as_deref() {
            if let Some(prior) = self.bets.find_by_idempotency_key(user_id, key).await? {
                debug!(user = %user_id, key, bet = %prior.id(), "Replayed keyed bet");
                return Ok(BetPlacement::Replayed { bet: prior });
            }
        }

        // The hold keeps the stake reserved across the market-gate await;
        // it is captured inside the debit transaction below, or released
        // on any earlier failure (and self-heals via TTL if we crash).
        let bet_id = BetId::new();
        let hold = self
            .ledger
            .place_hold(user_id, amount, Some(bet_id.to_string()))
            .await?;

        let market = match self.gate_market(market_ref).await {
            Ok(market) => market,
            Err(e) => {
                self.release_hold_best_effort(&hold.id).await;
                return Err(e);
            }
        };

        let bet = match Bet::place(
            bet_id,
            user_id.clone(),
            market.id.clone(),
            side,
            amount,
            idempotency_key.clone(),
        ) {
            Ok(bet) => bet,
            Err(e) => {
                self.release_hold_best_effort(&hold.id).await;
                return Err(e.into());
            }
        };

        match self.bets.insert_with_debit(&bet, &hold.id).await {
            Ok(debit) => {
                // Betting on a market is an implicit un-skip.
                if let Err(e) = self.interactions.remove(user_id, bet.market_id()).await {
                    warn!(user = %user_id, market = %bet.market_id(), error = %e, "Failed to clear skip");
                }
                info!(
                    user = %user_id,
                    market = %bet.market_id(),
                    side = bet.side().as_str(),
                    amount = %amount,
                    bet = %bet.id(),
                    "Placed bet"
                );
                Ok(BetPlacement::Placed { bet, debit })
            }
            Err(Error::Bet(BetError::DuplicateRequest { key })) => {
                // A concurrent keyed retry won the race; return its bet.
                self.release_hold_best_effort(&hold.id).await;
                match self.bets.find_by_idempotency_key(user_id, &key).await? {
                    Some(prior) => Ok(BetPlacement::Replayed { bet: prior }),
                    None => Err(BetError::DuplicateRequest { key }.into()),
                }
            }
            Err(e) => {
                self.release_hold_best_effort(&hold.id).await;
                Err(e)
            }
        }
    }

    /// Sell part or all of an open position. `amount` omitted sells the
    /// full remaining stake.
    pub async fn sell_position(
        &self,
        user_id: &UserId,
        bet_id: &BetId,
        amount: Option<Credits>,
    ) -> Result<SaleReceipt> {
        let bet = self.bets.get(bet_id).await?;
        // Another user's bet reads as unknown rather than leaking it.
        let bet = match bet {
            Some(bet) if bet.user_id() == user_id => bet,
            _ => {
                return Err(BetError::UnknownBet {
                    bet_id: bet_id.to_string(),
                }
                .into())
            }
        };

        if !bet.is_open() {
            return Err(BetError::BetNotOpen {
                bet_id: bet_id.to_string(),
                status: bet.status().as_str().to_string(),
            }
            .into());
        }

        let portion = amount.unwrap_or_else(|| bet.amount());
        if portion <= Credits::ZERO {
            return Err(crate::domain::error::DomainError::NonPositiveStake { stake: portion }.into());
        }
        if portion > bet.amount() {
            return Err(BetError::SaleExceedsStake {
                requested: portion,
                stake: bet.amount(),
            }
            .into());
        }

        let market = self.gate_market(bet.market_id().as_str()).await?;
        let proceeds = self.pricer.sale_quote(&market, bet.side(), portion)?;

        let updated = self.bets.sell(bet_id, portion, proceeds).await?;
        info!(
            user = %user_id,
            bet = %bet_id,
            sold = %portion,
            proceeds = %proceeds,
            closed = !updated.is_open(),
            "Sold position"
        );
        Ok(SaleReceipt {
            bet: updated,
            sold: portion,
            proceeds,
        })
    }

    /// Resolve and check the market under the configured timeout,
    /// failing closed on any delay or unknown reference.
    async fn gate_market(&self, market_ref: &str) -> Result<MarketSnapshot> {
        let timeout = Duration::from_millis(self.config.market_gate_timeout_ms);
        let lookup = tokio::time::timeout(timeout, self.markets.resolve(market_ref)).await;

        let snapshot = match lookup {
            Ok(result) => result?,
            Err(_) => {
                return Err(BetError::MarketUnavailable {
                    timeout_ms: self.config.market_gate_timeout_ms,
                }
                .into())
            }
        };

        let Some(snapshot) = snapshot else {
            return Err(BetError::MarketNotOpen {
                market_id: market_ref.to_string(),
                reason: "unknown".to_string(),
            }
            .into());
        };

        let now = Utc::now();
        if !snapshot.accepts_bets(now) {
            return Err(BetError::MarketNotOpen {
                market_id: snapshot.id.to_string(),
                reason: snapshot.rejection_reason(now).to_string(),
            }
            .into());
        }
        Ok(snapshot)
    }

    async fn release_hold_best_effort(&self, hold_id: &crate::domain::id::HoldId) {
        if let Err(e) = self.ledger.release_hold(hold_id).await {
            // Expiry will reclaim it; the sweep deletes the row.
            warn!(hold = %hold_id, error = %e, "Failed to release hold");
        }
    }
}
