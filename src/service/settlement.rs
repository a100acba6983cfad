//! Settlement engine: resolves every pending position on a market.
//!
//! Each bet settles independently via the store's compare-and-set, so a
//! repeated resolution finds nothing pending and credits nothing twice.

use std::sync::Arc;

use tracing::info;

use crate::domain::bet::{Bet, SettlementOutcome};
use crate::domain::id::MarketId;
use crate::domain::market::{MarketResolution, MarketSnapshot, MarketStatus};
use crate::domain::money::Credits;
use crate::error::Result;
use crate::port::outbound::market::MarketDirectory;
use crate::port::outbound::pricing::PayoutPricer;
use crate::port::outbound::store::BetStore;

/// What a settlement pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettlementSummary {
    /// Bets transitioned out of `pending` by this pass.
    pub settled: usize,
    /// Credits paid out, refunds included.
    pub total_payout: Credits,
}

/// Settlement application service.
#[derive(Clone)]
pub struct SettlementEngine {
    bets: Arc<dyn BetStore>,
    markets: Arc<dyn MarketDirectory>,
    pricer: Arc<dyn PayoutPricer>,
}

impl SettlementEngine {
    /// Create a settlement engine over its collaborators.
    pub fn new(
        bets: Arc<dyn BetStore>,
        markets: Arc<dyn MarketDirectory>,
        pricer: Arc<dyn PayoutPricer>,
    ) -> Self {
        Self {
            bets,
            markets,
            pricer,
        }
    }

    /// Settle every pending bet on `market_id` per `resolution`.
    ///
    /// Safe to call more than once; already-settled bets are skipped by
    /// the store's status check and never double-credited.
    pub async fn settle_positions_for_market(
        &self,
        market_id: &MarketId,
        resolution: MarketResolution,
    ) -> Result<SettlementSummary> {
        let pending = self.bets.pending_for_market(market_id).await?;
        if pending.is_empty() {
            info!(market = %market_id, "No pending positions to settle");
            return Ok(SettlementSummary::default());
        }

        // Pricing wants the snapshot's odds; a market the directory has
        // already evicted settles with fallback odds.
        let snapshot = match self.markets.resolve(market_id.as_str()).await? {
            Some(snapshot) => snapshot,
            None => resolved_placeholder(market_id, resolution),
        };

        let mut summary = SettlementSummary::default();
        for bet in &pending {
            let outcome = self.outcome_for(bet, &snapshot, resolution)?;
            let applied = self.bets.settle(bet.id(), &outcome).await?;
            if applied {
                summary.settled += 1;
                if let Some((_, credited)) = outcome.credit() {
                    summary.total_payout += credited;
                }
            }
        }

        info!(
            market = %market_id,
            resolution = resolution.as_str(),
            settled = summary.settled,
            total_payout = %summary.total_payout,
            "Settled market positions"
        );
        Ok(summary)
    }

    fn outcome_for(
        &self,
        bet: &Bet,
        snapshot: &MarketSnapshot,
        resolution: MarketResolution,
    ) -> Result<SettlementOutcome> {
        let outcome = match resolution.winning_side() {
            None => SettlementOutcome::Refunded {
                amount: bet.amount(),
            },
            Some(winner) if winner == bet.side() => SettlementOutcome::Won {
                payout: self.pricer.payout(snapshot, bet.side(), bet.amount())?,
            },
            Some(_) => SettlementOutcome::Lost,
        };
        Ok(outcome)
    }
}

fn resolved_placeholder(market_id: &MarketId, resolution: MarketResolution) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::open(market_id.clone());
    snapshot.status = match resolution {
        MarketResolution::Invalid => MarketStatus::Invalid,
        _ => MarketStatus::Resolved,
    };
    snapshot.resolution = Some(resolution);
    snapshot
}
