//! Application wiring: builds the store adapters and services from
//! configuration and runs the process until shutdown.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::adapter::outbound::memory::{InMemoryMarketDirectory, InMemoryRankedStore};
use crate::adapter::outbound::sqlite::{
    create_pool, run_migrations, DbPool, SqliteAccountStore, SqliteBetStore,
    SqliteInteractionStore, SqliteLedgerStore,
};
use crate::config::Config;
use crate::domain::pricing::FixedOddsPricer;
use crate::error::Result;
use crate::port::outbound::pricing::PayoutPricer;
use crate::service::{BettingEngine, LeaderboardSync, Ledger, SettlementEngine, SkipTracker};

pub mod jobs;

pub use jobs::JobController;

/// Fully wired services, shared by the runtime and by integration tests.
pub struct AppContext {
    pub pool: DbPool,
    pub ledger: Ledger,
    pub betting: BettingEngine,
    pub settlement: SettlementEngine,
    pub skips: SkipTracker,
    pub leaderboard: LeaderboardSync,
    /// Ingestion writes market snapshots here.
    pub markets: Arc<InMemoryMarketDirectory>,
    /// Scoring writes ranked standings here.
    pub ranked: Arc<InMemoryRankedStore>,
}

/// Application entry point.
pub struct App;

impl App {
    /// Build the full service graph from configuration.
    pub fn build(config: &Config) -> Result<AppContext> {
        let pool = create_pool(&config.database.url)?;
        run_migrations(&pool)?;

        let accounts = Arc::new(SqliteAccountStore::new(pool.clone()));
        let ledger_store = Arc::new(SqliteLedgerStore::new(pool.clone()));
        let bet_store = Arc::new(SqliteBetStore::new(pool.clone()));
        let interactions = Arc::new(SqliteInteractionStore::new(pool.clone()));
        let markets = Arc::new(InMemoryMarketDirectory::new());
        let ranked = Arc::new(InMemoryRankedStore::new());

        let pricer: Arc<dyn PayoutPricer> = Arc::new(FixedOddsPricer::try_new(
            config.pricing.fallback_odds,
            config.pricing.sale_haircut,
        )?);

        let ledger = Ledger::new(
            ledger_store,
            accounts.clone(),
            config.ledger.clone(),
            config.betting.hold_ttl_secs,
        );
        let betting = BettingEngine::new(
            bet_store.clone(),
            ledger.clone(),
            markets.clone(),
            interactions.clone(),
            pricer.clone(),
            config.betting.clone(),
        );
        let settlement = SettlementEngine::new(bet_store, markets.clone(), pricer);
        let skips = SkipTracker::new(interactions, config.skips.ttl_days);
        let leaderboard = LeaderboardSync::new(ranked.clone(), accounts);

        Ok(AppContext {
            pool,
            ledger,
            betting,
            settlement,
            skips,
            leaderboard,
            markets,
            ranked,
        })
    }

    /// Run until a shutdown signal arrives.
    pub async fn run(config: Config) -> Result<()> {
        let context = Self::build(&config)?;
        info!(database = %config.database.url, "Wagering core ready");

        let mut jobs = JobController::new();
        jobs.start(
            &config.jobs,
            context.leaderboard.clone(),
            context.skips.clone(),
            context.ledger.clone(),
        );

        signal::ctrl_c().await?;
        info!("Shutdown signal received");
        jobs.stop().await;
        Ok(())
    }
}
