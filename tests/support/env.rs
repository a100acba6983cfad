//! Fully wired service graph over a test database.

use std::sync::Arc;

use wagerbook::adapter::outbound::memory::{InMemoryMarketDirectory, InMemoryRankedStore};
use wagerbook::adapter::outbound::sqlite::{
    DbPool, SqliteAccountStore, SqliteBetStore, SqliteInteractionStore, SqliteLedgerStore,
};
use wagerbook::config::{BettingConfig, LedgerConfig, SkipConfig};
use wagerbook::domain::id::UserId;
use wagerbook::domain::market::MarketSnapshot;
use wagerbook::domain::money::Credits;
use wagerbook::domain::pricing::FixedOddsPricer;
use wagerbook::port::outbound::pricing::PayoutPricer;
use wagerbook::service::{BettingEngine, LeaderboardSync, Ledger, SettlementEngine, SkipTracker};

pub struct TestEnv {
    pub ledger: Ledger,
    pub betting: BettingEngine,
    pub settlement: SettlementEngine,
    pub skips: SkipTracker,
    pub leaderboard: LeaderboardSync,
    pub markets: Arc<InMemoryMarketDirectory>,
    pub ranked: Arc<InMemoryRankedStore>,
    pub ledger_store: Arc<SqliteLedgerStore>,
    pub interaction_store: Arc<SqliteInteractionStore>,
    pub bet_store: Arc<SqliteBetStore>,
    pub account_store: Arc<SqliteAccountStore>,
}

impl TestEnv {
    pub fn new(pool: &DbPool) -> Self {
        let accounts = Arc::new(SqliteAccountStore::new(pool.clone()));
        let ledger_store = Arc::new(SqliteLedgerStore::new(pool.clone()));
        let bet_store = Arc::new(SqliteBetStore::new(pool.clone()));
        let interaction_store = Arc::new(SqliteInteractionStore::new(pool.clone()));
        let markets = Arc::new(InMemoryMarketDirectory::new());
        let ranked = Arc::new(InMemoryRankedStore::new());

        let betting_config = BettingConfig::default();
        let skip_config = SkipConfig::default();
        let pricer: Arc<dyn PayoutPricer> = Arc::new(FixedOddsPricer::default());

        let ledger = Ledger::new(
            ledger_store.clone(),
            accounts.clone(),
            LedgerConfig::default(),
            betting_config.hold_ttl_secs,
        );
        let betting = BettingEngine::new(
            bet_store.clone(),
            ledger.clone(),
            markets.clone(),
            interaction_store.clone(),
            pricer.clone(),
            betting_config,
        );
        let settlement = SettlementEngine::new(bet_store.clone(), markets.clone(), pricer);
        let skips = SkipTracker::new(interaction_store.clone(), skip_config.ttl_days);
        let leaderboard = LeaderboardSync::new(ranked.clone(), accounts.clone());

        Self {
            ledger,
            betting,
            settlement,
            skips,
            leaderboard,
            markets,
            ranked,
            ledger_store,
            interaction_store,
            bet_store,
            account_store: accounts,
        }
    }

    /// Open an account with the given balance and return its id.
    pub async fn fund(&self, user: &str, balance: Credits) -> UserId {
        let user_id = UserId::new(user);
        self.ledger
            .open_account(&user_id, balance)
            .await
            .expect("open account");
        user_id
    }

    /// Register an open, unpriced market.
    pub fn open_market(&self, id: &str) -> MarketSnapshot {
        let snapshot = MarketSnapshot::open(id);
        self.markets.upsert(snapshot.clone());
        snapshot
    }
}
