//! SQLite persistence adapters.
//!
//! Diesel-backed implementations of the store ports: accounts, the
//! ledger, bets, and skip records.

pub mod accounts;
pub mod bets;
pub mod database;
pub mod interactions;
pub mod ledger;

pub use accounts::SqliteAccountStore;
pub use bets::SqliteBetStore;
pub use database::connection::{create_pool, run_migrations, DbPool};
pub use interactions::SqliteInteractionStore;
pub use ledger::SqliteLedgerStore;
