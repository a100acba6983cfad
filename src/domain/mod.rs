//! Core domain types for the wagering ledger.
//!
//! Pure types with no I/O: identifiers, decimal money, the bet lifecycle,
//! market snapshots, ledger transactions, holds, skip records, and
//! leaderboard entries. Persistence and collaborator access live behind
//! the ports in [`crate::port`].

pub mod account;
pub mod bet;
pub mod error;
pub mod hold;
pub mod id;
pub mod interaction;
pub mod leaderboard;
pub mod market;
pub mod money;
pub mod pricing;
pub mod transaction;

pub use account::{BalanceSnapshot, LedgerAudit, UserAccount};
pub use bet::{Bet, BetSide, BetStatus, SettlementOutcome};
pub use error::DomainError;
pub use hold::Hold;
pub use id::{BetId, HoldId, MarketId, TransactionId, UserId};
pub use interaction::SkipRecord;
pub use leaderboard::{RankAssignment, RankedEntry, SyncOutcome};
pub use market::{MarketResolution, MarketSnapshot, MarketStatus};
pub use money::{Credits, Score};
pub use pricing::FixedOddsPricer;
pub use transaction::{CreditTransaction, TransactionKind};
