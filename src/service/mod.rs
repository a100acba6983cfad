//! Application services orchestrating domain logic over the outbound ports.

pub mod betting;
pub mod leaderboard;
pub mod ledger;
pub mod settlement;
pub mod skips;

pub use betting::{BetPlacement, BettingEngine, SaleReceipt};
pub use leaderboard::LeaderboardSync;
pub use ledger::Ledger;
pub use settlement::{SettlementEngine, SettlementSummary};
pub use skips::{SkipReceipt, SkipTracker};
