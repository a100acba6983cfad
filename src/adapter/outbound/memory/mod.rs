//! In-process stand-ins for external collaborators.

pub mod markets;
pub mod ranked;

pub use markets::InMemoryMarketDirectory;
pub use ranked::InMemoryRankedStore;
