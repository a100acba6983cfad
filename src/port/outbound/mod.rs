//! Outbound ports (driven side): durable storage, the market directory,
//! the ranked store, and the pricing collaborator.

pub mod market;
pub mod pricing;
pub mod ranking;
pub mod store;
