//! Wagering core for a prediction-market platform: a credit ledger,
//! bet lifecycle engine, position settlement, skip tracking, and
//! leaderboard reconciliation over SQLite.

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

pub use error::{Error, Result};
