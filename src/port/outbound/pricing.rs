//! Pricing port: payout multipliers and sale quotes.
//!
//! Market odds and pool mechanics are an external concern; settlement and
//! the betting engine only see this seam. The default implementation is
//! [`FixedOddsPricer`](crate::domain::pricing::FixedOddsPricer).

use crate::domain::bet::BetSide;
use crate::domain::market::MarketSnapshot;
use crate::domain::money::Credits;
use crate::error::Result;

/// Prices winning payouts and early-sale proceeds.
pub trait PayoutPricer: Send + Sync {
    /// Total credit for a winning bet of `stake` on `side`.
    fn payout(&self, market: &MarketSnapshot, side: BetSide, stake: Credits) -> Result<Credits>;

    /// Proceeds for selling `stake` worth of an open position early.
    fn sale_quote(&self, market: &MarketSnapshot, side: BetSide, stake: Credits)
        -> Result<Credits>;
}
