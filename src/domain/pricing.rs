//! Fixed-odds pricing for payouts and early-sale quotes.
//!
//! The settlement and betting engines treat pricing as an injected
//! collaborator ([`PayoutPricer`](crate::port::outbound::pricing::PayoutPricer));
//! this is the default implementation. Payout = stake × decimal odds of the
//! winning side, odds taken from the market snapshot when ingestion supplies
//! them, else a configured fallback. An early sale is quoted at the stake's
//! implied fair value (stake, for fixed odds) less a haircut.

use rust_decimal::Decimal;

use super::bet::BetSide;
use super::error::DomainError;
use super::market::MarketSnapshot;
use super::money::Credits;
use crate::port::outbound::pricing::PayoutPricer;

/// Default fallback odds when ingestion supplies no pricing (1.9 decimal).
pub const DEFAULT_FALLBACK_ODDS: Decimal = Decimal::from_parts(19, 0, 0, false, 1);

/// Default fraction of fair value withheld on an early sale (5%).
pub const DEFAULT_SALE_HAIRCUT: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Fixed-odds pricer.
#[derive(Debug, Clone)]
pub struct FixedOddsPricer {
    fallback_odds: Credits,
    sale_haircut: Credits,
}

impl FixedOddsPricer {
    /// Create a pricer, validating both parameters.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositiveOdds`] for odds at or below zero,
    /// [`DomainError::InvalidHaircut`] for a haircut outside `[0, 1)`.
    pub fn try_new(fallback_odds: Credits, sale_haircut: Credits) -> Result<Self, DomainError> {
        if fallback_odds <= Credits::ZERO {
            return Err(DomainError::NonPositiveOdds {
                odds: fallback_odds,
            });
        }
        if sale_haircut < Credits::ZERO || sale_haircut >= Credits::ONE {
            return Err(DomainError::InvalidHaircut {
                haircut: sale_haircut,
            });
        }
        Ok(Self {
            fallback_odds,
            sale_haircut,
        })
    }

    fn odds_for(&self, market: &MarketSnapshot, side: BetSide) -> Result<Credits, DomainError> {
        let odds = market.odds_for(side).unwrap_or(self.fallback_odds);
        if odds <= Credits::ZERO {
            return Err(DomainError::NonPositiveOdds { odds });
        }
        Ok(odds)
    }
}

impl Default for FixedOddsPricer {
    fn default() -> Self {
        Self {
            fallback_odds: DEFAULT_FALLBACK_ODDS,
            sale_haircut: DEFAULT_SALE_HAIRCUT,
        }
    }
}

impl PayoutPricer for FixedOddsPricer {
    fn payout(
        &self,
        market: &MarketSnapshot,
        side: BetSide,
        stake: Credits,
    ) -> crate::error::Result<Credits> {
        let odds = self.odds_for(market, side)?;
        Ok(stake * odds)
    }

    fn sale_quote(
        &self,
        _market: &MarketSnapshot,
        _side: BetSide,
        stake: Credits,
    ) -> crate::error::Result<Credits> {
        // Fixed odds imply fair value == stake; the haircut covers spread.
        Ok(stake * (Credits::ONE - self.sale_haircut))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_constants_are_well_formed() {
        assert_eq!(DEFAULT_FALLBACK_ODDS, dec!(1.9));
        assert_eq!(DEFAULT_SALE_HAIRCUT, dec!(0.05));
    }

    #[test]
    fn payout_uses_snapshot_odds_when_present() {
        let pricer = FixedOddsPricer::default();
        let mut market = MarketSnapshot::open("m1");
        market.this_odds = Some(dec!(2.5));

        let payout = pricer.payout(&market, BetSide::This, dec!(40)).unwrap();
        assert_eq!(payout, dec!(100.0));
    }

    #[test]
    fn payout_falls_back_to_configured_odds() {
        let pricer = FixedOddsPricer::default();
        let market = MarketSnapshot::open("m1");

        let payout = pricer.payout(&market, BetSide::This, dec!(50)).unwrap();
        assert_eq!(payout, dec!(95.0));
    }

    #[test]
    fn sale_quote_applies_haircut() {
        let pricer = FixedOddsPricer::default();
        let market = MarketSnapshot::open("m1");

        let quote = pricer.sale_quote(&market, BetSide::That, dec!(100)).unwrap();
        assert_eq!(quote, dec!(95.00));
    }

    #[test]
    fn try_new_rejects_bad_parameters() {
        assert!(matches!(
            FixedOddsPricer::try_new(dec!(0), dec!(0.05)),
            Err(DomainError::NonPositiveOdds { .. })
        ));
        assert!(matches!(
            FixedOddsPricer::try_new(dec!(1.9), dec!(1)),
            Err(DomainError::InvalidHaircut { .. })
        ));
    }

    #[test]
    fn payout_rejects_non_positive_snapshot_odds() {
        let pricer = FixedOddsPricer::default();
        let mut market = MarketSnapshot::open("m1");
        market.that_odds = Some(dec!(-1));

        assert!(pricer.payout(&market, BetSide::That, dec!(10)).is_err());
    }
}
