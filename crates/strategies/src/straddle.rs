use crate::error::StrategyError;
use core_types::MaxProfit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A long call and a long put bought at the same strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Straddle {
    pub strike: Decimal,
    pub call_premium: Decimal,
    pub put_premium: Decimal,
}

impl Straddle {
    pub fn new(
        strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        if strike < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "strike must be non-negative, got {}",
                strike
            )));
        }
        if call_premium < Decimal::ZERO || put_premium < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "premiums must be non-negative, got call {} / put {}",
                call_premium, put_premium
            )));
        }

        Ok(Self {
            strike,
            call_premium,
            put_premium,
        })
    }

    /// Total premium paid for both legs.
    pub fn total_cost(&self) -> Decimal {
        self.call_premium + self.put_premium
    }

    pub fn payoff(&self, spot: Decimal) -> Decimal {
        let call_payoff = (spot - self.strike).max(Decimal::ZERO) - self.call_premium;
        let put_payoff = (self.strike - spot).max(Decimal::ZERO) - self.put_premium;
        call_payoff + put_payoff
    }

    pub fn max_profit(&self) -> MaxProfit {
        MaxProfit::Unlimited
    }

    pub fn max_loss(&self) -> Decimal {
        self.total_cost()
    }

    pub fn break_even_points(&self) -> Vec<Decimal> {
        vec![
            self.strike - self.total_cost(),
            self.strike + self.total_cost(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Straddle {
        // Reference scenario: 200 strike, 15.0 call premium, 12.0 put premium.
        Straddle::new(dec!(200), dec!(15), dec!(12)).unwrap()
    }

    #[test]
    fn metrics_match_reference_scenario() {
        let straddle = sample();
        assert_eq!(straddle.max_profit(), MaxProfit::Unlimited);
        assert_eq!(straddle.max_loss(), dec!(27));
        assert_eq!(straddle.break_even_points(), vec![dec!(173), dec!(227)]);
    }

    #[test]
    fn payoff_zero_at_break_evens() {
        let straddle = sample();
        assert_eq!(straddle.payoff(dec!(173)), Decimal::ZERO);
        assert_eq!(straddle.payoff(dec!(227)), Decimal::ZERO);
    }

    #[test]
    fn worst_case_at_the_strike() {
        let straddle = sample();
        assert_eq!(straddle.payoff(dec!(200)), dec!(-27));
        // Never below the total premium paid.
        for spot in [dec!(0), dec!(150), dec!(250), dec!(500)] {
            assert!(straddle.payoff(spot) >= dec!(-27));
        }
    }

    #[test]
    fn profits_grow_with_large_moves() {
        let straddle = sample();
        assert_eq!(straddle.payoff(dec!(300)), dec!(73));
        assert_eq!(straddle.payoff(dec!(100)), dec!(73));
    }

    #[test]
    fn rejects_negative_premium() {
        assert!(Straddle::new(dec!(200), dec!(-1), dec!(12)).is_err());
    }
}
