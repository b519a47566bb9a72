use crate::error::StrategyError;
use core_types::MaxProfit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four legs of an iron condor: a short call spread above the market and
/// a short put spread below it, entered for a net credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IronCondor {
    pub short_call_strike: Decimal,
    pub long_call_strike: Decimal,
    pub short_put_strike: Decimal,
    pub long_put_strike: Decimal,
    pub net_credit: Decimal,
}

impl IronCondor {
    /// Validates the leg layout. Strikes must satisfy
    /// `long_put < short_put < short_call < long_call`, the credit must be
    /// non-negative, and the credit may not exceed the wider spread (the max
    /// loss would turn negative otherwise).
    pub fn new(
        short_call_strike: Decimal,
        long_call_strike: Decimal,
        short_put_strike: Decimal,
        long_put_strike: Decimal,
        net_credit: Decimal,
    ) -> Result<Self, StrategyError> {
        for (name, strike) in [
            ("short_call_strike", short_call_strike),
            ("long_call_strike", long_call_strike),
            ("short_put_strike", short_put_strike),
            ("long_put_strike", long_put_strike),
        ] {
            if strike < Decimal::ZERO {
                return Err(StrategyError::InvalidParameters(format!(
                    "{} must be non-negative, got {}",
                    name, strike
                )));
            }
        }
        if net_credit < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "net_credit must be non-negative, got {}",
                net_credit
            )));
        }
        if !(long_put_strike < short_put_strike
            && short_put_strike < short_call_strike
            && short_call_strike < long_call_strike)
        {
            return Err(StrategyError::InvalidParameters(
                "strikes must satisfy long_put < short_put < short_call < long_call".to_string(),
            ));
        }

        let condor = Self {
            short_call_strike,
            long_call_strike,
            short_put_strike,
            long_put_strike,
            net_credit,
        };
        if condor.max_loss() < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "net_credit {} exceeds the wider spread width {}",
                net_credit,
                condor.call_spread_width().max(condor.put_spread_width())
            )));
        }

        Ok(condor)
    }

    pub fn call_spread_width(&self) -> Decimal {
        self.long_call_strike - self.short_call_strike
    }

    pub fn put_spread_width(&self) -> Decimal {
        self.short_put_strike - self.long_put_strike
    }

    /// Expiration payoff per unit: the credit, less whatever either short
    /// spread gives back, each capped at its own width.
    pub fn payoff(&self, spot: Decimal) -> Decimal {
        let call_spread_loss = if spot > self.short_call_strike {
            (spot - self.short_call_strike).min(self.call_spread_width())
        } else {
            Decimal::ZERO
        };

        let put_spread_loss = if spot < self.short_put_strike {
            (self.short_put_strike - spot).min(self.put_spread_width())
        } else {
            Decimal::ZERO
        };

        self.net_credit - call_spread_loss - put_spread_loss
    }

    pub fn max_profit(&self) -> MaxProfit {
        MaxProfit::Finite(self.net_credit)
    }

    pub fn max_loss(&self) -> Decimal {
        self.call_spread_width().max(self.put_spread_width()) - self.net_credit
    }

    pub fn break_even_points(&self) -> Vec<Decimal> {
        vec![
            self.short_put_strike - self.net_credit,
            self.short_call_strike + self.net_credit,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> IronCondor {
        // The reference scenario: short 155/160 calls, short 145/140 puts,
        // 2.50 credit on a 150 underlying.
        IronCondor::new(dec!(155), dec!(160), dec!(145), dec!(140), dec!(2.50)).unwrap()
    }

    #[test]
    fn metrics_match_reference_scenario() {
        let condor = sample();
        assert_eq!(condor.max_profit(), MaxProfit::Finite(dec!(2.50)));
        assert_eq!(condor.max_loss(), dec!(2.50));
        assert_eq!(condor.break_even_points(), vec![dec!(142.50), dec!(157.50)]);
    }

    #[test]
    fn payoff_zero_at_break_evens() {
        let condor = sample();
        assert_eq!(condor.payoff(dec!(142.50)), Decimal::ZERO);
        assert_eq!(condor.payoff(dec!(157.50)), Decimal::ZERO);
    }

    #[test]
    fn payoff_is_capped_both_directions() {
        let condor = sample();
        // Full credit inside the short strikes.
        assert_eq!(condor.payoff(dec!(150)), dec!(2.50));
        // Max loss beyond either long strike, no matter how far.
        assert_eq!(condor.payoff(dec!(170)), dec!(-2.50));
        assert_eq!(condor.payoff(dec!(1000)), dec!(-2.50));
        assert_eq!(condor.payoff(dec!(100)), dec!(-2.50));
        assert_eq!(condor.payoff(Decimal::ZERO), dec!(-2.50));
    }

    #[test]
    fn payoff_continuous_at_short_strikes() {
        let condor = sample();
        let eps = dec!(0.0001);
        let at = condor.payoff(dec!(155));
        let above = condor.payoff(dec!(155) + eps);
        assert!((at - above).abs() < dec!(0.001));
    }

    #[test]
    fn rejects_credit_wider_than_spread() {
        let result = IronCondor::new(dec!(155), dec!(160), dec!(145), dec!(140), dec!(6));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_disordered_strikes() {
        let result = IronCondor::new(dec!(145), dec!(160), dec!(155), dec!(140), dec!(2.50));
        assert!(result.is_err());
    }
}
