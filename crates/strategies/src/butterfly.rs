use crate::error::StrategyError;
use core_types::MaxProfit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A long call butterfly: long one low-strike call, short two middle-strike
/// calls, long one high-strike call.
///
/// Wings must be equidistant from the body; with asymmetric wings the payoff
/// would not return to the net debit past the high strike and the declared
/// break-evens would be wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Butterfly {
    pub low_strike: Decimal,
    pub middle_strike: Decimal,
    pub high_strike: Decimal,
    pub low_premium: Decimal,
    pub middle_premium: Decimal,
    pub high_premium: Decimal,
}

impl Butterfly {
    pub fn new(
        low_strike: Decimal,
        middle_strike: Decimal,
        high_strike: Decimal,
        low_premium: Decimal,
        middle_premium: Decimal,
        high_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        for (name, value) in [
            ("low_strike", low_strike),
            ("middle_strike", middle_strike),
            ("high_strike", high_strike),
            ("low_premium", low_premium),
            ("middle_premium", middle_premium),
            ("high_premium", high_premium),
        ] {
            if value < Decimal::ZERO {
                return Err(StrategyError::InvalidParameters(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(low_strike < middle_strike && middle_strike < high_strike) {
            return Err(StrategyError::InvalidParameters(
                "strikes must satisfy low < middle < high".to_string(),
            ));
        }
        if middle_strike - low_strike != high_strike - middle_strike {
            return Err(StrategyError::InvalidParameters(format!(
                "wings must be equidistant: {}..{} vs {}..{}",
                low_strike, middle_strike, middle_strike, high_strike
            )));
        }

        let butterfly = Self {
            low_strike,
            middle_strike,
            high_strike,
            low_premium,
            middle_premium,
            high_premium,
        };
        let debit = butterfly.net_debit();
        if debit < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "net debit must be non-negative, got {}",
                debit
            )));
        }
        if debit > butterfly.wing_width() {
            return Err(StrategyError::InvalidParameters(format!(
                "net debit {} exceeds wing width {}",
                debit,
                butterfly.wing_width()
            )));
        }

        Ok(butterfly)
    }

    pub fn wing_width(&self) -> Decimal {
        self.middle_strike - self.low_strike
    }

    pub fn net_debit(&self) -> Decimal {
        self.low_premium - (Decimal::TWO * self.middle_premium) + self.high_premium
    }

    /// Expiration payoff per unit, as the sum of the four call legs.
    pub fn payoff(&self, spot: Decimal) -> Decimal {
        let long_low = (spot - self.low_strike).max(Decimal::ZERO);
        let short_middle = (spot - self.middle_strike).max(Decimal::ZERO);
        let long_high = (spot - self.high_strike).max(Decimal::ZERO);
        long_low - Decimal::TWO * short_middle + long_high - self.net_debit()
    }

    pub fn max_profit(&self) -> MaxProfit {
        MaxProfit::Finite(self.wing_width() - self.net_debit())
    }

    pub fn max_loss(&self) -> Decimal {
        self.net_debit()
    }

    pub fn break_even_points(&self) -> Vec<Decimal> {
        vec![
            self.low_strike + self.net_debit(),
            self.high_strike - self.net_debit(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Butterfly {
        // 95/100/105 call butterfly for a 2.00 net debit.
        Butterfly::new(dec!(95), dec!(100), dec!(105), dec!(8), dec!(4), dec!(2)).unwrap()
    }

    #[test]
    fn metrics() {
        let butterfly = sample();
        assert_eq!(butterfly.net_debit(), dec!(2));
        assert_eq!(butterfly.max_profit(), MaxProfit::Finite(dec!(3)));
        assert_eq!(butterfly.max_loss(), dec!(2));
        assert_eq!(butterfly.break_even_points(), vec![dec!(97), dec!(103)]);
    }

    #[test]
    fn payoff_peaks_at_the_body() {
        let butterfly = sample();
        assert_eq!(butterfly.payoff(dec!(100)), dec!(3));
        assert_eq!(butterfly.payoff(dec!(97)), Decimal::ZERO);
        assert_eq!(butterfly.payoff(dec!(103)), Decimal::ZERO);
    }

    #[test]
    fn payoff_flat_outside_the_wings() {
        let butterfly = sample();
        assert_eq!(butterfly.payoff(dec!(90)), dec!(-2));
        assert_eq!(butterfly.payoff(dec!(95)), dec!(-2));
        assert_eq!(butterfly.payoff(dec!(105)), dec!(-2));
        assert_eq!(butterfly.payoff(dec!(200)), dec!(-2));
    }

    #[test]
    fn payoff_continuous_across_all_strikes() {
        let butterfly = sample();
        let eps = dec!(0.0001);
        for strike in [dec!(95), dec!(100), dec!(105)] {
            let below = butterfly.payoff(strike - eps);
            let at = butterfly.payoff(strike);
            assert!((at - below).abs() < dec!(0.001));
        }
    }

    #[test]
    fn rejects_asymmetric_wings() {
        let result = Butterfly::new(dec!(95), dec!(100), dec!(110), dec!(8), dec!(4), dec!(2));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_disordered_strikes() {
        let result = Butterfly::new(dec!(100), dec!(95), dec!(105), dec!(8), dec!(4), dec!(2));
        assert!(result.is_err());
    }
}
