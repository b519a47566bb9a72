use crate::error::StrategyError;
use core_types::MaxProfit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A long out-of-the-money call and a long out-of-the-money put at different
/// strikes. Cheaper than a straddle but needs a larger move to pay off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strangle {
    pub call_strike: Decimal,
    pub put_strike: Decimal,
    pub call_premium: Decimal,
    pub put_premium: Decimal,
}

impl Strangle {
    pub fn new(
        call_strike: Decimal,
        put_strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        if call_strike < Decimal::ZERO || put_strike < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "strikes must be non-negative, got call {} / put {}",
                call_strike, put_strike
            )));
        }
        if call_premium < Decimal::ZERO || put_premium < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "premiums must be non-negative, got call {} / put {}",
                call_premium, put_premium
            )));
        }
        if put_strike >= call_strike {
            return Err(StrategyError::InvalidParameters(format!(
                "put_strike {} must be below call_strike {}",
                put_strike, call_strike
            )));
        }

        Ok(Self {
            call_strike,
            put_strike,
            call_premium,
            put_premium,
        })
    }

    pub fn total_cost(&self) -> Decimal {
        self.call_premium + self.put_premium
    }

    pub fn payoff(&self, spot: Decimal) -> Decimal {
        let call_payoff = (spot - self.call_strike).max(Decimal::ZERO) - self.call_premium;
        let put_payoff = (self.put_strike - spot).max(Decimal::ZERO) - self.put_premium;
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
            self.put_strike - self.total_cost(),
            self.call_strike + self.total_cost(),
        ]
    }
}
