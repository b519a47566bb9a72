use crate::error::StrategyError;
use core_types::MaxProfit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bull call spread: long a call, short a higher-strike call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSpread {
    pub buy_strike: Decimal,
    pub sell_strike: Decimal,
    pub buy_premium: Decimal,
    pub sell_premium: Decimal,
}

impl CallSpread {
    pub fn new(
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        validate_vertical(buy_strike, sell_strike, buy_premium, sell_premium)?;
        if buy_strike >= sell_strike {
            return Err(StrategyError::InvalidParameters(format!(
                "buy_strike {} must be below sell_strike {}",
                buy_strike, sell_strike
            )));
        }

        let spread = Self {
            buy_strike,
            sell_strike,
            buy_premium,
            sell_premium,
        };
        validate_debit(spread.net_debit(), spread.width())?;
        Ok(spread)
    }

    pub fn width(&self) -> Decimal {
        self.sell_strike - self.buy_strike
    }

    pub fn net_debit(&self) -> Decimal {
        self.buy_premium - self.sell_premium
    }

    pub fn payoff(&self, spot: Decimal) -> Decimal {
        if spot <= self.buy_strike {
            -self.net_debit()
        } else if spot <= self.sell_strike {
            (spot - self.buy_strike) - self.net_debit()
        } else {
            self.width() - self.net_debit()
        }
    }

    pub fn max_profit(&self) -> MaxProfit {
        MaxProfit::Finite(self.width() - self.net_debit())
    }

    pub fn max_loss(&self) -> Decimal {
        self.net_debit()
    }

    pub fn break_even_points(&self) -> Vec<Decimal> {
        vec![self.buy_strike + self.net_debit()]
    }
}

/// A bear put spread: long a put, short a lower-strike put.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutSpread {
    pub buy_strike: Decimal,
    pub sell_strike: Decimal,
    pub buy_premium: Decimal,
    pub sell_premium: Decimal,
}

impl PutSpread {
    pub fn new(
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        validate_vertical(buy_strike, sell_strike, buy_premium, sell_premium)?;
        if sell_strike >= buy_strike {
            return Err(StrategyError::InvalidParameters(format!(
                "sell_strike {} must be below buy_strike {}",
                sell_strike, buy_strike
            )));
        }

        let spread = Self {
            buy_strike,
            sell_strike,
            buy_premium,
            sell_premium,
        };
        validate_debit(spread.net_debit(), spread.width())?;
        Ok(spread)
    }

    pub fn width(&self) -> Decimal {
        self.buy_strike - self.sell_strike
    }

    pub fn net_debit(&self) -> Decimal {
        self.buy_premium - self.sell_premium
    }

    pub fn payoff(&self, spot: Decimal) -> Decimal {
        if spot >= self.buy_strike {
            -self.net_debit()
        } else if spot >= self.sell_strike {
            (self.buy_strike - spot) - self.net_debit()
        } else {
            self.width() - self.net_debit()
        }
    }

    pub fn max_profit(&self) -> MaxProfit {
        MaxProfit::Finite(self.width() - self.net_debit())
    }

    pub fn max_loss(&self) -> Decimal {
        self.net_debit()
    }

    pub fn break_even_points(&self) -> Vec<Decimal> {
        vec![self.buy_strike - self.net_debit()]
    }
}

fn validate_vertical(
    buy_strike: Decimal,
    sell_strike: Decimal,
    buy_premium: Decimal,
    sell_premium: Decimal,
) -> Result<(), StrategyError> {
    if buy_strike < Decimal::ZERO || sell_strike < Decimal::ZERO {
        return Err(StrategyError::InvalidParameters(format!(
            "strikes must be non-negative, got buy {} / sell {}",
            buy_strike, sell_strike
        )));
    }
    if buy_premium < Decimal::ZERO || sell_premium < Decimal::ZERO {
        return Err(StrategyError::InvalidParameters(format!(
            "premiums must be non-negative, got buy {} / sell {}",
            buy_premium, sell_premium
        )));
    }
    Ok(())
}

/// The debit is the max loss, so it may not be negative; a debit wider than
/// the spread would make the max profit negative.
fn validate_debit(net_debit: Decimal, width: Decimal) -> Result<(), StrategyError> {
    if net_debit < Decimal::ZERO {
        return Err(StrategyError::InvalidParameters(format!(
            "net debit must be non-negative, got {}",
            net_debit
        )));
    }
    if net_debit > width {
        return Err(StrategyError::InvalidParameters(format!(
            "net debit {} exceeds spread width {}",
            net_debit, width
        )));
    }
    Ok(())
}
