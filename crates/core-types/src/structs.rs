use crate::enums::{ExitReason, OptionType, StrategyKind, TradeAction};
use crate::error::CoreError;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single option contract.
///
/// Immutable once constructed, except for the reference price of the
/// underlying, which may be refreshed as new market data arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub expiration: NaiveDate,
    pub premium: Decimal,
    pub reference_price: Decimal,
    pub volume: u64,
    pub open_interest: u64,
}

impl OptionContract {
    /// Validates and constructs a contract. Negative strikes, premiums, or
    /// reference prices are rejected, never silently corrected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        option_type: OptionType,
        strike: Decimal,
        expiration: NaiveDate,
        premium: Decimal,
        reference_price: Decimal,
        volume: u64,
        open_interest: u64,
    ) -> Result<Self, CoreError> {
        if strike < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "strike".to_string(),
                format!("must be non-negative, got {}", strike),
            ));
        }
        if premium < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "premium".to_string(),
                format!("must be non-negative, got {}", premium),
            ));
        }
        if reference_price < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "reference_price".to_string(),
                format!("must be non-negative, got {}", reference_price),
            ));
        }

        Ok(Self {
            symbol: symbol.into(),
            option_type,
            strike,
            expiration,
            premium,
            reference_price,
            volume,
            open_interest,
        })
    }

    /// Days until expiration relative to the given date. Negative once past.
    pub fn days_to_expiration(&self, as_of: NaiveDate) -> i64 {
        (self.expiration - as_of).num_days()
    }

    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.days_to_expiration(as_of) <= 0
    }

    /// Intrinsic value at the current reference price.
    pub fn intrinsic_value(&self) -> Decimal {
        match self.option_type {
            OptionType::Call => (self.reference_price - self.strike).max(Decimal::ZERO),
            OptionType::Put => (self.strike - self.reference_price).max(Decimal::ZERO),
        }
    }

    /// The premium remaining after intrinsic value is stripped out.
    pub fn time_value(&self) -> Decimal {
        self.premium - self.intrinsic_value()
    }

    /// Expiration payoff of this single contract at the given spot price.
    pub fn payoff_at(&self, spot: Decimal) -> Decimal {
        let intrinsic = match self.option_type {
            OptionType::Call => (spot - self.strike).max(Decimal::ZERO),
            OptionType::Put => (self.strike - spot).max(Decimal::ZERO),
        };
        intrinsic - self.premium
    }

    pub fn refresh_reference_price(&mut self, price: Decimal) -> Result<(), CoreError> {
        if price < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "reference_price".to_string(),
                format!("must be non-negative, got {}", price),
            ));
        }
        self.reference_price = price;
        Ok(())
    }
}

/// Best-case payoff of a strategy across all underlying prices.
///
/// The unbounded case is its own variant so it can never be confused with a
/// finite numeric result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxProfit {
    Unlimited,
    Finite(Decimal),
}

impl MaxProfit {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, MaxProfit::Unlimited)
    }

    /// The finite value, if there is one.
    pub fn finite(&self) -> Option<Decimal> {
        match self {
            MaxProfit::Unlimited => None,
            MaxProfit::Finite(value) => Some(*value),
        }
    }
}

impl fmt::Display for MaxProfit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxProfit::Unlimited => write!(f, "unlimited"),
            MaxProfit::Finite(value) => write!(f, "{}", value),
        }
    }
}

/// An open strategy position, owned exclusively by the simulation ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: u64,
    pub symbol: String,
    pub strategy: StrategyKind,
    pub entry_date: NaiveDate,
    pub entry_price: Decimal,
    pub quantity: u32,
    pub current_price: Decimal,
    pub unrealized_pnl: Decimal,
    /// Days to expiration captured when the position was opened; the time
    /// exit rule is evaluated against this, not the shrinking current value.
    pub days_to_expiration_at_entry: i64,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position_id: u64,
        symbol: impl Into<String>,
        strategy: StrategyKind,
        entry_date: NaiveDate,
        entry_price: Decimal,
        quantity: u32,
        days_to_expiration_at_entry: i64,
    ) -> Result<Self, CoreError> {
        if quantity == 0 {
            return Err(CoreError::InvalidQuantity(0));
        }

        Ok(Self {
            position_id,
            symbol: symbol.into(),
            strategy,
            entry_date,
            entry_price,
            quantity,
            current_price: entry_price,
            unrealized_pnl: Decimal::ZERO,
            days_to_expiration_at_entry,
        })
    }

    pub fn days_held(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.entry_date).num_days()
    }
}

/// An immutable record of a closed position. Append-only; never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: u64,
    pub symbol: String,
    pub strategy: StrategyKind,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: u32,
    pub pnl: Decimal,
    pub action: TradeAction,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn holding_period(&self) -> Duration {
        self.exit_date - self.entry_date
    }
}
