//! # Strategy Payoff Library
//!
//! This crate contains the payoff model at the heart of the system. It
//! defines `OptionsStrategy`, a validated multi-leg option combination, and
//! the closed `StrategyLegs` sum type with one variant per supported shape.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   market data sources, simulation, or reporting. It depends only on
//!   `core-types`.
//! - **Closed variant set:** Strategies are a sum type rather than an open
//!   trait hierarchy. The analyzer and the simulation engine dispatch through
//!   the methods on `OptionsStrategy` without knowing which variant they hold,
//!   and the compiler guarantees every variant handles every operation.
//! - **Validation at construction:** A value of `OptionsStrategy` that exists
//!   is well-formed: strikes ordered, premiums non-negative, expiration after
//!   entry, and max loss non-negative by construction.
//!
//! ## Public API
//!
//! - `OptionsStrategy`: the validated strategy with payoff/metric methods.
//! - `StrategyLegs`: the per-variant leg data.
//! - `StrategyParams` / `build_strategy`: conversion from the plain parameter
//!   structure produced by an external recommender.

pub mod butterfly;
pub mod condor;
pub mod error;
pub mod factory;
pub mod spread;
pub mod straddle;
pub mod strangle;

pub use butterfly::Butterfly;
pub use condor::IronCondor;
pub use error::StrategyError;
pub use factory::{build_strategy, StrategyParams};
pub use spread::{CallSpread, PutSpread};
pub use straddle::Straddle;
pub use strangle::Strangle;

use chrono::NaiveDate;
use core_types::{MaxProfit, StrategyCategory, StrategyKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The leg data for each supported strategy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyLegs {
    IronCondor(IronCondor),
    Straddle(Straddle),
    Strangle(Strangle),
    CallSpread(CallSpread),
    PutSpread(PutSpread),
    Butterfly(Butterfly),
}

/// A validated multi-leg option strategy on a single underlying.
///
/// Common fields live here; the variant-specific strikes and premiums live in
/// `legs`. Everything is immutable after construction except the reference
/// price, which tracks the underlying as new data arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsStrategy {
    symbol: String,
    reference_price: Decimal,
    expiration: NaiveDate,
    entry_date: NaiveDate,
    category: StrategyCategory,
    legs: StrategyLegs,
}

impl OptionsStrategy {
    fn new(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        category: StrategyCategory,
        legs: StrategyLegs,
    ) -> Result<Self, StrategyError> {
        if reference_price < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "reference_price must be non-negative, got {}",
                reference_price
            )));
        }
        if expiration <= entry_date {
            return Err(StrategyError::ExpirationNotAfterEntry {
                expiration,
                entry: entry_date,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            reference_price,
            expiration,
            entry_date,
            category,
            legs,
        })
    }

    /// Short call spread over short put spread, entered for a net credit.
    #[allow(clippy::too_many_arguments)]
    pub fn iron_condor(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        short_call_strike: Decimal,
        long_call_strike: Decimal,
        short_put_strike: Decimal,
        long_put_strike: Decimal,
        net_credit: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = IronCondor::new(
            short_call_strike,
            long_call_strike,
            short_put_strike,
            long_put_strike,
            net_credit,
        )?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Credit,
            StrategyLegs::IronCondor(legs),
        )
    }

    /// Long call plus long put at the same strike.
    pub fn straddle(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = Straddle::new(strike, call_premium, put_premium)?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Debit,
            StrategyLegs::Straddle(legs),
        )
    }

    /// Long call plus long put at different strikes.
    #[allow(clippy::too_many_arguments)]
    pub fn strangle(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        call_strike: Decimal,
        put_strike: Decimal,
        call_premium: Decimal,
        put_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = Strangle::new(call_strike, put_strike, call_premium, put_premium)?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Debit,
            StrategyLegs::Strangle(legs),
        )
    }

    /// Long call, short higher-strike call.
    #[allow(clippy::too_many_arguments)]
    pub fn call_spread(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = CallSpread::new(buy_strike, sell_strike, buy_premium, sell_premium)?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Debit,
            StrategyLegs::CallSpread(legs),
        )
    }

    /// Long put, short lower-strike put.
    #[allow(clippy::too_many_arguments)]
    pub fn put_spread(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        buy_strike: Decimal,
        sell_strike: Decimal,
        buy_premium: Decimal,
        sell_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = PutSpread::new(buy_strike, sell_strike, buy_premium, sell_premium)?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Debit,
            StrategyLegs::PutSpread(legs),
        )
    }

    /// Long low call, two short middle calls, long high call.
    #[allow(clippy::too_many_arguments)]
    pub fn butterfly(
        symbol: impl Into<String>,
        reference_price: Decimal,
        entry_date: NaiveDate,
        expiration: NaiveDate,
        low_strike: Decimal,
        middle_strike: Decimal,
        high_strike: Decimal,
        low_premium: Decimal,
        middle_premium: Decimal,
        high_premium: Decimal,
    ) -> Result<Self, StrategyError> {
        let legs = Butterfly::new(
            low_strike,
            middle_strike,
            high_strike,
            low_premium,
            middle_premium,
            high_premium,
        )?;
        Self::new(
            symbol,
            reference_price,
            entry_date,
            expiration,
            StrategyCategory::Debit,
            StrategyLegs::Butterfly(legs),
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> StrategyKind {
        match &self.legs {
            StrategyLegs::IronCondor(_) => StrategyKind::IronCondor,
            StrategyLegs::Straddle(_) => StrategyKind::Straddle,
            StrategyLegs::Strangle(_) => StrategyKind::Strangle,
            StrategyLegs::CallSpread(_) => StrategyKind::CallSpread,
            StrategyLegs::PutSpread(_) => StrategyKind::PutSpread,
            StrategyLegs::Butterfly(_) => StrategyKind::Butterfly,
        }
    }

    pub fn category(&self) -> StrategyCategory {
        self.category
    }

    pub fn legs(&self) -> &StrategyLegs {
        &self.legs
    }

    pub fn reference_price(&self) -> Decimal {
        self.reference_price
    }

    /// Substitutes a fresh underlying price for the one captured at
    /// construction, e.g. from a live data feed or the simulated tape.
    pub fn refresh_reference_price(&mut self, price: Decimal) -> Result<(), StrategyError> {
        if price < Decimal::ZERO {
            return Err(StrategyError::InvalidParameters(format!(
                "reference_price must be non-negative, got {}",
                price
            )));
        }
        self.reference_price = price;
        Ok(())
    }

    pub fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn days_to_expiration(&self, as_of: NaiveDate) -> i64 {
        (self.expiration - as_of).num_days()
    }

    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.days_to_expiration(as_of) <= 0
    }

    /// Expiration payoff per unit at the given spot price. Piecewise-linear
    /// and continuous for every variant.
    pub fn calculate_payoff(&self, spot: Decimal) -> Decimal {
        match &self.legs {
            StrategyLegs::IronCondor(legs) => legs.payoff(spot),
            StrategyLegs::Straddle(legs) => legs.payoff(spot),
            StrategyLegs::Strangle(legs) => legs.payoff(spot),
            StrategyLegs::CallSpread(legs) => legs.payoff(spot),
            StrategyLegs::PutSpread(legs) => legs.payoff(spot),
            StrategyLegs::Butterfly(legs) => legs.payoff(spot),
        }
    }

    pub fn max_profit(&self) -> MaxProfit {
        match &self.legs {
            StrategyLegs::IronCondor(legs) => legs.max_profit(),
            StrategyLegs::Straddle(legs) => legs.max_profit(),
            StrategyLegs::Strangle(legs) => legs.max_profit(),
            StrategyLegs::CallSpread(legs) => legs.max_profit(),
            StrategyLegs::PutSpread(legs) => legs.max_profit(),
            StrategyLegs::Butterfly(legs) => legs.max_profit(),
        }
    }

    /// Worst-case loss as a non-negative magnitude.
    pub fn max_loss(&self) -> Decimal {
        match &self.legs {
            StrategyLegs::IronCondor(legs) => legs.max_loss(),
            StrategyLegs::Straddle(legs) => legs.max_loss(),
            StrategyLegs::Strangle(legs) => legs.max_loss(),
            StrategyLegs::CallSpread(legs) => legs.max_loss(),
            StrategyLegs::PutSpread(legs) => legs.max_loss(),
            StrategyLegs::Butterfly(legs) => legs.max_loss(),
        }
    }

    /// Break-even spots in ascending order; one for verticals, two for the
    /// range-bound and volatility shapes.
    pub fn break_even_points(&self) -> Vec<Decimal> {
        match &self.legs {
            StrategyLegs::IronCondor(legs) => legs.break_even_points(),
            StrategyLegs::Straddle(legs) => legs.break_even_points(),
            StrategyLegs::Strangle(legs) => legs.break_even_points(),
            StrategyLegs::CallSpread(legs) => legs.break_even_points(),
            StrategyLegs::PutSpread(legs) => legs.break_even_points(),
            StrategyLegs::Butterfly(legs) => legs.break_even_points(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MaxProfit;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn all_variants() -> Vec<OptionsStrategy> {
        let entry = date(2026, 8, 10);
        let expiry = date(2026, 9, 18);
        vec![
            OptionsStrategy::iron_condor(
                "SPY",
                dec!(150),
                entry,
                expiry,
                dec!(155),
                dec!(160),
                dec!(145),
                dec!(140),
                dec!(2.50),
            )
            .unwrap(),
            OptionsStrategy::straddle("TSLA", dec!(200), entry, expiry, dec!(200), dec!(15), dec!(12))
                .unwrap(),
            OptionsStrategy::strangle(
                "QQQ",
                dec!(200),
                entry,
                expiry,
                dec!(210),
                dec!(190),
                dec!(8),
                dec!(6),
            )
            .unwrap(),
            OptionsStrategy::call_spread(
                "AAPL",
                dec!(105),
                entry,
                expiry,
                dec!(100),
                dec!(110),
                dec!(6),
                dec!(2),
            )
            .unwrap(),
            OptionsStrategy::put_spread(
                "MSFT",
                dec!(105),
                entry,
                expiry,
                dec!(110),
                dec!(100),
                dec!(7),
                dec!(3),
            )
            .unwrap(),
            OptionsStrategy::butterfly(
                "GOOGL",
                dec!(100),
                entry,
                expiry,
                dec!(95),
                dec!(100),
                dec!(105),
                dec!(8),
                dec!(4),
                dec!(2),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn payoff_is_zero_at_every_declared_break_even() {
        for strategy in all_variants() {
            for be in strategy.break_even_points() {
                assert_eq!(
                    strategy.calculate_payoff(be),
                    Decimal::ZERO,
                    "{} payoff at break-even {}",
                    strategy.kind(),
                    be
                );
            }
        }
    }

    #[test]
    fn payoff_respects_declared_bounds_over_a_wide_range() {
        for strategy in all_variants() {
            let max_loss = strategy.max_loss();
            let max_profit = strategy.max_profit();
            let mut spot = Decimal::ZERO;
            while spot <= dec!(400) {
                let payoff = strategy.calculate_payoff(spot);
                assert!(
                    payoff >= -max_loss,
                    "{} payoff {} below -max_loss {} at spot {}",
                    strategy.kind(),
                    payoff,
                    max_loss,
                    spot
                );
                if let MaxProfit::Finite(cap) = max_profit {
                    assert!(
                        payoff <= cap,
                        "{} payoff {} above max_profit {} at spot {}",
                        strategy.kind(),
                        payoff,
                        cap,
                        spot
                    );
                }
                spot += dec!(0.5);
            }
        }
    }

    #[test]
    fn payoff_is_continuous_everywhere() {
        let eps = dec!(0.001);
        for strategy in all_variants() {
            let mut spot = dec!(0.5);
            while spot <= dec!(400) {
                let jump = (strategy.calculate_payoff(spot + eps)
                    - strategy.calculate_payoff(spot - eps))
                .abs();
                // A piecewise-linear payoff over these legs can change by at
                // most 4 units of slope across a 2*eps window.
                assert!(
                    jump <= dec!(0.008),
                    "{} payoff jumps by {} near {}",
                    strategy.kind(),
                    jump,
                    spot
                );
                spot += dec!(0.25);
            }
        }
    }

    #[test]
    fn categories_are_assigned_at_construction() {
        let variants = all_variants();
        assert_eq!(variants[0].category(), StrategyCategory::Credit);
        for strategy in &variants[1..] {
            assert_eq!(strategy.category(), StrategyCategory::Debit);
        }
    }

    #[test]
    fn break_evens_are_ascending() {
        for strategy in all_variants() {
            let points = strategy.break_even_points();
            assert!(!points.is_empty() && points.len() <= 2);
            if points.len() == 2 {
                assert!(points[0] < points[1]);
            }
        }
    }

    #[test]
    fn rejects_expiration_on_or_before_entry() {
        let entry = date(2026, 8, 10);
        let result = OptionsStrategy::straddle(
            "TSLA",
            dec!(200),
            entry,
            entry,
            dec!(200),
            dec!(15),
            dec!(12),
        );
        assert!(result.is_err());
    }

    #[test]
    fn reference_price_can_be_refreshed() {
        let mut strategy = all_variants().remove(0);
        strategy.refresh_reference_price(dec!(151.25)).unwrap();
        assert_eq!(strategy.reference_price(), dec!(151.25));
        assert!(strategy.refresh_reference_price(dec!(-1)).is_err());
    }

    #[test]
    fn expiry_countdown_uses_the_given_date() {
        let strategy = all_variants().remove(0);
        assert_eq!(strategy.days_to_expiration(date(2026, 8, 10)), 39);
        assert!(!strategy.is_expired(date(2026, 9, 17)));
        assert!(strategy.is_expired(date(2026, 9, 18)));
    }
}
