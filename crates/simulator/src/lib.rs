//! # Simulation Engine
//!
//! The day-stepped portfolio simulation. Each simulated day the engine
//! advances every open position's price along a seeded random walk, applies
//! the exit rules, then considers new entries under risk-capped sizing; on
//! the final day any remaining positions are force-closed. The `Ledger` is
//! the only mutable state and is owned exclusively by the engine for the
//! duration of a run.
//!
//! The loop is single-threaded and fully deterministic: all randomness comes
//! from the constructor-injected seeded price process, so two runs with the
//! same seed and inputs produce identical trade histories.

pub mod error;
pub mod ledger;
pub mod price;

pub use error::EngineError;
pub use ledger::{Ledger, PortfolioSnapshot};
pub use price::PriceProcess;

use analytics::{AnalyticsEngine, PerformanceReport};
use chrono::{Duration, NaiveDate};
use configuration::Config;
use core_types::{ExitReason, MaxProfit, Position, StrategyCategory, Trade};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strategies::OptionsStrategy;
use uuid::Uuid;

/// Position size is capped regardless of how small the risk per unit is.
const MAX_POSITION_SIZE: Decimal = dec!(10);

/// Take profits once this fraction of the finite max profit is reached.
const PROFIT_TAKE_FRACTION: Decimal = dec!(0.5);

/// Cut losses once this fraction of the max loss is reached.
const LOSS_CUT_FRACTION: Decimal = dec!(0.5);

/// Everything a caller needs to know about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: Uuid,
    pub final_value: Decimal,
    pub total_return_pct: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Zero when there were no trades.
    pub win_rate_pct: Decimal,
    pub trades: Vec<Trade>,
    pub report: PerformanceReport,
}

/// The day-stepped simulation engine.
///
/// Strategies are registered up front; `run` then owns the whole lifecycle:
/// ledger reset, the per-day loop, the final force-close, and result
/// assembly.
pub struct SimulationEngine {
    run_id: Uuid,
    config: Config,
    /// The strategies exactly as registered; the working set is rebuilt from
    /// these at the start of every run.
    registered: Vec<OptionsStrategy>,
    /// The working set for the current run. Reference prices in here follow
    /// the simulated tape.
    strategies: Vec<OptionsStrategy>,
    ledger: Ledger,
    prices: PriceProcess,
    current_date: NaiveDate,
}

impl SimulationEngine {
    pub fn new(run_id: Uuid, config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        let prices = PriceProcess::new(
            config.price_process.drift,
            config.price_process.volatility,
            config.price_process.seed,
        )?;
        let ledger = Ledger::new(config.simulation.initial_capital);
        let current_date = config.simulation.start_date;

        Ok(Self {
            run_id,
            config,
            registered: Vec::new(),
            strategies: Vec::new(),
            ledger,
            prices,
            current_date,
        })
    }

    pub fn add_strategy(&mut self, strategy: OptionsStrategy) {
        tracing::debug!(symbol = strategy.symbol(), kind = %strategy.kind(), "strategy registered");
        self.registered.push(strategy.clone());
        self.strategies.push(strategy);
    }

    /// A read-only view of the current cash and open positions.
    pub fn portfolio(&self) -> PortfolioSnapshot {
        self.ledger.snapshot()
    }

    /// The closed trades recorded so far, in close order.
    pub fn trade_history(&self) -> &[Trade] {
        self.ledger.trades()
    }

    /// Runs the full simulation and assembles the result.
    ///
    /// State is reset first (ledger back to initial capital, price process
    /// re-seeded), so calling `run` twice on the same engine produces the
    /// same history twice.
    pub fn run(&mut self) -> Result<SimulationResult, EngineError> {
        let initial_capital = self.config.simulation.initial_capital;
        let days = self.config.simulation.simulation_days;
        let start_date = self.config.simulation.start_date;

        self.ledger.reset(initial_capital);
        self.strategies = self.registered.clone();
        self.prices = PriceProcess::new(
            self.config.price_process.drift,
            self.config.price_process.volatility,
            self.config.price_process.seed,
        )?;
        self.current_date = start_date;

        let mut equity_curve = Vec::with_capacity(days as usize);

        let progress_bar = ProgressBar::new(days as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("=>-"),
        );

        for day in 0..days {
            self.current_date = start_date + Duration::days(day as i64);

            self.mark_positions()?;
            self.process_exits()?;
            self.process_entries()?;

            equity_curve.push((self.current_date, self.ledger.total_value()));
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Simulation complete");

        // Whatever is still open goes back to cash at the last marked price.
        for id in self.ledger.position_ids() {
            self.close(id, ExitReason::EndOfRun)?;
        }

        let trades = self.ledger.trades().to_vec();
        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.pnl > Decimal::ZERO).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate_pct = if total_trades > 0 {
            (Decimal::from(winning_trades) / Decimal::from(total_trades)) * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let final_value = self.ledger.cash();
        let total_return_pct = if initial_capital > Decimal::ZERO {
            ((final_value - initial_capital) / initial_capital) * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let report =
            AnalyticsEngine::new().calculate(&trades, &equity_curve, initial_capital)?;

        Ok(SimulationResult {
            run_id: self.run_id,
            final_value,
            total_return_pct,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate_pct,
            trades,
            report,
        })
    }

    /// Steps every open position's price forward one day and recomputes its
    /// unrealized P&L off the payoff surface. The owning strategy's reference
    /// price follows the simulated tape.
    fn mark_positions(&mut self) -> Result<(), EngineError> {
        for id in self.ledger.position_ids() {
            let (symbol, quantity, current_price) = {
                let position = self
                    .ledger
                    .position(id)
                    .ok_or(EngineError::PositionNotFound(id))?;
                (
                    position.symbol.clone(),
                    position.quantity,
                    position.current_price,
                )
            };

            let new_price = self.prices.next_price(current_price)?;

            let Some(strategy) = self.strategies.iter_mut().find(|s| s.symbol() == symbol)
            else {
                tracing::warn!(symbol = %symbol, "open position has no backing strategy");
                continue;
            };
            strategy.refresh_reference_price(new_price)?;

            let unrealized = strategy.calculate_payoff(new_price) * Decimal::from(quantity);
            self.ledger.mark_position(id, new_price, unrealized)?;
        }
        Ok(())
    }

    fn process_exits(&mut self) -> Result<(), EngineError> {
        let mut to_close = Vec::new();
        for id in self.ledger.position_ids() {
            let position = self
                .ledger
                .position(id)
                .ok_or(EngineError::PositionNotFound(id))?;
            let Some(strategy) = self
                .strategies
                .iter()
                .find(|s| s.symbol() == position.symbol)
            else {
                continue;
            };
            if let Some(reason) = self.exit_reason(position, strategy) {
                to_close.push((id, reason));
            }
        }

        for (id, reason) in to_close {
            self.close(id, reason)?;
        }
        Ok(())
    }

    /// The exit rules, first match wins.
    fn exit_reason(
        &self,
        position: &Position,
        strategy: &OptionsStrategy,
    ) -> Option<ExitReason> {
        if strategy.is_expired(self.current_date) {
            return Some(ExitReason::Expired);
        }

        // Held for at least half the days-to-expiration captured at entry.
        let days_held = position.days_held(self.current_date);
        if 2 * days_held >= position.days_to_expiration_at_entry {
            return Some(ExitReason::TimeExit);
        }

        let quantity = Decimal::from(position.quantity);
        if let MaxProfit::Finite(max_profit) = strategy.max_profit() {
            if position.unrealized_pnl >= max_profit * PROFIT_TAKE_FRACTION * quantity {
                return Some(ExitReason::ProfitTarget);
            }
        }

        // Max loss is a non-negative magnitude, so the threshold is negated.
        let max_loss = strategy.max_loss();
        if position.unrealized_pnl <= -max_loss * LOSS_CUT_FRACTION * quantity {
            return Some(ExitReason::StopLoss);
        }

        None
    }

    /// Realizes a position at its last marked price and records the trade.
    fn close(&mut self, id: u64, reason: ExitReason) -> Result<(), EngineError> {
        let (symbol, quantity, current_price, unrealized) = {
            let position = self
                .ledger
                .position(id)
                .ok_or(EngineError::PositionNotFound(id))?;
            (
                position.symbol.clone(),
                position.quantity,
                position.current_price,
                position.unrealized_pnl,
            )
        };

        let pnl = match self.strategies.iter().find(|s| s.symbol() == symbol) {
            Some(strategy) => {
                strategy.calculate_payoff(current_price) * Decimal::from(quantity)
            }
            None => unrealized,
        };

        let trade = self
            .ledger
            .close_position(id, self.current_date, pnl, reason)?;
        tracing::info!(
            date = %self.current_date,
            symbol = %trade.symbol,
            kind = %trade.strategy,
            pnl = %trade.pnl,
            reason = %trade.exit_reason,
            "position closed"
        );
        Ok(())
    }

    fn process_entries(&mut self) -> Result<(), EngineError> {
        for index in 0..self.strategies.len() {
            let (dte, quantity) = {
                let strategy = &self.strategies[index];

                if self.ledger.position_for_symbol(strategy.symbol()).is_some() {
                    continue;
                }
                if self.ledger.open_count() >= self.config.simulation.max_concurrent_trades {
                    continue;
                }
                if strategy.is_expired(self.current_date) {
                    continue;
                }

                let dte = strategy.days_to_expiration(self.current_date);
                let in_window = match strategy.category() {
                    StrategyCategory::Credit => (30..=45).contains(&dte),
                    StrategyCategory::Debit => (15..=30).contains(&dte),
                };
                if !in_window {
                    continue;
                }

                let Some(quantity) = self.position_size(strategy) else {
                    continue;
                };
                (dte, quantity)
            };

            let strategy = &self.strategies[index];
            let id = self.ledger.open_position(
                strategy.symbol(),
                strategy.kind(),
                self.current_date,
                strategy.reference_price(),
                quantity,
                dte,
            )?;
            tracing::info!(
                date = %self.current_date,
                position_id = id,
                symbol = strategy.symbol(),
                kind = %strategy.kind(),
                quantity,
                "position opened"
            );
        }
        Ok(())
    }

    /// Risk-capped size: `floor(cash * risk_per_trade / max_loss)`, capped at
    /// ten units. A strategy without a usable max loss cannot be sized and is
    /// skipped, never fatal.
    fn position_size(&self, strategy: &OptionsStrategy) -> Option<u32> {
        let max_loss = strategy.max_loss();
        if max_loss <= Decimal::ZERO {
            tracing::warn!(
                symbol = strategy.symbol(),
                kind = %strategy.kind(),
                "max loss is not positive; skipping entry"
            );
            return None;
        }

        let budget = self.ledger.cash() * self.config.simulation.risk_per_trade;
        let size = (budget / max_loss).floor().min(MAX_POSITION_SIZE);
        size.to_u32().filter(|quantity| *quantity > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{PriceProcessSettings, SimulationSettings};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn start() -> NaiveDate {
        date(2026, 8, 10)
    }

    fn config(days: u32, drift: f64, volatility: f64, seed: u64) -> Config {
        Config {
            simulation: SimulationSettings {
                initial_capital: dec!(10000),
                risk_per_trade: dec!(0.02),
                max_concurrent_trades: 5,
                simulation_days: days,
                start_date: start(),
            },
            price_process: PriceProcessSettings {
                drift,
                volatility,
                seed,
            },
        }
    }

    fn engine(config: Config) -> SimulationEngine {
        SimulationEngine::new(Uuid::nil(), config).unwrap()
    }

    /// The reference condor: 2.50 credit, 2.50 max loss, entered `dte` days
    /// before expiry at the given reference price.
    fn condor(reference: Decimal, dte: i64) -> OptionsStrategy {
        OptionsStrategy::iron_condor(
            "SPY",
            reference,
            start(),
            start() + Duration::days(dte),
            dec!(155),
            dec!(160),
            dec!(145),
            dec!(140),
            dec!(2.50),
        )
        .unwrap()
    }

    #[test]
    fn sizing_is_risk_capped_and_bounded() {
        // floor(10000 * 0.02 / 2.50) = 80, capped to 10.
        let mut engine = engine(config(1, 0.0, 0.0, 1));
        engine.add_strategy(condor(dec!(150), 35));

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 1);
        assert_eq!(result.trades[0].quantity, 10);
        assert_eq!(result.trades[0].exit_reason, ExitReason::EndOfRun);
        // Force-closed at the unmoved entry price: full credit realized.
        assert_eq!(result.trades[0].pnl, dec!(25));
        assert_eq!(result.final_value, dec!(10025));
        assert_eq!(result.win_rate_pct, dec!(100));
    }

    #[test]
    fn profit_target_exit_realizes_into_cash() {
        // Flat tape at the reference: the full credit is on the table from
        // day one, which clears the 50% profit target. dte 30 keeps the
        // strategy out of the credit entry window after the close.
        let mut engine = engine(config(3, 0.0, 0.0, 1));
        engine.add_strategy(condor(dec!(150), 30));

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::ProfitTarget);
        assert_eq!(trade.exit_date, start() + Duration::days(1));
        assert_eq!(trade.pnl, dec!(25));
        assert_eq!(result.final_value, dec!(10025));
        assert_eq!(result.winning_trades, 1);
        assert_eq!(result.losing_trades, 0);
    }

    #[test]
    fn stop_loss_exit_fires_on_a_crash() {
        // -10% a day with no noise: day one lands at 135, beyond the put
        // wing, so the marked loss is the full 2.50 per unit.
        let mut engine = engine(config(3, -0.10, 0.0, 1));
        engine.add_strategy(condor(dec!(150), 30));

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.pnl, dec!(-25));
        assert_eq!(result.final_value, dec!(9975));
        assert_eq!(result.losing_trades, 1);
        assert_eq!(result.win_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn time_exit_after_half_the_entry_dte() {
        // Reference off-center: payoff at a flat 157 tape is 0.50 per unit,
        // inside both the profit-target and stop-loss bands, so only the
        // clock can close it. Half of 30 days at entry = day 15.
        let mut engine = engine(config(20, 0.0, 0.0, 1));
        engine.add_strategy(condor(dec!(157), 30));

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TimeExit);
        assert_eq!(trade.exit_date, start() + Duration::days(15));
        assert_eq!(trade.pnl, dec!(5));
    }

    #[test]
    fn no_entry_outside_the_dte_window_means_no_trades() {
        // 100 days out is far beyond the 30-45 credit window; with zero
        // volatility nothing ever moves it into range within 5 days.
        let mut engine = engine(config(5, 0.0, 0.0, 1));
        engine.add_strategy(condor(dec!(150), 100));

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.final_value, dec!(10000));
        assert_eq!(result.total_return_pct, Decimal::ZERO);
        assert_eq!(result.win_rate_pct, Decimal::ZERO);
        assert_eq!(result.report, PerformanceReport::new());
        assert!(engine.portfolio().positions.is_empty());
    }

    #[test]
    fn unsizable_strategy_is_skipped_not_fatal() {
        // Credit equal to the spread width: max loss is zero, so the
        // position cannot be sized.
        let degenerate = OptionsStrategy::iron_condor(
            "SPY",
            dec!(150),
            start(),
            start() + Duration::days(35),
            dec!(155),
            dec!(160),
            dec!(145),
            dec!(140),
            dec!(5),
        )
        .unwrap();

        let mut engine = engine(config(3, 0.0, 0.0, 1));
        engine.add_strategy(degenerate);

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.final_value, dec!(10000));
    }

    #[test]
    fn max_concurrent_limit_blocks_additional_entries() {
        let mut cfg = config(1, 0.0, 0.0, 1);
        cfg.simulation.max_concurrent_trades = 1;
        let mut engine = engine(cfg);
        engine.add_strategy(condor(dec!(150), 35));

        engine.add_strategy(
            OptionsStrategy::iron_condor(
                "QQQ",
                dec!(150),
                start(),
                start() + Duration::days(35),
                dec!(155),
                dec!(160),
                dec!(145),
                dec!(140),
                dec!(2.50),
            )
            .unwrap(),
        );

        let result = engine.run().unwrap();
        assert_eq!(result.total_trades, 1);
        assert_eq!(result.trades[0].symbol, "SPY");
    }

    #[test]
    fn same_seed_reproduces_the_trade_history() {
        let build = || {
            let mut engine = engine(config(40, 0.0005, 0.02, 42));
            engine.add_strategy(condor(dec!(150), 35));
            engine.add_strategy(
                OptionsStrategy::straddle(
                    "TSLA",
                    dec!(200),
                    start(),
                    start() + Duration::days(21),
                    dec!(200),
                    dec!(15),
                    dec!(12),
                )
                .unwrap(),
            );
            engine
        };

        let result_a = build().run().unwrap();
        let result_b = build().run().unwrap();
        assert_eq!(result_a.trades, result_b.trades);
        assert_eq!(result_a.final_value, result_b.final_value);

        // Re-running the same engine resets state and reproduces the run.
        let mut engine = build();
        let first = engine.run().unwrap();
        let second = engine.run().unwrap();
        assert_eq!(first.trades, second.trades);
    }

    #[test]
    fn result_counts_are_consistent() {
        let mut engine = engine(config(60, 0.0005, 0.02, 7));
        engine.add_strategy(condor(dec!(150), 35));

        let result = engine.run().unwrap();
        assert_eq!(
            result.winning_trades + result.losing_trades,
            result.total_trades
        );
        assert_eq!(result.report.total_trades, result.total_trades);
        if result.total_trades > 0 {
            let expected = (Decimal::from(result.winning_trades)
                / Decimal::from(result.total_trades))
                * Decimal::ONE_HUNDRED;
            assert_eq!(result.win_rate_pct, expected);
        }
        // Cash plus realized P&L reconciles with the trade log.
        let realized: Decimal = result.trades.iter().map(|t| t.pnl).sum();
        assert_eq!(result.final_value, dec!(10000) + realized);
    }
}
