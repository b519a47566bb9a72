use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use chrono::NaiveDate;
use core_types::Trade;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 86_400;

/// A stateless calculator for deriving performance metrics from a finished
/// simulation run.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the full performance report.
    ///
    /// # Arguments
    ///
    /// * `trades` - Every closed `Trade` from the run, in close order.
    /// * `equity_curve` - The per-day series of cash + unrealized P&L.
    /// * `initial_capital` - The starting cash of the run.
    ///
    /// A run with zero trades produces the zeroed default report rather than
    /// an error.
    pub fn calculate(
        &self,
        trades: &[Trade],
        equity_curve: &[(NaiveDate, Decimal)],
        initial_capital: Decimal,
    ) -> Result<PerformanceReport, AnalyticsError> {
        let mut report = PerformanceReport::new();

        if trades.is_empty() {
            return Ok(report);
        }

        self.calculate_profitability(trades, initial_capital, &mut report)?;
        self.calculate_drawdown(equity_curve, &mut report)?;
        self.calculate_time_metrics(trades, &mut report)?;
        self.calculate_ratios(equity_curve, &mut report)?;

        Ok(report)
    }

    /// Calculates all profitability-related metrics.
    fn calculate_profitability(
        &self,
        trades: &[Trade],
        initial_capital: Decimal,
        report: &mut PerformanceReport,
    ) -> Result<(), AnalyticsError> {
        report.total_trades = trades.len();

        for trade in trades {
            report.total_net_profit += trade.pnl;

            if trade.pnl.is_sign_positive() && !trade.pnl.is_zero() {
                report.gross_profit += trade.pnl;
                report.winning_trades += 1;
            } else {
                report.gross_loss += trade.pnl.abs();
                report.losing_trades += 1;
            }
        }

        // --- Ratios ---
        if report.gross_loss > Decimal::ZERO {
            report.profit_factor = Some(report.gross_profit / report.gross_loss);
        }

        if report.total_trades > 0 {
            report.win_rate_pct = (Decimal::from(report.winning_trades)
                / Decimal::from(report.total_trades))
                * Decimal::ONE_HUNDRED;
        }

        if report.winning_trades > 0 {
            report.average_win = report.gross_profit / Decimal::from(report.winning_trades);
        }

        if report.losing_trades > 0 {
            report.average_loss = report.gross_loss / Decimal::from(report.losing_trades);
            if report.average_loss > Decimal::ZERO {
                report.payoff_ratio = Some(report.average_win / report.average_loss);
            }
        }

        if initial_capital > Decimal::ZERO {
            report.total_return_pct =
                (report.total_net_profit / initial_capital) * Decimal::ONE_HUNDRED;
        }

        Ok(())
    }

    /// Calculates maximum drawdown from the equity curve.
    fn calculate_drawdown(
        &self,
        equity_curve: &[(NaiveDate, Decimal)],
        report: &mut PerformanceReport,
    ) -> Result<(), AnalyticsError> {
        let mut max_drawdown = Decimal::ZERO;

        if equity_curve.is_empty() {
            return Ok(());
        }

        let mut peak_equity = equity_curve[0].1;

        for &(_date, equity) in equity_curve {
            if equity > peak_equity {
                peak_equity = equity;
            }
            let drawdown = peak_equity - equity;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        report.max_drawdown = max_drawdown;

        if peak_equity > Decimal::ZERO {
            report.max_drawdown_pct = (max_drawdown / peak_equity) * Decimal::ONE_HUNDRED;
        }

        Ok(())
    }

    /// Calculates all ratio-based metrics like Sharpe and Calmar.
    fn calculate_ratios(
        &self,
        equity_curve: &[(NaiveDate, Decimal)],
        report: &mut PerformanceReport,
    ) -> Result<(), AnalyticsError> {
        // --- Calmar Ratio ---
        if report.max_drawdown_pct > Decimal::ZERO {
            report.calmar_ratio = Some(report.total_return_pct / report.max_drawdown_pct);
        }

        // --- Sharpe Ratio ---
        // 1. Daily returns from consecutive equity points. A zero-equity day
        //    cannot produce a return and is skipped.
        let returns: Vec<Decimal> = equity_curve
            .windows(2)
            .filter_map(|w| (w[1].1 - w[0].1).checked_div(w[0].1))
            .collect();

        if returns.len() < 2 {
            report.sharpe_ratio = None;
            return Ok(());
        }

        // 2. Mean of returns.
        let returns_sum: Decimal = returns.iter().sum();
        let mean_return = returns_sum / Decimal::from(returns.len());

        // 3. Standard deviation of returns.
        let variance: Decimal = returns
            .iter()
            .map(|r| (*r - mean_return) * (*r - mean_return))
            .sum::<Decimal>()
            / Decimal::from(returns.len());

        if variance <= Decimal::ZERO {
            report.sharpe_ratio = None;
            return Ok(());
        }

        let std_dev = variance.sqrt().ok_or_else(|| {
            AnalyticsError::InternalError(
                "Failed to calculate square root for variance".to_string(),
            )
        })?;

        // 4. Non-annualized Sharpe over daily returns, risk-free rate 0.
        if std_dev > Decimal::ZERO {
            report.sharpe_ratio = Some(mean_return / std_dev);
        }

        Ok(())
    }

    /// Calculates time-based metrics.
    fn calculate_time_metrics(
        &self,
        trades: &[Trade],
        report: &mut PerformanceReport,
    ) -> Result<(), AnalyticsError> {
        if trades.is_empty() {
            return Ok(());
        }

        let total_days: i64 = trades.iter().map(|t| t.holding_period().num_days()).sum();
        let avg_days = (total_days / trades.len() as i64).max(0) as u64;
        report.average_holding_period = Duration::from_secs(avg_days * SECONDS_PER_DAY);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ExitReason, StrategyKind, TradeAction};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(id: u64, pnl: Decimal, entry: NaiveDate, exit: NaiveDate) -> Trade {
        Trade {
            trade_id: id,
            symbol: "SPY".to_string(),
            strategy: StrategyKind::IronCondor,
            entry_date: entry,
            exit_date: exit,
            entry_price: dec!(150),
            exit_price: dec!(151),
            quantity: 10,
            pnl,
            action: TradeAction::Sell,
            exit_reason: ExitReason::ProfitTarget,
        }
    }

    #[test]
    fn zero_trades_yields_zeroed_report() {
        let engine = AnalyticsEngine::new();
        let report = engine.calculate(&[], &[], dec!(10000)).unwrap();
        assert_eq!(report, PerformanceReport::new());
        assert_eq!(report.win_rate_pct, Decimal::ZERO);
        assert_eq!(report.total_trades, 0);
    }

    #[test]
    fn profitability_and_win_rate() {
        let engine = AnalyticsEngine::new();
        let d0 = date(2026, 8, 10);
        let trades = vec![
            trade(1, dec!(25), d0, date(2026, 8, 14)),
            trade(2, dec!(-10), d0, date(2026, 8, 16)),
            trade(3, dec!(15), d0, date(2026, 8, 18)),
            trade(4, dec!(0), d0, date(2026, 8, 20)),
        ];

        let report = engine.calculate(&trades, &[], dec!(10000)).unwrap();
        assert_eq!(report.total_trades, 4);
        assert_eq!(report.winning_trades, 2);
        assert_eq!(report.losing_trades, 2);
        assert_eq!(report.win_rate_pct, dec!(50));
        assert_eq!(report.total_net_profit, dec!(30));
        assert_eq!(report.gross_profit, dec!(40));
        assert_eq!(report.gross_loss, dec!(10));
        assert_eq!(report.profit_factor, Some(dec!(4)));
        assert_eq!(report.average_win, dec!(20));
        assert_eq!(report.average_loss, dec!(5));
        assert_eq!(report.payoff_ratio, Some(dec!(4)));
        assert_eq!(report.total_return_pct, dec!(0.30));
        assert_eq!(
            report.average_holding_period,
            Duration::from_secs(7 * SECONDS_PER_DAY)
        );
    }

    #[test]
    fn drawdown_from_equity_curve() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(1, dec!(-100), date(2026, 8, 10), date(2026, 8, 12))];
        let curve = vec![
            (date(2026, 8, 10), dec!(10000)),
            (date(2026, 8, 11), dec!(10500)),
            (date(2026, 8, 12), dec!(9800)),
            (date(2026, 8, 13), dec!(10100)),
        ];

        let report = engine.calculate(&trades, &curve, dec!(10000)).unwrap();
        assert_eq!(report.max_drawdown, dec!(700));
        // 700 / 10500 peak.
        assert!(report.max_drawdown_pct > dec!(6.6) && report.max_drawdown_pct < dec!(6.7));
        assert!(report.sharpe_ratio.is_some());
    }

    #[test]
    fn flat_equity_has_no_sharpe() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(1, dec!(0), date(2026, 8, 10), date(2026, 8, 12))];
        let curve = vec![
            (date(2026, 8, 10), dec!(10000)),
            (date(2026, 8, 11), dec!(10000)),
            (date(2026, 8, 12), dec!(10000)),
        ];

        let report = engine.calculate(&trades, &curve, dec!(10000)).unwrap();
        assert_eq!(report.sharpe_ratio, None);
        assert_eq!(report.max_drawdown, Decimal::ZERO);
        assert_eq!(report.calmar_ratio, None);
    }
}
