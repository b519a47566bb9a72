use crate::analysis::{
    MarketConditions, MarketSentiment, Recommendation, Sensitivities, StrategyAnalysis,
    StrategyRanking,
};
use crate::error::RiskError;
use chrono::NaiveDate;
use core_types::{MaxProfit, StrategyCategory};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::OptionsStrategy;

/// Spot bump used for the finite-difference delta and gamma estimates.
const PRICE_BUMP: Decimal = dec!(0.01);

/// Width of the sampled payoff curve as a fraction of the reference price.
const CURVE_RANGE_PCT: Decimal = dec!(0.3);

/// A stateless analyzer deriving risk metrics and a discrete recommendation
/// from a strategy's payoff surface.
///
/// All probability and sensitivity figures are deliberately coarse
/// heuristics; there is no pricing model behind them.
#[derive(Debug, Default)]
pub struct RiskAnalyzer {}

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full static analysis of one strategy as of the given date.
    pub fn analyze(
        &self,
        strategy: &OptionsStrategy,
        as_of: NaiveDate,
    ) -> Result<StrategyAnalysis, RiskError> {
        let max_profit = strategy.max_profit();
        let max_loss = strategy.max_loss();
        let break_even_points = strategy.break_even_points();

        let risk_reward_ratio = self.risk_reward_ratio(max_profit, max_loss)?;
        let probability_of_profit = self.probability_of_profit(strategy);
        let expected_value =
            self.expected_value(max_profit, max_loss, probability_of_profit);
        let sensitivities = self.sensitivities(strategy, as_of)?;
        let recommendation = self.recommendation(
            expected_value,
            risk_reward_ratio,
            probability_of_profit,
            max_loss,
        );

        Ok(StrategyAnalysis {
            max_profit,
            max_loss,
            break_even_points,
            risk_reward_ratio,
            probability_of_profit,
            expected_value,
            sensitivities,
            recommendation,
        })
    }

    /// Analyzes every strategy and returns the rows sorted by descending
    /// expected value.
    pub fn compare_strategies(
        &self,
        strategies: &[OptionsStrategy],
        as_of: NaiveDate,
    ) -> Result<Vec<StrategyRanking>, RiskError> {
        let mut rankings = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            let analysis = self.analyze(strategy, as_of)?;
            rankings.push(StrategyRanking {
                symbol: strategy.symbol().to_string(),
                kind: strategy.kind(),
                expected_value: analysis.expected_value,
                risk_reward_ratio: analysis.risk_reward_ratio,
                probability_of_profit: analysis.probability_of_profit,
                recommendation: analysis.recommendation,
            });
        }
        rankings.sort_by(|a, b| b.expected_value.cmp(&a.expected_value));
        Ok(rankings)
    }

    /// Derives an aggregate sentiment from the sign of the summed expected
    /// value and the average probability of profit. An empty candidate set
    /// yields a zeroed NEUTRAL aggregate.
    pub fn analyze_market_conditions(
        &self,
        strategies: &[OptionsStrategy],
        as_of: NaiveDate,
    ) -> Result<MarketConditions, RiskError> {
        if strategies.is_empty() {
            return Ok(MarketConditions {
                total_expected_value: Decimal::ZERO,
                average_probability_of_profit: Decimal::ZERO,
                sentiment: MarketSentiment::Neutral,
                strategy_count: 0,
            });
        }

        let mut total_expected_value = Decimal::ZERO;
        let mut probability_sum = Decimal::ZERO;
        for strategy in strategies {
            let analysis = self.analyze(strategy, as_of)?;
            total_expected_value += analysis.expected_value;
            probability_sum += analysis.probability_of_profit;
        }
        let average_probability_of_profit =
            probability_sum / Decimal::from(strategies.len());

        let sentiment = if total_expected_value > Decimal::ZERO
            && average_probability_of_profit > dec!(0.6)
        {
            MarketSentiment::Bullish
        } else if total_expected_value < Decimal::ZERO
            && average_probability_of_profit < dec!(0.4)
        {
            MarketSentiment::Bearish
        } else {
            MarketSentiment::Neutral
        };

        Ok(MarketConditions {
            total_expected_value,
            average_probability_of_profit,
            sentiment,
            strategy_count: strategies.len(),
        })
    }

    /// Samples the payoff over ±30% of the reference price, for plotting or
    /// tabular display.
    pub fn payoff_curve(
        &self,
        strategy: &OptionsStrategy,
        points: usize,
    ) -> Result<Vec<(Decimal, Decimal)>, RiskError> {
        if points < 2 {
            return Err(RiskError::InvalidParameters(format!(
                "payoff curve needs at least 2 points, got {}",
                points
            )));
        }

        let reference = strategy.reference_price();
        let half_range = reference * CURVE_RANGE_PCT;
        let min_price = (reference - half_range).max(dec!(0.01));
        let max_price = reference + half_range;
        let step = (max_price - min_price) / Decimal::from(points as u64 - 1);

        let mut curve = Vec::with_capacity(points);
        for i in 0..points {
            let spot = min_price + step * Decimal::from(i as u64);
            curve.push((spot, strategy.calculate_payoff(spot)));
        }
        Ok(curve)
    }

    fn risk_reward_ratio(
        &self,
        max_profit: MaxProfit,
        max_loss: Decimal,
    ) -> Result<Option<Decimal>, RiskError> {
        if max_loss.is_zero() {
            // Nothing at risk: unbounded ratio when there is any upside.
            let has_upside = match max_profit {
                MaxProfit::Unlimited => true,
                MaxProfit::Finite(value) => value > Decimal::ZERO,
            };
            return Ok(if has_upside { None } else { Some(Decimal::ZERO) });
        }

        match max_profit {
            // An unlimited payoff has no meaningful ratio against a finite
            // loss; it ranks as zero rather than dominating every comparison.
            MaxProfit::Unlimited => Ok(Some(Decimal::ZERO)),
            MaxProfit::Finite(value) => value
                .checked_div(max_loss.abs())
                .map(Some)
                .ok_or_else(|| RiskError::Calculation("risk/reward overflow".to_string())),
        }
    }

    /// Positional heuristic: where the reference price sits relative to the
    /// break-evens. Not a distributional model.
    fn probability_of_profit(&self, strategy: &OptionsStrategy) -> Decimal {
        let reference = strategy.reference_price();
        let break_evens = strategy.break_even_points();

        match break_evens.as_slice() {
            [single] => {
                if reference > *single {
                    dec!(0.6)
                } else {
                    dec!(0.4)
                }
            }
            [lower, upper] => {
                if *lower <= reference && reference <= *upper {
                    dec!(0.3)
                } else {
                    dec!(0.7)
                }
            }
            _ => dec!(0.5),
        }
    }

    fn expected_value(
        &self,
        max_profit: MaxProfit,
        max_loss: Decimal,
        probability: Decimal,
    ) -> Decimal {
        // An unbounded best case is capped at twice the loss magnitude for
        // this calculation only.
        let capped_profit = match max_profit {
            MaxProfit::Unlimited => max_loss.abs() * Decimal::TWO,
            MaxProfit::Finite(value) => value,
        };
        probability * capped_profit - (Decimal::ONE - probability) * max_loss.abs()
    }

    fn sensitivities(
        &self,
        strategy: &OptionsStrategy,
        as_of: NaiveDate,
    ) -> Result<Sensitivities, RiskError> {
        let spot = strategy.reference_price();
        let delta = self.estimate_delta(strategy, spot);
        let delta_bumped = self.estimate_delta(strategy, spot + PRICE_BUMP);
        let gamma = (delta_bumped - delta) / PRICE_BUMP;

        let days = strategy.days_to_expiration(as_of);
        let (theta, vega) = if days <= 0 {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            // The square roots are taken in f64 and converted straight back;
            // the scale factors are coarse heuristics anyway.
            let decay = 1.0 / (days as f64).sqrt();
            let horizon = (days as f64 / 365.0).sqrt();
            let (theta_f, vega_f) = match strategy.category() {
                StrategyCategory::Credit => (0.1 * decay, -0.1 * horizon),
                StrategyCategory::Debit => (-0.1 * decay, 0.2 * horizon),
            };
            (
                Decimal::from_f64(theta_f).ok_or_else(|| {
                    RiskError::Calculation("theta is not representable".to_string())
                })?,
                Decimal::from_f64(vega_f).ok_or_else(|| {
                    RiskError::Calculation("vega is not representable".to_string())
                })?,
            )
        };

        Ok(Sensitivities {
            delta,
            gamma,
            theta,
            vega,
        })
    }

    fn estimate_delta(&self, strategy: &OptionsStrategy, spot: Decimal) -> Decimal {
        let payoff = strategy.calculate_payoff(spot);
        let bumped = strategy.calculate_payoff(spot + PRICE_BUMP);
        (bumped - payoff) / PRICE_BUMP
    }

    fn recommendation(
        &self,
        expected_value: Decimal,
        risk_reward_ratio: Option<Decimal>,
        probability: Decimal,
        max_loss: Decimal,
    ) -> Recommendation {
        // `None` is the unbounded ratio and clears every threshold.
        let ratio_above = |threshold: Decimal| match risk_reward_ratio {
            None => true,
            Some(ratio) => ratio > threshold,
        };

        if expected_value > Decimal::ZERO && ratio_above(dec!(1.5)) && probability > dec!(0.6) {
            Recommendation::StrongBuy
        } else if expected_value > Decimal::ZERO
            && ratio_above(dec!(1.0))
            && probability > dec!(0.5)
        {
            Recommendation::Buy
        } else if expected_value > Decimal::ZERO {
            Recommendation::WeakBuy
        } else if expected_value < max_loss.abs() * dec!(-0.5) {
            Recommendation::Avoid
        } else {
            Recommendation::Hold
        }
    }
}
