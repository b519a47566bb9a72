use core_types::{MaxProfit, StrategyKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finite-difference sensitivity estimates for a strategy.
///
/// These are payoff-surface approximations, not closed-form option Greeks:
/// delta and gamma are bump-and-revalue differences over the expiration
/// payoff, theta and vega are fixed-factor time scalings signed by the
/// strategy category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivities {
    pub delta: Decimal,
    pub gamma: Decimal,
    pub theta: Decimal,
    pub vega: Decimal,
}

/// The discrete call the analyzer makes on a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    WeakBuy,
    Hold,
    Avoid,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::WeakBuy => "WEAK BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Avoid => "AVOID",
        };
        write!(f, "{}", label)
    }
}

/// The full static analysis of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAnalysis {
    pub max_profit: MaxProfit,
    /// Worst-case loss as a non-negative magnitude.
    pub max_loss: Decimal,
    pub break_even_points: Vec<Decimal>,
    /// `None` means unbounded (a positive max profit against a zero max
    /// loss); an unlimited max profit over a real max loss ranks as zero.
    pub risk_reward_ratio: Option<Decimal>,
    pub probability_of_profit: Decimal,
    pub expected_value: Decimal,
    pub sensitivities: Sensitivities,
    pub recommendation: Recommendation,
}

/// One row of a multi-strategy comparison, ranked by expected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRanking {
    pub symbol: String,
    pub kind: StrategyKind,
    pub expected_value: Decimal,
    pub risk_reward_ratio: Option<Decimal>,
    pub probability_of_profit: Decimal,
    pub recommendation: Recommendation,
}

/// Aggregate sentiment across a set of candidate strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketSentiment::Bullish => "BULLISH",
            MarketSentiment::Bearish => "BEARISH",
            MarketSentiment::Neutral => "NEUTRAL",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub total_expected_value: Decimal,
    pub average_probability_of_profit: Decimal,
    pub sentiment: MarketSentiment,
    pub strategy_count: usize,
}
