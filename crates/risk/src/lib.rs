//! # Risk Analysis
//!
//! Static analysis of option strategies: payoff bounds, break-evens, a
//! positional probability-of-profit heuristic, expected value, coarse
//! finite-difference sensitivities, and a discrete recommendation.
//!
//! This crate is pure computation over `strategies::OptionsStrategy`; it
//! holds no state and performs no I/O. The probability and sensitivity
//! figures are deliberately simple heuristics, not a stochastic pricing
//! model.

pub mod analysis;
pub mod analyzer;
pub mod error;

pub use analysis::{
    MarketConditions, MarketSentiment, Recommendation, Sensitivities, StrategyAnalysis,
    StrategyRanking,
};
pub use analyzer::RiskAnalyzer;
pub use error::RiskError;
