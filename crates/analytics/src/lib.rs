//! # Performance Analytics
//!
//! Turns a finished run's trade list and equity curve into a
//! `PerformanceReport`: profitability aggregates, drawdown, Sharpe/Calmar,
//! win rate, and holding-period statistics. Stateless and infallible on
//! empty input (zero trades produce a zeroed report).

pub mod engine;
pub mod error;
pub mod report;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::PerformanceReport;
