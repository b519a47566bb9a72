use crate::error::ConfigError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for a simulation run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: SimulationSettings,
    pub price_process: PriceProcessSettings,
}

/// Contains parameters for the day-stepped trading simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    /// The initial starting capital for the simulation.
    pub initial_capital: Decimal,
    /// The fraction of cash to risk on a single trade (e.g., 0.02 for 2%).
    pub risk_per_trade: Decimal,
    /// The maximum number of positions that may be open at once.
    pub max_concurrent_trades: usize,
    /// How many days the simulation steps through.
    pub simulation_days: u32,
    /// The simulated calendar date of day zero.
    pub start_date: NaiveDate,
}

/// Parameters of the synthetic daily price process.
///
/// Each day every tracked price moves by `price * N(drift, volatility)`,
/// floored at 0.01. Drift and volatility are plain f64 because the draws are
/// made in floating point before being converted back to Decimal.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceProcessSettings {
    /// Mean daily return (e.g., 0.0005 for a 0.05% upward bias).
    pub drift: f64,
    /// Daily volatility (e.g., 0.02 for 2%).
    pub volatility: f64,
    /// Seed for the pseudo-random source. Two runs with the same seed and
    /// inputs produce identical trade histories.
    pub seed: u64,
}

impl Config {
    /// Validates that the configured parameters are logical. Called by the
    /// loader and again by the engine constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "initial_capital must be positive".to_string(),
            ));
        }
        if self.simulation.risk_per_trade <= dec!(0) || self.simulation.risk_per_trade >= dec!(1) {
            return Err(ConfigError::ValidationError(
                "risk_per_trade must be between 0 and 1".to_string(),
            ));
        }
        if self.simulation.max_concurrent_trades == 0 {
            return Err(ConfigError::ValidationError(
                "max_concurrent_trades must be at least 1".to_string(),
            ));
        }
        if self.simulation.simulation_days == 0 {
            return Err(ConfigError::ValidationError(
                "simulation_days must be at least 1".to_string(),
            ));
        }
        if !self.price_process.drift.is_finite() {
            return Err(ConfigError::ValidationError(
                "drift must be finite".to_string(),
            ));
        }
        if !(self.price_process.volatility.is_finite() && self.price_process.volatility >= 0.0) {
            return Err(ConfigError::ValidationError(
                "volatility must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            simulation: SimulationSettings {
                initial_capital: dec!(10000),
                risk_per_trade: dec!(0.02),
                max_concurrent_trades: 5,
                simulation_days: 30,
                start_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            },
            price_process: PriceProcessSettings {
                drift: 0.0005,
                volatility: 0.02,
                seed: 42,
            },
        }
    }

    #[test]
    fn accepts_sane_defaults() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_risk() {
        let mut config = valid();
        config.simulation.risk_per_trade = dec!(0);
        assert!(config.validate().is_err());
        config.simulation.risk_per_trade = dec!(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_volatility() {
        let mut config = valid();
        config.price_process.volatility = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_days_or_slots() {
        let mut config = valid();
        config.simulation.simulation_days = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.simulation.max_concurrent_trades = 0;
        assert!(config.validate().is_err());
    }
}
