use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Prices never fall to or below zero; the walk is clamped here.
const PRICE_FLOOR: Decimal = dec!(0.01);

/// A seeded daily random walk: each step moves a price by
/// `price * N(drift, volatility)` over a one-day interval.
///
/// The generator is injected at construction and owned here, so a run is
/// fully reproducible from its seed: no other component draws randomness.
#[derive(Debug, Clone)]
pub struct PriceProcess {
    normal: Normal<f64>,
    rng: StdRng,
}

impl PriceProcess {
    pub fn new(drift: f64, volatility: f64, seed: u64) -> Result<Self, EngineError> {
        let normal = Normal::new(drift, volatility)
            .map_err(|e| EngineError::PriceProcess(e.to_string()))?;
        Ok(Self {
            normal,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Advances a price by one simulated day.
    ///
    /// The draw happens in f64 and the result is converted straight back to
    /// Decimal; this is the accepted precision trade-off for sampling from
    /// the normal distribution.
    pub fn next_price(&mut self, current: Decimal) -> Result<Decimal, EngineError> {
        let current_f = current
            .to_f64()
            .ok_or_else(|| EngineError::Calculation(format!("price {} exceeds f64", current)))?;

        let daily_return = self.normal.sample(&mut self.rng);
        let moved = current_f + current_f * daily_return;

        let next = Decimal::from_f64(moved)
            .ok_or_else(|| EngineError::Calculation(format!("price {} is not representable", moved)))?
            .round_dp(6);

        Ok(next.max(PRICE_FLOOR))
    }
}
