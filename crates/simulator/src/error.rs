use analytics::AnalyticsError;
use configuration::error::ConfigError;
use core_types::CoreError;
use strategies::StrategyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine configuration is invalid: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Price process error: {0}")]
    PriceProcess(String),

    #[error("No open position with id {0}")]
    PositionNotFound(u64),

    #[error("A calculation error occurred: {0}")]
    Calculation(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
