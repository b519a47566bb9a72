use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Expiration {expiration} must be strictly after entry date {entry}")]
    ExpirationNotAfterEntry {
        expiration: NaiveDate,
        entry: NaiveDate,
    },

    #[error("Strategy of type '{0}' not found or implemented")]
    StrategyNotFound(String),
}
