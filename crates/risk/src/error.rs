use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Analyzer received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("A calculation error occurred: {0}")]
    Calculation(String),
}
