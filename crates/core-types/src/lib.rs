pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExitReason, OptionType, StrategyCategory, StrategyKind, TradeAction};
pub use error::CoreError;
pub use structs::{MaxProfit, OptionContract, Position, Trade};
