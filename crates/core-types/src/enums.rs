use serde::{Deserialize, Serialize};
use std::fmt;

/// The side of a single option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

/// Identifies one of the supported multi-leg strategy shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    IronCondor,
    Straddle,
    Strangle,
    CallSpread,
    PutSpread,
    Butterfly,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::IronCondor => "Iron Condor",
            StrategyKind::Straddle => "Straddle",
            StrategyKind::Strangle => "Strangle",
            StrategyKind::CallSpread => "Call Spread",
            StrategyKind::PutSpread => "Put Spread",
            StrategyKind::Butterfly => "Butterfly",
        };
        write!(f, "{}", name)
    }
}

/// Whether a strategy collects premium at entry (credit) or pays it (debit).
///
/// Assigned once at construction. Entry timing windows and the signs of the
/// time/volatility sensitivities are keyed off this, never off the presence
/// of particular leg fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyCategory {
    Credit,
    Debit,
}

/// The direction tag recorded on a completed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The underlying strategy reached its expiration date.
    Expired,
    /// Held for at least half of the days-to-expiration captured at entry.
    TimeExit,
    /// Unrealized P&L reached half of the finite maximum profit.
    ProfitTarget,
    /// Unrealized P&L fell to half of the maximum loss.
    StopLoss,
    /// Force-closed on the final simulated day.
    EndOfRun,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitReason::Expired => "EXPIRED",
            ExitReason::TimeExit => "TIME EXIT",
            ExitReason::ProfitTarget => "PROFIT TARGET",
            ExitReason::StopLoss => "STOP LOSS",
            ExitReason::EndOfRun => "END OF RUN",
        };
        write!(f, "{}", name)
    }
}
