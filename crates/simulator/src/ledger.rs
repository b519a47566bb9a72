use crate::error::EngineError;
use chrono::NaiveDate;
use core_types::{ExitReason, Position, StrategyKind, Trade, TradeAction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single mutable state of a simulation run: cash, the open-position
/// arena, and the append-only trade log.
///
/// Positions live in a BTreeMap keyed by their arena id, so iteration order
/// is stable and deterministic. Only the simulation engine mutates a ledger;
/// everything else reads snapshots.
#[derive(Debug, Clone)]
pub struct Ledger {
    cash: Decimal,
    positions: BTreeMap<u64, Position>,
    trades: Vec<Trade>,
    next_position_id: u64,
    next_trade_id: u64,
}

/// A read-only view of the ledger for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub cash: Decimal,
    /// Cash plus the unrealized P&L of every open position.
    pub total_value: Decimal,
    pub positions: Vec<Position>,
}

impl Ledger {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            cash: initial_capital,
            positions: BTreeMap::new(),
            trades: Vec::new(),
            next_position_id: 1,
            next_trade_id: 1,
        }
    }

    /// Returns the ledger to its day-zero state. Id counters restart too, so
    /// repeated runs of the same engine produce identical histories.
    pub fn reset(&mut self, initial_capital: Decimal) {
        self.cash = initial_capital;
        self.positions.clear();
        self.trades.clear();
        self.next_position_id = 1;
        self.next_trade_id = 1;
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn open_count(&self) -> usize {
        self.positions.len()
    }

    /// Opening a position records it in the arena but moves no cash: with
    /// expiration-payoff accounting the entire P&L is realized at close.
    pub fn open_position(
        &mut self,
        symbol: &str,
        strategy: StrategyKind,
        entry_date: NaiveDate,
        entry_price: Decimal,
        quantity: u32,
        days_to_expiration_at_entry: i64,
    ) -> Result<u64, EngineError> {
        let id = self.next_position_id;
        let position = Position::new(
            id,
            symbol,
            strategy,
            entry_date,
            entry_price,
            quantity,
            days_to_expiration_at_entry,
        )?;
        self.positions.insert(id, position);
        self.next_position_id += 1;
        Ok(id)
    }

    pub fn position(&self, id: u64) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn position_for_symbol(&self, symbol: &str) -> Option<&Position> {
        self.positions.values().find(|p| p.symbol == symbol)
    }

    /// Open position ids in ascending arena order.
    pub fn position_ids(&self) -> Vec<u64> {
        self.positions.keys().copied().collect()
    }

    /// Writes a freshly simulated price and the unrealized P&L recomputed
    /// from it onto an open position.
    pub fn mark_position(
        &mut self,
        id: u64,
        current_price: Decimal,
        unrealized_pnl: Decimal,
    ) -> Result<(), EngineError> {
        let position = self
            .positions
            .get_mut(&id)
            .ok_or(EngineError::PositionNotFound(id))?;
        position.current_price = current_price;
        position.unrealized_pnl = unrealized_pnl;
        Ok(())
    }

    /// Realizes `pnl` into cash, appends the immutable trade record, and
    /// removes the position from the arena.
    ///
    /// A close that drives cash negative still executes; the condition is
    /// logged and remains visible in every later snapshot.
    pub fn close_position(
        &mut self,
        id: u64,
        exit_date: NaiveDate,
        pnl: Decimal,
        exit_reason: ExitReason,
    ) -> Result<Trade, EngineError> {
        let position = self
            .positions
            .remove(&id)
            .ok_or(EngineError::PositionNotFound(id))?;

        self.cash += pnl;
        if self.cash < Decimal::ZERO {
            tracing::warn!(
                position_id = id,
                cash = %self.cash,
                "cash balance went negative after closing position"
            );
        }

        let trade = Trade {
            trade_id: self.next_trade_id,
            symbol: position.symbol,
            strategy: position.strategy,
            entry_date: position.entry_date,
            exit_date,
            entry_price: position.entry_price,
            exit_price: position.current_price,
            quantity: position.quantity,
            pnl,
            action: TradeAction::Sell,
            exit_reason,
        };
        self.next_trade_id += 1;
        self.trades.push(trade.clone());

        Ok(trade)
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Cash plus the marked value of every open position.
    pub fn total_value(&self) -> Decimal {
        self.cash
            + self
                .positions
                .values()
                .map(|p| p.unrealized_pnl)
                .sum::<Decimal>()
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            cash: self.cash,
            total_value: self.total_value(),
            positions: self.positions.values().cloned().collect(),
        }
    }
}
