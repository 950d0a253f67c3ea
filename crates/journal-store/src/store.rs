use crate::error::StoreError;
use core_types::{Trade, TradeId};
use std::sync::Arc;

/// An immutable, cheaply cloneable view of the journal at one point in time.
///
/// Later mutations of the store never show up in a snapshot already handed out.
pub type Snapshot = Arc<Vec<Trade>>;

/// The collection of recorded trades, newest first.
pub trait TradeStore {
    /// A read-only snapshot of every trade.
    fn list_trades(&self) -> Snapshot;

    fn get(&self, id: &TradeId) -> Option<Trade> {
        self.list_trades().iter().find(|t| &t.id == id).cloned()
    }

    /// Records a new trade at the front of the journal.
    fn add(&mut self, trade: Trade) -> Result<(), StoreError>;

    /// Replaces the trade with the same id wholesale.
    fn update(&mut self, trade: Trade) -> Result<(), StoreError>;

    /// Removes a trade and returns it.
    fn delete(&mut self, id: &TradeId) -> Result<Trade, StoreError>;
}

pub(crate) fn insert_front(trades: &mut Vec<Trade>, trade: Trade) -> Result<(), StoreError> {
    if trades.iter().any(|t| t.id == trade.id) {
        return Err(StoreError::DuplicateId(trade.id));
    }
    trades.insert(0, trade);
    Ok(())
}

pub(crate) fn replace(trades: &mut [Trade], trade: Trade) -> Result<(), StoreError> {
    let slot = trades
        .iter_mut()
        .find(|t| t.id == trade.id)
        .ok_or_else(|| StoreError::NotFound(trade.id.clone()))?;
    *slot = trade;
    Ok(())
}

pub(crate) fn remove(trades: &mut Vec<Trade>, id: &TradeId) -> Result<Trade, StoreError> {
    let index = trades
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;
    Ok(trades.remove(index))
}

/// A journal that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    trades: Snapshot,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with `trades`, kept in the given order.
    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self {
            trades: Arc::new(trades),
        }
    }
}

impl TradeStore for InMemoryStore {
    fn list_trades(&self) -> Snapshot {
        Arc::clone(&self.trades)
    }

    fn add(&mut self, trade: Trade) -> Result<(), StoreError> {
        insert_front(Arc::make_mut(&mut self.trades), trade)
    }

    fn update(&mut self, trade: Trade) -> Result<(), StoreError> {
        replace(Arc::make_mut(&mut self.trades).as_mut_slice(), trade)
    }

    fn delete(&mut self, id: &TradeId) -> Result<Trade, StoreError> {
        remove(Arc::make_mut(&mut self.trades), id)
    }
}
