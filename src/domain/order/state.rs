//! Order snapshot: the merged child + parent order map and its views.
//!
//! A snapshot is rebuilt from scratch on every query; nothing here is cached
//! across calls.

use std::collections::HashMap;

use super::{ClosedOrderView, NormalizedOrder, OpenOrderView};
use crate::shared::{OrderId, TradingPair};

/// All orders known for the active markets, keyed by acceptance id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSnapshot {
    pub orders: HashMap<OrderId, NormalizedOrder>,
}

impl OrderSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order, returning the entry it replaced on an id collision.
    pub fn insert(&mut self, order: NormalizedOrder) -> Option<NormalizedOrder> {
        let replaced = self.orders.insert(order.id.clone(), order);
        if let Some(previous) = &replaced {
            tracing::warn!(
                order_id = %previous.id,
                replaced_family = ?previous.family,
                "Acceptance id collision while merging orders"
            );
        }
        replaced
    }

    pub fn get(&self, id: &OrderId) -> Option<&NormalizedOrder> {
        self.orders.get(id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders in `ACTIVE` state.
    pub fn open(&self) -> HashMap<OrderId, OpenOrderView> {
        self.orders
            .iter()
            .filter(|(_, o)| o.is_open())
            .map(|(id, o)| (id.clone(), o.into()))
            .collect()
    }

    /// Finished orders that traded or were cancelled.
    pub fn closed(&self) -> HashMap<OrderId, ClosedOrderView> {
        self.orders
            .iter()
            .filter(|(_, o)| o.is_closed())
            .map(|(id, o)| (id.clone(), o.into()))
            .collect()
    }

    /// Open orders restricted to one pair.
    pub fn open_for(&self, pair: &TradingPair) -> HashMap<OrderId, OpenOrderView> {
        self.open()
            .into_iter()
            .filter(|(_, o)| &o.pair == pair)
            .collect()
    }
}

impl Extend<NormalizedOrder> for OrderSnapshot {
    fn extend<I: IntoIterator<Item = NormalizedOrder>>(&mut self, iter: I) {
        for order in iter {
            self.insert(order);
        }
    }
}
