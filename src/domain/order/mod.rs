//! Order domain: normalized orders, open/closed views, lifecycle routing.

pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{OrderId, Side, TradingPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use state::OrderSnapshot;

/// Number of orders requested per market and endpoint family.
pub const DEFAULT_COUNT: u32 = 200;

// ─── OrderFamily ─────────────────────────────────────────────────────────────

/// Endpoint family an order lives in.
///
/// Child orders execute directly; parent orders are conditional and spawn a
/// child order when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderFamily {
    Child,
    Parent,
}

impl OrderFamily {
    /// Response field carrying the acceptance id after placement.
    pub fn acceptance_id_field(&self) -> &'static str {
        match self {
            OrderFamily::Child => "child_order_acceptance_id",
            OrderFamily::Parent => "parent_order_acceptance_id",
        }
    }
}

// ─── OrderType ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub fn family(&self) -> OrderFamily {
        match self {
            OrderType::Market | OrderType::Limit => OrderFamily::Child,
            OrderType::Stop => OrderFamily::Parent,
        }
    }

    /// The exchange's spelling (`child_order_type` / `condition_type`).
    pub fn native(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        }
    }

    /// Map an exchange order-type string back to a routable type, if it is one.
    pub fn from_native(native: &str) -> Option<Self> {
        match native {
            "MARKET" => Some(OrderType::Market),
            "LIMIT" => Some(OrderType::Limit),
            "STOP" => Some(OrderType::Stop),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::Stop => write!(f, "stop"),
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            other => Err(format!("Invalid order type: {}", other)),
        }
    }
}

// ─── OrderState ──────────────────────────────────────────────────────────────

/// Exchange lifecycle state.
///
/// States the exchange adds later are kept verbatim in `Unknown`; such an
/// order is neither open nor, unless it traded, closed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    Active,
    Completed,
    Canceled,
    Expired,
    Rejected,
    Unknown(String),
}

impl OrderState {
    /// The exchange's spelling, e.g. `"ACTIVE"`.
    pub fn as_str(&self) -> &str {
        match self {
            OrderState::Active => "ACTIVE",
            OrderState::Completed => "COMPLETED",
            OrderState::Canceled => "CANCELED",
            OrderState::Expired => "EXPIRED",
            OrderState::Rejected => "REJECTED",
            OrderState::Unknown(raw) => raw,
        }
    }
}

impl From<String> for OrderState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ACTIVE" => OrderState::Active,
            "COMPLETED" => OrderState::Completed,
            "CANCELED" => OrderState::Canceled,
            "EXPIRED" => OrderState::Expired,
            "REJECTED" => OrderState::Rejected,
            _ => OrderState::Unknown(raw),
        }
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── NormalizedOrder ─────────────────────────────────────────────────────────

/// One order from either endpoint family, in exchange-agnostic form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedOrder {
    pub id: OrderId,
    pub family: OrderFamily,
    /// Epoch seconds.
    pub open_time: i64,
    /// Not reported by the list endpoints; always `None` for now.
    pub close_time: Option<i64>,
    pub pair: TradingPair,
    pub side: Side,
    pub price: Decimal,
    /// Executed quantity.
    pub volume: Decimal,
    pub outstanding_size: Decimal,
    pub state: OrderState,
    /// Native order type, e.g. `"LIMIT"` or `"STOP"`.
    pub order_type: String,
    /// Zero while unfilled.
    pub average_price: Decimal,
    pub fee: Decimal,
}

impl NormalizedOrder {
    pub fn is_open(&self) -> bool {
        self.state == OrderState::Active
    }

    /// Finished orders that either traded or were cancelled.
    pub fn is_closed(&self) -> bool {
        !self.is_open() && (!self.volume.is_zero() || self.state == OrderState::Canceled)
    }

    /// Average fill price when a fill occurred, otherwise the order price.
    pub fn display_price(&self) -> Decimal {
        if self.average_price.is_zero() {
            self.price
        } else {
            self.average_price
        }
    }
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// Projection of an active order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenOrderView {
    pub family: OrderFamily,
    pub open_time: i64,
    pub pair: TradingPair,
    pub side: Side,
    pub price: Decimal,
    pub volume: Decimal,
    pub order_type: String,
}

/// Projection of a finished order with its realized cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosedOrderView {
    pub close_time: Option<i64>,
    pub pair: TradingPair,
    pub side: Side,
    pub price: Decimal,
    pub volume_executed: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    pub order_type: String,
}

impl From<&NormalizedOrder> for OpenOrderView {
    fn from(order: &NormalizedOrder) -> Self {
        OpenOrderView {
            family: order.family,
            open_time: order.open_time,
            pair: order.pair.clone(),
            side: order.side,
            price: order.price,
            volume: order.volume,
            order_type: order.order_type.clone(),
        }
    }
}

impl From<&NormalizedOrder> for ClosedOrderView {
    fn from(order: &NormalizedOrder) -> Self {
        let price = order.display_price();
        ClosedOrderView {
            close_time: order.close_time,
            pair: order.pair.clone(),
            side: order.side,
            price,
            volume_executed: order.volume,
            cost: price * order.volume,
            fee: order.fee,
            order_type: order.order_type.clone(),
        }
    }
}
