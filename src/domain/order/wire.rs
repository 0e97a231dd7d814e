//! Wire types for the child-order and parent-order endpoints (REST).

use crate::shared::{serde_util, OrderId, ProductCode, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderState;

// ─── Queries ────────────────────────────────────────────────────────────────

/// Query for `getchildorders` / `getparentorders`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderListQuery {
    pub product_code: ProductCode,
    pub count: u32,
}

impl OrderListQuery {
    pub fn to_query_string(&self) -> String {
        format!(
            "product_code={}&count={}",
            urlencoding::encode(self.product_code.as_str()),
            self.count
        )
    }
}

// ─── List responses ─────────────────────────────────────────────────────────

/// One entry of `getchildorders`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChildOrderResponse {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub child_order_id: Option<String>,
    pub product_code: ProductCode,
    pub side: Side,
    pub child_order_type: String,
    pub price: Decimal,
    pub average_price: Decimal,
    #[serde(default)]
    pub size: Decimal,
    pub child_order_state: OrderState,
    #[serde(default)]
    pub expire_date: Option<String>,
    #[serde(with = "serde_util::epoch_seconds")]
    pub child_order_date: i64,
    pub child_order_acceptance_id: OrderId,
    pub outstanding_size: Decimal,
    #[serde(default)]
    pub cancel_size: Decimal,
    pub executed_size: Decimal,
    pub total_commission: Decimal,
}

/// One entry of `getparentorders`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParentOrderResponse {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub parent_order_id: Option<String>,
    pub product_code: ProductCode,
    pub side: Side,
    pub parent_order_type: String,
    pub price: Decimal,
    pub average_price: Decimal,
    #[serde(default)]
    pub size: Decimal,
    pub parent_order_state: OrderState,
    #[serde(default)]
    pub expire_date: Option<String>,
    #[serde(with = "serde_util::epoch_seconds")]
    pub parent_order_date: i64,
    pub parent_order_acceptance_id: OrderId,
    pub outstanding_size: Decimal,
    #[serde(default)]
    pub cancel_size: Decimal,
    pub executed_size: Decimal,
    pub total_commission: Decimal,
}

// ─── Placement ──────────────────────────────────────────────────────────────

/// Body of `sendchildorder`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendChildOrderRequest {
    pub product_code: ProductCode,
    pub child_order_type: &'static str,
    pub side: Side,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
}

/// A single condition inside `sendparentorder`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParentOrderParameter {
    pub product_code: ProductCode,
    pub condition_type: &'static str,
    pub side: Side,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_price: Option<Decimal>,
}

/// Body of `sendparentorder`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendParentOrderRequest {
    pub order_method: &'static str,
    pub parameters: Vec<ParentOrderParameter>,
}

// ─── Cancellation ───────────────────────────────────────────────────────────

/// Body of `cancelchildorder`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CancelChildOrderRequest {
    pub product_code: ProductCode,
    pub child_order_acceptance_id: OrderId,
}

/// Body of `cancelparentorder`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CancelParentOrderRequest {
    pub product_code: ProductCode,
    pub parent_order_acceptance_id: OrderId,
}

/// Body of `cancelallchildorders`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CancelAllChildOrdersRequest {
    pub product_code: ProductCode,
}
