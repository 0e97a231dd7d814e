//! The exchange's remote trading API, as seen by the execution layer.
//!
//! One method per endpoint. Responses stay raw JSON so the response
//! validator can look for embedded error payloads before anything is
//! deserialized. An empty success body (the cancel endpoints) is `Value::Null`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::order::wire::{
    CancelAllChildOrdersRequest, CancelChildOrderRequest, CancelParentOrderRequest,
    OrderListQuery, SendChildOrderRequest, SendParentOrderRequest,
};
use crate::error::HttpError;
use crate::shared::ProductCode;

#[async_trait]
pub trait ExchangeApi: Send + Sync {
    // ── Public ──────────────────────────────────────────────────────────

    async fn get_markets(&self) -> Result<Value, HttpError>;

    async fn get_ticker(&self, product_code: &ProductCode) -> Result<Value, HttpError>;

    // ── Child orders ────────────────────────────────────────────────────

    async fn get_child_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError>;

    async fn send_child_order(&self, request: &SendChildOrderRequest) -> Result<Value, HttpError>;

    async fn cancel_child_order(
        &self,
        request: &CancelChildOrderRequest,
    ) -> Result<Value, HttpError>;

    async fn cancel_all_child_orders(
        &self,
        request: &CancelAllChildOrdersRequest,
    ) -> Result<Value, HttpError>;

    // ── Parent orders ───────────────────────────────────────────────────

    async fn get_parent_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError>;

    async fn send_parent_order(
        &self,
        request: &SendParentOrderRequest,
    ) -> Result<Value, HttpError>;

    async fn cancel_parent_order(
        &self,
        request: &CancelParentOrderRequest,
    ) -> Result<Value, HttpError>;
}
