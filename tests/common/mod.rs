//! In-memory exchange used by the integration tests.
//!
//! Keeps child and parent orders per product code, answers the list and
//! mutation endpoints the way the live API does (raw JSON, embedded
//! `error_message` on rejection, empty body on cancel), records every call,
//! and can be scripted to fail the next N calls of an endpoint.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use bitflyer_execution::domain::order::wire::{
    CancelAllChildOrdersRequest, CancelChildOrderRequest, CancelParentOrderRequest,
    OrderListQuery, SendChildOrderRequest, SendParentOrderRequest,
};
use bitflyer_execution::prelude::*;

const ORDER_DATE: &str = "2024-03-01T12:30:45.517";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Transport-level failure (`HttpError::Timeout`).
    Transport,
    /// Success-shaped body carrying `error_message`.
    Api,
    /// Rejected before sending (`HttpError::MissingCredentials`).
    Local,
}

#[derive(Debug, Clone)]
pub struct FakeOrder {
    pub id: String,
    pub family: OrderFamily,
    pub product_code: String,
    pub side: Side,
    pub order_type: String,
    pub price: Decimal,
    pub size: Decimal,
    pub executed: Decimal,
    pub average_price: Decimal,
    pub state: &'static str,
}

impl FakeOrder {
    pub fn child(id: &str, product_code: &str, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            id: id.to_string(),
            family: OrderFamily::Child,
            product_code: product_code.to_string(),
            side,
            order_type: "LIMIT".to_string(),
            price,
            size,
            executed: Decimal::ZERO,
            average_price: Decimal::ZERO,
            state: "ACTIVE",
        }
    }

    pub fn stop(id: &str, product_code: &str, side: Side, trigger: Decimal, size: Decimal) -> Self {
        Self {
            family: OrderFamily::Parent,
            order_type: "STOP".to_string(),
            ..Self::child(id, product_code, side, trigger, size)
        }
    }

    pub fn with_state(mut self, state: &'static str) -> Self {
        self.state = state;
        self
    }

    pub fn with_fill(mut self, executed: Decimal, average_price: Decimal) -> Self {
        self.executed = executed;
        self.average_price = average_price;
        self
    }

    fn to_json(&self) -> Value {
        let outstanding = if self.state == "ACTIVE" {
            self.size - self.executed
        } else {
            Decimal::ZERO
        };
        let side = match self.side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        };
        let prefix = match self.family {
            OrderFamily::Child => "child",
            OrderFamily::Parent => "parent",
        };
        json!({
            "id": 1,
            "product_code": self.product_code,
            "side": side,
            format!("{}_order_type", prefix): self.order_type,
            "price": self.price.to_string(),
            "average_price": self.average_price.to_string(),
            "size": self.size.to_string(),
            format!("{}_order_state", prefix): self.state,
            "expire_date": "2024-03-31T12:30:45",
            format!("{}_order_date", prefix): ORDER_DATE,
            format!("{}_order_acceptance_id", prefix): self.id,
            "outstanding_size": outstanding.to_string(),
            "cancel_size": "0",
            "executed_size": self.executed.to_string(),
            "total_commission": "0"
        })
    }
}

#[derive(Default)]
struct State {
    listed: Vec<Value>,
    tickers: HashSet<String>,
    orders: Vec<FakeOrder>,
    failures: HashMap<&'static str, (Failure, u32)>,
    calls: Vec<String>,
    /// Child orders the bulk cancel does not reach.
    sticky: HashSet<String>,
    reject_placement: Option<String>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct FakeExchange {
    state: Arc<Mutex<State>>,
}

impl FakeExchange {
    /// Lists the given product codes (no aliases).
    pub fn listing(codes: &[&str]) -> Self {
        let fake = Self::default();
        for code in codes {
            fake.list_market(json!({ "product_code": code }));
        }
        fake
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn list_market(&self, entry: Value) {
        self.lock().listed.push(entry);
    }

    /// Answer the ticker for `code` even though it is not listed.
    pub fn serve_ticker(&self, code: &str) {
        self.lock().tickers.insert(code.to_string());
    }

    pub fn seed(&self, order: FakeOrder) {
        self.lock().orders.push(order);
    }

    pub fn make_sticky(&self, id: &str) {
        self.lock().sticky.insert(id.to_string());
    }

    pub fn reject_placements(&self, message: &str) {
        self.lock().reject_placement = Some(message.to_string());
    }

    pub fn fail_next(&self, endpoint: &'static str, failure: Failure, times: u32) {
        self.lock().failures.insert(endpoint, (failure, times));
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count_calls(&self, endpoint: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == endpoint).count()
    }

    pub fn order(&self, id: &str) -> Option<FakeOrder> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }

    /// Record the call and consume a scripted failure, if one is pending.
    fn enter(&self, endpoint: &'static str) -> Option<Result<Value, HttpError>> {
        let mut state = self.lock();
        state.calls.push(endpoint.to_string());
        let (failure, remaining) = state.failures.get_mut(endpoint)?;
        if *remaining == 0 {
            return None;
        }
        *remaining -= 1;
        Some(match failure {
            Failure::Transport => Err(HttpError::Timeout),
            Failure::Api => Ok(api_error(-500, "System is busy")),
            Failure::Local => Err(HttpError::MissingCredentials(endpoint.to_string())),
        })
    }

    fn list(&self, family: OrderFamily, query: &OrderListQuery) -> Value {
        let state = self.lock();
        let orders: Vec<Value> = state
            .orders
            .iter()
            .filter(|o| o.family == family && o.product_code == query.product_code.as_str())
            .take(query.count as usize)
            .map(FakeOrder::to_json)
            .collect();
        Value::Array(orders)
    }

    fn accept(&self, mut order: FakeOrder) -> Result<String, Value> {
        let mut state = self.lock();
        if let Some(message) = &state.reject_placement {
            return Err(api_error(-208, message));
        }
        state.next_id += 1;
        order.id = format!("JRF20240301-123045-{:06}", state.next_id);
        let id = order.id.clone();
        state.orders.push(order);
        Ok(id)
    }

    fn cancel(&self, family: OrderFamily, product_code: &ProductCode, id: &OrderId) -> Value {
        let mut state = self.lock();
        match state.orders.iter_mut().find(|o| {
            o.family == family
                && o.id == id.as_str()
                && o.product_code == product_code.as_str()
                && o.state == "ACTIVE"
        }) {
            Some(order) => {
                order.state = "CANCELED";
                Value::Null
            }
            None => api_error(-111, "Order not found"),
        }
    }
}

fn api_error(status: i64, message: &str) -> Value {
    json!({ "status": status, "error_message": message, "data": null })
}

#[async_trait]
impl ExchangeApi for FakeExchange {
    async fn get_markets(&self) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("getmarkets") {
            return scripted;
        }
        Ok(Value::Array(self.lock().listed.clone()))
    }

    async fn get_ticker(&self, product_code: &ProductCode) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("getticker") {
            return scripted;
        }
        if self.lock().tickers.contains(product_code.as_str()) {
            Ok(json!({ "product_code": product_code, "ltp": 9000 }))
        } else {
            Ok(api_error(-1, "Invalid product"))
        }
    }

    async fn get_child_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("getchildorders") {
            return scripted;
        }
        Ok(self.list(OrderFamily::Child, query))
    }

    async fn send_child_order(
        &self,
        request: &SendChildOrderRequest,
    ) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("sendchildorder") {
            return scripted;
        }
        let mut order = FakeOrder::child(
            "",
            request.product_code.as_str(),
            request.side,
            request.price.unwrap_or(Decimal::ZERO),
            request.size,
        );
        order.order_type = request.child_order_type.to_string();
        if request.child_order_type == "MARKET" {
            order = order
                .with_state("COMPLETED")
                .with_fill(request.size, Decimal::from(9000));
        }
        Ok(match self.accept(order) {
            Ok(id) => json!({ "child_order_acceptance_id": id }),
            Err(rejection) => rejection,
        })
    }

    async fn cancel_child_order(
        &self,
        request: &CancelChildOrderRequest,
    ) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("cancelchildorder") {
            return scripted;
        }
        Ok(self.cancel(
            OrderFamily::Child,
            &request.product_code,
            &request.child_order_acceptance_id,
        ))
    }

    async fn cancel_all_child_orders(
        &self,
        request: &CancelAllChildOrdersRequest,
    ) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("cancelallchildorders") {
            return scripted;
        }
        let mut state = self.lock();
        let sticky = state.sticky.clone();
        for order in state.orders.iter_mut().filter(|o| {
            o.family == OrderFamily::Child
                && o.product_code == request.product_code.as_str()
                && o.state == "ACTIVE"
                && !sticky.contains(&o.id)
        }) {
            order.state = "CANCELED";
        }
        Ok(Value::Null)
    }

    async fn get_parent_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("getparentorders") {
            return scripted;
        }
        Ok(self.list(OrderFamily::Parent, query))
    }

    async fn send_parent_order(
        &self,
        request: &SendParentOrderRequest,
    ) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("sendparentorder") {
            return scripted;
        }
        let Some(param) = request.parameters.first() else {
            return Ok(api_error(-100, "No parameters"));
        };
        let order = FakeOrder::stop(
            "",
            param.product_code.as_str(),
            param.side,
            param.trigger_price.unwrap_or(Decimal::ZERO),
            param.size,
        );
        Ok(match self.accept(order) {
            Ok(id) => json!({ "parent_order_acceptance_id": id }),
            Err(rejection) => rejection,
        })
    }

    async fn cancel_parent_order(
        &self,
        request: &CancelParentOrderRequest,
    ) -> Result<Value, HttpError> {
        if let Some(scripted) = self.enter("cancelparentorder") {
            return scripted;
        }
        Ok(self.cancel(
            OrderFamily::Parent,
            &request.product_code,
            &request.parent_order_acceptance_id,
        ))
    }
}

/// Millisecond backoff with a small attempt budget.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: Some(5),
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
        backoff_factor: 2.0,
        jitter: false,
    }
}

pub async fn client_for(
    fake: &FakeExchange,
    pairs: &[&str],
) -> Result<BitflyerClient<FakeExchange>, ExecutionError> {
    BitflyerClientBuilder::new()
        .active_pairs(pairs.iter().copied())
        .retry(fast_retry())
        .settle_delay(Duration::ZERO)
        .build_with(fake.clone())
        .await
}
