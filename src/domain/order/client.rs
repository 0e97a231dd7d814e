//! Orders sub-client: aggregate, classify, place, cancel, clear.
//!
//! Queries and cancellations go through [`with_backoff`]; placement is a
//! single attempt because a reissued placement can open a duplicate order.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use super::wire::{
    CancelAllChildOrdersRequest, CancelChildOrderRequest, CancelParentOrderRequest,
    ChildOrderResponse, OrderListQuery, ParentOrderParameter, ParentOrderResponse,
    SendChildOrderRequest, SendParentOrderRequest,
};
use super::{
    ClosedOrderView, NormalizedOrder, OpenOrderView, OrderFamily, OrderSnapshot, OrderType,
};
use crate::client::BitflyerClient;
use crate::error::{ExecutionError, PlacementError};
use crate::exchange::ExchangeApi;
use crate::http::retry::with_backoff;
use crate::response::{checked, validate, OnError};
use crate::shared::{OrderId, ProductCode, Side, TradingPair};

/// `order_method` for a parent order with a single condition.
const SIMPLE_ORDER_METHOD: &str = "SIMPLE";

pub struct Orders<'a, A> {
    pub(crate) client: &'a BitflyerClient<A>,
}

impl<'a, A: ExchangeApi> Orders<'a, A> {
    // ── Aggregation ──────────────────────────────────────────────────────

    /// Child then parent orders for every active market, merged by
    /// acceptance id. Any market that fails for good aborts the whole call.
    pub async fn fetch_all_orders(&self, count: u32) -> Result<OrderSnapshot, ExecutionError> {
        let mut snapshot = OrderSnapshot::new();
        let markets = self.client.translator.active_markets();

        for product_code in markets {
            let raw = self.list_child_orders(product_code, count).await?;
            snapshot.extend(self.normalize_child(raw)?);
        }
        for product_code in markets {
            let raw = self.list_parent_orders(product_code, count).await?;
            snapshot.extend(self.normalize_parent(raw)?);
        }

        Ok(snapshot)
    }

    /// [`fetch_all_orders`](Self::fetch_all_orders) with the client's configured count.
    pub async fn snapshot(&self) -> Result<OrderSnapshot, ExecutionError> {
        self.fetch_all_orders(self.client.order_count).await
    }

    pub async fn open_orders(&self) -> Result<HashMap<OrderId, OpenOrderView>, ExecutionError> {
        Ok(self.snapshot().await?.open())
    }

    pub async fn closed_orders(
        &self,
    ) -> Result<HashMap<OrderId, ClosedOrderView>, ExecutionError> {
        Ok(self.snapshot().await?.closed())
    }

    async fn list_child_orders(
        &self,
        product_code: &ProductCode,
        count: u32,
    ) -> Result<Vec<ChildOrderResponse>, ExecutionError> {
        let api = &self.client.api;
        let query = OrderListQuery {
            product_code: product_code.clone(),
            count,
        };
        let query = &query;
        let raw = with_backoff(&self.client.retry, "getchildorders", move || {
            checked(api.get_child_orders(query))
        })
        .await?;
        Ok(serde_json::from_value(raw)?)
    }

    async fn list_parent_orders(
        &self,
        product_code: &ProductCode,
        count: u32,
    ) -> Result<Vec<ParentOrderResponse>, ExecutionError> {
        let api = &self.client.api;
        let query = OrderListQuery {
            product_code: product_code.clone(),
            count,
        };
        let query = &query;
        let raw = with_backoff(&self.client.retry, "getparentorders", move || {
            checked(api.get_parent_orders(query))
        })
        .await?;
        Ok(serde_json::from_value(raw)?)
    }

    fn normalize_child(
        &self,
        raw: Vec<ChildOrderResponse>,
    ) -> Result<Vec<NormalizedOrder>, ExecutionError> {
        let symbols = self.client.translator.symbols();
        raw.into_iter()
            .map(|order| Ok(NormalizedOrder::try_from((order, symbols))?))
            .collect()
    }

    fn normalize_parent(
        &self,
        raw: Vec<ParentOrderResponse>,
    ) -> Result<Vec<NormalizedOrder>, ExecutionError> {
        let symbols = self.client.translator.symbols();
        raw.into_iter()
            .map(|order| Ok(NormalizedOrder::try_from((order, symbols))?))
            .collect()
    }

    // ── Placement ────────────────────────────────────────────────────────

    /// Place an order, returning its acceptance id or `None` on any failure.
    ///
    /// Market orders ignore `price`; stop orders use it as the trigger price.
    /// The failure reason is logged; use [`try_place_order`](Self::try_place_order)
    /// to inspect it.
    pub async fn place_order(
        &self,
        pair: &TradingPair,
        side: Side,
        order_type: OrderType,
        price: Decimal,
        volume: Decimal,
    ) -> Option<OrderId> {
        match self
            .try_place_order(pair, side, order_type, price, volume)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(pair = %pair, %side, %order_type, "Order placement failed: {}", e);
                None
            }
        }
    }

    pub async fn try_place_order(
        &self,
        pair: &TradingPair,
        side: Side,
        order_type: OrderType,
        price: Decimal,
        volume: Decimal,
    ) -> Result<OrderId, PlacementError> {
        if volume <= Decimal::ZERO {
            return Err(PlacementError::Invalid(format!(
                "volume must be positive, got {}",
                volume
            )));
        }
        if order_type != OrderType::Market && price <= Decimal::ZERO {
            return Err(PlacementError::Invalid(format!(
                "{} order needs a positive price, got {}",
                order_type, price
            )));
        }

        let product_code = self.client.translator.to_product_code(pair)?.clone();
        let family = order_type.family();
        let api = &self.client.api;

        let response = match order_type {
            OrderType::Market | OrderType::Limit => {
                let request = SendChildOrderRequest {
                    product_code,
                    child_order_type: order_type.native(),
                    side,
                    price: (order_type == OrderType::Limit).then_some(price),
                    size: volume,
                };
                api.send_child_order(&request).await?
            }
            OrderType::Stop => {
                let request = SendParentOrderRequest {
                    order_method: SIMPLE_ORDER_METHOD,
                    parameters: vec![ParentOrderParameter {
                        product_code,
                        condition_type: order_type.native(),
                        side,
                        size: volume,
                        trigger_price: Some(price),
                    }],
                };
                api.send_parent_order(&request).await?
            }
        };

        let response = validate(response, OnError::Raise)?;
        let field = family.acceptance_id_field();
        response
            .get(field)
            .and_then(Value::as_str)
            .map(OrderId::from)
            .ok_or(PlacementError::MissingAcceptanceId(field))
    }

    // ── Cancellation ─────────────────────────────────────────────────────

    /// Cancel one order. Stop orders go to the parent-order endpoint.
    ///
    /// `Ok(true)` when the exchange acknowledges with an empty payload.
    pub async fn cancel_order(
        &self,
        pair: &TradingPair,
        id: &OrderId,
        order_type: OrderType,
    ) -> Result<bool, ExecutionError> {
        self.cancel_in_family(pair, id, order_type.family()).await
    }

    pub async fn cancel_in_family(
        &self,
        pair: &TradingPair,
        id: &OrderId,
        family: OrderFamily,
    ) -> Result<bool, ExecutionError> {
        let product_code = self.client.translator.to_product_code(pair)?.clone();
        let api = &self.client.api;
        let retry = &self.client.retry;

        let response = match family {
            OrderFamily::Child => {
                let request = CancelChildOrderRequest {
                    product_code,
                    child_order_acceptance_id: id.clone(),
                };
                let request = &request;
                with_backoff(retry, "cancelchildorder", move || {
                    checked(api.cancel_child_order(request))
                })
                .await?
            }
            OrderFamily::Parent => {
                let request = CancelParentOrderRequest {
                    product_code,
                    parent_order_acceptance_id: id.clone(),
                };
                let request = &request;
                with_backoff(retry, "cancelparentorder", move || {
                    checked(api.cancel_parent_order(request))
                })
                .await?
            }
        };

        Ok(is_empty_payload(&response))
    }

    /// Bulk-cancel child orders for `pair`, wait for the exchange to settle,
    /// then cancel whatever is still open for the pair one by one.
    ///
    /// Returns the number of leftovers that were cancelled individually.
    /// A leftover whose cancel fails is logged and skipped.
    pub async fn clear_open_orders(&self, pair: &TradingPair) -> Result<usize, ExecutionError> {
        let product_code = self.client.translator.to_product_code(pair)?.clone();
        let api = &self.client.api;
        let request = CancelAllChildOrdersRequest { product_code };
        let request = &request;
        let ack = with_backoff(&self.client.retry, "cancelallchildorders", move || {
            checked(api.cancel_all_child_orders(request))
        })
        .await?;
        tracing::debug!(pair = %pair, ack = %ack, "Bulk child cancel acknowledged");

        futures_timer::Delay::new(self.client.settle_delay).await;

        let leftovers = self.snapshot().await?.open_for(pair);
        let mut cancelled = 0;
        for (id, order) in &leftovers {
            match self.cancel_in_family(pair, id, order.family).await {
                Ok(_) => {
                    tracing::debug!(
                        order_id = %id,
                        family = ?order.family,
                        "Cancelled leftover order"
                    );
                    cancelled += 1;
                }
                Err(e) => {
                    tracing::warn!(order_id = %id, "Could not cancel leftover order: {}", e);
                }
            }
        }

        tracing::debug!(pair = %pair, cancelled, "Open orders cleared");
        Ok(cancelled)
    }
}

fn is_empty_payload(response: &Value) -> bool {
    match response {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
