//! Low-level HTTP client: `BitflyerHttp`.
//!
//! One method per API endpoint, returning raw JSON. Private endpoints are
//! HMAC-signed. Nothing here retries; callers decide which calls are safe
//! to reissue.

use crate::auth::{Credentials, ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER};
use crate::domain::order::wire::{
    CancelAllChildOrdersRequest, CancelChildOrderRequest, CancelParentOrderRequest,
    OrderListQuery, SendChildOrderRequest, SendParentOrderRequest,
};
use crate::error::HttpError;
use crate::exchange::ExchangeApi;
use crate::response::ERROR_MESSAGE_FIELD;
use crate::shared::ProductCode;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the bitFlyer REST API.
#[derive(Clone)]
pub struct BitflyerHttp {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
}

impl BitflyerHttp {
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn public_get(&self, path_and_query: &str) -> Result<Value, HttpError> {
        self.send(Method::GET, path_and_query, None, false).await
    }

    async fn private_get(&self, path_and_query: &str) -> Result<Value, HttpError> {
        self.send(Method::GET, path_and_query, None, true).await
    }

    async fn private_post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, HttpError> {
        let body = serde_json::to_string(body)
            .map_err(|e| HttpError::BadRequest(format!("Unserializable body: {}", e)))?;
        self.send(Method::POST, path, Some(body), true).await
    }

    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<String>,
        signed: bool,
    ) -> Result<Value, HttpError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let mut req = self.client.request(method.clone(), &url);

        if signed {
            let credentials = self
                .credentials
                .as_ref()
                .ok_or_else(|| HttpError::MissingCredentials(path_and_query.to_string()))?;
            let timestamp = chrono::Utc::now().timestamp();
            let signature = credentials.sign(
                timestamp,
                method.as_str(),
                path_and_query,
                body.as_deref().unwrap_or(""),
            )?;
            req = req
                .header(ACCESS_KEY_HEADER, header_value(&credentials.api_key)?)
                .header(ACCESS_TIMESTAMP_HEADER, timestamp.to_string())
                .header(ACCESS_SIGN_HEADER, signature);
        }

        if let Some(b) = body {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(b);
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;

        if status.is_success() && text.trim().is_empty() {
            return Ok(Value::Null);
        }

        // Error bodies are handed back as JSON so the response validator
        // sees the exchange's own message.
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            if status.is_success() || value.get(ERROR_MESSAGE_FIELD).is_some() {
                return Ok(value);
            }
        }

        tracing::debug!(status = status.as_u16(), "Unparseable response from {}", url);
        match status.as_u16() {
            401 => Err(HttpError::Unauthorized),
            429 => Err(HttpError::RateLimited),
            400..=499 => Err(HttpError::BadRequest(text)),
            code => Err(HttpError::ServerError {
                status: code,
                body: text,
            }),
        }
    }
}

fn transport_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(raw).map_err(|e| HttpError::InvalidHeader(e.to_string()))
}

#[async_trait]
impl ExchangeApi for BitflyerHttp {
    // ── Public ───────────────────────────────────────────────────────────

    async fn get_markets(&self) -> Result<Value, HttpError> {
        self.public_get("/v1/getmarkets").await
    }

    async fn get_ticker(&self, product_code: &ProductCode) -> Result<Value, HttpError> {
        let path = format!(
            "/v1/getticker?product_code={}",
            urlencoding::encode(product_code.as_str())
        );
        self.public_get(&path).await
    }

    // ── Child orders ─────────────────────────────────────────────────────

    async fn get_child_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError> {
        let path = format!("/v1/me/getchildorders?{}", query.to_query_string());
        self.private_get(&path).await
    }

    async fn send_child_order(
        &self,
        request: &SendChildOrderRequest,
    ) -> Result<Value, HttpError> {
        self.private_post("/v1/me/sendchildorder", request).await
    }

    async fn cancel_child_order(
        &self,
        request: &CancelChildOrderRequest,
    ) -> Result<Value, HttpError> {
        self.private_post("/v1/me/cancelchildorder", request).await
    }

    async fn cancel_all_child_orders(
        &self,
        request: &CancelAllChildOrdersRequest,
    ) -> Result<Value, HttpError> {
        self.private_post("/v1/me/cancelallchildorders", request).await
    }

    // ── Parent orders ────────────────────────────────────────────────────

    async fn get_parent_orders(&self, query: &OrderListQuery) -> Result<Value, HttpError> {
        let path = format!("/v1/me/getparentorders?{}", query.to_query_string());
        self.private_get(&path).await
    }

    async fn send_parent_order(
        &self,
        request: &SendParentOrderRequest,
    ) -> Result<Value, HttpError> {
        self.private_post("/v1/me/sendparentorder", request).await
    }

    async fn cancel_parent_order(
        &self,
        request: &CancelParentOrderRequest,
    ) -> Result<Value, HttpError> {
        self.private_post("/v1/me/cancelparentorder", request).await
    }
}
