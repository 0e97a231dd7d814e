//! # bitflyer-execution
//!
//! Execution handler for the bitFlyer exchange: symbol translation, order
//! aggregation across child and parent orders, open/closed classification,
//! and order placement and cancellation with retry on transient failures.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Newtypes, domain models, symbol tables, order views (no I/O)
//! 2. **Auth**: Credentials and HMAC request signing
//! 3. **Exchange API**: `ExchangeApi` trait, response validation, retry
//!    policy, and the reqwest-backed `BitflyerHttp`
//! 4. **High-Level Client**: `BitflyerClient` with `markets()` and `orders()`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bitflyer_execution::prelude::*;
//!
//! let config = ExchangeConfig::load("config")?;
//! let client = BitflyerClient::builder().config(&config).build().await?;
//!
//! let pair = TradingPair::from("BTCUSD");
//! let id = client
//!     .orders()
//!     .place_order(&pair, Side::Sell, OrderType::Limit, dec!(9000), dec!(0.001))
//!     .await;
//! let open = client.orders().open_orders().await?;
//! client.orders().clear_open_orders(&pair).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Layered process configuration.
pub mod config;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Credentials and private-endpoint signing.
pub mod auth;

// ── Layer 3: Exchange API ────────────────────────────────────────────────────

/// The outbound exchange seam.
pub mod exchange;

/// Embedded error detection.
pub mod response;

/// HTTP transport and retry policy.
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `BitflyerClient`: the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{OrderId, ProductCode, Side, TradingPair};

    // Domain types: market
    pub use crate::domain::market::{SymbolMap, Translator};

    // Domain types: order
    pub use crate::domain::order::{
        ClosedOrderView, NormalizedOrder, OpenOrderView, OrderFamily, OrderSnapshot, OrderState,
        OrderType,
    };

    // Errors
    pub use crate::error::{ApiError, ExecutionError, HttpError, PlacementError, SymbolError};

    // Configuration + network
    pub use crate::config::ExchangeConfig;
    pub use crate::network::DEFAULT_API_URL;

    // Auth
    pub use crate::auth::Credentials;

    // Exchange seam, validation, retry
    pub use crate::exchange::ExchangeApi;
    pub use crate::http::retry::{with_backoff, RetryConfig};
    pub use crate::response::{validate, OnError};

    // Client + sub-clients
    pub use crate::client::{BitflyerClient, BitflyerClientBuilder, MarketsClient, OrdersClient};
    #[cfg(feature = "http")]
    pub use crate::http::BitflyerHttp;
}
