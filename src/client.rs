//! High-level client: `BitflyerClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and the state shared by the sub-clients:
//! the exchange transport, the translator, and the retry policy.
//!
//! Building a client is the one initialization step: it discovers the live
//! markets and freezes the [`Translator`]. Nothing mutates it afterwards.

use std::time::Duration;

use crate::config::ExchangeConfig;
use crate::domain::market::client::{discover_markets, Markets};
use crate::domain::market::{SymbolMap, Translator};
use crate::domain::order::client::Orders;
use crate::domain::order::DEFAULT_COUNT;
use crate::error::ExecutionError;
use crate::exchange::ExchangeApi;
use crate::http::retry::RetryConfig;
use crate::shared::TradingPair;

#[cfg(feature = "http")]
use crate::auth::Credentials;
#[cfg(feature = "http")]
use crate::http::BitflyerHttp;

// Re-export sub-client types for convenience.
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::order::client::Orders as OrdersClient;

/// Default pause between a bulk cancel and the verification re-fetch.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// The primary entry point.
///
/// Generic over the exchange transport so the same logic runs against
/// [`BitflyerHttp`](crate::http::BitflyerHttp) or any other [`ExchangeApi`].
pub struct BitflyerClient<A> {
    pub(crate) api: A,
    pub(crate) translator: Translator,
    pub(crate) retry: RetryConfig,
    pub(crate) order_count: u32,
    pub(crate) settle_delay: Duration,
}

#[cfg(feature = "http")]
impl BitflyerClient<BitflyerHttp> {
    pub fn builder() -> BitflyerClientBuilder {
        BitflyerClientBuilder::default()
    }
}

impl<A: ExchangeApi> BitflyerClient<A> {
    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn markets(&self) -> Markets<'_, A> {
        Markets { client: self }
    }

    pub fn orders(&self) -> Orders<'_, A> {
        Orders { client: self }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct BitflyerClientBuilder {
    symbols: SymbolMap,
    active_pairs: Vec<TradingPair>,
    retry: RetryConfig,
    order_count: u32,
    settle_delay: Duration,
    #[cfg(feature = "http")]
    base_url: String,
    #[cfg(feature = "http")]
    timeout: Duration,
    #[cfg(feature = "http")]
    credentials: Option<Credentials>,
}

impl Default for BitflyerClientBuilder {
    fn default() -> Self {
        Self {
            symbols: SymbolMap::bitflyer(),
            active_pairs: Vec::new(),
            retry: RetryConfig::default(),
            order_count: DEFAULT_COUNT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            #[cfg(feature = "http")]
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            #[cfg(feature = "http")]
            timeout: crate::http::client::DEFAULT_TIMEOUT,
            #[cfg(feature = "http")]
            credentials: None,
        }
    }
}

impl BitflyerClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in bitFlyer symbol table.
    pub fn symbols(mut self, symbols: SymbolMap) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn active_pairs<I, P>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<TradingPair>,
    {
        self.active_pairs = pairs.into_iter().map(Into::into).collect();
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn order_count(mut self, count: u32) -> Self {
        self.order_count = count;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[cfg(feature = "http")]
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    #[cfg(feature = "http")]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(feature = "http")]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Take every setting `config` carries.
    pub fn config(mut self, config: &ExchangeConfig) -> Self {
        self.active_pairs = config.active_pairs.clone();
        self.order_count = config.order_count;
        self.settle_delay = config.settle_delay();
        #[cfg(feature = "http")]
        {
            self.base_url = config.base_url.clone();
            self.timeout = config.timeout();
            self.credentials = config.credentials();
        }
        self
    }

    /// Discover markets through `api` and freeze the translator.
    pub async fn build_with<A: ExchangeApi>(
        self,
        api: A,
    ) -> Result<BitflyerClient<A>, ExecutionError> {
        let listed = discover_markets(&api, &self.retry).await?;
        let translator = Translator::new(self.symbols, &self.active_pairs, &listed)?;
        tracing::info!(
            active_markets = translator.active_markets().len(),
            listed_markets = listed.len(),
            "Translator initialized"
        );

        Ok(BitflyerClient {
            api,
            translator,
            retry: self.retry,
            order_count: self.order_count,
            settle_delay: self.settle_delay,
        })
    }

    /// Build against the live REST API.
    #[cfg(feature = "http")]
    pub async fn build(self) -> Result<BitflyerClient<BitflyerHttp>, ExecutionError> {
        let http = BitflyerHttp::new(&self.base_url, self.credentials.clone(), self.timeout)?;
        self.build_with(http).await
    }
}
