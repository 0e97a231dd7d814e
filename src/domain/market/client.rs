//! Markets sub-client: live market discovery.

use std::collections::BTreeSet;

use super::wire::MarketResponse;
use super::Translator;
use crate::client::BitflyerClient;
use crate::error::ExecutionError;
use crate::exchange::ExchangeApi;
use crate::http::retry::{with_backoff, RetryConfig};
use crate::response::checked;
use crate::shared::ProductCode;

/// Product codes the market list has been known to omit even though they
/// trade. Each is confirmed with a ticker call.
pub const UNLISTED_CODES: [&str; 2] = ["BTC_USD", "BTC_EUR"];

/// Fetch the listed markets, preferring aliases, then confirm the
/// historically unlisted codes with a live ticker call.
///
/// The listing call is retried; ticker calls are single attempts. One that
/// comes back with an exchange error just means the market is not there.
pub async fn discover_markets<A>(
    api: &A,
    retry: &RetryConfig,
) -> Result<BTreeSet<ProductCode>, ExecutionError>
where
    A: ExchangeApi + ?Sized,
{
    let raw = with_backoff(retry, "getmarkets", move || checked(api.get_markets())).await?;
    let listing: Vec<MarketResponse> = serde_json::from_value(raw)?;
    let mut codes: BTreeSet<ProductCode> = listing
        .iter()
        .map(|m| m.tradable_code().clone())
        .collect();

    for raw_code in UNLISTED_CODES {
        let code = ProductCode::from(raw_code);
        if codes.contains(&code) {
            continue;
        }
        match checked(api.get_ticker(&code)).await {
            Ok(_) => {
                codes.insert(code);
            }
            Err(ExecutionError::Api(e)) => {
                tracing::debug!(product_code = %code, "Ticker check rejected: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(codes)
}

/// Sub-client for market queries.
pub struct Markets<'a, A> {
    pub(crate) client: &'a BitflyerClient<A>,
}

impl<'a, A: ExchangeApi> Markets<'a, A> {
    /// Re-run discovery against the exchange. Does not change the markets
    /// the client fans out over; those are fixed at construction.
    pub async fn discover(&self) -> Result<BTreeSet<ProductCode>, ExecutionError> {
        discover_markets(&self.client.api, &self.client.retry).await
    }

    /// Configured markets that were listed when the client was built.
    pub fn active(&self) -> &'a BTreeSet<ProductCode> {
        self.client.translator.active_markets()
    }

    pub fn translator(&self) -> &'a Translator {
        &self.client.translator
    }
}
