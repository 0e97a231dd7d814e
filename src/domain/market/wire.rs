//! Wire types for market responses (REST).

use crate::shared::ProductCode;
use serde::Deserialize;

/// One entry of `getmarkets`. Futures carry a stable `alias`
/// (`BTCJPY_MAT1WK`) next to a dated product code (`BTCJPY30MAR2018`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MarketResponse {
    pub product_code: ProductCode,
    #[serde(default)]
    pub alias: Option<ProductCode>,
    #[serde(default)]
    pub market_type: Option<String>,
}

impl MarketResponse {
    /// The code orders are placed with: the alias when one exists.
    pub fn tradable_code(&self) -> &ProductCode {
        self.alias.as_ref().unwrap_or(&self.product_code)
    }
}
