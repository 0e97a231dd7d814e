//! Market domain: symbol translation and the set of tradable markets.

pub mod client;
pub mod wire;

use crate::error::SymbolError;
use crate::shared::{ProductCode, TradingPair};
use std::collections::{BTreeSet, HashMap};

pub use client::discover_markets;

/// Canonical pair → product code table for bitFlyer.
const BITFLYER_SYMBOLS: &[(&str, &str)] = &[
    ("BTCJPY", "BTC_JPY"),
    ("BTCUSD", "BTC_USD"),
    ("BTCEUR", "BTC_EUR"),
    ("ETHBTC", "ETH_BTC"),
    ("BCHBTC", "BCH_BTC"),
    ("BTCJPY_FX", "FX_BTC_JPY"),
    ("BTCJPY_MAT1WK", "BTCJPY_MAT1WK"),
    ("BTCJPY_MAT2WK", "BTCJPY_MAT2WK"),
];

// ─── SymbolMap ───────────────────────────────────────────────────────────────

/// Bidirectional mapping between canonical pairs and product codes.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolMap {
    forward: HashMap<TradingPair, ProductCode>,
    reverse: HashMap<ProductCode, TradingPair>,
}

impl SymbolMap {
    /// Build a map, rejecting tables that are not one-to-one.
    pub fn new<I, P, C>(entries: I) -> Result<Self, SymbolError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<TradingPair>,
        C: Into<ProductCode>,
    {
        let mut forward = HashMap::new();
        let mut reverse: HashMap<ProductCode, TradingPair> = HashMap::new();
        for (pair, code) in entries {
            let (pair, code) = (pair.into(), code.into());
            if forward.contains_key(&pair) {
                return Err(SymbolError::DuplicatePair(pair));
            }
            if let Some(first) = reverse.get(&code) {
                return Err(SymbolError::DuplicateProductCode {
                    code,
                    first: first.clone(),
                    second: pair,
                });
            }
            forward.insert(pair.clone(), code.clone());
            reverse.insert(code, pair);
        }
        Ok(Self { forward, reverse })
    }

    /// The built-in bitFlyer table.
    pub fn bitflyer() -> Self {
        let forward: HashMap<TradingPair, ProductCode> = BITFLYER_SYMBOLS
            .iter()
            .map(|(pair, code)| (TradingPair::from(*pair), ProductCode::from(*code)))
            .collect();
        let reverse = forward
            .iter()
            .map(|(pair, code)| (code.clone(), pair.clone()))
            .collect();
        Self { forward, reverse }
    }

    /// e.g. `BTCUSD` → `BTC_USD`
    pub fn to_product_code(&self, pair: &TradingPair) -> Result<&ProductCode, SymbolError> {
        self.forward
            .get(pair)
            .ok_or_else(|| SymbolError::UnknownPair(pair.clone()))
    }

    /// e.g. `BTC_USD` → `BTCUSD`
    pub fn to_pair(&self, code: &ProductCode) -> Result<&TradingPair, SymbolError> {
        self.reverse
            .get(code)
            .ok_or_else(|| SymbolError::UnknownProductCode(code.clone()))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &TradingPair> {
        self.forward.keys()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self::bitflyer()
    }
}

// ─── Translator ──────────────────────────────────────────────────────────────

/// Symbol map plus the markets that are both configured and listed.
///
/// Built once during client construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Translator {
    symbols: SymbolMap,
    markets: BTreeSet<ProductCode>,
}

impl Translator {
    /// Intersect the configured pairs with the markets the exchange lists.
    ///
    /// Every configured pair must be in the symbol map.
    pub fn new(
        symbols: SymbolMap,
        active_pairs: &[TradingPair],
        listed: &BTreeSet<ProductCode>,
    ) -> Result<Self, SymbolError> {
        let mut markets = BTreeSet::new();
        for pair in active_pairs {
            let code = symbols.to_product_code(pair)?;
            if listed.contains(code) {
                markets.insert(code.clone());
            } else {
                tracing::debug!(
                    pair = %pair,
                    product_code = %code,
                    "Configured pair is not listed"
                );
            }
        }
        Ok(Self { symbols, markets })
    }

    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    pub fn to_product_code(&self, pair: &TradingPair) -> Result<&ProductCode, SymbolError> {
        self.symbols.to_product_code(pair)
    }

    pub fn to_pair(&self, code: &ProductCode) -> Result<&TradingPair, SymbolError> {
        self.symbols.to_pair(code)
    }

    /// Product codes the order queries fan out over, in sorted order.
    pub fn active_markets(&self) -> &BTreeSet<ProductCode> {
        &self.markets
    }
}
