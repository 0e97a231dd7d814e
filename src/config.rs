//! Process configuration: credentials, timeout, active pairs.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `<dir>/default.toml`
//! 3. `<dir>/<BITFLYER_ENV>.toml` (`development` when unset)
//! 4. environment variables: `BITFLYER__API_KEY`, `BITFLYER__ACTIVE_PAIRS=BTCJPY,BTCUSD`, ...

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::auth::Credentials;
use crate::domain::order::DEFAULT_COUNT;
use crate::network::DEFAULT_API_URL;
use crate::shared::TradingPair;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExchangeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub active_pairs: Vec<TradingPair>,
    /// Orders requested per market and endpoint family.
    pub order_count: u32,
    /// Pause between the bulk cancel and the verification re-fetch.
    pub settle_delay_ms: u64,
}

impl ExchangeConfig {
    pub fn load(config_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let env_name = std::env::var("BITFLYER_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            .set_default("base_url", DEFAULT_API_URL)?
            .set_default("timeout_secs", 30_i64)?
            .set_default("active_pairs", Vec::<String>::new())?
            .set_default("order_count", DEFAULT_COUNT as i64)?
            .set_default("settle_delay_ms", 2_000_i64)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env_name))).required(false))
            .add_source(
                Environment::with_prefix("BITFLYER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("active_pairs"),
            )
            .build()?
            .try_deserialize()
    }

    /// `None` when no API key is configured (public endpoints only).
    pub fn credentials(&self) -> Option<Credentials> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(Credentials::new(&self.api_key, &self.api_secret))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
