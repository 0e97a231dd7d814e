//! Custom serde helpers for exchange wire formats.

use chrono::NaiveDateTime;

const EXCHANGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Converts an exchange time string to epoch seconds.
///
/// The exchange sends UTC times without an offset, sometimes with fractional
/// seconds (`"2015-07-07T08:45:53.123"`). The fraction is truncated.
pub fn parse_exchange_time(raw: &str) -> Result<i64, chrono::ParseError> {
    let whole = raw.split('.').next().unwrap_or(raw);
    let naive = NaiveDateTime::parse_from_str(whole, EXCHANGE_TIME_FORMAT)?;
    Ok(naive.and_utc().timestamp())
}

/// Deserializes an exchange time string into epoch seconds.
pub mod epoch_seconds {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_exchange_time(&raw)
            .map_err(|e| serde::de::Error::custom(format!("Invalid timestamp {:?}: {}", raw, e)))
    }
}
