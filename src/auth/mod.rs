//! Authentication: API credentials and private-endpoint request signing.
//!
//! ## Signing
//!
//! Private endpoints carry three headers:
//!
//! - `ACCESS-KEY`: the API key
//! - `ACCESS-TIMESTAMP`: Unix seconds at signing time
//! - `ACCESS-SIGN`: hex HMAC-SHA256 over `timestamp + METHOD + path_and_query + body`
//!   keyed with the API secret
//!
//! The secret is never exposed: there is no accessor and `Debug` redacts it.

#[cfg(feature = "http")]
use hmac::{Hmac, Mac};
#[cfg(feature = "http")]
use sha2::Sha256;

#[cfg(feature = "http")]
use crate::error::HttpError;

#[cfg(feature = "http")]
type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_KEY_HEADER: &str = "ACCESS-KEY";
pub const ACCESS_TIMESTAMP_HEADER: &str = "ACCESS-TIMESTAMP";
pub const ACCESS_SIGN_HEADER: &str = "ACCESS-SIGN";

/// API key pair for private endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Sign one request. `body` is the exact JSON text sent, or `""`.
    #[cfg(feature = "http")]
    pub fn sign(
        &self,
        timestamp: i64,
        method: &str,
        path_and_query: &str,
        body: &str,
    ) -> Result<String, HttpError> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| HttpError::InvalidHeader(format!("HMAC init failed: {}", e)))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(method.to_uppercase().as_bytes());
        mac.update(path_and_query.as_bytes());
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("key-123", "very-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("key-123"));
        assert!(!printed.contains("very-secret"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_sign_get_request() {
        let creds = Credentials::new("key", "secret-key");
        let sig = creds
            .sign(
                1436258753,
                "GET",
                "/v1/me/getchildorders?product_code=BTC_JPY&count=200",
                "",
            )
            .unwrap();
        assert_eq!(
            sig,
            "20f689b512aa7e86bbc926cdeab32bfc254896432cd17718c88431817be0c2e0"
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_sign_post_request_includes_body() {
        let creds = Credentials::new("key", "secret-key");
        let sig = creds
            .sign(
                1436258753,
                "post",
                "/v1/me/cancelallchildorders",
                r#"{"product_code":"BTC_JPY"}"#,
            )
            .unwrap();
        assert_eq!(
            sig,
            "c3906ee3e2306492f8ac03e0017b191a7bee948981a9508d5917f3b88842b13f"
        );
    }
}
