//! HTTP layer: `BitflyerHttp` transport and the retry policy for reissuable calls.

#[cfg(feature = "http")]
pub mod client;
pub mod retry;

#[cfg(feature = "http")]
pub use client::BitflyerHttp;
pub use retry::{with_backoff, RetryConfig};
