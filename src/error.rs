//! Unified error types.

use thiserror::Error;

use crate::shared::{ProductCode, TradingPair};

/// Top-level execution error.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Exchange API error: {0}")]
    Api(#[from] ApiError),

    #[error("Symbol error: {0}")]
    Symbol(#[from] SymbolError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ExecutionError {
    /// Transient transport failures and embedded exchange errors may succeed
    /// on a later attempt; everything else is a defect the caller must see.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExecutionError::Http(e) => e.is_transient(),
            ExecutionError::Api(_) => true,
            _ => false,
        }
    }
}

/// Transport-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Missing credentials for private endpoint {0}")]
    MissingCredentials(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl HttpError {
    /// Network and server-side failures. Errors raised locally before a
    /// request leaves (credentials, headers, bodies) and auth rejections
    /// repeat identically on every attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => !e.is_builder(),
            HttpError::ServerError { .. } | HttpError::RateLimited | HttpError::Timeout => true,
            HttpError::Unauthorized
            | HttpError::BadRequest(_)
            | HttpError::MissingCredentials(_)
            | HttpError::InvalidHeader(_) => false,
        }
    }
}

/// An error payload embedded in an otherwise well-formed exchange response.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (status {status:?})")]
pub struct ApiError {
    pub status: Option<i64>,
    pub message: String,
}

/// Lookup failures between canonical pairs and exchange product codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("Unknown trading pair: {0}")]
    UnknownPair(TradingPair),

    #[error("Unknown product code: {0}")]
    UnknownProductCode(ProductCode),

    #[error("Trading pair {0} appears twice in the symbol table")]
    DuplicatePair(TradingPair),

    #[error("Product code {code} is mapped by both {first} and {second}")]
    DuplicateProductCode {
        code: ProductCode,
        first: TradingPair,
        second: TradingPair,
    },
}

/// Why an order placement produced no acceptance id.
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Invalid order: {0}")]
    Invalid(String),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error("Rejected by exchange: {0}")]
    Rejected(#[from] ApiError),

    #[error("Transport failure: {0}")]
    Transport(#[from] HttpError),

    #[error("Response has no `{0}` field")]
    MissingAcceptanceId(&'static str),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;
