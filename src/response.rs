//! Response validation: detects error payloads embedded in exchange responses.
//!
//! The exchange reports many failures with a success-shaped body such as
//! `{"status": -208, "error_message": "Order is not accepted"}`.

use serde_json::Value;
use std::future::Future;

use crate::error::{ApiError, ExecutionError, HttpError};

/// Field the exchange uses to carry an error description.
pub const ERROR_MESSAGE_FIELD: &str = "error_message";

/// What to do when a response carries an error indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Fail with [`ApiError`].
    Raise,
    /// Log and return the response unchanged; the caller inspects it.
    Absorb,
}

/// Extract the embedded error, if any.
pub fn embedded_error(response: &Value) -> Option<ApiError> {
    let message = response.get(ERROR_MESSAGE_FIELD)?;
    let message = match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(ApiError {
        status: response.get("status").and_then(Value::as_i64),
        message,
    })
}

/// Validate a raw response. Embedded errors are always logged at warn level.
pub fn validate(response: Value, on_error: OnError) -> Result<Value, ApiError> {
    if let Some(err) = embedded_error(&response) {
        tracing::warn!(status = ?err.status, "Exchange returned an error: {}", err.message);
        if on_error == OnError::Raise {
            return Err(err);
        }
    }
    Ok(response)
}

/// Await a raw exchange call and raise on an embedded error, so both
/// failure kinds surface as retryable [`ExecutionError`]s.
pub async fn checked<F>(call: F) -> Result<Value, ExecutionError>
where
    F: Future<Output = Result<Value, HttpError>>,
{
    let response = call.await?;
    Ok(validate(response, OnError::Raise)?)
}
