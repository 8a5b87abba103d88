//! Error types for the Shopforge API client.

use thiserror::Error;

/// Errors surfaced by [`ShopforgeClient`](crate::ShopforgeClient).
///
/// Every variant propagates synchronously from the call that detects it;
/// the client never retries or suppresses a failure. HTTP error status
/// codes are not part of this taxonomy: a 4xx/5xx response is handed back
/// to the caller as a normal result, body and all.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested response format is not one the platform supports.
    #[error("invalid response format: {0:?} (expected \"json\" or \"xml\")")]
    InvalidFormat(String),

    /// The requested HTTP verb is outside the set the platform accepts.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The transport failed to complete the exchange (DNS, connect, TLS,
    /// timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be parsed as JSON.
    #[error("failed to parse JSON response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The response body could not be parsed as XML.
    #[error("failed to parse XML response: {0}")]
    XmlParse(String),
}
