//! Error taxonomy for the request pipeline.
//!
//! Every failure surfaces to the caller as a typed variant; nothing is
//! swallowed. String payloads are boxed to keep the enum small.

use tokio::time::Duration;

/// Errors produced by the client, the request pipeline and configuration
/// loading.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Network-level failure: connection refused, timeout, or the response
    /// body could not be read. Retried within the configured budget.
    #[error("request failed when running {context}: {source}")]
    Transport {
        context: Box<str>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The API signalled throttling (HTTP 429). Retried within the budget,
    /// honoring `Retry-After` when the server provides one.
    #[error("rate limited: {snippet}")]
    RateLimited {
        retry_after: Option<Duration>,
        snippet: Box<str>,
    },
    /// Non-2xx response that is not a rate limit. Never retried. `code` is
    /// Notion's machine-readable error code when the error envelope parsed.
    #[error("API error: status {status} code {code} | {message}")]
    Http {
        status: u16,
        code: Box<str>,
        message: Box<str>,
    },
    /// A 2xx body that does not conform to the expected schema.
    #[error("malformed response: status {status} | {message} | snippet: {snippet}")]
    Validation {
        status: u16,
        message: Box<str>,
        snippet: Box<str>,
    },
    /// The response was well-formed JSON but violated the API's own
    /// protocol, for example a pagination cursor missing while more pages
    /// were advertised.
    #[error("bad response: {0}")]
    BadResponse(Box<str>),
    /// The caller cancelled the operation while it was in flight.
    #[error("operation {operation} cancelled")]
    Cancelled { operation: Box<str> },
    /// The request descriptor could not be turned into an HTTP request, for
    /// example a body that does not serialise to a JSON object where one is
    /// required.
    #[error("invalid request: {0}")]
    InvalidRequest(Box<str>),
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(Box<str>),
    #[error("io error: {0}")]
    Io(#[from] Box<std::io::Error>),
}

impl Error {
    /// Status code carried by this error, when one applies.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Validation { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}
