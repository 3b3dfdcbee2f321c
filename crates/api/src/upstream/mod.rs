//! Outbound HTTP clients for external providers.
//!
//! No retries and no circuit breaking: one attempt per request, bounded by
//! a client timeout.

pub mod llm;
pub mod payments;

/// Error type shared by the upstream clients.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Upstream returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}
