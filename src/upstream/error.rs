//! Upstream error types.

use std::time::Duration;

use axum::http::header::InvalidHeaderValue;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single upstream fetch. All variants are terminal.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The target could not be turned into an outbound request.
    #[error("invalid target URL: {0}")]
    InvalidUrl(String),

    /// The upstream did not complete within the deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// DNS, connect, TLS or transport failure.
    #[error("upstream request failed: {0}")]
    Network(#[source] BoxError),
}

impl FetchError {
    pub(crate) fn network(err: impl Into<BoxError>) -> Self {
        FetchError::Network(err.into())
    }
}

/// Failure while constructing a [`Fetcher`](super::Fetcher).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to set up TLS client: {0}")]
    Tls(#[from] rustls::Error),

    #[error("invalid user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),
}
