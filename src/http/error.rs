//! Error responses for the proxy endpoints.
//!
//! Each failure maps to exactly one status code and a short JSON body of the
//! form `{"error": "<message>"}`. Message text depends on the endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::upstream::FetchError;

/// Request-terminating failure.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The `url` query parameter is absent or empty.
    #[error("url query parameter is missing")]
    MissingParameter,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingParameter => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(FetchError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(FetchError::Timeout(_)) => StatusCode::REQUEST_TIMEOUT,
            ProxyError::Fetch(FetchError::Network(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Caller-facing route an error occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Proxy,
    Feed,
}

impl Endpoint {
    fn message(self, error: &ProxyError) -> &'static str {
        match (self, error) {
            (_, ProxyError::MissingParameter) => "URL parameter is required",
            (Endpoint::Proxy, ProxyError::Fetch(FetchError::InvalidUrl(_))) => "Invalid URL format",
            (Endpoint::Proxy, ProxyError::Fetch(FetchError::Timeout(_))) => "Request timeout",
            (Endpoint::Proxy, ProxyError::Fetch(FetchError::Network(_))) => {
                "Failed to fetch the requested URL"
            }
            (Endpoint::Feed, ProxyError::Fetch(FetchError::InvalidUrl(_))) => {
                "Invalid RSS URL format"
            }
            (Endpoint::Feed, ProxyError::Fetch(FetchError::Timeout(_))) => "RSS request timeout",
            (Endpoint::Feed, ProxyError::Fetch(FetchError::Network(_))) => {
                "Failed to fetch the RSS feed"
            }
        }
    }
}

/// A [`ProxyError`] bound to the endpoint that produced it.
#[derive(Debug)]
pub struct EndpointError {
    endpoint: Endpoint,
    error: ProxyError,
}

impl EndpointError {
    pub fn new(endpoint: Endpoint, error: impl Into<ProxyError>) -> Self {
        Self {
            endpoint,
            error: error.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    pub fn message(&self) -> &'static str {
        self.endpoint.message(&self.error)
    }

    pub fn error(&self) -> &ProxyError {
        &self.error
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
