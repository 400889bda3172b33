//! Upstream fetcher.
//!
//! Two entry points share request construction:
//! - [`Fetcher::fetch`] returns the response head and leaves the body
//!   streaming, so the caller can pipe it with backpressure.
//! - [`Fetcher::fetch_text`] drains the body into a string.
//!
//! The deadline for `fetch` covers connect and response head, after which
//! the same duration applies as an idle limit on the streamed body. For
//! `fetch_text` the deadline covers reading the whole body.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use hyper::body::Incoming;

use crate::config::UpstreamConfig;
use crate::upstream::body::IdleTimeoutBody;
use crate::upstream::error::{BuildError, FetchError};
use crate::upstream::target::{FetchFlavor, UpstreamRequest};
use crate::upstream::transport::{Connectors, Transport};

/// Response head plus a still-streaming body.
#[derive(Debug)]
pub struct UpstreamResponse {
    /// Upstream status; logged only, callers always answer 200.
    pub status: StatusCode,
    /// Declared content type, or the flavor default.
    pub content_type: HeaderValue,
    pub body: IdleTimeoutBody<Incoming>,
}

/// Fully buffered upstream body, decoded as UTF-8.
#[derive(Debug, Clone)]
pub struct FetchedText {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub text: String,
}

/// Issues outbound GET requests with a fixed deadline.
#[derive(Clone)]
pub struct Fetcher {
    connectors: Connectors,
    timeout: Duration,
    user_agent: HeaderValue,
}

impl Fetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self, BuildError> {
        Ok(Self {
            connectors: Connectors::new()?,
            timeout: config.timeout(),
            user_agent: HeaderValue::from_str(&config.user_agent)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `target` and return as soon as the response head arrives.
    pub async fn fetch(
        &self,
        target: &str,
        flavor: FetchFlavor,
    ) -> Result<UpstreamResponse, FetchError> {
        let (transport, request) = self.prepare(target, flavor)?;

        let response = tokio::time::timeout(self.timeout, transport.send(request))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
            .map_err(FetchError::network)?;

        let status = response.status();
        let content_type = content_type_or_default(response.headers(), flavor);
        tracing::debug!(target_url = %target, status = %status, "Upstream responded");

        Ok(UpstreamResponse {
            status,
            content_type,
            body: IdleTimeoutBody::new(response.into_body(), self.timeout),
        })
    }

    /// Fetch `target` and buffer the complete body as text.
    pub async fn fetch_text(
        &self,
        target: &str,
        flavor: FetchFlavor,
    ) -> Result<FetchedText, FetchError> {
        let (transport, request) = self.prepare(target, flavor)?;

        let exchange = async {
            let response = transport.send(request).await.map_err(FetchError::network)?;
            let status = response.status();
            let content_type = content_type_or_default(response.headers(), flavor);
            let bytes = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
                .await
                .map_err(FetchError::network)?;
            Ok::<_, FetchError>(FetchedText {
                status,
                content_type,
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
        };

        let fetched = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        tracing::debug!(
            target_url = %target,
            status = %fetched.status,
            bytes = fetched.text.len(),
            "Upstream body buffered"
        );
        Ok(fetched)
    }

    fn prepare(
        &self,
        target: &str,
        flavor: FetchFlavor,
    ) -> Result<(Transport, Request<Body>), FetchError> {
        let upstream = UpstreamRequest::parse(target)?;
        let request = upstream.to_request(flavor, &self.user_agent)?;

        tracing::debug!(
            target_url = %target,
            transport = ?upstream.transport(),
            host = %upstream.host(),
            port = upstream.port(),
            "Dispatching upstream request"
        );

        Ok((self.connectors.transport(upstream.transport()), request))
    }
}

fn content_type_or_default(headers: &axum::http::HeaderMap, flavor: FetchFlavor) -> HeaderValue {
    headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(flavor.default_content_type()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(timeout_ms: u64) -> Fetcher {
        let config = UpstreamConfig {
            timeout_ms,
            ..UpstreamConfig::default()
        };
        Fetcher::new(&config).unwrap()
    }

    #[test]
    fn missing_content_type_uses_flavor_default() {
        let headers = axum::http::HeaderMap::new();
        assert_eq!(content_type_or_default(&headers, FetchFlavor::Generic), "text/plain");
        assert_eq!(content_type_or_default(&headers, FetchFlavor::Feed), "application/xml");

        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        assert_eq!(content_type_or_default(&headers, FetchFlavor::Generic), "image/png");
    }

    #[tokio::test]
    async fn invalid_url_fails_before_dispatch() {
        let err = fetcher(1000).fetch("not-a-url", FetchFlavor::Generic).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));

        let err = fetcher(1000).fetch_text("not-a-url", FetchFlavor::Feed).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher(2000)
            .fetch(&format!("http://{addr}/"), FetchFlavor::Generic)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn silent_upstream_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = fetcher(100)
            .fetch_text(&format!("http://{addr}/feed"), FetchFlavor::Feed)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
    }
}
