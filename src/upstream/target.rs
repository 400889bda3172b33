//! Target URL parsing and outbound request construction.

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Uri};
use url::Url;

use crate::upstream::error::FetchError;

/// `Accept` header sent when fetching feeds.
pub const FEED_ACCEPT: &str = "application/rss+xml, application/xml, text/xml";

/// Which caller path a fetch serves. Controls the `Accept` header and the
/// fallback content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFlavor {
    /// Generic pass-through (`/proxy`).
    Generic,
    /// Syndication feed (`/rss-proxy`).
    Feed,
}

impl FetchFlavor {
    /// Content type used when the upstream does not declare one.
    pub fn default_content_type(self) -> &'static str {
        match self {
            FetchFlavor::Generic => "text/plain",
            FetchFlavor::Feed => "application/xml",
        }
    }

    fn accept(self) -> Option<&'static str> {
        match self {
            FetchFlavor::Generic => None,
            FetchFlavor::Feed => Some(FEED_ACCEPT),
        }
    }
}

/// Outbound transport selected from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Plain,
    Tls,
}

impl TransportKind {
    pub fn default_port(self) -> u16 {
        match self {
            TransportKind::Plain => 80,
            TransportKind::Tls => 443,
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            TransportKind::Plain => "http",
            TransportKind::Tls => "https",
        }
    }
}

/// Everything needed to issue the outbound GET. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    transport: TransportKind,
    host: String,
    port: u16,
    path_and_query: String,
}

impl UpstreamRequest {
    /// Parse a caller-supplied absolute URL.
    ///
    /// `https` selects TLS; every other scheme is sent over plain HTTP.
    pub fn parse(target: &str) -> Result<Self, FetchError> {
        let url = Url::parse(target).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(FetchError::InvalidUrl(format!("{target:?} has no host"))),
        };

        let transport = if url.scheme() == "https" {
            TransportKind::Tls
        } else {
            TransportKind::Plain
        };

        let port = url.port().unwrap_or_else(|| transport.default_port());

        let mut path_and_query = url.path().to_string();
        if let Some(query) = url.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        Ok(Self {
            transport,
            host,
            port,
            path_and_query,
        })
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Host as it appears in an authority (IPv6 literals keep their brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    /// Absolute URI handed to the HTTP client.
    pub fn uri(&self) -> Result<Uri, FetchError> {
        let raw = format!(
            "{}://{}:{}{}",
            self.transport.scheme(),
            self.host,
            self.port,
            self.path_and_query
        );
        Uri::try_from(raw.as_str()).map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Build the GET request for `flavor`.
    pub fn to_request(
        &self,
        flavor: FetchFlavor,
        user_agent: &HeaderValue,
    ) -> Result<Request<Body>, FetchError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(self.uri()?)
            .header(header::USER_AGENT, user_agent.clone());

        if let Some(accept) = flavor.accept() {
            builder = builder.header(header::ACCEPT, accept);
        }

        builder
            .body(Body::empty())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}
