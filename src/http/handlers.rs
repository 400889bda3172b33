//! Endpoint handlers.
//!
//! - `GET /`          usage document
//! - `GET /proxy`     stream the upstream body unchanged
//! - `GET /rss-proxy` buffer the feed, rewrite its links, return the text

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::feed::rewrite_links;
use crate::http::error::{Endpoint, EndpointError, ProxyError};
use crate::http::server::AppState;
use crate::upstream::{FetchError, FetchFlavor};

/// Query string accepted by both proxy endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

impl ProxyQuery {
    /// The non-empty `url` parameter.
    pub fn target(&self) -> Result<&str, ProxyError> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ProxyError::MissingParameter),
        }
    }
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Any Proxy Server",
        "usage": "GET /proxy?url=<target_url>",
        "rss_usage": "GET /rss-proxy?url=<feed_url>",
        "example": "/proxy?url=https://jsonplaceholder.typicode.com/posts/1",
    }))
}

pub async fn proxy(
    State(state): State<AppState>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Result<Response, EndpointError> {
    let query = accept_query(Endpoint::Proxy, query)?;
    let target = query.target().map_err(|e| reject(Endpoint::Proxy, None, e))?;

    let upstream = state
        .fetcher
        .fetch(target, FetchFlavor::Generic)
        .await
        .map_err(|e| reject(Endpoint::Proxy, Some(target), e))?;

    if !upstream.status.is_success() {
        tracing::debug!(target_url = %target, status = %upstream.status, "Upstream returned non-success status");
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, upstream.content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        ],
        Body::new(upstream.body),
    )
        .into_response())
}

pub async fn rss_proxy(
    State(state): State<AppState>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Result<Response, EndpointError> {
    let query = accept_query(Endpoint::Feed, query)?;
    let target = query.target().map_err(|e| reject(Endpoint::Feed, None, e))?;

    let fetched = state
        .fetcher
        .fetch_text(target, FetchFlavor::Feed)
        .await
        .map_err(|e| reject(Endpoint::Feed, Some(target), e))?;

    let rewritten = rewrite_links(&fetched.text, &state.proxy_base);
    tracing::debug!(
        target_url = %target,
        status = %fetched.status,
        proxy_base = %state.proxy_base,
        "Feed rewritten"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, fetched.content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        ],
        rewritten,
    )
        .into_response())
}

/// Unparseable query strings (e.g. a repeated `url`) get the same JSON error
/// as a malformed URL instead of axum's plain-text rejection.
fn accept_query(
    endpoint: Endpoint,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Result<ProxyQuery, EndpointError> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => Err(reject(
            endpoint,
            None,
            FetchError::InvalidUrl(rejection.body_text()),
        )),
    }
}

fn reject(endpoint: Endpoint, target: Option<&str>, error: impl Into<ProxyError>) -> EndpointError {
    let error = EndpointError::new(endpoint, error);
    let target = target.unwrap_or("");
    if error.status_code().is_server_error() || error.status_code() == StatusCode::REQUEST_TIMEOUT {
        tracing::error!(
            endpoint = ?endpoint,
            target_url = %target,
            status = error.status_code().as_u16(),
            error = %error.error(),
            "Upstream fetch failed"
        );
    } else {
        tracing::warn!(
            endpoint = ?endpoint,
            target_url = %target,
            status = error.status_code().as_u16(),
            error = %error.error(),
            "Rejected proxy request"
        );
    }
    error
}
