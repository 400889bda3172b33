//! Plain and TLS HTTP clients.
//!
//! A fresh client is built per fetch with idle pooling disabled, so every
//! outbound connection is closed once its response is done or dropped.

use axum::body::Body;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client, Error as ClientError},
    rt::TokioExecutor,
};

use crate::upstream::target::TransportKind;

/// Connectors shared by all fetches. Cloning is cheap.
#[derive(Clone)]
pub struct Connectors {
    plain: HttpConnector,
    tls: HttpsConnector<HttpConnector>,
}

impl Connectors {
    pub fn new() -> Result<Self, rustls::Error> {
        let tls = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_only()
            .enable_http1()
            .build();

        Ok(Self {
            plain: HttpConnector::new(),
            tls,
        })
    }

    /// Build a single-use client for `kind`.
    pub fn transport(&self, kind: TransportKind) -> Transport {
        match kind {
            TransportKind::Plain => Transport::Plain(
                Client::builder(TokioExecutor::new())
                    .pool_max_idle_per_host(0)
                    .build(self.plain.clone()),
            ),
            TransportKind::Tls => Transport::Tls(
                Client::builder(TokioExecutor::new())
                    .pool_max_idle_per_host(0)
                    .build(self.tls.clone()),
            ),
        }
    }
}

/// A client bound to one transport.
pub enum Transport {
    Plain(Client<HttpConnector, Body>),
    Tls(Client<HttpsConnector<HttpConnector>, Body>),
}

impl Transport {
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Incoming>, ClientError> {
        match self {
            Transport::Plain(client) => client.request(request).await,
            Transport::Tls(client) => client.request(request).await,
        }
    }
}
