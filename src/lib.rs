//! Any Proxy library.
//!
//! HTTP forwarding proxy with a feed-rewriting mode. `GET /proxy?url=` streams
//! the target back unchanged; `GET /rss-proxy?url=` rewrites the feed's links
//! so they point back through this proxy.

pub mod config;
pub mod feed;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
