//! Observability subsystem.
//!
//! Structured logging through `tracing`. Per-request spans come from
//! `tower_http::trace::TraceLayer` in the HTTP server and carry the request id.

pub mod logging;

pub use logging::init_logging;
