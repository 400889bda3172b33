//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request id)
//!     → handlers.rs (query parsing, call into upstream / feed)
//!     → error.rs (status + JSON body on failure)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{Endpoint, EndpointError, ProxyError};
pub use request::{MakeProxyRequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
