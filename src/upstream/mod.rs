//! Upstream fetching subsystem.
//!
//! # Data Flow
//! ```text
//! caller-supplied URL string
//!     → target.rs (parse, derive UpstreamRequest: transport, authority, path)
//!     → transport.rs (plain or TLS client, no idle connections kept)
//!     → fetcher.rs (dispatch under a single deadline)
//!     → body.rs (idle deadline on the streamed body)
//!     → UpstreamResponse (streamed body) or FetchedText (buffered body)
//! ```
//!
//! # Design Decisions
//! - Invalid input is rejected before any socket is opened
//! - One deadline per fetch; dropping the in-flight future closes the connection
//! - No retries; every failure is reported exactly once

pub mod body;
pub mod error;
pub mod fetcher;
pub mod target;
pub mod transport;

pub use body::IdleTimeoutBody;
pub use error::{BuildError, FetchError};
pub use fetcher::{FetchedText, Fetcher, UpstreamResponse};
pub use target::{FetchFlavor, TransportKind, UpstreamRequest};
