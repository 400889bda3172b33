//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (PORT / HOST environment overlay)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to the fetcher and rewriter at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; core logic never reads the environment
//! - All fields have defaults to allow running without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use schema::PublicConfig;
pub use schema::UpstreamConfig;
