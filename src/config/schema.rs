//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Public-facing address used to build rewritten feed links.
    pub public: PublicConfig,

    /// Outbound request settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Public base URL this proxy is reachable at.
    ///
    /// Falls back to `http://localhost:<port>` when no public host is configured.
    pub fn public_base(&self) -> String {
        match &self.public.host {
            Some(host) => host.clone(),
            None => format!("http://localhost:{}", self.listener.port),
        }
    }

    /// Socket address string the listener binds to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.listener.bind_address, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listen port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Public address configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PublicConfig {
    /// Public base URL (e.g., "https://proxy.example.com").
    pub host: Option<String>,
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Deadline for an upstream fetch in milliseconds.
    pub timeout_ms: u64,

    /// User-Agent sent with every upstream request.
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: "any-proxy/1.0.0".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
