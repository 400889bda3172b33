//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected
//! rather than stopping at the first one.

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.port must not be 0")]
    ZeroPort,
    #[error("upstream.timeout_ms must be greater than 0")]
    ZeroTimeout,
    #[error("upstream.user_agent is not a valid header value")]
    InvalidUserAgent,
    #[error("public.host {0:?} is not an absolute http(s) URL")]
    InvalidPublicHost(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let user_agent = &config.upstream.user_agent;
    if user_agent.is_empty() || HeaderValue::from_str(user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent);
    }

    if let Some(host) = &config.public.host {
        let valid = Url::parse(host)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidPublicHost(host.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.port = 0;
        config.upstream.timeout_ms = 0;
        config.upstream.user_agent = String::new();
        config.public.host = Some("proxy.example.com".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroPort,
                ValidationError::ZeroTimeout,
                ValidationError::InvalidUserAgent,
                ValidationError::InvalidPublicHost("proxy.example.com".into()),
            ]
        );
    }

    #[test]
    fn accepts_public_host_with_trailing_slash() {
        let mut config = ProxyConfig::default();
        config.public.host = Some("https://proxy.example.com/".into());
        assert!(validate_config(&config).is_ok());
    }
}
