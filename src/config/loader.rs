//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the public base URL.
pub const ENV_HOST: &str = "HOST";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => {
                write!(f, "Invalid value {:?} for environment variable {}", value, name)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ProxyConfig::default(),
    };

    build_config(config, |name| std::env::var(name).ok())
}

/// Overlay environment values onto `config` and validate.
///
/// `lookup` resolves an environment variable name to its value.
pub fn build_config<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_PORT,
            value: port.clone(),
        })?;
    }

    if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
        config.public.host = Some(host);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_port_and_host() {
        let config = build_config(
            ProxyConfig::default(),
            env(&[("PORT", "8088"), ("HOST", "http://proxy.test")]),
        )
        .unwrap();

        assert_eq!(config.listener.port, 8088);
        assert_eq!(config.public_base(), "http://proxy.test");
    }

    #[test]
    fn default_host_follows_env_port() {
        let config = build_config(ProxyConfig::default(), env(&[("PORT", "4000")])).unwrap();
        assert_eq!(config.public_base(), "http://localhost:4000");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let config =
            build_config(ProxyConfig::default(), env(&[("PORT", ""), ("HOST", "")])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert!(config.public.host.is_none());
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = build_config(ProxyConfig::default(), env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "PORT", .. }));
    }

    #[test]
    fn rejects_invalid_host() {
        let err = build_config(ProxyConfig::default(), env(&[("HOST", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
