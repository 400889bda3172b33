//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for `level`, used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("any_proxy={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_crate_and_http_layer() {
        assert_eq!(default_directive("debug"), "any_proxy=debug,tower_http=debug");
        assert!(EnvFilter::try_new(default_directive("info")).is_ok());
    }
}
