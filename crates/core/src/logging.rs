//! Subscriber setup for native processes
//!
//! Browser builds log through `wasm-logger` instead.

use crate::config::PortalConfig;
use crate::error::{CoreError, CoreResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` first, then the configured level, then `info`
pub fn env_filter(config: &PortalConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &PortalConfig) -> CoreResult<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(config))
        .try_init()
        .map_err(|err| CoreError::invalid_config(format!("tracing: {err}")))
}

/// Install the global subscriber with configuration read from the environment
pub fn init_default() -> CoreResult<()> {
    let config = PortalConfig::from_env()?;
    init_tracing(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        let config = PortalConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        // Another test may have installed a subscriber first
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn invalid_level_falls_back() {
        let config = PortalConfig {
            log_level: "not a level[".to_string(),
            ..PortalConfig::default()
        };
        // Only checks that building the filter does not panic
        let _ = env_filter(&config);
    }
}
