//! Portal configuration

use crate::{CoreError, CoreResult};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session storage layout and lifetime
pub struct SessionConfig;

impl SessionConfig {
    /// Storage key for the bearer token
    pub const TOKEN_KEY: &'static str = "userToken";

    /// Storage key for the JSON-serialized user record
    pub const USER_KEY: &'static str = "userData";

    /// Storage key for the authenticated flag ("true" or absent)
    pub const AUTHENTICATED_KEY: &'static str = "isAuthenticated";

    /// Storage key for the ISO 8601 login timestamp
    pub const LOGIN_TIME_KEY: &'static str = "loginTime";

    /// Storage key for the ISO 8601 expiration timestamp
    pub const EXPIRATION_KEY: &'static str = "loginExpiration";

    /// Every key a session writes, in write order
    pub const ALL_KEYS: [&'static str; 5] = [
        Self::TOKEN_KEY,
        Self::USER_KEY,
        Self::AUTHENTICATED_KEY,
        Self::LOGIN_TIME_KEY,
        Self::EXPIRATION_KEY,
    ];

    /// Default session lifetime in days
    pub const DEFAULT_DURATION_DAYS: u32 = 20;

    /// Session lifetime for `days`, computed in milliseconds
    pub fn duration(days: u32) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(days) * 24 * 60 * 60 * 1000)
    }
}

/// Top-level portal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Session lifetime settings
    #[serde(default)]
    pub session: SessionSettings,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (ignored on wasm)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_days: default_duration_days(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_duration_days() -> u32 {
    SessionConfig::DEFAULT_DURATION_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PortalConfig {
    /// Load configuration from a file, overridden by `PORTAL_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the values do not validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults and `PORTAL_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> CoreResult<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("session.duration_days", defaults.session.duration_days)?
            .set_default("log_level", defaults.log_level)?
            .add_source(
                config::Environment::with_prefix("PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the portal cannot run with
    pub fn validate(&self) -> CoreResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CoreError::invalid_config(
                "api.base_url must not be empty",
            ));
        }
        if self.session.duration_days == 0 {
            return Err(CoreError::invalid_config(
                "session.duration_days must be at least 1",
            ));
        }
        Ok(())
    }

    /// Configured session lifetime
    pub fn session_duration(&self) -> TimeDelta {
        SessionConfig::duration(self.session.duration_days)
    }
}
