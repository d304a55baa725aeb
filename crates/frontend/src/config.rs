//! Frontend configuration

use portal_core::PortalConfig;
use tracing::warn;
use web_sys::window;

/// Browser-side settings
pub struct FrontendConfig;

impl FrontendConfig {
    /// How often the stored session is re-validated
    pub const SESSION_CHECK_INTERVAL_MS: u32 = 60_000; // 1 minute

    /// Path of the backend API relative to the page origin
    pub const API_PATH: &'static str = "/api";

    /// Capability required for the insurance pages
    pub const INSURANCE_CAPABILITY: &'static str = "Insurance";

    /// Session lifetime baked in at build time, same variable as native config
    const SESSION_DURATION_DAYS: Option<&'static str> =
        option_env!("PORTAL_SESSION__DURATION_DAYS");

    /// Portal settings for the current page
    pub fn portal() -> PortalConfig {
        let origin = window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::portal_for(&origin, Self::SESSION_DURATION_DAYS)
    }

    /// Portal settings for a page served from `origin`
    fn portal_for(origin: &str, duration_days: Option<&str>) -> PortalConfig {
        let mut config = PortalConfig::default();
        config.api.base_url = format!("{origin}{}", Self::API_PATH);

        if let Some(raw) = duration_days {
            match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => config.session.duration_days = days,
                _ => warn!(value = raw, "Ignoring invalid session duration"),
            }
        }
        config
    }
}
