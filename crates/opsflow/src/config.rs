//! Windmill connection settings

use std::time::Duration;

/// Connection settings for the Windmill API
#[derive(Debug, Clone)]
pub struct WindmillConfig {
    /// Windmill server URL
    pub base_url: String,
    /// Authentication token (unset for anonymous access)
    pub token: Option<String>,
    /// Windmill workspace
    pub workspace: String,
    /// Total time to wait for a job result
    pub timeout: Duration,
    /// Delay between status polls
    pub poll_interval: Duration,
}

impl Default for WindmillConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
            workspace: "idp".to_string(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl WindmillConfig {
    /// Load settings from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("WINDMILL_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map_or(defaults.timeout, Duration::from_secs);

        Self {
            base_url: std::env::var("WINDMILL_URL").unwrap_or(defaults.base_url),
            token: std::env::var("WINDMILL_TOKEN").ok().filter(|t| !t.is_empty()),
            workspace: std::env::var("WINDMILL_WORKSPACE").unwrap_or(defaults.workspace),
            timeout,
            poll_interval: defaults.poll_interval,
        }
    }
}
