//! Upstream provider configuration.

use std::time::Duration;

use reqwest::Client;

use cityscope_core::{defaults, Error, Result};

/// Configuration for all upstream providers.
///
/// API keys are required; base URLs default to the real endpoints and can be
/// overridden so tests can point adapters at a local mock server.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub geocode_api_key: String,
    pub weather_api_key: String,
    pub eventbrite_token: String,
    pub movie_api_key: String,
    pub geocode_base_url: String,
    pub weather_base_url: String,
    pub events_base_url: String,
    pub movies_base_url: String,
    /// Per-call request timeout.
    pub timeout: Duration,
}

fn required(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| Error::Config(format!("{} is not set", var)))
}

fn url_or_default(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

impl UpstreamConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::UPSTREAM_TIMEOUT_SECS);

        Ok(Self {
            geocode_api_key: required("GEOCODE_API_KEY")?,
            weather_api_key: required("WEATHER_API_KEY")?,
            eventbrite_token: required("EVENTBRITE_API_KEY")?,
            movie_api_key: required("MOVIE_API_KEY")?,
            geocode_base_url: url_or_default("GEOCODE_BASE_URL", defaults::GEOCODE_BASE_URL),
            weather_base_url: url_or_default("WEATHER_BASE_URL", defaults::WEATHER_BASE_URL),
            events_base_url: url_or_default("EVENTS_BASE_URL", defaults::EVENTS_BASE_URL),
            movies_base_url: url_or_default("MOVIES_BASE_URL", defaults::MOVIES_BASE_URL),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Build the shared HTTP client with the configured request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))
}
