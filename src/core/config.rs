//! Backend and map configuration for route-picker
//!
//! Handles base URL resolution from the environment and the map view defaults.

use std::env;
use std::time::Duration;

use crate::core::error::{Error, Result};

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "ROUTE_PICKER_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "ROUTE_PICKER_TIMEOUT_SECS";

/// Local development backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for the backend client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend, without trailing slash
    pub base_url: String,

    /// Overall request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&url)?;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::InvalidInput(format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the base URL, normalizing away trailing slashes
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::InvalidInput(format!(
                "Backend URL must start with http:// or https://, got '{url}'"
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Full URL of a backend endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Initial map viewport and tile source
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: (50.4501, 30.5234),
            zoom: 12,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}
