//! Client settings resolution.
//!
//! # Design
//! Explicit arguments win; an absent or empty argument falls back to the
//! environment (`API_KEY`, `API_ENDPOINT`). The environment is reached through
//! a lookup function so tests can inject a map instead of mutating process
//! state. Resolution never touches the network.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "API_KEY";
pub const API_ENDPOINT_VAR: &str = "API_ENDPOINT";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved credentials and base URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub api_endpoint: String,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(api_key: Option<&str>, api_endpoint: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve_with(api_key, api_endpoint, |name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(
        api_key: Option<&str>,
        api_endpoint: Option<&str>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = pick(api_key, API_KEY_VAR, &lookup).ok_or(ConfigError::MissingApiKey)?;
        let api_endpoint =
            pick(api_endpoint, API_ENDPOINT_VAR, &lookup).ok_or(ConfigError::MissingApiEndpoint)?;
        Ok(Self {
            api_key,
            api_endpoint,
        })
    }
}

fn pick<F>(explicit: Option<&str>, var: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| lookup(var).filter(|v| !v.is_empty()))
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .finish()
    }
}

/// Everything needed to open a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub settings: Settings,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<Settings> for ClientConfig {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}
