//! Configuration types for zonesync
//!
//! Configuration is assembled once at process start (the binary reads it
//! from the environment) and passed explicitly to the collaborators and the
//! engine. Nothing in this crate reads the environment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default public address lookup service
pub const DEFAULT_DISCOVERY_URL: &str = "https://ipinfo.io/ip";

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSyncConfig {
    /// Address discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Managed zone identifier
    pub zone_id: String,

    /// Live or dry-run
    #[serde(default)]
    pub mode: RunMode,
}

impl ZoneSyncConfig {
    /// Create a configuration with default discovery and live mode
    pub fn new(provider: ProviderConfig, zone_id: impl Into<String>) -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            provider,
            zone_id: zone_id.into(),
            mode: RunMode::default(),
        }
    }

    /// Set the discovery configuration
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }

    /// Set the run mode
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Zone ID cannot be empty"));
        }

        self.provider.validate()?;
        self.discovery.validate()?;

        Ok(())
    }
}

/// Address discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscoveryConfig {
    /// HTTP(S) lookup service returning the address as the response body
    Http {
        /// URL to fetch the address from
        url: String,
    },
}

impl DiscoveryConfig {
    /// Validate the discovery configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            DiscoveryConfig::Http { url } => {
                if url.is_empty() {
                    return Err(crate::Error::config("Discovery URL cannot be empty"));
                }
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(crate::Error::config(format!(
                        "Discovery URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the discovery type name
    pub fn type_name(&self) -> &str {
        match self {
            DiscoveryConfig::Http { .. } => "http",
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig::Http {
            url: DEFAULT_DISCOVERY_URL.to_string(),
        }
    }
}

/// DNS provider configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider (global API key authentication)
    Cloudflare {
        /// Account email
        api_email: String,
        /// Global API key
        api_key: String,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare { api_email, api_key } => {
                if api_email.trim().is_empty() {
                    return Err(crate::Error::config("Cloudflare account email cannot be empty"));
                }
                if !api_email.contains('@') {
                    return Err(crate::Error::config(format!(
                        "Cloudflare account email looks invalid: {}",
                        api_email
                    )));
                }
                if api_key.trim().is_empty() {
                    return Err(crate::Error::config("Cloudflare API key cannot be empty"));
                }

                // Common mistake: copying the sample .env verbatim
                let key_lower = api_key.to_lowercase();
                if key_lower.contains("your_key")
                    || key_lower.contains("replace_me")
                    || key_lower == "key"
                {
                    return Err(crate::Error::config(
                        "Cloudflare API key appears to be a placeholder",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

// Secrets stay out of Debug output
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Cloudflare { api_email, .. } => f
                .debug_struct("Cloudflare")
                .field("api_email", api_email)
                .field("api_key", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Run mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Apply updates
    #[default]
    Live,
    /// Read, classify and plan, but only log the updates
    DryRun,
}

impl RunMode {
    /// Whether updates are skipped
    pub fn is_dry_run(self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

impl std::str::FromStr for RunMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(RunMode::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(RunMode::DryRun),
            other => Err(crate::Error::config(format!(
                "Unknown run mode '{}'. Valid modes: live, dry-run",
                other
            ))),
        }
    }
}
