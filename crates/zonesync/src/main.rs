// # zonesync - dynamic DNS zone reconciler
//
// This binary is a THIN integration layer. All reconciliation logic lives in
// zonesync-core; this file only:
// 1. Loads `.env` and reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Builds the collaborators and runs the engine once
// 4. Maps the result to an exit code
//
// ## Configuration
//
// ### DNS Provider
// - `CLOUDFLARE_EMAIL`: Cloudflare account email (required)
// - `CLOUDFLARE_API_KEY`: Cloudflare global API key (required)
// - `DNS_ZONE_ID`: Zone to reconcile (required)
//
// ### Address Discovery
// - `ZONESYNC_IP_SOURCE_URL`: Lookup URL (default: https://ipinfo.io/ip)
//
// ### Runtime
// - `ZONESYNC_MODE`: `live` or `dry-run` (default: live)
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_EMAIL=admin@example.com
// export CLOUDFLARE_API_KEY=your_global_api_key
// export DNS_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
//
// zonesync
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::config::DEFAULT_DISCOVERY_URL;
use zonesync_core::{
    DiscoveryConfig, ProviderConfig, ReconcileEngine, RunMode, RunOutcome, ZoneSyncConfig,
};
use zonesync_ip_http::HttpAddressSource;
use zonesync_provider_cloudflare::CloudflareProvider;

/// Exit codes
///
/// Only success and fatal error are distinguished.
#[derive(Debug, Clone, Copy)]
enum ZoneSyncExitCode {
    /// Zone reconciled (or already up to date)
    Success = 0,
    /// Any fatal condition
    Fatal = 1,
}

impl From<ZoneSyncExitCode> for ExitCode {
    fn from(code: ZoneSyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Settings read from the environment
struct Settings {
    api_email: String,
    api_key: String,
    zone_id: String,
    ip_source_url: String,
    mode: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through a variable lookup function
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is required. Set it via: export {}=...", key, key))
        };

        Ok(Self {
            api_email: required("CLOUDFLARE_EMAIL")?,
            api_key: required("CLOUDFLARE_API_KEY")?,
            zone_id: required("DNS_ZONE_ID")?,
            ip_source_url: lookup("ZONESYNC_IP_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_DISCOVERY_URL.to_string()),
            mode: lookup("ZONESYNC_MODE").unwrap_or_else(|| "live".to_string()),
        })
    }

    /// Build and validate the run configuration
    fn into_config(self) -> Result<ZoneSyncConfig> {
        let mode: RunMode = self.mode.parse().context("ZONESYNC_MODE is not valid")?;

        let config = ZoneSyncConfig::new(
            ProviderConfig::Cloudflare {
                api_email: self.api_email,
                api_key: self.api_key,
            },
            self.zone_id,
        )
        .with_discovery(DiscoveryConfig::Http {
            url: self.ip_source_url,
        })
        .with_mode(mode);

        config.validate()?;
        Ok(config)
    }
}

/// Resolve the log level on its own, so it is known before any other
/// setting is validated
fn log_level_from<F>(lookup: F) -> Result<Level>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup("ZONESYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "ZONESYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

/// Report a fatal condition through the log and on stderr
fn fatal(context: &str, e: &anyhow::Error) -> ExitCode {
    error!("{}: {:#}", context, e);
    eprintln!("{}: {:#}", context, e);
    ZoneSyncExitCode::Fatal.into()
}

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables take precedence
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // An invalid level still gets a subscriber, at the default level, so the
    // error below is logged
    let log_level = log_level_from(|key| env::var(key).ok());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level.as_ref().map_or(Level::INFO, |level| *level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZoneSyncExitCode::Fatal.into();
    }

    if let Err(e) = log_level {
        return fatal("Configuration error", &e);
    }

    info!("zonesync starting");
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => return fatal("Configuration error", &e),
    };

    let config = match settings.into_config() {
        Ok(config) => config,
        Err(e) => return fatal("Configuration validation error", &e),
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return fatal("Failed to create tokio runtime", &anyhow::Error::from(e)),
    };

    match rt.block_on(run(config)) {
        Ok(()) => ZoneSyncExitCode::Success.into(),
        Err(e) => fatal("zonesync failed", &e),
    }
}

/// Run one reconciliation pass
async fn run(config: ZoneSyncConfig) -> Result<()> {
    let address_source = HttpAddressSource::from_config(&config.discovery)?;
    let provider = CloudflareProvider::from_config(&config.provider, config.mode)?;

    info!(
        "Address discovery: {} ({})",
        config.discovery.type_name(),
        address_source.url()
    );
    info!("Provider: {}", config.provider.type_name());
    info!("Zone: {}", config.zone_id);

    // Progress is narrated through tracing; the event stream is not needed here
    let (engine, _) =
        ReconcileEngine::new(Box::new(address_source), Box::new(provider), &config)?;

    match engine.run_once().await? {
        RunOutcome::UpToDate => info!("DNS record up to date!"),
        RunOutcome::Applied { count } => info!("{} record(s) updated", count),
        RunOutcome::DryRun { planned } => {
            info!("[DRY-RUN] {} record(s) would have been updated", planned)
        }
    }

    info!("All done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("CLOUDFLARE_EMAIL", "admin@example.com"),
        ("CLOUDFLARE_API_KEY", "c2547eb745079dac9320b638f5e225cf483cc"),
        ("DNS_ZONE_ID", "023e105f4ecef8ad9ca31a8372d0c353"),
    ];

    #[test]
    fn test_required_settings_with_defaults() {
        let settings = Settings::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(settings.ip_source_url, DEFAULT_DISCOVERY_URL);
        assert_eq!(log_level_from(lookup_from(REQUIRED)).unwrap(), Level::INFO);

        let config = settings.into_config().unwrap();
        assert_eq!(config.zone_id, "023e105f4ecef8ad9ca31a8372d0c353");
        assert_eq!(config.mode, RunMode::Live);
    }

    #[test]
    fn test_missing_zone_id_is_an_error() {
        let result = Settings::from_lookup(lookup_from(&REQUIRED[..2]));

        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("DNS_ZONE_ID"));
    }

    #[test]
    fn test_blank_required_value_is_an_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("CLOUDFLARE_API_KEY", "   ");

        assert!(Settings::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_optional_settings() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ZONESYNC_IP_SOURCE_URL", "https://api.ipify.org"));
        pairs.push(("ZONESYNC_MODE", "dry-run"));
        pairs.push(("ZONESYNC_LOG_LEVEL", "DEBUG"));

        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(log_level_from(lookup_from(&pairs)).unwrap(), Level::DEBUG);

        let config = settings.into_config().unwrap();
        assert!(config.mode.is_dry_run());
        assert_eq!(
            config.discovery,
            DiscoveryConfig::Http {
                url: "https://api.ipify.org".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ZONESYNC_MODE", "sometimes"));
        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(settings.into_config().is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ZONESYNC_LOG_LEVEL", "loud"));
        assert!(log_level_from(lookup_from(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ZONESYNC_IP_SOURCE_URL", "ftp://example.com"));
        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(settings.into_config().is_err());
    }

    #[test]
    fn test_log_level_resolves_without_other_settings() {
        // Missing credentials must still be reported through the log
        let lookup = lookup_from(&[("ZONESYNC_LOG_LEVEL", "warn")]);

        assert_eq!(log_level_from(&lookup).unwrap(), Level::WARN);
        assert!(Settings::from_lookup(&lookup).is_err());
        assert_eq!(log_level_from(lookup_from(&[])).unwrap(), Level::INFO);
    }
}
