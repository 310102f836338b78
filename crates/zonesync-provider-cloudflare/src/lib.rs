// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `zonesync_core::DnsProvider`.
//
// ## Behavior
//
// - ✅ One HTTP request per page when listing, one per record when updating
// - ✅ Full error propagation (no retry, no backoff)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ✅ Dry-run mode: listing is real, updates are only logged
// - ❌ NO record creation or deletion
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - Credentials are passed in explicitly, never read from the environment here
// - Provider MUST fail fast if email or key is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N&per_page=100`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use zonesync_core::config::{ProviderConfig, RunMode};
use zonesync_core::traits::DnsProvider;
use zonesync_core::{Error, Record, Result};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per listing page
const PAGE_SIZE: u32 = 100;

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Envelope common to every Cloudflare API v4 response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    page: u32,
    total_pages: u32,
}

/// A DNS record as returned by the Cloudflare API
#[derive(Debug, Deserialize)]
struct CloudflareRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    #[serde(default)]
    content: String,
}

impl From<CloudflareRecord> for Record {
    fn from(record: CloudflareRecord) -> Self {
        Record::new(record.id, record.record_type, record.name, record.content)
    }
}

/// Join API error messages into one line
fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} (code {})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a non-success HTTP status to an error
///
/// `context` describes the failed operation (e.g. "Record listing").
fn status_error(status: reqwest::StatusCode, body: &str, context: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API email/key or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: zone or record not found. Status: {}", context, status)),
        409 => Error::provider(
            PROVIDER,
            format!("Conflict: Record is being updated by another process. Status: {}", status),
        ),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {} - {}", status, body),
        ),
        _ => Error::provider(PROVIDER, format!("{} failed: {} - {}", context, status, body)),
    }
}

/// Cloudflare DNS provider
///
/// Authenticates with the account email and global API key. The zone is
/// passed per call, so one provider can serve any zone the key can access.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (record listing)
/// - Log the intended PATCH payload
/// - **NOT** actually modify DNS records
pub struct CloudflareProvider {
    /// Account email
    api_email: String,

    /// Global API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PATCH updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_email", &self.api_email)
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_email`: Cloudflare account email
    /// - `api_key`: Global API key with DNS edit access to the zone
    /// - `dry_run`: If true, list records but skip PATCH updates
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either credential is empty or the
    /// HTTP client cannot be built.
    pub fn new(
        api_email: impl Into<String>,
        api_key: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_email = api_email.into();
        let api_key = api_key.into();

        if api_email.is_empty() {
            return Err(Error::config("Cloudflare account email cannot be empty"));
        }
        if api_key.is_empty() {
            return Err(Error::config("Cloudflare API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_email,
            api_key,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig, mode: RunMode) -> Result<Self> {
        config.validate()?;

        match config {
            ProviderConfig::Cloudflare { api_email, api_key } => {
                if mode.is_dry_run() {
                    tracing::warn!(
                        "Cloudflare provider running in DRY-RUN mode - no changes will be made"
                    );
                }
                Self::new(api_email.clone(), api_key.clone(), mode.is_dry_run())
            }
        }
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether updates are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Fetch one page of records
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=N&per_page=100
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn fetch_page(&self, zone_id: &str, page: u32) -> Result<(Vec<Record>, u32)> {
        let response = self
            .client
            .get(self.records_url(zone_id))
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .header("X-Auth-Email", &self.api_email)
            .header("X-Auth-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text, "Record listing"));
        }

        let body: ApiResponse<Vec<CloudflareRecord>> = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        if !body.success {
            return Err(Error::provider(
                PROVIDER,
                format!("Record listing rejected: {}", describe_errors(&body.errors)),
            ));
        }

        let records = body
            .result
            .ok_or_else(|| Error::provider(PROVIDER, "Invalid response format: result is missing"))?
            .into_iter()
            .map(Record::from)
            .collect();

        // Without result_info the response is a single page
        let total_pages = body
            .result_info
            .map(|info| {
                tracing::debug!("Fetched page {} of {}", info.page, info.total_pages);
                info.total_pages
            })
            .unwrap_or(page);

        Ok((records, total_pages))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<Record>> {
        tracing::debug!("Listing DNS records for zone {}", zone_id);

        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (mut batch, total_pages) = self.fetch_page(zone_id, page).await?;
            records.append(&mut batch);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Replace a record's content
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// { "content": "5.6.7.8" }
    /// ```
    async fn update_record(&self, record_id: &str, zone_id: &str, content: &str) -> Result<()> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);
        let payload = serde_json::json!({ "content": content });

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                payload
            );
            return Ok(());
        }

        let response = self
            .client
            .patch(&url)
            .header("X-Auth-Email", &self.api_email)
            .header("X-Auth-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text, "Record update"));
        }

        let body: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        if !body.success {
            return Err(Error::provider(
                PROVIDER,
                format!("Record update rejected: {}", describe_errors(&body.errors)),
            ));
        }

        tracing::debug!("DNS record {} updated", record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
