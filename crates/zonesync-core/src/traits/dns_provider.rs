// # DNS Provider Trait
//
// Defines the interface for reading and updating zone records via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `zonesync-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records("zone-id").await?;
//     for record in &records {
//         println!("{}", record);
//     }
//
//     provider.update_record("record-id", "zone-id", "5.6.7.8").await?;
//
//     Ok(())
// }
// ```

use crate::record::Record;
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Providers are thin API clients. They do not decide which records need an
/// update (owned by the reconciler), and they never retry: a failed call is
/// returned as an error and the run ends.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or backoff
/// - ❌ Caching records between calls
/// - ❌ Creating or deleting records
/// - ❌ Reading credentials from the environment (they are passed in)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in a zone
    ///
    /// Returns the full snapshot in provider order. Implementations must
    /// follow pagination so the snapshot is complete.
    ///
    /// # Parameters
    ///
    /// - `zone_id`: The managed zone identifier
    async fn list_records(&self, zone_id: &str) -> Result<Vec<Record>, crate::Error>;

    /// Replace the content of one record
    ///
    /// # Parameters
    ///
    /// - `record_id`: The record identifier from the snapshot
    /// - `zone_id`: The managed zone identifier
    /// - `content`: The new record content
    async fn update_record(
        &self,
        record_id: &str,
        zone_id: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare")
    fn provider_name(&self) -> &'static str;
}
