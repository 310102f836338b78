// # Address Source Trait
//
// Defines the interface for discovering the caller's current public address.
//
// ## Implementations
//
// - HTTPS lookup service: `zonesync-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     let observed = source.current().await?;
//     println!("Public address: {}", observed);
//
//     Ok(())
// }
// ```

use crate::record::ObservedAddress;
use async_trait::async_trait;

/// Trait for public address discovery
///
/// One call per run. Implementations perform a single attempt and return an
/// error on any failure; the engine treats that error as fatal.
///
/// Implementations must return an [`ObservedAddress`], which guarantees the
/// value is a well-formed address before it reaches the reconciler.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Discover the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(ObservedAddress)`: The current public address
    /// - `Err(Error)`: If the service is unreachable, answers with a
    ///   non-success status, or returns something that is not an address
    async fn current(&self) -> Result<ObservedAddress, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
