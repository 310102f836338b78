// # zonesync-core
//
// Core library for the zonesync dynamic DNS reconciler.
//
// ## Architecture Overview
//
// This library decides which records of a DNS zone are stale with respect to
// the caller's current public address, and rewrites them:
// - **Record**: One entry of a zone snapshot, with an explicit type tag
// - **classify / build_plan / UpdatePlan**: The reconciliation algorithm
// - **AddressSource**: Trait for discovering the current public address
// - **DnsProvider**: Trait for listing and updating zone records
// - **ReconcileEngine**: Runs one discover → snapshot → reconcile → apply pass
//
// ## Design Principles
//
// 1. **Pure Core**: Classification and planning perform no I/O
// 2. **Explicit Configuration**: Credentials are passed in, never read from the environment here
// 3. **Fail Fast**: Every failure is returned to the caller; nothing retries
// 4. **Stateless Runs**: The old address is inferred from the snapshot, never stored

pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{DiscoveryConfig, ProviderConfig, RunMode, ZoneSyncConfig};
pub use engine::{EngineEvent, ReconcileEngine, RunOutcome};
pub use error::{Error, Result};
pub use reconcile::{Classification, UpdatePlan, build_plan, classify};
pub use record::{ObservedAddress, Record, RecordType};
pub use traits::{AddressSource, DnsProvider};
