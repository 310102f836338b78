//! Single-run reconciliation engine
//!
//! The ReconcileEngine is responsible for:
//! - Discovering the current public address via AddressSource
//! - Taking one record snapshot via DnsProvider
//! - Classifying the snapshot and building the update plan
//! - Applying the plan, one record at a time
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐      ┌──────────────┐
//! │ AddressSource │      │ DnsProvider  │
//! │  (discover)   │      │ (list/update)│
//! └───────┬───────┘      └──────┬───────┘
//!         │ observed            │ records
//!         ▼                     ▼
//!       ┌─────────────────────────┐         ┌─────────────┐
//!       │     ReconcileEngine     │────────►│   Events    │
//!       │ classify → plan → apply │         │  (notify)   │
//!       └─────────────────────────┘         └─────────────┘
//! ```
//!
//! ## Run States
//!
//! ```text
//! Start → Discover → Snapshot → Classify ─┬─► UpToDate
//!                                         ├─► Inconsistent (fatal)
//!                                         └─► PlanBuilt → Apply ─┬─► Done
//!                                                                └─► Failed (fatal)
//! ```
//!
//! Every fatal state is returned as an `Err`; the engine never terminates
//! the process and never retries.

use crate::config::{RunMode, ZoneSyncConfig};
use crate::error::{Error, Result};
use crate::reconcile::{build_plan, classify};
use crate::record::Record;
use crate::traits::{AddressSource, DnsProvider};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Default capacity of the engine event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the ReconcileEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Run started
    Started {
        zone_id: String,
    },

    /// Public address discovered
    AddressDiscovered {
        address: String,
    },

    /// Record read from the zone snapshot
    RecordListed {
        record: Record,
    },

    /// Update plan built
    PlanBuilt {
        mismatched: usize,
        reference_old: String,
    },

    /// Record content updated (or would have been, in dry-run mode)
    RecordUpdated {
        record_id: String,
        name: String,
        new_content: String,
    },

    /// Nothing to update
    UpToDate {
        records_count: usize,
    },

    /// Run finished after applying updates
    Completed {
        applied: usize,
    },

    /// Run ended in a fatal state
    Failed {
        error: String,
    },
}

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every record already matched the observed address
    UpToDate,

    /// Updates were applied
    Applied {
        /// Number of records updated
        count: usize,
    },

    /// Dry-run pass: every planned update was handed to the provider, which
    /// logged it instead of sending it
    DryRun {
        /// Number of records that would have been updated
        planned: usize,
    },
}

/// Core reconciliation engine
///
/// Orchestrates exactly one discovery → snapshot → reconcile → apply pass.
/// Intended to be constructed and run once per process invocation; the
/// engine holds no state between calls to [`ReconcileEngine::run_once`].
pub struct ReconcileEngine {
    /// Address discovery collaborator
    address_source: Box<dyn AddressSource>,

    /// DNS provider collaborator
    provider: Box<dyn DnsProvider>,

    /// Managed zone
    zone_id: String,

    /// Live or dry-run
    mode: RunMode,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ReconcileEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `address_source`: Address discovery implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Run configuration (validated here)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        address_source: Box<dyn AddressSource>,
        provider: Box<dyn DnsProvider>,
        config: &ZoneSyncConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            address_source,
            provider,
            zone_id: config.zone_id.clone(),
            mode: config.mode,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: The zone is up to date, or every planned update
    ///   was applied
    /// - `Err(Error)`: The run ended in a fatal state (`Discovery`, `Listing`,
    ///   `Inconsistent` or `Update`)
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let result = self.run_internal().await;

        if let Err(ref e) = result {
            error!("Run failed: {}", e);
            self.emit_event(EngineEvent::Failed {
                error: e.to_string(),
            });
        }

        result
    }

    async fn run_internal(&self) -> Result<RunOutcome> {
        self.emit_event(EngineEvent::Started {
            zone_id: self.zone_id.clone(),
        });

        // Discover
        let observed = self
            .address_source
            .current()
            .await
            .map_err(|e| Error::discovery(e.to_string()))?;
        info!(
            "Public IP address: {} (via {})",
            observed,
            self.address_source.source_name()
        );
        self.emit_event(EngineEvent::AddressDiscovered {
            address: observed.to_string(),
        });

        // Snapshot
        let records = self
            .provider
            .list_records(&self.zone_id)
            .await
            .map_err(|e| Error::listing(e.to_string()))?;
        info!(
            "DNS records retrieved from {}: {}",
            self.provider.provider_name(),
            records.len()
        );
        for record in &records {
            info!("{}", record);
            self.emit_event(EngineEvent::RecordListed {
                record: record.clone(),
            });
        }

        // Classify
        let classification = classify(&records, observed.as_str());
        if classification.is_up_to_date() {
            info!("DNS records up to date");
            self.emit_event(EngineEvent::UpToDate {
                records_count: records.len(),
            });
            return Ok(RunOutcome::UpToDate);
        }
        info!("Number of mismatched records: {}", classification.len());

        // Plan
        let plan = build_plan(&classification, observed.as_str())?;
        self.emit_event(EngineEvent::PlanBuilt {
            mismatched: plan.len(),
            reference_old: classification.reference_old().unwrap_or_default().to_string(),
        });
        for update in &plan {
            debug!(
                "Planned {} -> {} for record {}",
                update.previous_content, update.new_content, update.record_id
            );
        }

        // Apply
        if self.mode.is_dry_run() {
            info!("[DRY-RUN] Handing {} planned update(s) to the provider", plan.len());
        } else {
            info!("Updating DNS records");
        }
        let applied = plan
            .apply_with(self.provider.as_ref(), &self.zone_id, |update| {
                self.emit_event(EngineEvent::RecordUpdated {
                    record_id: update.record_id.clone(),
                    name: update.name.clone(),
                    new_content: update.new_content.clone(),
                });
            })
            .await?;

        self.emit_event(EngineEvent::Completed { applied });

        if self.mode.is_dry_run() {
            return Ok(RunOutcome::DryRun { planned: applied });
        }
        Ok(RunOutcome::Applied { count: applied })
    }

    /// Emit an engine event
    ///
    /// Never blocks; a full channel drops the event.
    fn emit_event(&self, event: EngineEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event");
        }
    }
}
