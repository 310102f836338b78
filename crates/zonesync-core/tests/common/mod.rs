//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal collaborators that record how the engine
//! uses them, without performing any I/O.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use zonesync_core::error::{Error, Result};
use zonesync_core::traits::{AddressSource, DnsProvider};
use zonesync_core::{EngineEvent, ObservedAddress, ProviderConfig, Record, ZoneSyncConfig};

pub const ZONE_ID: &str = "zone-under-test";

/// An AddressSource returning a fixed answer
pub struct FixedAddressSource {
    answer: std::result::Result<String, String>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
}

impl FixedAddressSource {
    /// Source that discovers `address`
    pub fn new(address: &str) -> Self {
        Self {
            answer: Ok(address.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source that always fails
    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressSource for FixedAddressSource {
    async fn current(&self) -> Result<ObservedAddress> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(address) => ObservedAddress::parse(address),
            Err(message) => Err(Error::http(message.clone())),
        }
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A mock DnsProvider serving a fixed snapshot and tracking calls
pub struct MockDnsProvider {
    /// Snapshot returned by list_records()
    records: Vec<Record>,
    /// Fail list_records() when set
    fail_listing: bool,
    /// Fail the update of this record id when set
    fail_update_of: Option<String>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// Recorded (record_id, zone_id, content) from update calls
    updates: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fail_listing: false,
            fail_update_of: None,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make list_records() fail
    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Make update_record() fail for one record
    pub fn with_failing_update(mut self, record_id: &str) -> Self {
        self.fail_update_of = Some(record_id.to_string());
        self
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: other.records.clone(),
            fail_listing: other.fail_listing,
            fail_update_of: other.fail_update_of.clone(),
            list_call_count: Arc::clone(&other.list_call_count),
            updates: Arc::clone(&other.updates),
        }
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded update calls
    pub fn updates(&self) -> Vec<(String, String, String)> {
        self.updates.lock().unwrap().clone()
    }

    /// Get the record ids passed to update_record(), in call order
    pub fn updated_ids(&self) -> Vec<String> {
        self.updates().into_iter().map(|(id, _, _)| id).collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, _zone_id: &str) -> Result<Vec<Record>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Error::not_found("Zone not found"));
        }
        Ok(self.records.clone())
    }

    async fn update_record(&self, record_id: &str, zone_id: &str, content: &str) -> Result<()> {
        self.updates.lock().unwrap().push((
            record_id.to_string(),
            zone_id.to_string(),
            content.to_string(),
        ));

        if self.fail_update_of.as_deref() == Some(record_id) {
            return Err(Error::provider("mock", "Cloudflare server error (transient): 502"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal config for testing
pub fn minimal_config() -> ZoneSyncConfig {
    ZoneSyncConfig::new(
        ProviderConfig::Cloudflare {
            api_email: "test@example.com".to_string(),
            api_key: "test-key-0123456789".to_string(),
        },
        ZONE_ID,
    )
}

/// Drain every event currently buffered in the receiver
pub fn drain_events(rx: &mut mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn a(id: &str, name: &str, content: &str) -> Record {
    Record::new(id, "A", name, content)
}

pub fn txt(id: &str, name: &str, content: &str) -> Record {
    Record::new(id, "TXT", name, content)
}
