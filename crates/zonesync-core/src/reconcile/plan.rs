use super::classify::{Classification, MismatchReason};
use crate::error::{Error, Result};
use crate::record::RecordType;
use crate::traits::DnsProvider;
use tracing::{debug, info};

/// One record rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    /// Identifier of the record to update
    pub record_id: String,
    /// Record type (for narration)
    pub record_type: RecordType,
    /// Record name (for narration)
    pub name: String,
    /// Content before the rewrite
    pub previous_content: String,
    /// Content after the rewrite
    pub new_content: String,
}

impl PlannedUpdate {
    /// True when the rewrite leaves the content as it was
    pub fn is_noop(&self) -> bool {
        self.previous_content == self.new_content
    }
}

/// Ordered set of record rewrites for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    updates: Vec<PlannedUpdate>,
}

impl UpdatePlan {
    /// Number of planned updates
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// True when nothing is planned
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Planned updates in apply order
    pub fn iter(&self) -> impl Iterator<Item = &PlannedUpdate> {
        self.updates.iter()
    }

    /// New content planned for a record, if it is part of the plan
    pub fn new_content(&self, record_id: &str) -> Option<&str> {
        self.updates
            .iter()
            .find(|u| u.record_id == record_id)
            .map(|u| u.new_content.as_str())
    }

    /// Apply every planned update through the provider
    ///
    /// Updates are sent one at a time in plan order. The first failure aborts
    /// the run; updates already applied are not rolled back.
    ///
    /// # Returns
    ///
    /// The number of records updated.
    pub async fn apply(&self, provider: &dyn DnsProvider, zone_id: &str) -> Result<usize> {
        self.apply_with(provider, zone_id, |_| {}).await
    }

    /// Like [`UpdatePlan::apply`], calling `on_applied` after each successful update
    pub async fn apply_with<F>(
        &self,
        provider: &dyn DnsProvider,
        zone_id: &str,
        mut on_applied: F,
    ) -> Result<usize>
    where
        F: FnMut(&PlannedUpdate) + Send,
    {
        let mut applied = 0;

        for update in &self.updates {
            provider
                .update_record(&update.record_id, zone_id, &update.new_content)
                .await
                .map_err(|e| Error::update(&update.record_id, e.to_string()))?;

            info!(
                "Updated {}\t{}: id={}, content={}",
                update.record_type, update.name, update.record_id, update.new_content
            );
            on_applied(update);
            applied += 1;
        }

        Ok(applied)
    }
}

impl<'p> IntoIterator for &'p UpdatePlan {
    type Item = &'p PlannedUpdate;
    type IntoIter = std::slice::Iter<'p, PlannedUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

/// Build the rewrite plan for a classification
///
/// Every occurrence of the reference old address in each flagged record is
/// replaced with `observed`.
///
/// # Errors
///
/// - [`Error::Inconsistent`] when records are flagged but no stale `A` record
///   established a non-empty reference, or when a record was flagged before
///   the reference existed. Nothing is planned in either case.
/// - [`Error::InvalidInput`] when `observed` is empty.
pub fn build_plan(classification: &Classification<'_>, observed: &str) -> Result<UpdatePlan> {
    if classification.is_up_to_date() {
        return Ok(UpdatePlan::default());
    }

    if observed.is_empty() {
        return Err(Error::invalid_input("Observed address is empty"));
    }

    // Replacing an empty string would splice the address between every character
    let Some(reference) = classification.reference_old().filter(|r| !r.is_empty()) else {
        return Err(Error::inconsistent(format!(
            "Could not identify old address from A records ({} mismatched record(s))",
            classification.len()
        )));
    };

    if let Some(unanchored) = classification
        .mismatched()
        .iter()
        .find(|m| m.reason == MismatchReason::Unanchored)
    {
        let record = unanchored.record;
        return Err(Error::inconsistent(format!(
            "{} record {} (id={}) was flagged before any stale A record established the old address",
            record.record_type, record.name, record.id
        )));
    }

    let updates = classification
        .records()
        .map(|record| {
            let update = PlannedUpdate {
                record_id: record.id.clone(),
                record_type: record.record_type.clone(),
                name: record.name.clone(),
                previous_content: record.content.clone(),
                new_content: record.content.replace(reference, observed),
            };
            if update.is_noop() {
                debug!("Record {} does not embed {}, content unchanged", record.id, reference);
            }
            update
        })
        .collect();

    Ok(UpdatePlan { updates })
}
