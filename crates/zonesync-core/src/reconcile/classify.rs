use crate::record::Record;
use tracing::debug;

/// Why a record was flagged during classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchReason {
    /// Primary (`A`) record whose content is not the observed address.
    /// Its content becomes the reference old address.
    StalePrimary,

    /// Non-primary record examined after a reference was established whose
    /// content does not contain that reference
    NonPrimary,

    /// Non-primary record examined before any reference was established.
    /// No replacement value exists for it, so a plan containing it is rejected.
    Unanchored,
}

/// A record flagged for update, with the reason it was flagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch<'a> {
    /// The flagged record
    pub record: &'a Record,
    /// Why it was flagged
    pub reason: MismatchReason,
}

/// Result of one classification pass over a zone snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    mismatched: Vec<Mismatch<'a>>,
    reference_old: Option<&'a str>,
}

impl<'a> Classification<'a> {
    /// Assemble a classification from already-flagged records
    ///
    /// Used when the flagged set comes from somewhere other than [`classify`];
    /// [`build_plan`](super::build_plan) applies the same checks either way.
    pub fn new(mismatched: Vec<Mismatch<'a>>, reference_old: Option<&'a str>) -> Self {
        Self {
            mismatched,
            reference_old,
        }
    }

    /// Flagged records, in snapshot order
    pub fn mismatched(&self) -> &[Mismatch<'a>] {
        &self.mismatched
    }

    /// Flagged records without their reasons, in snapshot order
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.mismatched.iter().map(|m| m.record)
    }

    /// Content of the last stale primary record, if any
    pub fn reference_old(&self) -> Option<&'a str> {
        self.reference_old
    }

    /// Number of flagged records
    pub fn len(&self) -> usize {
        self.mismatched.len()
    }

    /// True when no record needs an update
    pub fn is_up_to_date(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Classify a zone snapshot against the observed address
///
/// Single pass in snapshot order:
///
/// 1. A record whose content already contains `observed` is up to date.
/// 2. A stale `A` record is flagged and its content becomes the reference old
///    address. The last stale `A` record wins.
/// 3. Any other stale record is flagged only if its content does not contain
///    the reference known at the moment it is examined. Before a reference
///    exists such a record is flagged as [`MismatchReason::Unanchored`].
///
/// The outcome therefore depends on snapshot order. The function is pure:
/// the same input always yields the same classification.
///
/// A stale `A` record with empty content still wins: it clears the reference,
/// so a later [`build_plan`](super::build_plan) reports the run as inconsistent.
pub fn classify<'a>(records: &'a [Record], observed: &str) -> Classification<'a> {
    let mut mismatched = Vec::new();
    let mut reference_old: Option<&'a str> = None;

    for record in records {
        if record.references(observed) {
            debug!("Record {} ({}) is up to date", record.id, record.name);
            continue;
        }

        let reason = if record.record_type.is_primary() {
            reference_old = Some(record.content.as_str()).filter(|c| !c.is_empty());
            MismatchReason::StalePrimary
        } else {
            match reference_old {
                None => MismatchReason::Unanchored,
                Some(old) if !record.references(old) => MismatchReason::NonPrimary,
                Some(_) => {
                    debug!(
                        "Record {} ({}) already references the old address, skipping",
                        record.id, record.name
                    );
                    continue;
                }
            }
        };

        debug!(
            "Record {} ({} {}) mismatched: {:?}",
            record.id, record.record_type, record.name, reason
        );
        mismatched.push(Mismatch { record, reason });
    }

    Classification {
        mismatched,
        reference_old,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVED: &str = "5.6.7.8";

    fn a(id: &str, content: &str) -> Record {
        Record::new(id, "A", "home.example.com", content)
    }

    fn txt(id: &str, content: &str) -> Record {
        Record::new(id, "TXT", "example.com", content)
    }

    #[test]
    fn test_empty_snapshot_is_up_to_date() {
        let result = classify(&[], OBSERVED);

        assert!(result.is_up_to_date());
        assert_eq!(result.len(), 0);
        assert_eq!(result.reference_old(), None);
    }

    #[test]
    fn test_records_containing_observed_are_skipped() {
        let records = vec![
            a("1", "5.6.7.8"),
            txt("2", "v=spf1 ip4:5.6.7.8 -all"),
            Record::new("3", "CNAME", "www.example.com", "host-5.6.7.8.example.net"),
        ];

        let result = classify(&records, OBSERVED);

        assert!(result.is_up_to_date());
        assert_eq!(result.reference_old(), None);
    }

    #[test]
    fn test_stale_a_record_sets_reference() {
        let records = vec![a("1", "1.2.3.4")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.reference_old(), Some("1.2.3.4"));
        assert_eq!(result.len(), 1);
        assert_eq!(result.mismatched()[0].record.id, "1");
        assert_eq!(result.mismatched()[0].reason, MismatchReason::StalePrimary);
    }

    #[test]
    fn test_last_stale_a_record_wins() {
        let records = vec![a("1", "1.2.3.4"), a("2", "9.9.9.9")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.reference_old(), Some("9.9.9.9"));
        let ids: Vec<_> = result.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_non_primary_after_reference_without_old_address_is_flagged() {
        let records = vec![a("1", "1.2.3.4"), txt("2", "google-site-verification=abc")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.len(), 2);
        assert_eq!(result.mismatched()[1].reason, MismatchReason::NonPrimary);
    }

    #[test]
    fn test_non_primary_after_reference_with_old_address_is_skipped() {
        let records = vec![a("1", "1.2.3.4"), txt("2", "v=spf1 ip4:1.2.3.4 -all")];

        let result = classify(&records, OBSERVED);

        let ids: Vec<_> = result.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_non_primary_before_reference_is_unanchored() {
        let records = vec![txt("2", "v=spf1 ip4:1.2.3.4 -all"), a("1", "1.2.3.4")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.len(), 2);
        assert_eq!(result.mismatched()[0].reason, MismatchReason::Unanchored);
        assert_eq!(result.reference_old(), Some("1.2.3.4"));
    }

    #[test]
    fn test_non_primary_with_observed_is_never_flagged() {
        let records = vec![a("1", "1.2.3.4"), txt("2", "points at 5.6.7.8")];

        let result = classify(&records, OBSERVED);

        assert!(result.records().all(|r| r.id != "2"));
    }

    #[test]
    fn test_preserves_input_order() {
        let records = vec![
            a("a1", "1.2.3.4"),
            txt("t1", "unrelated"),
            a("a2", "5.6.7.8"),
            Record::new("m1", "MX", "example.com", "mail.example.org"),
        ];

        let result = classify(&records, OBSERVED);

        let ids: Vec<_> = result.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "t1", "m1"]);
    }

    #[test]
    fn test_empty_a_content_clears_reference() {
        let records = vec![a("1", "1.2.3.4"), a("2", "")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.len(), 2);
        assert_eq!(result.reference_old(), None);
    }

    #[test]
    fn test_later_a_record_restores_reference() {
        let records = vec![a("1", ""), a("2", "1.2.3.4")];

        let result = classify(&records, OBSERVED);

        assert_eq!(result.reference_old(), Some("1.2.3.4"));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let records = vec![
            txt("t0", "first"),
            a("a1", "1.2.3.4"),
            txt("t1", "ip=1.2.3.4"),
            txt("t2", "other"),
        ];

        let first = classify(&records, OBSERVED);
        let second = classify(&records, OBSERVED);

        assert_eq!(first, second);
    }
}
