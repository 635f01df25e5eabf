//! Merging newly discovered relationships into existing registry records.

use tracing::{debug, warn};

use crate::doi::doi_url;

use super::{
    RegistryClient, RegistryDoiRecord, RegistryError, RelatedIdentifier, RelationType,
};

/// Result of merging candidate relations into an existing record.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// At least one relation was new; the updated record should be submitted.
    Updated(RegistryDoiRecord),
    /// Every candidate relation was already present; no registry write.
    AllAccountedFor,
}

/// Terminal status of one registry update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The record was fetched, merged, and submitted.
    Updated,
    /// All relations were already accounted for; nothing was submitted.
    AllAccountedFor,
    /// Fetch or update failed; the message is the collaborator's detail.
    /// Not retried automatically.
    Failed(String),
}

/// Per-target outcome of [`apply_relationships`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// The registry record's DOI.
    pub doi: String,
    /// What happened for this target.
    pub status: UpdateStatus,
}

/// Merges related DOIs into an existing record's relationship list.
///
/// A candidate is appended only when its exact `https://doi.org/<DOI>` URL
/// string is not already present verbatim among the record's existing
/// entries. The comparison is case-sensitive string equality, not
/// DOI-canonical: entries differing only by case or prefix are treated as
/// distinct. Existing entries are never removed or rewritten; new entries
/// precede them in the merged list.
#[must_use]
pub fn merge(
    existing: &RegistryDoiRecord,
    related_dois: &[String],
    relation_type: RelationType,
) -> MergeOutcome {
    let existing_urls: Vec<&str> = existing
        .related_identifiers
        .iter()
        .map(|entry| entry.related_identifier.as_str())
        .collect();

    let mut new_entries: Vec<RelatedIdentifier> = Vec::new();
    for related_doi in related_dois {
        let url = doi_url(&related_doi.to_uppercase());
        let already_present = existing_urls.contains(&url.as_str())
            || new_entries
                .iter()
                .any(|entry| entry.related_identifier == url);
        if !already_present {
            new_entries.push(RelatedIdentifier::doi(url, relation_type));
        }
    }

    if new_entries.is_empty() {
        debug!(doi = %existing.doi, "all relations already accounted for");
        return MergeOutcome::AllAccountedFor;
    }

    let mut updated = existing.clone();
    let retained = std::mem::take(&mut updated.related_identifiers);
    new_entries.extend(retained);
    updated.related_identifiers = new_entries;
    MergeOutcome::Updated(updated)
}

/// Fetches a target record, merges the related DOIs, and submits the update
/// when anything changed.
///
/// Failures are captured in the returned report rather than propagated, so
/// one bad target never blocks its siblings; the caller decides whether to
/// retry the whole update.
#[tracing::instrument(skip(client, related_dois), fields(related_count = related_dois.len()))]
pub async fn apply_relationships(
    client: &dyn RegistryClient,
    target_doi: &str,
    related_dois: &[String],
    relation_type: RelationType,
) -> UpdateReport {
    let target = target_doi.to_uppercase();

    let existing = match client.fetch(&target).await {
        Ok(record) => record,
        Err(error) => {
            warn!(doi = %target, error = %error, "registry fetch failed");
            return UpdateReport {
                doi: target,
                status: UpdateStatus::Failed(error.to_string()),
            };
        }
    };

    match merge(&existing, related_dois, relation_type) {
        MergeOutcome::AllAccountedFor => UpdateReport {
            doi: target,
            status: UpdateStatus::AllAccountedFor,
        },
        MergeOutcome::Updated(updated) => match client.update(&updated).await {
            Ok(()) => {
                debug!(doi = %target, "registry update successful");
                UpdateReport {
                    doi: target,
                    status: UpdateStatus::Updated,
                }
            }
            Err(error) => {
                warn!(doi = %target, error = %error, "registry update failed");
                UpdateReport {
                    doi: target,
                    status: UpdateStatus::Failed(error.to_string()),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_record(doi: &str) -> RegistryDoiRecord {
        RegistryDoiRecord {
            doi: doi.to_string(),
            related_identifiers: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_merge_into_empty_record_appends_all() {
        let existing = empty_record("10.5066/P9LYUFRH");
        let related = vec![
            "10.23706/1111111A".to_string(),
            "10.3133/OFR20191040".to_string(),
        ];
        let MergeOutcome::Updated(updated) =
            merge(&existing, &related, RelationType::IsCitedBy)
        else {
            panic!("expected Updated outcome");
        };
        assert_eq!(updated.related_identifiers.len(), 2);
        assert_eq!(
            updated.related_identifiers[0].related_identifier,
            "https://doi.org/10.23706/1111111A"
        );
        assert_eq!(updated.related_identifiers[0].relation_type, "IS_CITED_BY");
    }

    #[test]
    fn test_merge_skips_verbatim_duplicates_keeps_new() {
        let mut existing = empty_record("10.5066/P9LYUFRH");
        existing.related_identifiers.push(RelatedIdentifier::doi(
            "https://doi.org/10.23706/1111111A",
            RelationType::IsDocumentedBy,
        ));
        let related = vec![
            "10.23706/1111111A".to_string(),
            "10.3133/OFR20191040".to_string(),
        ];
        let MergeOutcome::Updated(updated) =
            merge(&existing, &related, RelationType::IsCitedBy)
        else {
            panic!("expected Updated outcome");
        };
        // New entry first, retained existing entry after it, nothing rewritten.
        assert_eq!(updated.related_identifiers.len(), 2);
        assert_eq!(
            updated.related_identifiers[0].related_identifier,
            "https://doi.org/10.3133/OFR20191040"
        );
        assert_eq!(
            updated.related_identifiers[1].relation_type,
            "IS_DOCUMENTED_BY"
        );
    }

    #[test]
    fn test_merge_all_present_is_noop() {
        let mut existing = empty_record("10.5066/P9LYUFRH");
        existing.related_identifiers.push(RelatedIdentifier::doi(
            "https://doi.org/10.3133/OFR20191040",
            RelationType::IsCitedBy,
        ));
        let related = vec!["10.3133/OFR20191040".to_string()];
        assert_eq!(
            merge(&existing, &related, RelationType::IsCitedBy),
            MergeOutcome::AllAccountedFor
        );
    }

    #[test]
    fn test_merge_twice_is_idempotent() {
        let existing = empty_record("10.5066/P9LYUFRH");
        let related = vec!["10.3133/OFR20191040".to_string()];
        let MergeOutcome::Updated(updated) =
            merge(&existing, &related, RelationType::IsCitedBy)
        else {
            panic!("expected Updated outcome");
        };
        // Second merge against the already-updated record is a no-op, not a
        // duplicate entry.
        assert_eq!(
            merge(&updated, &related, RelationType::IsCitedBy),
            MergeOutcome::AllAccountedFor
        );
    }

    #[test]
    fn test_merge_case_differences_are_distinct_entries() {
        let mut existing = empty_record("10.5066/P9LYUFRH");
        existing.related_identifiers.push(RelatedIdentifier::doi(
            "https://doi.org/10.3133/ofr20191040",
            RelationType::IsCitedBy,
        ));
        let related = vec!["10.3133/OFR20191040".to_string()];
        // Intentional limitation: matching is exact string equality, so a
        // case-differing URL is not detected as a duplicate.
        assert!(matches!(
            merge(&existing, &related, RelationType::IsCitedBy),
            MergeOutcome::Updated(_)
        ));
    }

    #[test]
    fn test_merge_dedupes_candidate_list() {
        let existing = empty_record("10.5066/P9LYUFRH");
        let related = vec![
            "10.3133/OFR20191040".to_string(),
            "10.3133/OFR20191040".to_string(),
        ];
        let MergeOutcome::Updated(updated) =
            merge(&existing, &related, RelationType::IsCitedBy)
        else {
            panic!("expected Updated outcome");
        };
        assert_eq!(updated.related_identifiers.len(), 1);
    }
}
