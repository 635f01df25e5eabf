//! Integration tests for registry write-back.
//!
//! Uses an in-memory `RegistryClient` double to verify the fetch/merge/update
//! cycle and the per-record pipeline push.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use citelink_core::pipeline::push_relationships;
use citelink_core::reconcile::RelationshipRecord;
use citelink_core::registry::{
    RegistryClient, RegistryDoiRecord, RegistryError, RelatedIdentifier, RelationType,
    UpdateStatus, apply_relationships,
};

/// In-memory registry double; `fetch` misses become fetch errors, `update`
/// stores the submitted record for later inspection.
struct FakeRegistry {
    records: Mutex<HashMap<String, RegistryDoiRecord>>,
    fail_update: bool,
}

impl FakeRegistry {
    fn with_records(records: Vec<RegistryDoiRecord>) -> Self {
        Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (record.doi.clone(), record))
                    .collect(),
            ),
            fail_update: false,
        }
    }

    fn stored(&self, doi: &str) -> Option<RegistryDoiRecord> {
        self.records.lock().unwrap().get(doi).cloned()
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn fetch(&self, doi: &str) -> Result<RegistryDoiRecord, RegistryError> {
        self.records
            .lock()
            .unwrap()
            .get(doi)
            .cloned()
            .ok_or_else(|| RegistryError::fetch(doi, "record not found"))
    }

    async fn update(&self, record: &RegistryDoiRecord) -> Result<(), RegistryError> {
        if self.fail_update {
            return Err(RegistryError::update(&record.doi, "service unavailable"));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.doi.clone(), record.clone());
        Ok(())
    }
}

fn empty_record(doi: &str) -> RegistryDoiRecord {
    RegistryDoiRecord {
        doi: doi.to_string(),
        related_identifiers: Vec::new(),
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn test_apply_relationships_submits_merged_record() {
    let registry = FakeRegistry::with_records(vec![empty_record("10.5066/P9LYUFRH")]);
    let related = vec!["10.3133/ofr20191040".to_string()];

    let report = apply_relationships(
        &registry,
        "10.5066/p9lyufrh",
        &related,
        RelationType::IsCitedBy,
    )
    .await;

    assert_eq!(report.doi, "10.5066/P9LYUFRH");
    assert_eq!(report.status, UpdateStatus::Updated);

    let stored = registry.stored("10.5066/P9LYUFRH").expect("record submitted");
    assert_eq!(stored.related_identifiers.len(), 1);
    assert_eq!(
        stored.related_identifiers[0].related_identifier,
        "https://doi.org/10.3133/OFR20191040"
    );
    assert_eq!(stored.related_identifiers[0].relation_type, "IS_CITED_BY");
}

#[tokio::test]
async fn test_apply_relationships_all_accounted_for_skips_update() {
    let mut existing = empty_record("10.5066/P9LYUFRH");
    existing.related_identifiers.push(RelatedIdentifier::doi(
        "https://doi.org/10.3133/OFR20191040",
        RelationType::IsCitedBy,
    ));
    let registry = FakeRegistry::with_records(vec![existing]);

    let report = apply_relationships(
        &registry,
        "10.5066/P9LYUFRH",
        &["10.3133/OFR20191040".to_string()],
        RelationType::IsCitedBy,
    )
    .await;

    assert_eq!(report.status, UpdateStatus::AllAccountedFor);
}

#[tokio::test]
async fn test_apply_relationships_fetch_failure_is_reported() {
    let registry = FakeRegistry::with_records(Vec::new());

    let report = apply_relationships(
        &registry,
        "10.5066/MISSING1",
        &["10.3133/OFR20191040".to_string()],
        RelationType::IsCitedBy,
    )
    .await;

    assert!(matches!(report.status, UpdateStatus::Failed(_)));
}

#[tokio::test]
async fn test_apply_relationships_update_failure_is_reported() {
    let mut registry = FakeRegistry::with_records(vec![empty_record("10.5066/P9LYUFRH")]);
    registry.fail_update = true;

    let report = apply_relationships(
        &registry,
        "10.5066/P9LYUFRH",
        &["10.3133/OFR20191040".to_string()],
        RelationType::IsCitedBy,
    )
    .await;

    let UpdateStatus::Failed(message) = report.status else {
        panic!("expected failed status");
    };
    assert!(message.contains("service unavailable"));
}

#[tokio::test]
async fn test_push_relationships_one_failure_never_blocks_siblings() {
    let registry = FakeRegistry::with_records(vec![empty_record("10.5066/F7PG1PWZ")]);
    let records = vec![
        RelationshipRecord {
            subject_doi: "10.5066/MISSING1".to_string(),
            subject_identifier_url: "https://doi.org/10.5066/MISSING1".to_string(),
            related: vec![RelatedIdentifier::doi(
                "https://doi.org/10.1111/EVA.12645",
                RelationType::IsCitedBy,
            )],
        },
        RelationshipRecord {
            subject_doi: "10.5066/F7PG1PWZ".to_string(),
            subject_identifier_url: "https://doi.org/10.5066/F7PG1PWZ".to_string(),
            related: vec![RelatedIdentifier::doi(
                "https://doi.org/10.1111/EVA.12645",
                RelationType::IsCitedBy,
            )],
        },
    ];

    let reports = push_relationships(&registry, &records, RelationType::IsCitedBy).await;

    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].status, UpdateStatus::Failed(_)));
    assert_eq!(reports[1].status, UpdateStatus::Updated);

    // The related DOI is recovered from the entry's URL form before merging.
    let stored = registry.stored("10.5066/F7PG1PWZ").expect("record submitted");
    assert_eq!(
        stored.related_identifiers[0].related_identifier,
        "https://doi.org/10.1111/EVA.12645"
    );
}
