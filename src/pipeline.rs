//! End-to-end orchestration: search, extract, reconcile, write back.
//!
//! Each step is an explicit function over explicit values; the only shared
//! state is the accumulator each call owns. Network collaborators come in as
//! trait objects or clients constructed by the caller.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::clients::{LiteratureSearchClient, SearchOutcome};
use crate::extract::{
    ExtractError, MatchStrategy, Mention, SnippetRecord, collect_mentions, spaced_variants,
    split_terms,
};
use crate::reconcile::{
    DoiResolver, RelationPair, RelationshipRecord, build_relationships, dedupe_pairs,
    validate_pairs,
};
use crate::registry::{RegistryClient, RelationType, UpdateReport, apply_relationships};

/// Which side of a mention pair becomes the relationship subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrientation {
    /// The publication (source document) DOI is the subject.
    DocumentAsSubject,
    /// The found term (dataset DOI) is the subject; used when updating
    /// dataset registry records with the publications citing them.
    TermAsSubject,
}

/// Everything a reconciliation run produced.
#[derive(Debug)]
pub struct ReconcileReport {
    /// Validated, deduplicated relationship records.
    pub records: Vec<RelationshipRecord>,
    /// The validated pairs behind the records.
    pub pairs: Vec<RelationPair>,
    /// DOIs that failed the resolution probe, in first-seen order.
    pub unresolved: Vec<String>,
}

/// Expands a comma-separated term list, optionally adding spaced variants
/// to tolerate page-break splits.
#[must_use]
pub fn expand_search_terms(terms_csv: &str, account_for_spaces: bool) -> Vec<String> {
    let terms = split_terms(terms_csv);
    if !account_for_spaces {
        return terms;
    }
    terms
        .iter()
        .flat_map(|term| spaced_variants(term))
        .collect()
}

/// Searches the literature corpus for every (variant) term.
#[tracing::instrument(skip(client))]
pub async fn search_literature(
    client: &LiteratureSearchClient,
    terms_csv: &str,
    account_for_spaces: bool,
) -> SearchOutcome {
    let terms = expand_search_terms(terms_csv, account_for_spaces);
    client.search_terms(&terms).await
}

/// Extracts mentions from snippet records with the given strategy.
///
/// # Errors
///
/// Returns [`ExtractError`] when the strategy rejects a search term.
pub fn mentions_from_records(
    records: &[SnippetRecord],
    terms_csv: &str,
    strategy: &MatchStrategy,
) -> Result<Vec<Mention>, ExtractError> {
    let terms = match strategy {
        // The structural strategy needs the spaced variants to collapse
        // page-break splits back to the prefix before anchoring.
        MatchStrategy::UsgsDoi => expand_search_terms(terms_csv, true),
        _ => split_terms(terms_csv),
    };
    collect_mentions(records, &terms, strategy)
}

/// Dedupes, validates, and groups mentions into relationship records.
///
/// Resolution probes run once per unique DOI; pairs containing an
/// unresolvable member are dropped, and a record is emitted per surviving
/// subject. A probe failure affects only its own DOI.
#[tracing::instrument(skip(resolver, mentions), fields(mention_count = mentions.len()))]
pub async fn reconcile_mentions(
    resolver: &dyn DoiResolver,
    mentions: &[Mention],
    relation_type: RelationType,
    orientation: PairOrientation,
) -> ReconcileReport {
    let mut pairs = dedupe_pairs(mentions);
    if orientation == PairOrientation::TermAsSubject {
        pairs = pairs.into_iter().map(RelationPair::swap).collect();
        pairs.sort();
    }
    reconcile_pairs(resolver, pairs, relation_type).await
}

/// Validates pre-built pairs and groups them into relationship records.
///
/// Incoming pairs are deduplicated first; event-derived pairs arrive
/// unfiltered and the report must carry each pair once.
pub async fn reconcile_pairs(
    resolver: &dyn DoiResolver,
    pairs: Vec<RelationPair>,
    relation_type: RelationType,
) -> ReconcileReport {
    let unique: BTreeSet<RelationPair> = pairs.into_iter().collect();
    let pairs: Vec<RelationPair> = unique.into_iter().collect();
    let (kept, resolution) = validate_pairs(resolver, pairs).await;
    let records = build_relationships(&kept, &resolution.resolved, relation_type);
    debug!(
        record_count = records.len(),
        unresolved_count = resolution.unresolved.len(),
        "reconciliation finished"
    );
    ReconcileReport {
        records,
        pairs: kept,
        unresolved: resolution.unresolved,
    }
}

/// Pushes relationship records into the registry, one subject at a time.
///
/// Each subject's record is fetched, merged, and submitted independently;
/// one subject's failure never blocks the rest. The related DOI is recovered
/// from each entry's URL form.
#[tracing::instrument(skip(client, records), fields(record_count = records.len()))]
pub async fn push_relationships(
    client: &dyn RegistryClient,
    records: &[RelationshipRecord],
    relation_type: RelationType,
) -> Vec<UpdateReport> {
    let mut reports = Vec::with_capacity(records.len());
    for record in records {
        let related_dois: Vec<String> = record
            .related
            .iter()
            .map(|entry| crate::doi::canonicalize(&entry.related_identifier))
            .collect();
        let report =
            apply_relationships(client, &record.subject_doi, &related_dois, relation_type).await;
        info!(doi = %report.doi, status = ?report.status, "registry write-back");
        reports.push(report);
    }
    reports
}
