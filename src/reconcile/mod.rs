//! Reconciliation: pair deduplication, DOI validation, and relationship
//! record construction.
//!
//! Mentions flow in from extraction, get projected to unique
//! (subject, object) DOI pairs, every unique DOI is probed once for
//! resolvability, pairs containing unresolvable members are dropped, and the
//! survivors are grouped into schema-shaped relationship records for
//! registry write-back.

mod resolver;

pub use resolver::{DoiResolver, HttpDoiResolver};

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doi::doi_url;
use crate::extract::Mention;
use crate::registry::{RelatedIdentifier, RelationType};

/// A (subject DOI, object DOI) pair projected from a mention.
///
/// For literature mentions the subject is the publication's own DOI and the
/// object is the found term; [`RelationPair::swap`] flips orientation when a
/// flow targets the dataset side instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationPair {
    /// DOI the relationship record will be keyed on.
    pub subject_doi: String,
    /// DOI related to the subject.
    pub object_doi: String,
}

impl RelationPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(subject_doi: impl Into<String>, object_doi: impl Into<String>) -> Self {
        Self {
            subject_doi: subject_doi.into(),
            object_doi: object_doi.into(),
        }
    }

    /// Flips subject and object.
    #[must_use]
    pub fn swap(self) -> Self {
        Self {
            subject_doi: self.object_doi,
            object_doi: self.subject_doi,
        }
    }
}

/// Classification of every unique DOI probed in one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// DOIs whose probe succeeded.
    pub resolved: HashSet<String>,
    /// DOIs whose probe failed, in first-seen order.
    pub unresolved: Vec<String>,
}

/// One record per subject DOI with at least one surviving related DOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// The subject DOI.
    pub subject_doi: String,
    /// The subject DOI in `https://doi.org/...` form.
    pub subject_identifier_url: String,
    /// Validated related identifiers, sorted by URL.
    pub related: Vec<RelatedIdentifier>,
}

/// Projects mentions to unique relation pairs.
///
/// Uniqueness is on the pair's field values only, not on any ancillary
/// mention metadata. Mentions without a document DOI cannot form a pair and
/// are skipped. Output is sorted for deterministic downstream behavior.
#[must_use]
pub fn dedupe_pairs(mentions: &[Mention]) -> Vec<RelationPair> {
    let unique: BTreeSet<RelationPair> = mentions
        .iter()
        .filter_map(|mention| {
            mention
                .document_doi
                .as_ref()
                .map(|doc_doi| RelationPair::new(doc_doi.clone(), mention.found_term.clone()))
        })
        .collect();
    let pairs: Vec<RelationPair> = unique.into_iter().collect();
    debug!(
        mention_count = mentions.len(),
        pair_count = pairs.len(),
        "deduplicated mention pairs"
    );
    pairs
}

/// Probes every unique DOI once and classifies it.
///
/// A DOI already classified in this call is never re-probed; resolution is
/// idempotent and cached for the call's lifetime. A probe failure classifies
/// that single DOI as unresolved and never aborts the batch.
pub async fn resolve_many<I, S>(resolver: &dyn DoiResolver, dois: I) -> ResolutionReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ResolutionReport::default();
    let mut seen: HashSet<String> = HashSet::new();
    for doi in dois {
        let doi = doi.as_ref().to_string();
        if !seen.insert(doi.clone()) {
            continue;
        }
        if resolver.resolves(&doi).await {
            report.resolved.insert(doi);
        } else {
            report.unresolved.push(doi);
        }
    }
    debug!(
        resolved = report.resolved.len(),
        unresolved = report.unresolved.len(),
        "classified DOI resolvability"
    );
    report
}

/// Validates both members of every pair, dropping pairs with an unresolvable
/// member.
///
/// Returns the surviving pairs along with the full resolution report.
pub async fn validate_pairs(
    resolver: &dyn DoiResolver,
    pairs: Vec<RelationPair>,
) -> (Vec<RelationPair>, ResolutionReport) {
    let unique_dois: BTreeSet<&str> = pairs
        .iter()
        .flat_map(|pair| [pair.subject_doi.as_str(), pair.object_doi.as_str()])
        .collect();
    let report = resolve_many(resolver, unique_dois).await;
    let kept: Vec<RelationPair> = pairs
        .into_iter()
        .filter(|pair| {
            report.resolved.contains(&pair.subject_doi)
                && report.resolved.contains(&pair.object_doi)
        })
        .collect();
    (kept, report)
}

/// Groups validated pairs into relationship records.
///
/// A related DOI survives only when both it and its subject are in the
/// resolved set; a record is emitted only when at least one related DOI
/// survives. The relation type is the fixed constant supplied by the call
/// site, never inferred from content.
#[must_use]
pub fn build_relationships(
    pairs: &[RelationPair],
    resolved: &HashSet<String>,
    relation_type: RelationType,
) -> Vec<RelationshipRecord> {
    let mut by_subject: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for pair in pairs {
        if resolved.contains(&pair.subject_doi) && resolved.contains(&pair.object_doi) {
            by_subject
                .entry(pair.subject_doi.as_str())
                .or_default()
                .insert(pair.object_doi.as_str());
        }
    }

    by_subject
        .into_iter()
        .filter(|(_, related)| !related.is_empty())
        .map(|(subject, related)| RelationshipRecord {
            subject_doi: subject.to_string(),
            subject_identifier_url: doi_url(subject),
            related: related
                .into_iter()
                .map(|object| RelatedIdentifier::doi(doi_url(object), relation_type))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Confidence;

    fn mention(document_doi: Option<&str>, found_term: &str) -> Mention {
        Mention {
            document_id: "doc".to_string(),
            document_doi: document_doi.map(ToString::to_string),
            found_term: found_term.to_string(),
            matched_text: String::new(),
            confidence: Confidence::MostCertain,
        }
    }

    #[test]
    fn test_dedupe_pairs_removes_exact_duplicates() {
        let mentions = vec![
            mention(Some("10.1111/A"), "10.5066/B"),
            mention(Some("10.1111/A"), "10.5066/B"),
            mention(Some("10.1111/A"), "10.5066/C"),
        ];
        let pairs = dedupe_pairs(&mentions);
        assert_eq!(
            pairs,
            vec![
                RelationPair::new("10.1111/A", "10.5066/B"),
                RelationPair::new("10.1111/A", "10.5066/C"),
            ]
        );
    }

    #[test]
    fn test_dedupe_pairs_skips_mentions_without_document_doi() {
        let mentions = vec![
            mention(None, "10.5066/B"),
            mention(Some("10.1111/A"), "10.5066/B"),
        ];
        assert_eq!(dedupe_pairs(&mentions).len(), 1);
    }

    #[test]
    fn test_relation_pair_swap() {
        let pair = RelationPair::new("10.1111/A", "10.5066/B").swap();
        assert_eq!(pair, RelationPair::new("10.5066/B", "10.1111/A"));
    }

    #[test]
    fn test_build_relationships_drops_unresolved_members() {
        let pairs = vec![
            RelationPair::new("10.1111/A", "10.5066/B"),
            RelationPair::new("10.1111/A", "10.5066/C"),
        ];
        let resolved: HashSet<String> = ["10.1111/A", "10.5066/C"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let records = build_relationships(&pairs, &resolved, RelationType::References);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject_doi, "10.1111/A");
        assert_eq!(
            records[0].subject_identifier_url,
            "https://doi.org/10.1111/A"
        );
        assert_eq!(records[0].related.len(), 1);
        assert_eq!(
            records[0].related[0].related_identifier,
            "https://doi.org/10.5066/C"
        );
        assert_eq!(records[0].related[0].relation_type, "REFERENCES");
    }

    #[test]
    fn test_build_relationships_unresolved_subject_emits_nothing() {
        let pairs = vec![RelationPair::new("10.1111/A", "10.5066/B")];
        let resolved: HashSet<String> = ["10.5066/B"].iter().map(ToString::to_string).collect();
        assert!(build_relationships(&pairs, &resolved, RelationType::IsCitedBy).is_empty());
    }

    #[test]
    fn test_build_relationships_groups_by_subject() {
        let pairs = vec![
            RelationPair::new("10.5066/D", "10.1111/A"),
            RelationPair::new("10.5066/D", "10.2222/B"),
            RelationPair::new("10.5066/E", "10.1111/A"),
        ];
        let resolved: HashSet<String> = ["10.5066/D", "10.5066/E", "10.1111/A", "10.2222/B"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let records = build_relationships(&pairs, &resolved, RelationType::IsCitedBy);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject_doi, "10.5066/D");
        assert_eq!(records[0].related.len(), 2);
        assert_eq!(records[1].subject_doi, "10.5066/E");
    }
}
