//! CLI entry point for the citelink tool.

use anyhow::{Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info, warn};

use citelink_core::clients::{
    EventFilter, EventRelation, EventsClient, LiteratureSearchClient, SearchOutcome, SearchStatus,
    related_pairs,
};
use citelink_core::pipeline::{self, PairOrientation};
use citelink_core::reconcile::HttpDoiResolver;

mod cli;

use cli::{Args, Command, RelationArg, StrategyArg};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match args.command {
        Command::Mentions {
            terms,
            strategy,
            no_space_variants,
            search_url,
        } => run_mentions(&terms, strategy, no_space_variants, search_url).await,
        Command::Reconcile {
            terms,
            strategy,
            relation,
            search_url,
            probe_url,
        } => run_reconcile(&terms, strategy, relation, search_url, probe_url).await,
        Command::Events {
            term,
            prefix,
            mailto,
            relation,
            events_url,
            probe_url,
        } => run_events(&term, prefix, &mailto, relation, events_url, probe_url).await,
    }
}

fn literature_client(search_url: Option<String>) -> Result<LiteratureSearchClient> {
    let client = match search_url {
        Some(url) => LiteratureSearchClient::with_base_url(url)?,
        None => LiteratureSearchClient::new()?,
    };
    Ok(client)
}

fn probe_resolver(probe_url: Option<String>) -> Result<HttpDoiResolver> {
    let resolver = match probe_url {
        Some(url) => HttpDoiResolver::with_base_url(url)?,
        None => HttpDoiResolver::new()?,
    };
    Ok(resolver)
}

/// Runs a literature search and fails the command on a transport error.
///
/// A no-data response is not an error; downstream steps see zero records.
async fn search_or_bail(
    client: &LiteratureSearchClient,
    terms: &str,
    account_for_spaces: bool,
) -> Result<SearchOutcome> {
    let outcome = pipeline::search_literature(client, terms, account_for_spaces).await;
    match outcome.status {
        SearchStatus::Error => bail!("literature search failed: {}", outcome.message),
        SearchStatus::NoData => {
            warn!(message = %outcome.message, "literature search returned no data");
        }
        SearchStatus::Success => {
            info!(hits = outcome.hits, records = outcome.records.len(), "literature search done");
        }
    }
    Ok(outcome)
}

async fn run_mentions(
    terms: &str,
    strategy: StrategyArg,
    no_space_variants: bool,
    search_url: Option<String>,
) -> Result<()> {
    let client = literature_client(search_url)?;
    let outcome = search_or_bail(&client, terms, !no_space_variants).await?;
    let mentions = pipeline::mentions_from_records(&outcome.records, terms, &strategy.to_strategy())?;

    info!(mention_count = mentions.len(), "extraction done");
    let output = json!({
        "status": outcome.status,
        "hits": outcome.hits,
        "document_count": outcome.records.len(),
        "mentions": mentions,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_reconcile(
    terms: &str,
    strategy: StrategyArg,
    relation: RelationArg,
    search_url: Option<String>,
    probe_url: Option<String>,
) -> Result<()> {
    let client = literature_client(search_url)?;
    let resolver = probe_resolver(probe_url)?;

    let outcome = search_or_bail(&client, terms, true).await?;
    let mentions = pipeline::mentions_from_records(&outcome.records, terms, &strategy.to_strategy())?;

    // Registry records are keyed on the cited dataset DOI, so the found
    // term becomes the subject and the citing publication the object.
    let report = pipeline::reconcile_mentions(
        &resolver,
        &mentions,
        relation.to_relation_type(),
        PairOrientation::TermAsSubject,
    )
    .await;

    info!(
        record_count = report.records.len(),
        unresolved_count = report.unresolved.len(),
        "reconciliation done"
    );
    let output = json!({
        "status": outcome.status,
        "mention_count": mentions.len(),
        "records": report.records,
        "unresolved": report.unresolved,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_events(
    term: &str,
    prefix: bool,
    mailto: &str,
    relation: RelationArg,
    events_url: Option<String>,
    probe_url: Option<String>,
) -> Result<()> {
    let client = match events_url {
        Some(url) => EventsClient::with_base_url(mailto, url)?,
        None => EventsClient::new(mailto)?,
    };
    let resolver = probe_resolver(probe_url)?;

    let filter = if prefix {
        EventFilter::DoiPrefix
    } else {
        EventFilter::Doi
    };
    let outcome = client.search(term, filter).await;
    if outcome.status == SearchStatus::Error {
        bail!("events search failed: {}", outcome.message);
    }
    info!(hits = outcome.hits, events = outcome.events.len(), "events search done");

    let relations = related_pairs(&outcome.events);
    let pairs: Vec<_> = relations.iter().map(EventRelation::to_pair).collect();
    let report =
        pipeline::reconcile_pairs(&resolver, pairs, relation.to_relation_type()).await;

    info!(
        record_count = report.records.len(),
        unresolved_count = report.unresolved.len(),
        "reconciliation done"
    );
    let output = json!({
        "status": outcome.status,
        "hits": outcome.hits,
        "relation_count": relations.len(),
        "records": report.records,
        "unresolved": report.unresolved,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
