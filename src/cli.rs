//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};

use citelink_core::{MatchStrategy, RelationType};

/// Link scholarly publications to the datasets they cite.
///
/// Citelink searches literature and citation-event APIs for DOI mentions,
/// reconstructs DOIs from degraded snippet text, validates that they
/// resolve, and emits relationship records for DOI-registry write-back.
#[derive(Parser, Debug)]
#[command(name = "citelink")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract DOI mentions from literature snippets
    Mentions {
        /// Comma-separated search terms, e.g. "10.5066,10.4344"
        #[arg(short, long)]
        terms: String,

        /// Extraction strategy
        #[arg(long, value_enum, default_value = "usgs")]
        strategy: StrategyArg,

        /// Disable spaced search-term variants for exact matching
        #[arg(long)]
        no_space_variants: bool,

        /// Override the literature search API base URL
        #[arg(long)]
        search_url: Option<String>,
    },

    /// Extract mentions, validate DOIs, and emit relationship records
    Reconcile {
        /// Comma-separated search terms, e.g. "10.5066,10.4344"
        #[arg(short, long)]
        terms: String,

        /// Extraction strategy
        #[arg(long, value_enum, default_value = "usgs")]
        strategy: StrategyArg,

        /// Relation type written into emitted records
        #[arg(long, value_enum, default_value = "is-cited-by")]
        relation: RelationArg,

        /// Override the literature search API base URL
        #[arg(long)]
        search_url: Option<String>,

        /// Override the DOI resolution probe base URL
        #[arg(long)]
        probe_url: Option<String>,
    },

    /// Query citation events and emit validated relationship records
    Events {
        /// DOI or DOI prefix to query, e.g. "10.5066/P9IGEC9G" or "10.5066"
        #[arg(short, long)]
        term: String,

        /// Treat the term as a DOI prefix instead of a full DOI
        #[arg(long)]
        prefix: bool,

        /// Contact email sent with every events query
        #[arg(short, long)]
        mailto: String,

        /// Relation type written into emitted records
        #[arg(long, value_enum, default_value = "references")]
        relation: RelationArg,

        /// Override the events API base URL
        #[arg(long)]
        events_url: Option<String>,

        /// Override the DOI resolution probe base URL
        #[arg(long)]
        probe_url: Option<String>,
    },
}

/// Extraction strategy selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Literal substring match of each term
    Exact,
    /// Literal match where terms are DOIs (found terms are canonicalized)
    ExactDoi,
    /// Structural reconstruction of fixed-shape USGS data DOIs
    Usgs,
    /// Fixed-width reconstruction for arbitrary 7-character prefixes
    Prefix,
}

impl StrategyArg {
    /// Maps the CLI selector to the library strategy.
    #[must_use]
    pub fn to_strategy(self) -> MatchStrategy {
        match self {
            Self::Exact => MatchStrategy::ExactTerm {
                terms_are_dois: false,
            },
            Self::ExactDoi => MatchStrategy::ExactTerm {
                terms_are_dois: true,
            },
            Self::Usgs => MatchStrategy::UsgsDoi,
            Self::Prefix => MatchStrategy::Prefix,
        }
    }
}

/// Relation type selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationArg {
    IsCitedBy,
    Cites,
    References,
    IsReferencedBy,
}

impl RelationArg {
    /// Maps the CLI selector to the registry relation type.
    #[must_use]
    pub fn to_relation_type(self) -> RelationType {
        match self {
            Self::IsCitedBy => RelationType::IsCitedBy,
            Self::Cites => RelationType::Cites,
            Self::References => RelationType::References,
            Self::IsReferencedBy => RelationType::IsReferencedBy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_mentions_defaults_parse() {
        let args = Args::try_parse_from(["citelink", "mentions", "--terms", "10.5066"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        match args.command {
            Command::Mentions {
                terms,
                strategy,
                no_space_variants,
                search_url,
            } => {
                assert_eq!(terms, "10.5066");
                assert_eq!(strategy, StrategyArg::Usgs);
                assert!(!no_space_variants);
                assert!(search_url.is_none());
            }
            other => panic!("expected mentions command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_reconcile_relation_flag() {
        let args = Args::try_parse_from([
            "citelink",
            "reconcile",
            "--terms",
            "10.5066",
            "--relation",
            "references",
        ])
        .unwrap();
        match args.command {
            Command::Reconcile { relation, .. } => {
                assert_eq!(relation, RelationArg::References);
            }
            other => panic!("expected reconcile command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_events_requires_mailto() {
        let result = Args::try_parse_from(["citelink", "events", "--term", "10.5066"]);
        assert!(result.is_err(), "events without --mailto must be rejected");
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args =
            Args::try_parse_from(["citelink", "-vv", "mentions", "--terms", "10.5066"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_invalid_strategy_rejected() {
        let result = Args::try_parse_from([
            "citelink",
            "mentions",
            "--terms",
            "10.5066",
            "--strategy",
            "fuzzy",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_strategy_arg_mapping() {
        assert_eq!(
            StrategyArg::ExactDoi.to_strategy(),
            MatchStrategy::ExactTerm {
                terms_are_dois: true
            }
        );
        assert_eq!(StrategyArg::Usgs.to_strategy(), MatchStrategy::UsgsDoi);
    }
}
