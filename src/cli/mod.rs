//! Command-line interface for movie-search.
//!
//! Without a subcommand the interactive menu starts; the other subcommands
//! answer a single question and exit.

mod commands;
pub mod console;
pub mod render;
pub mod shell;

use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};

use crate::models::SearchKind;

/// Movie search over a relational catalog, with a search log for analytics
#[derive(Parser)]
#[command(name = "movie-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print JSON instead of text where supported
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu (default)
    #[command(alias = "sh")]
    Shell,

    /// List genres and the catalog's release year range
    #[command(alias = "g")]
    Genres,

    /// Show one movie with its genres and cast size
    #[command(alias = "info", alias = "i")]
    Details {
        /// Film ID
        id: i32,
    },

    /// Most repeated searches
    #[command(alias = "top")]
    Popular {
        /// Number of entries to show (defaults to general.stats_limit)
        #[arg(long, short, value_parser = positive_limit())]
        limit: Option<usize>,
    },

    /// Latest distinct searches
    Recent {
        /// Number of entries to show (defaults to general.stats_limit)
        #[arg(long, short, value_parser = positive_limit())]
        limit: Option<usize>,
    },

    /// Count search log entries
    Stats,

    /// List raw search log entries for a day or a search type
    #[command(alias = "h")]
    History {
        /// Day to list, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long, conflicts_with = "kind")]
        date: Option<NaiveDate>,

        /// keyword or genre_year
        #[arg(long)]
        kind: Option<SearchKind>,

        /// Number of entries to show
        #[arg(
            long,
            short,
            default_value_t = crate::constants::limits::DEFAULT_HISTORY_LIMIT,
            value_parser = positive_limit()
        )]
        limit: usize,
    },

    /// Delete old search log entries
    Purge {
        /// Remove entries older than this many days
        #[arg(long)]
        older_than_days: u32,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Check connectivity to both stores
    #[command(alias = "ping")]
    Check,
}

pub use commands::*;

/// Result limits start at 1; the log server reads a zero limit as unlimited.
fn positive_limit() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["movie-search"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn history_parses_typed_filters() {
        let cli =
            Cli::try_parse_from(["movie-search", "history", "--kind", "genre_year", "-l", "3"])
                .unwrap();
        match cli.command {
            Some(Commands::History { date, kind, limit }) => {
                assert!(date.is_none());
                assert_eq!(kind, Some(SearchKind::GenreYear));
                assert_eq!(limit, 3);
            }
            _ => panic!("expected history"),
        }

        let cli = Cli::try_parse_from(["movie-search", "history", "--date", "2024-02-29"]).unwrap();
        match cli.command {
            Some(Commands::History { date, .. }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29));
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn history_filters_are_exclusive() {
        let result = Cli::try_parse_from([
            "movie-search",
            "history",
            "--date",
            "2024-01-01",
            "--kind",
            "keyword",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn purge_requires_age() {
        assert!(Cli::try_parse_from(["movie-search", "purge"]).is_err());

        let cli =
            Cli::try_parse_from(["movie-search", "purge", "--older-than-days", "30", "--yes"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Purge {
                older_than_days: 30,
                yes: true
            })
        ));
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["movie-search", "stats", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn zero_limits_are_rejected() {
        for command in ["popular", "recent", "history"] {
            assert!(Cli::try_parse_from(["movie-search", command, "--limit", "0"]).is_err());
        }

        let cli = Cli::try_parse_from(["movie-search", "recent", "-l", "1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Recent { limit: Some(1) })));
    }
}
