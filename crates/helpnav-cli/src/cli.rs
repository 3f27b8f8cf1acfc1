//! CLI argument parsing for helpnav.
//!
//! Flags override every other configuration source.

use clap::{Parser, Subcommand};

/// Help site navigator
///
/// Browse the topic tree, keyword index and full-text search of a generated
/// help site from the terminal.
#[derive(Parser, Debug)]
#[command(name = "helpnav")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/helpnav/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Help site root: a directory or an http(s) URL
    #[arg(short, long, global = true)]
    pub site: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the site's full-text index
    Search {
        /// Words to search for; every word must match
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Search on behalf of a browser with this user-agent string
        #[arg(long)]
        user_agent: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the navigation tree
    Tree {
        /// Current page; its ancestors are opened and it is marked
        #[arg(short, long)]
        page: Option<String>,

        /// Query string (or bare value) carrying an encoded UI state
        #[arg(long)]
        state: Option<String>,

        /// Toggle these node indices before printing
        #[arg(short, long, value_delimiter = ',')]
        toggle: Vec<usize>,

        /// Include nodes hidden under closed parents
        #[arg(short, long)]
        all: bool,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the keyword index
    Keywords {
        /// Only keywords starting with this text (case-insensitive)
        filter: Option<String>,

        /// Print the keyword tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode or decode the URL state parameter
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

/// State subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StateCommands {
    /// Encode UI state into the query parameter value
    Encode {
        /// Selected tab index
        #[arg(long)]
        tab: Option<u32>,

        /// Navigation pane scroll offset
        #[arg(long)]
        scroll: Option<u64>,

        /// Navigation pane width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Search query
        #[arg(short, long)]
        query: Option<String>,

        /// Open/closed delta bits, e.g. 0110
        #[arg(long)]
        menu_state: Option<String>,

        /// Print a link to this page carrying the state instead of the bare value
        #[arg(long)]
        href: Option<String>,
    },

    /// Decode a query parameter value or a full query string
    Decode {
        /// Encoded value, `key=value` pair or query string
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_search() {
        let cli = Cli::parse_from(["helpnav", "--site", "/srv/help", "search", "install", "linux"]);
        assert_eq!(cli.site.as_deref(), Some("/srv/help"));
        match cli.command {
            Commands::Search { query, json, .. } => {
                assert_eq!(query, vec!["install", "linux"]);
                assert!(!json);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["helpnav", "search"]).is_err());
    }

    #[test]
    fn test_cli_tree_toggles() {
        let cli = Cli::parse_from(["helpnav", "tree", "--page", "install.htm", "-t", "1,3"]);
        match cli.command {
            Commands::Tree { page, toggle, all, .. } => {
                assert_eq!(page.as_deref(), Some("install.htm"));
                assert_eq!(toggle, vec![1, 3]);
                assert!(!all);
            }
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_cli_state_encode() {
        let cli = Cli::parse_from([
            "helpnav",
            "state",
            "encode",
            "--tab",
            "2",
            "--menu-state",
            "0101",
        ]);
        match cli.command {
            Commands::State {
                command: StateCommands::Encode { tab, menu_state, .. },
            } => {
                assert_eq!(tab, Some(2));
                assert_eq!(menu_state.as_deref(), Some("0101"));
            }
            _ => panic!("Expected State Encode command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["helpnav", "keywords", "inst", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Keywords { .. }));
    }
}
