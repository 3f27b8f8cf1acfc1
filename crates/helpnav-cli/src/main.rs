//! helpnav
//!
//! Browse and search a generated help site from the terminal.
//!
//! # Usage
//!
//! ```bash
//! helpnav --site ./manual search install linux
//! helpnav --site ./manual tree --page install.htm
//! helpnav --site ./manual keywords inst
//! helpnav state encode --tab 1 --query "install linux"
//! helpnav state decode 'hs=AQEBAQ'
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/helpnav/config.toml)
//! 3. Environment variables (HELPNAV_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use helpnav_cli::{
    handle_state, init_logging, load_settings, run_search, show_keywords, show_tree, Cli,
    Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.site.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Search {
            query,
            user_agent,
            json,
        } => {
            run_search(&settings, &query, user_agent.as_deref(), json).await?;
        }
        Commands::Tree {
            page,
            state,
            toggle,
            all,
            json,
        } => {
            show_tree(
                &settings,
                page.as_deref(),
                state.as_deref(),
                &toggle,
                all,
                json,
            )
            .await?;
        }
        Commands::Keywords { filter, json } => {
            show_keywords(&settings, filter.as_deref(), json).await?;
        }
        Commands::State { command } => {
            handle_state(&settings, command)?;
        }
    }

    Ok(())
}
