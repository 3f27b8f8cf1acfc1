//! helpnav library exports.
//!
//! This crate provides the `helpnav` command-line viewer for generated help
//! sites.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (search, tree, keywords, state)
//! - `site`: Menu and keyword index loading from a directory or URL

pub mod cli;
pub mod commands;
pub mod site;

pub use cli::{Cli, Commands, StateCommands};
pub use commands::{
    handle_state, init_logging, keywords_output, load_settings, run_search, search_output,
    show_keywords, show_tree, state_output, tree_output,
};
