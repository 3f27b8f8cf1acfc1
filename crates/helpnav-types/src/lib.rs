//! # helpnav-types
//!
//! Shared domain types for the helpnav help-system viewer.
//!
//! This crate defines the data structures used throughout the workspace:
//! - Menu and index data: the flat arrays a generated help site ships for
//!   its table of contents and keyword index
//! - Search types: prefix buckets routing tokens to index shards, and
//!   resolved search hits
//! - Settings: layered configuration and user-facing search messages
//!
//! ## Usage
//!
//! ```rust
//! use helpnav_types::{MenuData, Settings};
//!
//! let settings = Settings::default();
//! assert_eq!(settings.search_dir, "de_search");
//! ```

pub mod config;
pub mod error;
pub mod search;
pub mod topic;

pub use config::{LayoutSettings, SearchMessages, Settings};
pub use error::HelpError;
pub use search::{PrefixBucket, SearchHit};
pub use topic::{IndexData, MenuData};
