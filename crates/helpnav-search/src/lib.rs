//! # helpnav-search
//!
//! Client-side full-text search over a help site's static index.
//!
//! The index is a directory of plain text files produced when the help site
//! is built:
//! - `prefixes.txt` routes word ranges to shard files
//! - each shard maps words to the ids of the topics containing them
//! - `ids.txt` maps topic ids to titles and links
//!
//! A query is split into words, each word is looked up by prefix in its
//! shard, and the topic ids of all words are intersected.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use helpnav_search::{SearchEngine, SearchSession};
//!
//! let engine = SearchEngine::from_settings(&settings)?;
//! let session = SearchSession::new();
//! if let Some(result) = session.run(&engine, "install linux").await {
//!     for hit in result?.hits {
//!         println!("{} -> {}", hit.title, hit.link);
//!     }
//! }
//! ```

pub mod client;
pub mod engine;
pub mod error;
pub mod ids;
pub mod prefixes;
pub mod query;
pub mod session;
pub mod shard;
pub mod source;

pub use client::ClientProfile;
pub use engine::{SearchEngine, SearchOutcome, IDS_FILE, PREFIXES_FILE};
pub use error::SearchError;
pub use prefixes::PrefixRouter;
pub use session::{PublishedSearch, SearchPhase, SearchSession, SearchTicket};
pub use source::{
    source_from_settings, DirShardSource, HttpShardSource, MemoryShardSource, ShardSource,
};
