//! Client capability detection.
//!
//! Some browsers refuse to read files next to a page opened from disk, which
//! makes a local help site unsearchable for them.

use serde::{Deserialize, Serialize};

/// Classification of the client running the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientProfile {
    /// Chrome and other Chromium-based browsers
    Chrome,
    /// Opera with its version
    Opera { major: u32, minor: u32 },
    /// Any client able to read local files
    #[default]
    Other,
}

impl ClientProfile {
    /// Classify a user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();

        if ua.contains("opera") {
            let version = after(&ua, "version/")
                .or_else(|| after(&ua, "opera/"))
                .or_else(|| after(&ua, "opera "));
            let (major, minor) = version.map(parse_version).unwrap_or((0, 0));
            return Self::Opera { major, minor };
        }
        if let Some(version) = after(&ua, "opr/") {
            let (major, minor) = parse_version(version);
            return Self::Opera { major, minor };
        }
        if ua.contains("chrome/") || ua.contains("chromium/") {
            return Self::Chrome;
        }
        Self::Other
    }

    /// Whether this client cannot fetch index files from a local site.
    pub fn blocks_local_fetch(&self) -> bool {
        match *self {
            Self::Chrome => true,
            Self::Opera { major, minor } => (major, minor) >= (12, 2),
            Self::Other => false,
        }
    }
}

fn after<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    haystack
        .find(marker)
        .map(|pos| &haystack[pos + marker.len()..])
}

/// Parse a leading `major.minor` version; missing parts are zero.
fn parse_version(text: &str) -> (u32, u32) {
    let mut parts = text
        .split(|c: char| !c.is_ascii_digit())
        .map(|part| part.parse::<u32>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    (major, minor)
}
