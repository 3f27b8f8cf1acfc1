//! Configuration loading for helpnav.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/helpnav/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::HelpError;

/// User-facing texts shown by the search panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMessages {
    /// Shown when a search completes without hits
    #[serde(default = "default_not_found")]
    pub not_found: String,

    /// Shown when the query has no words
    #[serde(default = "default_empty_string")]
    pub empty_string: String,

    /// Shown while a search is running
    #[serde(default = "default_in_progress")]
    pub in_progress: String,

    /// Shown when the client cannot read a local (file:) site
    #[serde(default = "default_error_local_search")]
    pub error_local_search: String,
}

fn default_not_found() -> String {
    "Nothing was found".to_string()
}

fn default_empty_string() -> String {
    "Please, enter a string for search!".to_string()
}

fn default_in_progress() -> String {
    "Searching...".to_string()
}

fn default_error_local_search() -> String {
    "Search in local files is not supported by this browser. Open the help from a web server or use another browser."
        .to_string()
}

impl Default for SearchMessages {
    fn default() -> Self {
        Self {
            not_found: default_not_found(),
            empty_string: default_empty_string(),
            in_progress: default_in_progress(),
            error_local_search: default_error_local_search(),
        }
    }
}

/// Navigation pane layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Navigation pane width used when the URL carries none (pixels)
    #[serde(default = "default_initial_menu_width")]
    pub initial_menu_width: u32,
}

fn default_initial_menu_width() -> u32 {
    300
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            initial_menu_width: default_initial_menu_width(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Help site root: a directory or an http(s) URL
    #[serde(default = "default_site_root")]
    pub site_root: String,

    /// Directory under the site root holding prefixes.txt, shards and ids.txt
    #[serde(default = "default_search_dir")]
    pub search_dir: String,

    /// Menu data file, relative to a local site root unless absolute
    #[serde(default = "default_menu_data")]
    pub menu_data: String,

    /// Keyword index data file, relative to a local site root unless absolute
    #[serde(default = "default_index_data")]
    pub index_data: String,

    /// Query-string key carrying the encoded UI state
    #[serde(default = "default_state_param")]
    pub state_param: String,

    /// Link attached to the placeholder hit when ids.txt is inconsistent
    #[serde(default = "default_support_link")]
    pub support_link: String,

    /// Timeout for each remote index request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Navigation pane layout
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Search panel texts
    #[serde(default)]
    pub messages: SearchMessages,
}

fn default_site_root() -> String {
    ".".to_string()
}

fn default_search_dir() -> String {
    "de_search".to_string()
}

fn default_menu_data() -> String {
    "menu.json".to_string()
}

fn default_index_data() -> String {
    "index.json".to_string()
}

fn default_state_param() -> String {
    "hs".to_string()
}

fn default_support_link() -> String {
    "mailto:support@drexplain.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_root: default_site_root(),
            search_dir: default_search_dir(),
            menu_data: default_menu_data(),
            index_data: default_index_data(),
            state_param: default_state_param(),
            support_link: default_support_link(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            layout: LayoutSettings::default(),
            messages: SearchMessages::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/helpnav/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (HELPNAV_*, nested keys joined by `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, HelpError> {
        let config_dir = ProjectDirs::from("", "", "helpnav")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("site_root", default_site_root())
            .map_err(|e| HelpError::Config(e.to_string()))?
            .set_default("search_dir", default_search_dir())
            .map_err(|e| HelpError::Config(e.to_string()))?
            .set_default("state_param", default_state_param())
            .map_err(|e| HelpError::Config(e.to_string()))?
            .set_default("request_timeout_secs", default_request_timeout_secs() as i64)
            .map_err(|e| HelpError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| HelpError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: HELPNAV_SITE_ROOT, HELPNAV_MESSAGES__NOT_FOUND, etc.
        builder = builder.add_source(
            Environment::with_prefix("HELPNAV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| HelpError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| HelpError::Config(e.to_string()))?;

        settings.validate().map_err(HelpError::Config)?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.site_root.trim().is_empty() {
            return Err("site_root must not be empty".to_string());
        }
        if self.state_param.is_empty()
            || !self
                .state_param
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "state_param must be a non-empty URL-safe key, got {:?}",
                self.state_param
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Whether the site root points at a web server rather than a directory.
    pub fn is_remote_site(&self) -> bool {
        let root = self.site_root.to_ascii_lowercase();
        root.starts_with("http://") || root.starts_with("https://")
    }

    /// Local directory of the site root, with `file://` and `~/` expanded.
    ///
    /// Returns None for remote sites.
    pub fn site_dir(&self) -> Option<PathBuf> {
        if self.is_remote_site() {
            return None;
        }
        let root = self
            .site_root
            .strip_prefix("file://")
            .unwrap_or(&self.site_root);
        if let Some(rest) = root.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new() {
                return Some(home.home_dir().join(rest));
            }
        }
        Some(PathBuf::from(root))
    }

    /// Resolve a data file setting against the local site root.
    pub fn resolve_data_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.site_dir() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search_dir, "de_search");
        assert_eq!(settings.state_param, "hs");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.layout.initial_menu_width, 300);
        assert_eq!(settings.messages.not_found, "Nothing was found");
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.search_dir.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_cli_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helpnav.toml");
        std::fs::write(
            &path,
            r#"
site_root = "https://docs.example.com/manual"
state_param = "ui"

[messages]
not_found = "No topics matched"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(settings.site_root, "https://docs.example.com/manual");
        assert_eq!(settings.state_param, "ui");
        assert_eq!(settings.messages.not_found, "No topics matched");
        // Untouched nested fields keep their defaults
        assert_eq!(settings.messages.in_progress, "Searching...");
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.state_param = "a b".to_string();
        assert!(settings.validate().is_err());

        settings.state_param = "hs".to_string();
        settings.request_timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_remote_site_detection() {
        let mut settings = Settings::default();
        assert!(!settings.is_remote_site());
        assert!(settings.site_dir().is_some());

        settings.site_root = "HTTPS://docs.example.com".to_string();
        assert!(settings.is_remote_site());
        assert!(settings.site_dir().is_none());
    }

    #[test]
    fn test_resolve_data_path() {
        let mut settings = Settings::default();
        settings.site_root = "file:///srv/help".to_string();
        assert_eq!(
            settings.resolve_data_path("menu.json"),
            PathBuf::from("/srv/help/menu.json")
        );
        assert_eq!(
            settings.resolve_data_path("/etc/menu.json"),
            PathBuf::from("/etc/menu.json")
        );
    }

    #[test]
    fn test_messages_serialization() {
        let messages = SearchMessages::default();
        let json = serde_json::to_string(&messages).unwrap();
        let decoded: SearchMessages = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, messages);
    }
}
