//! Integration tests for the helpnav commands against a help site on disk.

use std::fs;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpnav_cli::{keywords_output, search_output, state_output, tree_output, StateCommands};
use helpnav_types::Settings;

const MENU: &str = r#"{
    "names": ["Manual", "Getting Started", "Reference", "Install", "Configure", "Command line"],
    "links": ["index.htm", "start.htm", "reference.htm", "install.htm", "configure.htm", "cli.htm"],
    "child_start": [1, 3, 5, 0, 0, 0],
    "child_end": [3, 5, 6, 0, 0, 0]
}"#;

const INDEX: &str = r#"{
    "keyword_names": ["", "install", "configuration", "linux"],
    "keyword_child_start": [1, 3, 0, 0],
    "keyword_child_end": [3, 4, 0, 0],
    "node_keywords": [1, 3, 2, 2],
    "node_keywords_start": [0, 0, 0, 0, 2, 3],
    "node_keywords_end": [0, 0, 0, 2, 3, 4]
}"#;

/// A help site in a temp directory.
struct TestSite {
    _temp_dir: TempDir,
    settings: Settings,
}

impl TestSite {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        let search = root.join("de_search");
        fs::create_dir_all(&search).unwrap();

        fs::write(root.join("menu.json"), MENU).unwrap();
        fs::write(root.join("index.json"), INDEX).unwrap();
        fs::write(
            search.join("prefixes.txt"),
            "c;COMMAND;CONFIGURE;i;INSTALL;INSTALL;l;LINUX;LINUX",
        )
        .unwrap();
        fs::write(search.join("c.txt"), "COMMAND;3;CONFIGURATION;2;CONFIGURE;2").unwrap();
        fs::write(search.join("i.txt"), "INSTALL;1,2").unwrap();
        fs::write(search.join("l.txt"), "LINUX;1").unwrap();
        fs::write(
            search.join("ids.txt"),
            "\nInstall\ninstall.htm\n\nConfigure\nconfigure.htm\n\nCommand line\ncli.htm\n",
        )
        .unwrap();

        let settings = Settings {
            site_root: root.to_string_lossy().into_owned(),
            ..Settings::default()
        };

        Self {
            _temp_dir: temp_dir,
            settings,
        }
    }
}

fn words(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

#[tokio::test]
async fn test_search_command() {
    let site = TestSite::new();

    let text = search_output(&site.settings, &words("install linux"), None, false)
        .await
        .unwrap();
    assert!(text.contains("1. Install"));
    assert!(!text.contains("Configure"));

    let text = search_output(&site.settings, &words("config"), None, false)
        .await
        .unwrap();
    assert!(text.contains("1. Configure"));

    let text = search_output(&site.settings, &words("install command"), None, false)
        .await
        .unwrap();
    assert_eq!(text, "Nothing was found");
}

#[tokio::test]
async fn test_search_json() {
    let site = TestSite::new();
    let json = search_output(&site.settings, &words("install"), None, true)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tokens"][0], "INSTALL");
    assert_eq!(value["hits"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_local_site_in_chrome() {
    let site = TestSite::new();
    let chrome = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";
    let err = search_output(&site.settings, &words("install"), Some(chrome), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), site.settings.messages.error_local_search);
}

#[tokio::test]
async fn test_search_missing_index() {
    let site = TestSite::new();
    let mut settings = site.settings.clone();
    settings.search_dir = "missing".to_string();
    let err = search_output(&settings, &words("install"), None, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Search failed"));
}

#[tokio::test]
async fn test_tree_command() {
    let site = TestSite::new();
    let text = tree_output(&site.settings, Some("cli.htm"), None, &[], false, false)
        .await
        .unwrap();

    assert!(text.contains("[-] Manual (index.htm) #0"));
    assert!(text.contains("[-] Reference (reference.htm) #2"));
    assert!(text.contains("Command line (cli.htm) #5 *"));
    assert!(text.contains("Width: 300px"));
    assert!(text.lines().last().unwrap().starts_with("State: hs="));
}

#[tokio::test]
async fn test_tree_state_carried_between_pages() {
    let site = TestSite::new();
    let first = tree_output(&site.settings, None, None, &[1], false, false)
        .await
        .unwrap();
    assert!(first.contains("[+] Getting Started"));
    let state = first.lines().last().unwrap().trim_start_matches("State: ");

    let second = tree_output(&site.settings, None, Some(state), &[], false, false)
        .await
        .unwrap();
    assert!(second.contains("[+] Getting Started"));
}

#[tokio::test]
async fn test_keywords_command() {
    let site = TestSite::new();
    let text = keywords_output(&site.settings, None, false).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "configuration");
    assert!(lines.contains(&"  - Command line (cli.htm)"));
    assert!(lines.contains(&"  linux"));

    let filtered = keywords_output(&site.settings, Some("LIN"), false)
        .await
        .unwrap();
    assert_eq!(filtered.trim_end(), "linux\n  - Install (install.htm)");

    let none = keywords_output(&site.settings, Some("zzz"), false)
        .await
        .unwrap();
    assert_eq!(none, "No keywords");
}

#[test]
fn test_state_decode_url_query() {
    let site = TestSite::new();
    let url = state_output(
        &site.settings,
        StateCommands::Encode {
            tab: Some(2),
            scroll: None,
            width: Some(280),
            query: Some("install".into()),
            menu_state: None,
            href: Some("install.htm".into()),
        },
    )
    .unwrap();
    let query = url.split_once('?').unwrap().1.to_string();

    let json = state_output(&site.settings, StateCommands::Decode { value: query }).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tab"], 2);
    assert_eq!(value["menu_width"], 280);
    assert_eq!(value["query"], "install");
    assert!(value.get("scroll").is_none());
}

/// Settings for a site served by `server` under `/manual/`.
async fn remote_site(server: &MockServer) -> Settings {
    for (file, body) in [("menu.json", MENU), ("index.json", INDEX)] {
        Mock::given(method("GET"))
            .and(path(format!("/manual/{}", file)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }
    Settings {
        site_root: format!("{}/manual", server.uri()),
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_tree_from_remote_site() {
    let server = MockServer::start().await;
    let settings = remote_site(&server).await;

    let text = tree_output(&settings, Some("install.htm"), None, &[], false, false)
        .await
        .unwrap();
    assert!(text.contains("[-] Getting Started (start.htm) #1"));
    assert!(text.contains("Install (install.htm) #3 *"));
}

#[tokio::test]
async fn test_keywords_from_remote_site() {
    let server = MockServer::start().await;
    let settings = remote_site(&server).await;

    let filtered = keywords_output(&settings, Some("lin"), false)
        .await
        .unwrap();
    assert_eq!(filtered.trim_end(), "linux\n  - Install (install.htm)");
}

#[tokio::test]
async fn test_remote_site_missing_menu() {
    let server = MockServer::start().await;
    let settings = Settings {
        site_root: format!("{}/manual", server.uri()),
        ..Settings::default()
    };

    let err = tree_output(&settings, None, None, &[], false, false)
        .await
        .unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to load menu data"));
    assert!(message.contains("404"));
}
