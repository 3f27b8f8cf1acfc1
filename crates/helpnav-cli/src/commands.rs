//! Command implementations for helpnav.
//!
//! Each command has an `*_output` function that does the work and returns the
//! text to print, and a thin wrapper that prints it.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use helpnav_search::{ClientProfile, SearchEngine, SearchOutcome, SearchSession};
use helpnav_state::{query_value, StateEncoder, StateField, StateValue, UiState};
use helpnav_toc::{nav_items, KeywordIndex, NavItem, OpenState, TopicTree};
use helpnav_types::{SearchMessages, Settings};

use crate::cli::StateCommands;
use crate::site::{load_keywords, load_tree};

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    site_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(site) = site_override {
        settings.site_root = site.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(settings)
}

/// Install the tracing subscriber; `RUST_LOG` wins over the configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

/// Run a search and render its hits.
pub async fn search_output(
    settings: &Settings,
    query: &[String],
    user_agent: Option<&str>,
    json: bool,
) -> Result<String> {
    let client = user_agent
        .map(ClientProfile::from_user_agent)
        .unwrap_or_default();
    let engine = SearchEngine::from_settings(settings)
        .context("Failed to open search index")?
        .with_client(client);

    let query = query.join(" ");
    info!(source = %engine.source().describe(), "{}", settings.messages.in_progress);

    let session = SearchSession::new();
    let result = session
        .run(&engine, &query)
        .await
        .context("Search was superseded")?;

    match result {
        Ok(outcome) if json => Ok(serde_json::to_string_pretty(&outcome)?),
        Ok(outcome) => Ok(render_hits(&outcome, &settings.messages)),
        Err(e) => match e.user_message(&settings.messages) {
            Some(message) => bail!("{}", message),
            None => Err(e).context("Search failed"),
        },
    }
}

pub async fn run_search(
    settings: &Settings,
    query: &[String],
    user_agent: Option<&str>,
    json: bool,
) -> Result<()> {
    println!("{}", search_output(settings, query, user_agent, json).await?);
    Ok(())
}

/// Numbered hit list, or the not-found message.
pub fn render_hits(outcome: &SearchOutcome, messages: &SearchMessages) -> String {
    if let Some(message) = outcome.message(messages) {
        return message.to_string();
    }
    let mut out = String::new();
    for (i, hit) in outcome.hits.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, hit.title);
        let _ = writeln!(out, "     {}", hit.link);
    }
    let _ = write!(out, "Highlight: {}", outcome.highlight_terms().join(" "));
    out
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

/// Navigation pane view: the visible tree and the state to carry forward.
#[derive(Debug, Serialize)]
pub struct NavView {
    pub items: Vec<NavItem>,
    pub open: Vec<bool>,
    /// Pane width carried in the state, if any
    pub menu_width: Option<u32>,
    /// `param=value` pair for links leaving this page
    pub next_state: String,
}

/// Restore the pane from an encoded state, apply toggles, and re-encode.
pub fn build_nav_view(
    tree: &TopicTree,
    encoder_param: &str,
    page: Option<&str>,
    state: Option<&str>,
    toggle: &[usize],
) -> NavView {
    let mut encoder = StateEncoder::new(encoder_param);
    let restored = state
        .map(|value| state_query(encoder_param, value))
        .and_then(|query| encoder.decode_from_query(&query))
        .unwrap_or_default();

    let default = OpenState::default_for(tree);
    let mut open = match &restored.menu_state {
        Some(delta) => OpenState::from_delta(&default, delta),
        None => default.clone(),
    };
    let selected = tree.active_node(page).map(|node| node.index);
    open.validate(tree, selected);
    for &index in toggle {
        open.toggle(index);
    }
    debug!(selected = ?selected, toggled = toggle.len(), "Prepared navigation state");

    carry_forward(&mut encoder, &restored);
    let delta = open.delta_from(&default);
    encoder.add_producer(StateField::MenuState, move || {
        Some(StateValue::Bits(delta.clone()))
    });

    NavView {
        items: nav_items(tree, &open, page),
        open: open.as_bits().to_vec(),
        menu_width: restored.menu_width,
        next_state: encoder.query_pair(),
    }
}

/// Re-register restored fields so they survive into the next link.
fn carry_forward(encoder: &mut StateEncoder, restored: &UiState) {
    if let Some(tab) = restored.tab {
        encoder.add_producer(StateField::Tab, move || Some(StateValue::Number(tab.into())));
    }
    if let Some(scroll) = restored.scroll {
        encoder.add_producer(StateField::Scroll, move || Some(StateValue::Number(scroll)));
    }
    if let Some(width) = restored.menu_width {
        encoder.add_producer(StateField::MenuWidth, move || {
            Some(StateValue::Number(width.into()))
        });
    }
    if let Some(query) = restored.query.clone() {
        encoder.add_producer(StateField::Query, move || Some(StateValue::Text(query.clone())));
    }
}

/// Accept either a query string or a bare encoded value.
fn state_query(param: &str, value: &str) -> String {
    if value.contains('=') {
        value.to_string()
    } else {
        format!("{}={}", param, value)
    }
}

pub async fn tree_output(
    settings: &Settings,
    page: Option<&str>,
    state: Option<&str>,
    toggle: &[usize],
    all: bool,
    json: bool,
) -> Result<String> {
    let tree = load_tree(settings).await?;
    let view = build_nav_view(&tree, &settings.state_param, page, state, toggle);
    if json {
        return Ok(serde_json::to_string_pretty(&view)?);
    }
    let mut out = render_nav(&view, all);
    let width = view
        .menu_width
        .unwrap_or(settings.layout.initial_menu_width);
    let _ = writeln!(out, "Width: {}px", width);
    let _ = write!(out, "State: {}", view.next_state);
    Ok(out)
}

pub async fn show_tree(
    settings: &Settings,
    page: Option<&str>,
    state: Option<&str>,
    toggle: &[usize],
    all: bool,
    json: bool,
) -> Result<()> {
    println!(
        "{}",
        tree_output(settings, page, state, toggle, all, json).await?
    );
    Ok(())
}

/// Indented tree: `[-]` open, `[+]` closed, `*` marks the current page.
pub fn render_nav(view: &NavView, all: bool) -> String {
    fn walk(out: &mut String, items: &[NavItem], open: &[bool], depth: usize, all: bool) {
        for item in items {
            let marker = match (item.children.is_empty(), open.get(item.node_index)) {
                (true, _) => "   ",
                (false, Some(true)) => "[-]",
                (false, _) => "[+]",
            };
            let current = if item.is_selected { " *" } else { "" };
            let _ = writeln!(
                out,
                "{}{} {} ({}) #{}{}",
                "  ".repeat(depth),
                marker,
                item.title,
                item.link,
                item.node_index,
                current
            );
            let expanded = open.get(item.node_index).copied().unwrap_or(false);
            if expanded || all {
                walk(out, &item.children, open, depth + 1, all);
            }
        }
    }

    let mut out = String::new();
    walk(&mut out, &view.items, &view.open, 0, all);
    out
}

// ---------------------------------------------------------------------------
// keywords
// ---------------------------------------------------------------------------

/// A topic referenced from the keyword index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRef {
    pub title: String,
    pub link: String,
}

/// A keyword with its topics and sub-keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordEntry {
    pub title: String,
    pub topics: Vec<TopicRef>,
    pub children: Vec<KeywordEntry>,
}

/// Keyword tree in display order, limited to keywords starting with `filter`
/// and their sub-keywords.
pub fn keyword_entries(
    keywords: &KeywordIndex,
    tree: &TopicTree,
    filter: Option<&str>,
) -> Vec<KeywordEntry> {
    let filter = filter.map(str::to_lowercase);

    fn collect(
        keywords: &KeywordIndex,
        tree: &TopicTree,
        index: usize,
        filter: Option<&str>,
    ) -> Vec<KeywordEntry> {
        let mut entries = Vec::new();
        for keyword in keywords.children_sorted(index) {
            let matched = filter.map_or(true, |f| keyword.title.to_lowercase().starts_with(f));
            if matched {
                entries.push(KeywordEntry {
                    title: keyword.title.clone(),
                    topics: keywords
                        .topics(keyword.index, tree)
                        .map(|node| TopicRef {
                            title: node.title.clone(),
                            link: node.link.clone(),
                        })
                        .collect(),
                    children: collect(keywords, tree, keyword.index, None),
                });
            } else {
                entries.extend(collect(keywords, tree, keyword.index, filter));
            }
        }
        entries
    }

    match keywords.root() {
        Some(root) => collect(keywords, tree, root.index, filter.as_deref()),
        None => Vec::new(),
    }
}

pub fn render_keywords(entries: &[KeywordEntry]) -> String {
    fn walk(out: &mut String, entries: &[KeywordEntry], depth: usize) {
        let indent = "  ".repeat(depth);
        for entry in entries {
            let _ = writeln!(out, "{}{}", indent, entry.title);
            for topic in &entry.topics {
                let _ = writeln!(out, "{}  - {} ({})", indent, topic.title, topic.link);
            }
            walk(out, &entry.children, depth + 1);
        }
    }

    let mut out = String::new();
    walk(&mut out, entries, 0);
    out
}

pub async fn keywords_output(
    settings: &Settings,
    filter: Option<&str>,
    json: bool,
) -> Result<String> {
    let tree = load_tree(settings).await?;
    let keywords = load_keywords(settings, &tree).await?;

    let entries = keyword_entries(&keywords, &tree, filter);
    if json {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }
    if entries.is_empty() {
        return Ok("No keywords".to_string());
    }
    Ok(render_keywords(&entries))
}

pub async fn show_keywords(settings: &Settings, filter: Option<&str>, json: bool) -> Result<()> {
    println!("{}", keywords_output(settings, filter, json).await?);
    Ok(())
}

// ---------------------------------------------------------------------------
// state
// ---------------------------------------------------------------------------

/// Parse a `0`/`1` string into bits.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => bail!("Invalid menu state bit {:?}, expected 0 or 1", other),
        })
        .collect()
}

pub fn state_output(settings: &Settings, command: StateCommands) -> Result<String> {
    match command {
        StateCommands::Encode {
            tab,
            scroll,
            width,
            query,
            menu_state,
            href,
        } => {
            let mut encoder = StateEncoder::from_settings(settings);
            let restored = UiState {
                tab,
                scroll,
                menu_width: width,
                query,
                menu_state: None,
            };
            carry_forward(&mut encoder, &restored);
            if let Some(bits) = menu_state {
                let bits = parse_bits(&bits)?;
                encoder.add_producer(StateField::MenuState, move || {
                    Some(StateValue::Bits(bits.clone()))
                });
            }

            Ok(match href {
                Some(href) => encoder.next_page_url(&href),
                None => encoder.encode(),
            })
        }
        StateCommands::Decode { value } => {
            let query = state_query(&settings.state_param, &value);
            let encoded = query_value(&query, &settings.state_param).with_context(|| {
                format!("No '{}' parameter in {:?}", settings.state_param, value)
            })?;
            let state = UiState::decode(&encoded).context("Invalid state value")?;
            Ok(serde_json::to_string_pretty(&state)?)
        }
    }
}

pub fn handle_state(settings: &Settings, command: StateCommands) -> Result<()> {
    println!("{}", state_output(settings, command)?);
    Ok(())
}
