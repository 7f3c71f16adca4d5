//! Command implementations for the newsrack reader.
//!
//! Handles:
//! - tree: print the visible hierarchy
//! - labels: print publication labels
//! - search: build the index in the background, run a query, print the result

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use rack_search::{SearchIndexBuilder, SearchIndexConfig};
use rack_types::{Directory, HierarchyModel, NodeId, NodeKind, Settings};
use rack_view::{
    ClickTarget, DateLabel, HoverEvent, QueryStatus, ReaderSession, TimeFormatter, VisibilityMap,
};

use crate::cli::InputArgs;

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    input: &InputArgs,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(directory) = &input.directory {
        settings.directory_path = directory.clone();
    }

    Ok(settings)
}

/// Install the global tracing subscriber. Logs go to stderr so `--json`
/// output stays clean.
pub fn init_tracing(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Read and materialize the directory file.
pub fn load_model(path: &Path) -> Result<Arc<HierarchyModel>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read directory file {:?}", path))?;
    let directory = Directory::from_json(&text).context("Failed to parse directory file")?;
    let model = HierarchyModel::from_directory(&directory).context("Invalid directory")?;
    info!(
        path = %path.display(),
        categories = directory.categories.len(),
        documents = model.document_count(),
        "Loaded directory"
    );
    Ok(Arc::new(model))
}

/// Parse `--now`, defaulting to the current instant.
pub fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(text) => Ok(DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("Invalid --now timestamp: {}", text))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Start a reader session with search still pending.
pub fn open_session(settings: &Settings, model: Arc<HierarchyModel>) -> Result<ReaderSession> {
    let formatter =
        TimeFormatter::from_settings(&settings.time).context("Invalid time settings")?;
    Ok(ReaderSession::new(model, formatter, settings.search.clone()))
}

/// Print the tree, expanding everything when asked.
pub fn run_tree(settings: &Settings, input: &InputArgs, expanded: bool) -> Result<()> {
    let model = load_model(&settings.expanded_directory_path())?;
    let now = parse_now(input.now.as_deref())?;
    let mut session = open_session(settings, model)?;

    if expanded {
        expand_all(&mut session)?;
    }

    let mut out = std::io::stdout().lock();
    if input.json {
        write_json(&mut out, session.states())?;
    } else {
        render_tree(&mut out, &session, now)?;
    }
    Ok(())
}

/// One entry of the `labels` output.
#[derive(Debug, Serialize)]
pub struct LabelReport {
    pub id: NodeId,
    pub title: String,
    #[serde(flatten)]
    pub label: DateLabel,
}

pub fn run_labels(settings: &Settings, input: &InputArgs, absolute: bool) -> Result<()> {
    let model = load_model(&settings.expanded_directory_path())?;
    let now = parse_now(input.now.as_deref())?;
    let mut session = open_session(settings, model)?;

    let reports = collect_labels(&mut session, now, absolute)?;

    let mut out = std::io::stdout().lock();
    if input.json {
        write_json(&mut out, &reports)?;
    } else {
        let refreshed = session.refreshed_label(now);
        writeln!(out, "{}", refreshed.text)?;
        for report in &reports {
            write!(out, "{}: {}", report.title, report.label.text)?;
            if let Some(tags) = &report.label.tags {
                write!(out, "  {}", tags)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Labels for every document, in listing order.
pub fn collect_labels(
    session: &mut ReaderSession,
    now: DateTime<Utc>,
    absolute: bool,
) -> Result<Vec<LabelReport>> {
    if absolute {
        let ids: Vec<NodeId> = session.model().documents().map(|d| d.id.clone()).collect();
        for id in &ids {
            session.on_date_hover(id, HoverEvent::Enter, now)?;
        }
    }

    let model = Arc::clone(session.model());
    let reports = session
        .date_labels(now)
        .into_iter()
        .map(|(id, label)| LabelReport {
            title: model.node(&id).map(|n| n.title.clone()).unwrap_or_default(),
            id,
            label,
        })
        .collect();
    Ok(reports)
}

/// Result of the `search` command.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub status: QueryStatus,
    pub message: Option<String>,
    pub states: VisibilityMap,
}

pub async fn run_search(settings: &Settings, input: &InputArgs, query: &str) -> Result<()> {
    let model = load_model(&settings.expanded_directory_path())?;
    let now = parse_now(input.now.as_deref())?;
    let mut session = open_session(settings, Arc::clone(&model))?;

    let report = search(&mut session, settings, model, query).await?;

    let mut out = std::io::stdout().lock();
    if input.json {
        write_json(&mut out, &report)?;
    } else {
        if let Some(message) = &report.message {
            writeln!(out, "{}", message)?;
        }
        render_tree(&mut out, &session, now)?;
    }
    Ok(())
}

/// Build the index off the command thread, then submit `query`.
pub async fn search(
    session: &mut ReaderSession,
    settings: &Settings,
    model: Arc<HierarchyModel>,
    query: &str,
) -> Result<SearchReport> {
    let builder = SearchIndexBuilder::new(SearchIndexConfig::from(&settings.search));
    let index = builder
        .build_in_background(model)
        .await
        .context("Failed to build search index")?;
    session.on_index_ready(index);

    let status = session.on_submit_query(query);
    debug!(query, status = ?status, "Query handled");

    Ok(SearchReport {
        query: query.to_string(),
        status,
        message: session.status().map(str::to_string),
        states: session.states().clone(),
    })
}

/// Open every category and document through the header handlers.
pub fn expand_all(session: &mut ReaderSession) -> Result<()> {
    let model = Arc::clone(session.model());
    for node in model.nodes() {
        match node.kind {
            NodeKind::Category => {
                session.on_category_header_click(&node.id, ClickTarget::Header)?;
            }
            NodeKind::Document => {
                session.on_document_header_click(&node.id)?;
            }
            NodeKind::Article => {}
        }
    }
    Ok(())
}

/// Text rendering of the visible part of the tree.
///
/// `[+]` marks a collapsed node, `[-]` an open one. Children are printed
/// only under open parents.
pub fn render_tree<W: Write>(
    out: &mut W,
    session: &ReaderSession,
    now: DateTime<Utc>,
) -> Result<()> {
    let model = session.model();
    let states = session.states();
    let labels: std::collections::HashMap<NodeId, DateLabel> =
        session.date_labels(now).into_iter().collect();

    for category in model.categories() {
        if !states.is_visible(&category.id) {
            continue;
        }
        let open = states.is_expanded(&category.id);
        writeln!(out, "{} {}", marker(open), category.title)?;
        if !open {
            continue;
        }

        for document in model.children(&category.id) {
            if !states.is_visible(&document.id) {
                continue;
            }
            let open = states.is_expanded(&document.id);
            write!(out, "    {} {}", marker(open), document.title)?;
            if let Some(label) = labels.get(&document.id) {
                write!(out, "  {}", label.text)?;
                if let Some(tags) = &label.tags {
                    write!(out, "  {}", tags)?;
                }
            }
            writeln!(out)?;
            if !open {
                continue;
            }

            for article in model.children(&document.id) {
                if states.is_visible(&article.id) {
                    writeln!(out, "        - {}", article.title)?;
                }
            }
        }
    }
    Ok(())
}

fn marker(open: bool) -> &'static str {
    if open {
        "[-]"
    } else {
        "[+]"
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DIRECTORY: &str = r#"{
        "refreshed_at": 1704672000000,
        "categories": [
            { "name": "Tech", "documents": [
                { "id": "d1", "title": "Weekly Digest", "published_at": 1704067200000,
                  "tags": ["ai", "ml"], "articles": ["Rust adoption grows"] },
                { "id": "d2", "title": "Gadget Review", "articles": ["Phones"] }
            ]},
            { "name": "World News", "documents": [
                { "id": "d3", "title": "Daily Brief", "articles": ["Elections"] }
            ]}
        ]
    }"#;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.time.locale_formatting = false;
        settings.time.utc_offset_minutes = Some(0);
        settings
    }

    fn write_directory() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DIRECTORY.as_bytes()).unwrap();
        file
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
    }

    fn render(session: &ReaderSession) -> String {
        let mut buf = Vec::new();
        render_tree(&mut buf, session, now()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_load_model_from_file() {
        let file = write_directory();
        let model = load_model(file.path()).unwrap();
        assert_eq!(model.document_count(), 3);
        assert!(model.node(&NodeId::from("cat-world-news")).is_some());
    }

    #[test]
    fn test_load_model_missing_file() {
        let err = load_model(Path::new("/nonexistent/directory.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read directory file"));
    }

    #[test]
    fn test_parse_now() {
        assert_eq!(parse_now(Some("2024-01-08T00:00:00Z")).unwrap(), now());
        assert_eq!(parse_now(Some("2024-01-08T01:00:00+01:00")).unwrap(), now());
        assert!(parse_now(Some("last tuesday")).is_err());
    }

    #[test]
    fn test_load_settings_overrides() {
        let input = InputArgs {
            directory: Some("/srv/directory.json".to_string()),
            ..InputArgs::default()
        };
        let settings = load_settings(None, Some("debug"), &input).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.directory_path, "/srv/directory.json");
    }

    #[test]
    fn test_render_collapsed_tree() {
        let file = write_directory();
        let session = open_session(&settings(), load_model(file.path()).unwrap()).unwrap();

        assert_eq!(render(&session), "[+] Tech\n[+] World News\n");
    }

    #[test]
    fn test_render_expanded_tree() {
        let file = write_directory();
        let mut session = open_session(&settings(), load_model(file.path()).unwrap()).unwrap();
        expand_all(&mut session).unwrap();

        let text = render(&session);
        assert!(text.contains("    [-] Weekly Digest  Published 7 days ago  #ai #ml\n"));
        assert!(text.contains("        - Rust adoption grows\n"));
        assert!(text.contains("    [-] Gadget Review  Not available\n"));
    }

    #[tokio::test]
    async fn test_search_narrows_tree() {
        let file = write_directory();
        let settings = settings();
        let model = load_model(file.path()).unwrap();
        let mut session = open_session(&settings, Arc::clone(&model)).unwrap();

        let report = search(&mut session, &settings, model, "rust").await.unwrap();

        assert_eq!(report.status, QueryStatus::Matches(1));
        assert!(report.message.is_none());
        assert_eq!(
            render(&session),
            "[-] Tech\n    [-] Weekly Digest  Published 7 days ago  #ai #ml\n        - Rust adoption grows\n[+] World News\n"
        );
    }

    #[tokio::test]
    async fn test_search_reports_status_message() {
        let file = write_directory();
        let settings = settings();
        let model = load_model(file.path()).unwrap();
        let mut session = open_session(&settings, Arc::clone(&model)).unwrap();

        let report = search(&mut session, &settings, model, "ai").await.unwrap();
        assert_eq!(report.status, QueryStatus::TooShort);
        assert_eq!(
            report.message.as_deref(),
            Some("Search text must be at least 3 characters long.")
        );
    }

    #[test]
    fn test_collect_absolute_labels() {
        let file = write_directory();
        let mut session = open_session(&settings(), load_model(file.path()).unwrap()).unwrap();

        let reports = collect_labels(&mut session, now(), true).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].title, "Weekly Digest");
        assert_eq!(reports[0].label.text, "Published 1/1/2024, 12:00:00 AM");

        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["id"], "d1");
        assert_eq!(json["tags"], "#ai #ml");
    }
}
