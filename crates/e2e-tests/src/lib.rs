//! End-to-end test infrastructure for newsrack.
//!
//! Provides a shared TestHarness and helpers for scenarios covering the
//! full directory -> index -> query -> projection pipeline.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::json;

use rack_search::{DirectoryIndex, SearchIndexBuilder};
use rack_types::{Directory, HierarchyModel, NodeId, SearchSettings};
use rack_view::{FormatterCapability, ReaderSession, TimeFormatter, VisibilityMap};

/// Shared test harness: a model plus a session over it.
pub struct TestHarness {
    pub model: Arc<HierarchyModel>,
    pub session: ReaderSession,
}

impl TestHarness {
    /// Session over `directory` with search still pending.
    pub fn new(directory: serde_json::Value, capability: FormatterCapability) -> Self {
        Self::with_settings(directory, capability, SearchSettings::default())
    }

    pub fn with_settings(
        directory: serde_json::Value,
        capability: FormatterCapability,
        settings: SearchSettings,
    ) -> Self {
        let directory: Directory =
            serde_json::from_value(directory).expect("Failed to parse test directory");
        let model = Arc::new(
            HierarchyModel::from_directory(&directory).expect("Failed to build test hierarchy"),
        );
        let formatter = TimeFormatter::new(capability, FixedOffset::east_opt(0));
        let session = ReaderSession::new(Arc::clone(&model), formatter, settings);
        Self { model, session }
    }

    /// The standard "Tech" directory with search already available.
    pub async fn tech_ready() -> Self {
        let mut harness = Self::new(tech_directory(), FormatterCapability::Platform);
        let index = harness.build_index().await;
        harness.session.on_index_ready(index);
        harness
    }

    /// Build the index the way the reader does, off the command thread.
    pub async fn build_index(&self) -> DirectoryIndex {
        SearchIndexBuilder::default()
            .build_in_background(Arc::clone(&self.model))
            .await
            .expect("Failed to build search index")
    }

    pub fn baseline(&self) -> VisibilityMap {
        VisibilityMap::baseline(&self.model)
    }
}

/// Epoch milliseconds for a UTC midnight.
pub fn epoch_ms(y: i32, m: u32, d: u32) -> i64 {
    utc(y, m, d).timestamp_millis()
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .expect("Invalid test date")
}

pub fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

/// Category "Tech" holding D1 "Weekly Digest" (tags ai, ml; article
/// "Rust adoption grows"; published 2024-01-01) and D2 "Gadget Review",
/// plus a "World" category with one brief.
pub fn tech_directory() -> serde_json::Value {
    json!({
        "refreshed_at": epoch_ms(2024, 1, 8),
        "categories": [
            {
                "name": "Tech",
                "documents": [
                    {
                        "id": "D1",
                        "title": "Weekly Digest",
                        "published_at": epoch_ms(2024, 1, 1),
                        "tags": ["ai", "ml"],
                        "cover_url": "https://covers.example.org/weekly-digest.jpg",
                        "description": "<p>The week in technology</p>",
                        "articles": ["Rust adoption grows"]
                    },
                    {
                        "id": "D2",
                        "title": "Gadget Review",
                        "published_at": epoch_ms(2023, 12, 20),
                        "tags": ["hardware"],
                        "articles": ["Foldable phones tested", "Laptop batteries"]
                    }
                ]
            },
            {
                "name": "World",
                "documents": [
                    {
                        "id": "D3",
                        "title": "Daily Brief",
                        "articles": ["Elections in focus"]
                    }
                ]
            }
        ]
    })
}
