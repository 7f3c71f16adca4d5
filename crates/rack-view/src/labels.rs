//! Date labels shown next to each document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rack_types::Node;

use crate::time::TimeFormatter;

/// Placeholder for documents without a publication date.
pub const NOT_AVAILABLE: &str = "Not available";

/// Which rendering a date label currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    #[default]
    Relative,
    /// While hovered
    Absolute,
}

/// Rendered date line for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLabel {
    /// e.g. "Published 7 days ago"
    pub text: String,
    /// Absolute date-time, None when not available
    pub tooltip: Option<String>,
    /// e.g. "#ai #ml"
    pub tags: Option<String>,
}

/// Label for a document's publication date.
pub fn publication_label(
    formatter: &TimeFormatter,
    document: &Node,
    mode: DateMode,
    now: DateTime<Utc>,
) -> DateLabel {
    let tags = document.tags_label();
    let Some(published) = document.published_at else {
        return DateLabel {
            text: NOT_AVAILABLE.to_string(),
            tooltip: None,
            tags,
        };
    };

    let absolute = formatter.format_absolute(published);
    let when = match mode {
        DateMode::Relative => formatter.format(published, now),
        DateMode::Absolute => absolute.clone(),
    };

    DateLabel {
        text: format!("Published {}", when),
        tooltip: Some(absolute),
        tags,
    }
}

/// Label for the directory refresh time, e.g. "Refreshed 2 hours ago".
pub fn refreshed_label(
    formatter: &TimeFormatter,
    refreshed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateLabel {
    match refreshed_at {
        Some(at) => DateLabel {
            text: format!("Refreshed {}", formatter.format(at, now)),
            tooltip: Some(formatter.format_absolute(at)),
            tags: None,
        },
        None => DateLabel {
            text: NOT_AVAILABLE.to_string(),
            tooltip: None,
            tags: None,
        },
    }
}
