//! # rack-view
//!
//! Presentation state for the News Rack directory.
//!
//! - Relative "time since published" labels with a manual fallback formatter
//! - Projection of search results onto per-node visibility and expansion
//! - A controller owning that state, driven by header toggles and resets
//! - [`ReaderSession`], the command handlers the listing page is built on
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rack_types::{Directory, HierarchyModel, SearchSettings};
//! use rack_view::{FormatterCapability, QueryStatus, ReaderSession, TimeFormatter};
//!
//! let directory = Directory::from_json(r#"{"categories": []}"#).unwrap();
//! let model = Arc::new(HierarchyModel::from_directory(&directory).unwrap());
//! let formatter = TimeFormatter::new(FormatterCapability::Manual, None);
//! let mut session = ReaderSession::new(model, formatter, SearchSettings::default());
//! assert_eq!(session.on_submit_query("rust"), QueryStatus::NotReady);
//! ```

pub mod controller;
pub mod error;
pub mod labels;
pub mod projector;
pub mod session;
pub mod time;
pub mod visibility;

pub use controller::{ClickTarget, DocumentToggle, JumpOutcome, VisibilityController};
pub use error::ViewError;
pub use labels::{publication_label, refreshed_label, DateLabel, DateMode, NOT_AVAILABLE};
pub use projector::{Projection, ProjectionOutcome, ResultProjector};
pub use session::{HoverEvent, QueryStatus, ReaderSession, SearchControls, SearchSlot};
pub use time::{
    FormatterCapability, ManualRelativeFormatter, PlatformRelativeFormatter, RelativeFormatter,
    RelativeTime, TimeFormatter, TimeUnit,
};
pub use visibility::{VisibilityMap, VisibilityState};
