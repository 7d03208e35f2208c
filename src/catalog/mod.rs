//! Catalog data model, persistence and the in-memory store served to queries.

pub mod category;
pub mod persist;
pub mod store;

pub use category::Category;
pub use persist::{read_catalog, write_catalog};
pub use store::{CatalogStore, ShuffleReport};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Largest duration, in whole seconds, still counted as short-form.
///
/// One second above the nominal 60 s threshold to tolerate rounding in the
/// upstream duration encoding.
pub const MAX_SHORT_SECONDS: i64 = 61;

/// A channel and the uploads collection that lists everything it published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    pub channel_id: String,
    pub uploads_collection_id: String,
}

/// One short-form video in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: i64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl VideoRecord {
    /// Record with no enrichment yet.
    pub fn new(video_id: impl Into<String>, title: impl Into<String>, duration_seconds: i64) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            published_at: None,
            duration_seconds,
            category: Category::Other,
            keywords: Vec::new(),
            channel_id: None,
            channel_title: None,
            thumbnail_url: None,
        }
    }
}

/// Acceptance predicate for the short-form window: `0 < seconds <= 61`.
pub fn is_short_duration(seconds: i64) -> bool {
    seconds > 0 && seconds <= MAX_SHORT_SECONDS
}

/// Drop records whose `video_id` was already seen, keeping the first occurrence.
pub fn dedup_by_video_id(records: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.video_id.clone()))
        .collect()
}
