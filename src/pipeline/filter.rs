use crate::catalog::{dedup_by_video_id, is_short_duration, VideoRecord};
use crate::youtube::{parse_duration_seconds, VideoItem, VideoPlatform, MAX_RESULTS_PER_CALL};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of filtering a list of ids down to short-form videos.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub records: Vec<VideoRecord>,
    pub batches: usize,
    pub failed_batches: usize,
    pub rejected: usize,
}

/// Fetches metadata in batches and keeps only short-form videos.
pub struct DurationFilter {
    platform: Arc<dyn VideoPlatform>,
}

impl DurationFilter {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self { platform }
    }

    pub async fn filter_shorts(&self, video_ids: &[String]) -> Vec<VideoRecord> {
        self.filter_with_report(video_ids).await.records
    }

    pub async fn filter_with_report(&self, video_ids: &[String]) -> FilterReport {
        let mut report = FilterReport::default();
        let total_batches = video_ids.len().div_ceil(MAX_RESULTS_PER_CALL);

        for (index, batch) in video_ids.chunks(MAX_RESULTS_PER_CALL).enumerate() {
            report.batches += 1;
            debug!("Checking durations for batch {} / {}", index + 1, total_batches);

            let response = match self.platform.list_videos(batch).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Error checking durations for batch {}: {}. Skipping batch.", index + 1, e);
                    report.failed_batches += 1;
                    continue;
                }
            };

            for item in &response.items {
                match to_short_record(item) {
                    Some(record) => report.records.push(record),
                    None => report.rejected += 1,
                }
            }
        }

        report.records = dedup_by_video_id(report.records);
        info!(
            "🎬 Found {} shorts among {} videos ({} batches skipped)",
            report.records.len(),
            video_ids.len(),
            report.failed_batches
        );
        report
    }
}

/// Build a record from a metadata item when its duration is in the short-form window.
fn to_short_record(item: &VideoItem) -> Option<VideoRecord> {
    let duration_seconds = item
        .duration()
        .map(parse_duration_seconds)
        .unwrap_or(crate::youtube::duration::INVALID_DURATION);

    if !is_short_duration(duration_seconds) {
        return None;
    }

    let snippet = item.snippet.as_ref();
    let mut record = VideoRecord::new(
        item.id.clone(),
        snippet.map(|s| s.title.clone()).unwrap_or_default(),
        duration_seconds,
    );
    record.published_at = snippet
        .and_then(|s| s.published_at.as_deref())
        .and_then(|raw| raw.parse::<DateTime<Utc>>().ok());
    record.channel_id = snippet.and_then(|s| s.channel_id.clone());
    record.channel_title = snippet.and_then(|s| s.channel_title.clone());
    record.thumbnail_url = item.thumbnail_url().map(String::from);

    Some(record)
}
