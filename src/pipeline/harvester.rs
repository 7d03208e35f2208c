use super::resolver::ChannelResolver;
use crate::youtube::{PlaylistItem, VideoPlatform, MAX_RESULTS_PER_CALL};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of harvesting a set of channels.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub video_ids: Vec<String>,
    pub channels_processed: usize,
    pub channels_skipped: usize,
    pub channels_truncated: usize,
}

/// Walks every channel's uploads collection and collects its video ids.
pub struct VideoIdHarvester {
    platform: Arc<dyn VideoPlatform>,
    resolver: ChannelResolver,
}

impl VideoIdHarvester {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self {
            resolver: ChannelResolver::new(platform.clone()),
            platform,
        }
    }

    pub async fn harvest_all(&self, channel_ids: &[String]) -> Vec<String> {
        self.harvest_with_report(channel_ids).await.video_ids
    }

    /// Harvest each distinct channel once, in input order.
    ///
    /// Unresolvable channels are skipped; a failing page ends that channel but keeps
    /// the ids already collected from it.
    pub async fn harvest_with_report(&self, channel_ids: &[String]) -> HarvestReport {
        let mut report = HarvestReport::default();
        let mut seen = HashSet::new();

        for channel_id in channel_ids.iter().filter(|id| seen.insert(*id)) {
            info!("📺 Processing channel: {}", channel_id);

            let channel = match self.resolver.resolve(channel_id).await {
                Ok(channel) => channel,
                Err(e) => {
                    warn!("Skipping channel {}: {}", channel_id, e);
                    report.channels_skipped += 1;
                    continue;
                }
            };

            let complete = self
                .collect_uploads(&channel.uploads_collection_id, &mut report.video_ids)
                .await;
            if !complete {
                report.channels_truncated += 1;
            }
            report.channels_processed += 1;
        }

        info!(
            "🔍 Harvested {} video ids from {} channels ({} skipped)",
            report.video_ids.len(),
            report.channels_processed,
            report.channels_skipped
        );
        report
    }

    /// Append every id of an uploads collection; returns false when a page failed.
    async fn collect_uploads(&self, uploads_id: &str, video_ids: &mut Vec<String>) -> bool {
        let mut page_token: Option<String> = None;
        let mut page_count = 1;

        loop {
            debug!("Fetching page {} of {}", page_count, uploads_id);

            let page = match self
                .platform
                .list_playlist_items(uploads_id, page_token.as_deref(), MAX_RESULTS_PER_CALL)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Error fetching page {} of {}: {}. Skipping rest of this channel.",
                        page_count, uploads_id, e
                    );
                    return false;
                }
            };

            video_ids.extend(
                page.items
                    .iter()
                    .filter_map(PlaylistItem::video_id)
                    .map(String::from),
            );

            match page.next_page_token {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    warn!("Upstream repeated page token for {}, stopping", uploads_id);
                    return true;
                }
                Some(next) => {
                    page_token = Some(next);
                    page_count += 1;
                }
                None => {
                    debug!("Reached the end of {} after {} pages", uploads_id, page_count);
                    return true;
                }
            }
        }
    }
}
