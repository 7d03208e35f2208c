//! Catalog build stages: channel resolution, id harvesting and duration filtering.

pub mod filter;
pub mod harvester;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use filter::{DurationFilter, FilterReport};
pub use harvester::{HarvestReport, VideoIdHarvester};
pub use resolver::ChannelResolver;

use crate::catalog::{write_catalog, VideoRecord};
use crate::youtube::VideoPlatform;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Summary of one harvest-and-filter run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub channels_processed: usize,
    pub channels_skipped: usize,
    pub videos_seen: usize,
    pub shorts_kept: usize,
    pub failed_batches: usize,
    pub elapsed_secs: f64,
}

/// Runs harvesting then filtering and persists the raw catalog.
pub struct CatalogBuilder {
    harvester: VideoIdHarvester,
    filter: DurationFilter,
}

impl CatalogBuilder {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self {
            harvester: VideoIdHarvester::new(platform.clone()),
            filter: DurationFilter::new(platform),
        }
    }

    /// Harvest and filter without touching the filesystem.
    pub async fn collect(&self, channel_ids: &[String]) -> (Vec<VideoRecord>, BuildReport) {
        let start = Instant::now();

        let harvest = self.harvester.harvest_with_report(channel_ids).await;
        let filtered = self.filter.filter_with_report(&harvest.video_ids).await;

        let report = BuildReport {
            channels_processed: harvest.channels_processed,
            channels_skipped: harvest.channels_skipped,
            videos_seen: harvest.video_ids.len(),
            shorts_kept: filtered.records.len(),
            failed_batches: filtered.failed_batches,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };

        (filtered.records, report)
    }

    /// Build the raw catalog and write it to `output`.
    ///
    /// The file is written even when nothing was collected.
    pub async fn build(&self, channel_ids: &[String], output: &Path) -> Result<BuildReport> {
        info!("🚀 Building catalog from {} channels", channel_ids.len());

        let (records, report) = self.collect(channel_ids).await;
        write_catalog(output, &records).await?;

        info!(
            "✅ Build finished in {:.1}s: {} shorts out of {} videos",
            report.elapsed_secs, report.shorts_kept, report.videos_seen
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::read_catalog;
    use super::testing::FakePlatform;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_writes_only_shorts() {
        let platform = Arc::new(
            FakePlatform::new()
                .with_channel("UC1", vec![vec!["short", "long"]])
                .with_video("short", "Python in 30 seconds", "PT30S")
                .with_video("long", "Full Python course", "PT4H12M"),
        );
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("raw").join("shorts_db.json");

        let report = CatalogBuilder::new(platform)
            .build(&["UC1".to_string()], &output)
            .await
            .unwrap();

        assert_eq!(report.videos_seen, 2);
        assert_eq!(report.shorts_kept, 1);

        let written = read_catalog(&output).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].video_id, "short");
        assert_eq!(written[0].duration_seconds, 30);
    }

    #[tokio::test]
    async fn test_build_writes_empty_file_when_everything_fails() {
        let platform = Arc::new(FakePlatform::new().with_failing_channel("UC1"));
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("shorts_db.json");

        let report = CatalogBuilder::new(platform)
            .build(&["UC1".to_string()], &output)
            .await
            .unwrap();

        assert_eq!(report.channels_skipped, 1);
        assert!(output.exists());
        assert!(read_catalog(&output).await.unwrap().is_empty());
    }
}
