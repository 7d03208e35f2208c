use crate::catalog::ChannelRef;
use crate::error::ResolveError;
use crate::youtube::VideoPlatform;
use std::sync::Arc;
use tracing::debug;

/// Maps a channel id to its uploads collection.
pub struct ChannelResolver {
    platform: Arc<dyn VideoPlatform>,
}

impl ChannelResolver {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self { platform }
    }

    pub async fn resolve(&self, channel_id: &str) -> Result<ChannelRef, ResolveError> {
        let response = self.platform.list_channels(channel_id).await?;

        let uploads = response
            .items
            .first()
            .and_then(|item| item.uploads_playlist())
            .filter(|uploads| !uploads.is_empty())
            .ok_or_else(|| ResolveError::ChannelNotFound(channel_id.to_string()))?;

        debug!("Channel {} uploads collection: {}", channel_id, uploads);
        Ok(ChannelRef {
            channel_id: channel_id.to_string(),
            uploads_collection_id: uploads.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::youtube::{
        ChannelContentDetails, ChannelItem, ChannelListResponse, PlaylistItemListResponse,
        RelatedPlaylists, VideoListResponse,
    };
    use async_trait::async_trait;

    struct StubPlatform {
        uploads: Option<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl VideoPlatform for StubPlatform {
        async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, PlatformError> {
            if self.fail {
                return Err(PlatformError::Status { status: 500, body: "boom".to_string() });
            }
            let items = self
                .uploads
                .map(|uploads| ChannelItem {
                    id: channel_id.to_string(),
                    content_details: Some(ChannelContentDetails {
                        related_playlists: RelatedPlaylists { uploads: Some(uploads.to_string()) },
                    }),
                })
                .into_iter()
                .collect();
            Ok(ChannelListResponse { items })
        }

        async fn list_playlist_items(
            &self,
            _playlist_id: &str,
            _page_token: Option<&str>,
            _max_results: usize,
        ) -> Result<PlaylistItemListResponse, PlatformError> {
            unreachable!("resolver never lists collections")
        }

        async fn list_videos(&self, _video_ids: &[String]) -> Result<VideoListResponse, PlatformError> {
            unreachable!("resolver never lists videos")
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_uploads_collection() {
        let resolver = ChannelResolver::new(Arc::new(StubPlatform { uploads: Some("UU123"), fail: false }));
        let channel = resolver.resolve("UC123").await.unwrap();
        assert_eq!(channel.channel_id, "UC123");
        assert_eq!(channel.uploads_collection_id, "UU123");
    }

    #[tokio::test]
    async fn test_resolve_without_items_is_not_found() {
        let resolver = ChannelResolver::new(Arc::new(StubPlatform { uploads: None, fail: false }));
        let result = resolver.resolve("UCgone").await;
        assert!(matches!(result, Err(ResolveError::ChannelNotFound(id)) if id == "UCgone"));
    }

    #[tokio::test]
    async fn test_resolve_transport_failure_is_upstream() {
        let resolver = ChannelResolver::new(Arc::new(StubPlatform { uploads: None, fail: true }));
        let result = resolver.resolve("UC123").await;
        assert!(matches!(result, Err(ResolveError::Upstream(_))));
    }
}
