//! Video-platform metadata API: the three read-only endpoints the pipeline needs.
//!
//! [`VideoPlatform`] is the seam the pipeline stages are written against;
//! [`YouTubeClient`] is the HTTP implementation of it.

pub mod client;
pub mod duration;

pub use client::YouTubeClient;
pub use duration::parse_duration_seconds;

use crate::error::PlatformError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Upper bound on items per page and ids per metadata request.
pub const MAX_RESULTS_PER_CALL: usize = 50;

/// Read-only access to channel, collection and video metadata.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// `channels` lookup by id, `contentDetails` only.
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, PlatformError>;

    /// One page of an uploads collection, `snippet` part.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<PlaylistItemListResponse, PlatformError>;

    /// Batched video lookup, `contentDetails,snippet` parts, at most 50 ids.
    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, PlatformError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    #[serde(default)]
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

impl ChannelItem {
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.related_playlists.uploads.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn for_video(video_id: impl Into<String>) -> Self {
        Self {
            snippet: Some(PlaylistItemSnippet {
                resource_id: ResourceId {
                    video_id: Some(video_id.into()),
                },
            }),
        }
    }

    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .and_then(|snippet| snippet.resource_id.video_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub content_details: Option<VideoContentDetails>,
    pub snippet: Option<VideoSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl VideoItem {
    pub fn duration(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.duration.as_deref())
    }

    /// Best available thumbnail, largest first.
    pub fn thumbnail_url(&self) -> Option<&str> {
        let thumbnails = self.snippet.as_ref()?.thumbnails.as_ref()?;
        thumbnails
            .high
            .as_ref()
            .or(thumbnails.medium.as_ref())
            .or(thumbnails.default.as_ref())
            .map(|thumbnail| thumbnail.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_response() {
        let json = r#"{
            "kind": "youtube#channelListResponse",
            "items": [{
                "id": "UCsBjURrPoezykLs9EqgamOA",
                "contentDetails": {"relatedPlaylists": {"likes": "", "uploads": "UUsBjURrPoezykLs9EqgamOA"}}
            }]
        }"#;

        let response: ChannelListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items[0].uploads_playlist(), Some("UUsBjURrPoezykLs9EqgamOA"));
    }

    #[test]
    fn test_parse_playlist_page_without_token() {
        let json = r#"{
            "items": [
                {"snippet": {"title": "a", "resourceId": {"kind": "youtube#video", "videoId": "v1"}}},
                {"snippet": {"title": "b", "resourceId": {"kind": "youtube#video", "videoId": "v2"}}}
            ]
        }"#;

        let page: PlaylistItemListResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = page.items.iter().filter_map(PlaylistItem::video_id).collect();
        assert_eq!(ids, vec!["v1", "v2"]);
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_parse_video_item() {
        let json = r#"{
            "items": [{
                "id": "abc",
                "snippet": {
                    "publishedAt": "2024-05-01T12:00:00Z",
                    "channelId": "UC1",
                    "title": "CSS Grid in 60 seconds",
                    "channelTitle": "Coder Coder",
                    "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/abc/default.jpg"}}
                },
                "contentDetails": {"duration": "PT59S", "dimension": "2d"}
            }]
        }"#;

        let response: VideoListResponse = serde_json::from_str(json).unwrap();
        let item = &response.items[0];
        assert_eq!(item.duration(), Some("PT59S"));
        assert_eq!(item.thumbnail_url(), Some("https://i.ytimg.com/vi/abc/default.jpg"));
    }
}
