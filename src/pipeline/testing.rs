//! In-memory [`VideoPlatform`] used by the pipeline unit tests.

use crate::error::PlatformError;
use crate::youtube::{
    ChannelContentDetails, ChannelItem, ChannelListResponse, PlaylistItem,
    PlaylistItemListResponse, RelatedPlaylists, VideoContentDetails, VideoItem,
    VideoListResponse, VideoPlatform, VideoSnippet,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakePlatform {
    uploads: HashMap<String, String>,
    pages: HashMap<String, Vec<Vec<String>>>,
    failing_pages: HashSet<(String, usize)>,
    stuck_pages: HashSet<(String, usize)>,
    failing_channels: HashSet<String>,
    videos: HashMap<String, (String, String)>,
    failing_video_calls: HashSet<usize>,
    pub calls: Mutex<RecordedCalls>,
}

#[derive(Debug, Default, Clone)]
pub struct RecordedCalls {
    pub channels: Vec<String>,
    pub pages: Vec<(String, Option<String>, usize)>,
    pub video_batches: Vec<Vec<String>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel whose uploads collection is served in the given pages.
    pub fn with_channel(mut self, channel_id: &str, pages: Vec<Vec<&str>>) -> Self {
        let uploads = format!("UU-{channel_id}");
        self.uploads.insert(channel_id.to_string(), uploads.clone());
        self.pages.insert(
            uploads,
            pages
                .into_iter()
                .map(|page| page.into_iter().map(String::from).collect())
                .collect(),
        );
        self
    }

    pub fn with_failing_channel(mut self, channel_id: &str) -> Self {
        self.failing_channels.insert(channel_id.to_string());
        self
    }

    pub fn with_failing_page(mut self, channel_id: &str, page_index: usize) -> Self {
        self.failing_pages.insert((format!("UU-{channel_id}"), page_index));
        self
    }

    /// Make a page hand back its own token as the next one.
    pub fn with_stuck_page(mut self, channel_id: &str, page_index: usize) -> Self {
        self.stuck_pages.insert((format!("UU-{channel_id}"), page_index));
        self
    }

    pub fn with_video(mut self, video_id: &str, title: &str, duration: &str) -> Self {
        self.videos
            .insert(video_id.to_string(), (title.to_string(), duration.to_string()));
        self
    }

    /// Make the n-th (0-based) `list_videos` call fail.
    pub fn with_failing_video_call(mut self, call_index: usize) -> Self {
        self.failing_video_calls.insert(call_index);
        self
    }

    pub fn recorded(&self) -> RecordedCalls {
        self.calls.lock().unwrap().clone()
    }
}

fn page_index(token: Option<&str>) -> usize {
    token
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, PlatformError> {
        self.calls.lock().unwrap().channels.push(channel_id.to_string());

        if self.failing_channels.contains(channel_id) {
            return Err(PlatformError::Status { status: 503, body: "unavailable".to_string() });
        }

        let items = self
            .uploads
            .get(channel_id)
            .map(|uploads| ChannelItem {
                id: channel_id.to_string(),
                content_details: Some(ChannelContentDetails {
                    related_playlists: RelatedPlaylists { uploads: Some(uploads.clone()) },
                }),
            })
            .into_iter()
            .collect();

        Ok(ChannelListResponse { items })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<PlaylistItemListResponse, PlatformError> {
        self.calls.lock().unwrap().pages.push((
            playlist_id.to_string(),
            page_token.map(String::from),
            max_results,
        ));

        let index = page_index(page_token);
        if self.failing_pages.contains(&(playlist_id.to_string(), index)) {
            return Err(PlatformError::Api { code: 403, message: "quotaExceeded".to_string() });
        }

        let pages = self.pages.get(playlist_id).cloned().unwrap_or_default();
        let items = pages
            .get(index)
            .map(|ids| ids.iter().map(PlaylistItem::for_video).collect())
            .unwrap_or_default();
        let next_page_token = if self.stuck_pages.contains(&(playlist_id.to_string(), index)) {
            Some(format!("page-{index}"))
        } else {
            (index + 1 < pages.len()).then(|| format!("page-{}", index + 1))
        };

        Ok(PlaylistItemListResponse { items, next_page_token })
    }

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, PlatformError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.video_batches.push(video_ids.to_vec());
            calls.video_batches.len() - 1
        };

        if self.failing_video_calls.contains(&call_index) {
            return Err(PlatformError::Status { status: 500, body: "backend error".to_string() });
        }

        let items = video_ids
            .iter()
            .filter_map(|id| {
                self.videos.get(id).map(|(title, duration)| VideoItem {
                    id: id.clone(),
                    content_details: Some(VideoContentDetails { duration: Some(duration.clone()) }),
                    snippet: Some(VideoSnippet {
                        title: title.clone(),
                        published_at: Some("2024-05-01T12:00:00Z".to_string()),
                        channel_id: Some("UCfake".to_string()),
                        channel_title: Some("Fake Channel".to_string()),
                        thumbnails: None,
                    }),
                })
            })
            .collect();

        Ok(VideoListResponse { items })
    }
}
