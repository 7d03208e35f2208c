use super::{ChannelListResponse, PlaylistItemListResponse, VideoListResponse, VideoPlatform};
use crate::config::YouTubeConfig;
use crate::error::PlatformError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// YouTube Data API v3 client.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("YouTube API key required"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, PlatformError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                return Err(PlatformError::Api {
                    code: envelope.error.code,
                    message: envelope.error.message,
                });
            }
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| PlatformError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, PlatformError> {
        self.get_json(
            "channels",
            &[
                ("part", "contentDetails".to_string()),
                ("id", channel_id.to_string()),
            ],
        )
        .await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<PlaylistItemListResponse, PlatformError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        self.get_json("playlistItems", &params).await
    }

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, PlatformError> {
        self.get_json(
            "videos",
            &[
                ("part", "contentDetails,snippet".to_string()),
                ("id", video_ids.join(",")),
            ],
        )
        .await
    }
}
