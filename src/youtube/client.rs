/// YouTube Data API v3 client
use super::models::{CommentThreadPage, VideoListResponse};
use super::CommentApi;
use crate::config::{ApiConfig, ApiCredential};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// `reqwest`-backed implementation of [`CommentApi`]
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    credential: ApiCredential,
}

impl YouTubeClient {
    pub fn new(config: &ApiConfig, credential: ApiCredential) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.credential.expose())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CommentApi for YouTubeClient {
    async fn video_title(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        let response: VideoListResponse = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;
        Ok(response.into_title())
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadPage, ApiError> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        self.get_json("commentThreads", &query).await
    }
}
