use crate::youtube::CommentApi;
use std::sync::Arc;
use tracing::warn;

/// Best-effort video title lookup. Falls back to the video id on any failure.
#[derive(Clone)]
pub struct TitleResolver {
    api: Arc<dyn CommentApi>,
}

impl TitleResolver {
    pub fn new(api: Arc<dyn CommentApi>) -> Self {
        Self { api }
    }

    pub async fn resolve(&self, video_id: &str) -> String {
        match self.api.video_title(video_id).await {
            Ok(Some(title)) if !title.trim().is_empty() => title,
            Ok(_) => {
                warn!("No title found for {}, using the video id", video_id);
                video_id.to_string()
            }
            Err(e) => {
                warn!("Could not fetch title for {}: {}", video_id, e);
                video_id.to_string()
            }
        }
    }
}
