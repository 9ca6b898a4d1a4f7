/// Remote collaborator surface for the YouTube Data API
///
/// Two logical operations are needed: title lookup by video id and
/// cursor-paginated listing of top-level comment threads.

pub mod client;
pub mod models;

pub use client::YouTubeClient;
pub use models::{CommentSnippet, CommentThreadPage};

use crate::error::ApiError;
use async_trait::async_trait;

/// Trait for comment API backends
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Title of a video, `None` when the id matches no video
    async fn video_title(&self, video_id: &str) -> Result<Option<String>, ApiError>;

    /// One page of top-level comment threads. `page_token` is `None` for the first page.
    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadPage, ApiError>;
}
