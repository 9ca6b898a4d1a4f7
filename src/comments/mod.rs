/// Per-video comment collection
///
/// `PageFetcher` turns the paginated listing into a lazy page stream,
/// `TitleResolver` supplies a best-effort label and
/// `VideoCommentCollector` drains the stream into `CommentRecord`s.

pub mod collector;
pub mod fetcher;
pub mod title;

pub use collector::{CollectionOutcome, VideoCommentCollector};
pub use fetcher::{CommentPage, PageCursor, PageFetcher};
pub use title::TitleResolver;

use crate::youtube::CommentSnippet;
use serde::{Deserialize, Serialize};

/// One top-level comment, with the video title copied onto every row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub published_at: String,
    pub text: String,
    pub video_id: String,
    pub video_title: String,
}

impl CommentRecord {
    pub fn from_snippet(snippet: CommentSnippet, video_id: &str, video_title: &str) -> Self {
        Self {
            author: snippet.author_display_name,
            published_at: snippet.published_at,
            text: snippet.text_original,
            video_id: video_id.to_string(),
            video_title: video_title.to_string(),
        }
    }
}
