use serde::Deserialize;

/// Response of `commentThreads.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadPage {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

impl CommentThreadPage {
    /// Continuation token, with an empty string treated as "no further pages"
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|token| !token.is_empty())
    }

    /// Top-level comment snippets in page order
    pub fn into_comments(self) -> Vec<CommentSnippet> {
        self.items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

/// Raw comment fields as delivered by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub text_original: String,
}

/// Response of `videos.list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub snippet: VideoSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
}

impl VideoListResponse {
    pub fn into_title(self) -> Option<String> {
        self.items.into_iter().next().map(|item| item.snippet.title)
    }
}
