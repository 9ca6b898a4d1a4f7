//! Scripted in-memory comment API for unit tests.

use crate::error::ApiError;
use crate::youtube::models::{
    CommentSnippet, CommentThread, CommentThreadPage, CommentThreadSnippet, TopLevelComment,
};
use crate::youtube::CommentApi;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted answer to a `comment_threads` call
pub enum PageReply {
    Page(Vec<CommentSnippet>),
    Error(u16),
}

/// Replays scripted page sequences per video and records every call.
#[derive(Default)]
pub struct ScriptedApi {
    titles: HashMap<String, Result<Option<String>, u16>>,
    pages: Mutex<HashMap<String, VecDeque<PageReply>>>,
    pub title_calls: Mutex<Vec<String>>,
    pub page_calls: Mutex<Vec<(String, Option<String>, u32)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, video_id: &str, title: &str) -> Self {
        self.titles.insert(video_id.to_string(), Ok(Some(title.to_string())));
        self
    }

    pub fn with_title_error(mut self, video_id: &str, status: u16) -> Self {
        self.titles.insert(video_id.to_string(), Err(status));
        self
    }

    /// Pages are answered in order; the last `Page` carries no continuation token.
    pub fn with_pages(self, video_id: &str, replies: Vec<PageReply>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(video_id.to_string(), replies.into());
        self
    }

    pub fn page_calls_for(&self, video_id: &str) -> usize {
        self.page_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| id == video_id)
            .count()
    }

    pub fn title_calls_for(&self, video_id: &str) -> usize {
        self.title_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| *id == video_id)
            .count()
    }
}

pub fn comments(prefix: &str, count: usize) -> Vec<CommentSnippet> {
    (0..count)
        .map(|i| CommentSnippet {
            author_display_name: format!("{}-author-{}", prefix, i),
            published_at: format!("2024-01-01T00:00:{:02}Z", i % 60),
            text_original: format!("{} comment {}", prefix, i),
        })
        .collect()
}

fn thread(snippet: CommentSnippet) -> CommentThread {
    CommentThread {
        snippet: CommentThreadSnippet {
            top_level_comment: TopLevelComment { snippet },
        },
    }
}

#[async_trait]
impl CommentApi for ScriptedApi {
    async fn video_title(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        self.title_calls.lock().unwrap().push(video_id.to_string());
        match self.titles.get(video_id) {
            Some(Ok(title)) => Ok(title.clone()),
            Some(Err(status)) => Err(ApiError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(None),
        }
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadPage, ApiError> {
        self.page_calls.lock().unwrap().push((
            video_id.to_string(),
            page_token.map(str::to_string),
            max_results,
        ));

        let mut pages = self.pages.lock().unwrap();
        let queue = pages.entry(video_id.to_string()).or_default();
        match queue.pop_front() {
            Some(PageReply::Page(items)) => {
                let next_page_token = if queue.is_empty() {
                    None
                } else {
                    Some(format!("{}-page-{}", video_id, queue.len()))
                };
                Ok(CommentThreadPage {
                    items: items.into_iter().map(thread).collect(),
                    next_page_token,
                })
            }
            Some(PageReply::Error(status)) => Err(ApiError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(CommentThreadPage::default()),
        }
    }
}
