use crate::config::{RetryPolicy, MAX_PAGE_SIZE};
use crate::error::TransportError;
use crate::youtube::{CommentApi, CommentSnippet};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the next page of a listing begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    Start,
    Token(String),
}

/// A single page of raw comments. `next == None` ends the listing.
#[derive(Debug, Clone)]
pub struct CommentPage {
    pub items: Vec<CommentSnippet>,
    pub next: Option<PageCursor>,
}

enum PageState {
    Next(PageCursor),
    Done,
}

/// Fetches comment pages for one video at a time.
///
/// `fetch` issues exactly one request. `pages` walks the cursor chain and
/// applies the retry policy between attempts.
#[derive(Clone)]
pub struct PageFetcher {
    api: Arc<dyn CommentApi>,
    page_size: u32,
    retry: RetryPolicy,
}

impl PageFetcher {
    pub fn new(api: Arc<dyn CommentApi>, page_size: u32, retry: RetryPolicy) -> Self {
        Self {
            api,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            retry,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Request the page at `cursor`. `video_id` must be non-empty.
    pub async fn fetch(&self, video_id: &str, cursor: &PageCursor) -> Result<CommentPage, TransportError> {
        let token = match cursor {
            PageCursor::Start => None,
            PageCursor::Token(token) => Some(token.as_str()),
        };

        let page = self
            .api
            .comment_threads(video_id, token, self.page_size)
            .await
            .map_err(|e| TransportError::from_api(video_id, &e))?;

        let next = page.continuation().map(|t| PageCursor::Token(t.to_string()));
        Ok(CommentPage {
            items: page.into_comments(),
            next,
        })
    }

    async fn fetch_with_retry(&self, video_id: &str, cursor: &PageCursor) -> Result<CommentPage, TransportError> {
        let mut attempt = 0;
        loop {
            match self.fetch(video_id, cursor).await {
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        "🔁 Page request for {} failed ({}), retry {}/{} in {:?}",
                        video_id, err, attempt, self.retry.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Lazy sequence of pages for `video_id`, starting from the first page.
    ///
    /// Ends after the page without a continuation token, or right after
    /// yielding the first error.
    pub fn pages(&self, video_id: &str) -> impl Stream<Item = Result<Vec<CommentSnippet>, TransportError>> {
        let fetcher = self.clone();
        let video_id = video_id.to_string();

        stream::unfold(PageState::Next(PageCursor::Start), move |state| {
            let fetcher = fetcher.clone();
            let video_id = video_id.clone();
            async move {
                let cursor = match state {
                    PageState::Next(cursor) => cursor,
                    PageState::Done => return None,
                };

                match fetcher.fetch_with_retry(&video_id, &cursor).await {
                    Ok(page) => {
                        debug!("Fetched {} comments for {} ({:?})", page.items.len(), video_id, cursor);
                        let next = match page.next {
                            Some(cursor) => PageState::Next(cursor),
                            None => PageState::Done,
                        };
                        Some((Ok(page.items), next))
                    }
                    Err(err) => Some((Err(err), PageState::Done)),
                }
            }
        })
    }
}
