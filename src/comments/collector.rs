use super::fetcher::PageFetcher;
use super::CommentRecord;
use crate::error::TransportError;
use futures::{pin_mut, StreamExt};
use tracing::{debug, error};

/// Result of draining one video's comment listing
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionOutcome {
    /// Every page was fetched. May hold zero records.
    Complete(Vec<CommentRecord>),
    /// A page failed; `records` holds everything from the pages before it.
    Failed {
        records: Vec<CommentRecord>,
        error: TransportError,
    },
}

impl CollectionOutcome {
    pub fn records(&self) -> &[CommentRecord] {
        match self {
            CollectionOutcome::Complete(records) => records,
            CollectionOutcome::Failed { records, .. } => records,
        }
    }

    pub fn into_records(self) -> Vec<CommentRecord> {
        match self {
            CollectionOutcome::Complete(records) => records,
            CollectionOutcome::Failed { records, .. } => records,
        }
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            CollectionOutcome::Complete(_) => None,
            CollectionOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CollectionOutcome::Complete(_))
    }
}

/// Drains the page stream for a single video into comment records
#[derive(Clone)]
pub struct VideoCommentCollector {
    fetcher: PageFetcher,
}

impl VideoCommentCollector {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Collect all top-level comments of `video_id`, stamping `video_title` on each record.
    pub async fn collect(&self, video_id: &str, video_title: &str) -> CollectionOutcome {
        let pages = self.fetcher.pages(video_id);
        pin_mut!(pages);

        let mut records = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            match page {
                Ok(items) => {
                    page_count += 1;
                    records.extend(
                        items
                            .into_iter()
                            .map(|snippet| CommentRecord::from_snippet(snippet, video_id, video_title)),
                    );
                    debug!("📄 {}: page {} done, {} comments so far", video_title, page_count, records.len());
                }
                Err(e) => {
                    let status = e
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "without status".to_string());
                    error!("An HTTP error {} occurred for {}: {}", status, video_title, e.detail);
                    return CollectionOutcome::Failed { records, error: e };
                }
            }
        }

        CollectionOutcome::Complete(records)
    }
}
