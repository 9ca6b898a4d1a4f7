use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::comments::{CommentRecord, PageFetcher, TitleResolver, VideoCommentCollector};
use crate::config::ScrapeConfig;
use crate::error::TransportError;
use crate::youtube::CommentApi;

/// All collected comments, in input video order and page/item order within a video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    records: Vec<CommentRecord>,
}

impl CombinedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommentRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<CommentRecord> {
        self.records
    }

    fn append(&mut self, mut records: Vec<CommentRecord>) {
        self.records.append(&mut records);
    }
}

impl From<Vec<CommentRecord>> for CombinedTable {
    fn from(records: Vec<CommentRecord>) -> Self {
        Self { records }
    }
}

/// Resolved title per video id. Lookups fall back to the id itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleIndex {
    titles: HashMap<String, String>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, video_id: impl Into<String>, title: impl Into<String>) {
        self.titles.insert(video_id.into(), title.into());
    }

    pub fn get(&self, video_id: &str) -> Option<&str> {
        self.titles.get(video_id).map(String::as_str)
    }

    pub fn title_for<'a>(&'a self, video_id: &'a str) -> &'a str {
        self.get(video_id).unwrap_or(video_id)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// What happened to one processed video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSummary {
    pub video_id: String,
    pub video_title: String,
    pub record_count: usize,
    pub error: Option<TransportError>,
}

/// Output of a full aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationRun {
    pub table: CombinedTable,
    pub titles: TitleIndex,
    pub videos: Vec<VideoSummary>,
}

impl AggregationRun {
    /// Number of videos whose collection stopped on a transport error
    pub fn failed_count(&self) -> usize {
        self.videos.iter().filter(|v| v.error.is_some()).count()
    }
}

/// Runs per-video collection over the whole input list
pub struct AggregationEngine {
    resolver: TitleResolver,
    collector: VideoCommentCollector,
    placeholder_prefix: String,
}

impl AggregationEngine {
    pub fn new(api: Arc<dyn CommentApi>, config: &ScrapeConfig) -> Self {
        let fetcher = PageFetcher::new(api.clone(), config.page_size, config.retry);
        Self {
            resolver: TitleResolver::new(api),
            collector: VideoCommentCollector::new(fetcher),
            placeholder_prefix: config.placeholder_prefix.clone(),
        }
    }

    /// Blank ids and unfilled template values are never sent to the API
    pub fn is_valid_video_id(&self, video_id: &str) -> bool {
        let video_id = video_id.trim();
        !video_id.is_empty() && !video_id.starts_with(&self.placeholder_prefix)
    }

    /// Process `video_ids` one at a time, in order.
    ///
    /// A failing video contributes the records fetched before the failure and
    /// never stops the run.
    pub async fn run<S: AsRef<str>>(&self, video_ids: &[S]) -> AggregationRun {
        let mut run = AggregationRun::default();

        for video_id in video_ids.iter().map(|id| id.as_ref().trim()) {
            if !self.is_valid_video_id(video_id) {
                continue;
            }

            let video_title = match run.titles.get(video_id) {
                Some(title) => title.to_string(),
                None => {
                    let title = self.resolver.resolve(video_id).await;
                    run.titles.insert(video_id, title.clone());
                    title
                }
            };
            info!("🎬 Scraping comments from: {}", video_title);

            let outcome = self.collector.collect(video_id, &video_title).await;
            let error = outcome.error().cloned();
            let records = outcome.into_records();

            run.videos.push(VideoSummary {
                video_id: video_id.to_string(),
                video_title: video_title.clone(),
                record_count: records.len(),
                error,
            });

            if !records.is_empty() {
                info!("✅ Collected {} comments from {}", records.len(), video_title);
                run.table.append(records);
            }
        }

        if run.table.is_empty() {
            info!("No comments found.");
        }

        run
    }
}
