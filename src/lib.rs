/// Comment Harvest
///
/// Collects every top-level comment of a list of YouTube videos, merges them
/// into a single table and writes it out as CSV with a per-video summary.

pub mod aggregate;
pub mod comments;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types for easy access
pub use crate::aggregate::{AggregationEngine, AggregationRun, CombinedTable, TitleIndex, VideoSummary};
pub use crate::comments::{
    CollectionOutcome, CommentRecord, PageCursor, PageFetcher, TitleResolver, VideoCommentCollector,
};
pub use crate::config::{ApiCredential, Config, ConfigBuilder, RetryPolicy};
pub use crate::error::{ApiError, ConfigError, OutputError, TransportError};
pub use crate::output::CsvWriter;
pub use crate::report::{ReportBuilder, SummaryRow};
pub use crate::youtube::{CommentApi, YouTubeClient};
