use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::aggregate::{CombinedTable, TitleIndex};

const SEPARATOR_WIDTH: usize = 80;
const TITLE_PREVIEW_CHARS: usize = 60;

/// Comment count for one (video_id, video_title) group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub video_id: String,
    pub video_title: String,
    pub comment_count: usize,
}

/// Per-video summary of a combined table
pub struct ReportBuilder;

impl ReportBuilder {
    /// Group rows by (video_id, video_title) and count them. Rows come back sorted by that key.
    pub fn build(table: &CombinedTable, titles: &TitleIndex) -> Vec<SummaryRow> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for record in table.iter() {
            *counts
                .entry((record.video_id.as_str(), record.video_title.as_str()))
                .or_default() += 1;
        }

        counts
            .into_iter()
            .map(|((video_id, record_title), comment_count)| SummaryRow {
                video_id: video_id.to_string(),
                video_title: titles.get(video_id).unwrap_or(record_title).to_string(),
                comment_count,
            })
            .collect()
    }

    /// Render the final text report, one line per entry
    pub fn render(rows: &[SummaryRow], saved_to: Option<&Path>) -> String {
        let total: usize = rows.iter().map(|row| row.comment_count).sum();
        if total == 0 {
            return "No comments found.".to_string();
        }

        let header = "=".repeat(SEPARATOR_WIDTH);
        let mut lines = vec![
            header.clone(),
            "Final Report: YouTube Comments Scraping".to_string(),
            header.clone(),
        ];
        if let Some(path) = saved_to {
            lines.push(format!("Saved to: {}", path.display()));
        }
        lines.push(format!("Total comments: {}", total));
        lines.push("-".repeat(SEPARATOR_WIDTH));

        for row in rows {
            lines.push(format!("{}: {} comments", row.video_id, row.comment_count));
            lines.push(format!("  Title: {}", elide(&row.video_title, TITLE_PREVIEW_CHARS)));
        }
        lines.push(header);

        lines.join("\n")
    }
}

/// Cut `text` to `max_chars` characters, appending "..." when something was dropped
pub fn elide(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
