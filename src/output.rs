use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::aggregate::CombinedTable;
use crate::config::OutputConfig;
use crate::error::OutputError;

/// Writes the combined table as CSV
pub struct CsvWriter {
    output_dir: PathBuf,
    file_name: String,
    include_video_title: bool,
}

impl CsvWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            file_name: config.file_name.clone(),
            include_video_title: config.include_video_title,
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["author", "published_at", "text", "video_id"];
        if self.include_video_title {
            header.push("video_title");
        }
        header
    }

    /// Write all rows to a temp file next to the target, then rename it into place.
    /// Returns the final path.
    pub fn write(&self, table: &CombinedTable) -> Result<PathBuf, OutputError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| OutputError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let target = self.target_path();
        let temp = NamedTempFile::new_in(&self.output_dir).map_err(io_error(&self.output_dir))?;
        let mut writer = csv::Writer::from_writer(temp);

        writer.write_record(self.header())?;
        for record in table.iter() {
            if self.include_video_title {
                writer.write_record([
                    &record.author,
                    &record.published_at,
                    &record.text,
                    &record.video_id,
                    &record.video_title,
                ])?;
            } else {
                writer.write_record([&record.author, &record.published_at, &record.text, &record.video_id])?;
            }
        }

        let temp = writer
            .into_inner()
            .map_err(|e| OutputError::Io {
                path: target.clone(),
                source: e.into_error(),
            })?;
        temp.as_file().sync_all().map_err(io_error(&target))?;
        temp.persist(&target).map_err(|e| OutputError::Io {
            path: target.clone(),
            source: e.error,
        })?;

        info!("💾 Wrote {} rows to {}", table.len(), target.display());
        Ok(target)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError {
    let path = path.to_path_buf();
    move |source| OutputError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CommentRecord;
    use tempfile::TempDir;

    fn sample_table() -> CombinedTable {
        CombinedTable::from(vec![
            CommentRecord {
                author: "@alice".into(),
                published_at: "2024-03-01T12:00:00Z".into(),
                text: "first, with a comma".into(),
                video_id: "abc123".into(),
                video_title: "Test Video".into(),
            },
            CommentRecord {
                author: "@bob".into(),
                published_at: "2024-03-02T08:30:00Z".into(),
                text: "line one\nline two".into(),
                video_id: "abc123".into(),
                video_title: "Test Video".into(),
            },
        ])
    }

    fn config_in(dir: &Path, include_video_title: bool) -> OutputConfig {
        OutputConfig {
            output_dir: dir.join("data").join("raw"),
            include_video_title,
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CsvWriter::new(&config_in(temp_dir.path(), true));

        let path = writer.write(&sample_table()).unwrap();
        assert_eq!(path, temp_dir.path().join("data/raw/comments.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, vec!["author", "published_at", "text", "video_id", "video_title"]);

        let rows: Vec<CommentRecord> = reader.deserialize::<CommentRecord>().map(|r| r.unwrap()).collect();
        assert_eq!(rows, sample_table().into_records());
    }

    #[test]
    fn test_title_column_is_optional() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CsvWriter::new(&config_in(temp_dir.path(), false));

        let path = writer.write(&sample_table()).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 4);
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_overwrites_previous_file_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CsvWriter::new(&config_in(temp_dir.path(), true));

        writer.write(&sample_table()).unwrap();
        let single = CombinedTable::from(vec![sample_table().into_records().remove(0)]);
        let path = writer.write(&single).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 1);

        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
