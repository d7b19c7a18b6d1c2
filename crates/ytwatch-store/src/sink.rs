//! Staged CSV writer.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::StoreError;

pub const VIDEO_COLUMNS: &[&str] = &[
    "Username",
    "Title",
    "Video_URL",
    "Publish_Date",
    "Has_Comments",
];

pub const COMMENT_COLUMNS: &[&str] = &[
    "Username",
    "Comment",
    "AuthorDisplayName",
    "AuthorProfileImageUrl",
    "AuthorChannelUrl",
    "AuthorChannelId",
    "ReplyCount",
    "LikeCount",
    "PublishedAt",
    "UpdatedAt",
    "CommentId",
    "ParentId",
    "VideoId",
    "VideoDate",
];

/// Returns the staging path used while `target` is being written.
pub(crate) fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

/// Creates the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// CSV writer that always emits its header and publishes on [`CsvSink::finish`].
///
/// Rows are flushed as they are written so the `.partial` file holds a
/// valid prefix if the process dies mid-run.
pub struct CsvSink {
    writer: csv::Writer<File>,
    staging: PathBuf,
    target: PathBuf,
    rows: usize,
}

impl CsvSink {
    /// Opens `<target>.partial` and writes `headers` as the first row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the staging file cannot be created or the
    /// header cannot be written.
    pub fn create(target: impl AsRef<Path>, headers: &[&str]) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        ensure_parent(&target)?;
        let staging = partial_path(&target);
        let file = File::create(&staging).map_err(|e| StoreError::io(&staging, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(headers)
            .map_err(|e| StoreError::csv(&staging, e))?;
        Ok(Self {
            writer,
            staging,
            target,
            rows: 0,
        })
    }

    /// Serializes one record as a row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Csv`] if serialization or the flush fails.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), StoreError> {
        self.writer
            .serialize(record)
            .map_err(|e| StoreError::csv(&self.staging, e))?;
        self.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Writes one row of raw cells.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Csv`] if the write or the flush fails.
    pub fn write_cells<I, S>(&mut self, cells: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer
            .write_record(cells)
            .map_err(|e| StoreError::csv(&self.staging, e))?;
        self.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes and renames the staging file over the target.
    ///
    /// Returns the number of data rows written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the final flush or rename fails.
    pub fn finish(mut self) -> Result<usize, StoreError> {
        self.flush()?;
        drop(self.writer);
        std::fs::rename(&self.staging, &self.target)
            .map_err(|e| StoreError::io(&self.target, e))?;
        Ok(self.rows)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.writer
            .flush()
            .map_err(|e| StoreError::io(&self.staging, e))
    }
}
