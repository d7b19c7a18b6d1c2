//! Comment CSV input and scored CSV output.

use std::path::Path;

use crate::error::StoreError;
use crate::sink::CsvSink;

pub const COMMENT_COLUMN: &str = "Comment";

/// A CSV of comments held in memory, row order preserved.
#[derive(Debug, Clone)]
pub struct CommentTable {
    pub headers: Vec<String>,
    pub comment_index: usize,
    pub rows: Vec<Vec<String>>,
}

impl CommentTable {
    /// The comment text of every row, in input order.
    pub fn comments(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(|row| row.get(self.comment_index).map_or("", String::as_str))
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Output header order: `Comment` first, then the remaining input columns.
    #[must_use]
    pub fn output_headers(&self) -> Vec<&str> {
        std::iter::once(COMMENT_COLUMN)
            .chain(
                self.headers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != self.comment_index)
                    .map(|(_, h)| h.as_str()),
            )
            .collect()
    }

    fn output_cells<'a>(&'a self, row: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        let comment = row.get(self.comment_index).map_or("", String::as_str);
        std::iter::once(comment).chain(
            row.iter()
                .enumerate()
                .filter(move |(i, _)| *i != self.comment_index)
                .map(|(_, cell)| cell.as_str()),
        )
    }
}

/// Loads a comment CSV and locates its `Comment` column.
///
/// # Errors
///
/// - [`StoreError::Io`] / [`StoreError::Csv`] if the file cannot be read or
///   a row is malformed.
/// - [`StoreError::MissingColumn`] if there is no `Comment` column.
pub fn read_comment_table(path: impl AsRef<Path>) -> Result<CommentTable, StoreError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| StoreError::csv(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::csv(path, e))?
        .iter()
        .map(str::to_owned)
        .collect();

    let comment_index = headers
        .iter()
        .position(|h| h == COMMENT_COLUMN)
        .ok_or_else(|| StoreError::MissingColumn {
            path: path.to_path_buf(),
            column: COMMENT_COLUMN.to_owned(),
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::csv(path, e))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(CommentTable {
        headers,
        comment_index,
        rows,
    })
}

/// Writes `table` with `extra_headers` columns appended to every row.
///
/// `extra_cells[i]` belongs to `table.rows[i]`.
///
/// # Errors
///
/// - [`StoreError::RowCountMismatch`] if `extra_cells` and the table differ
///   in length; nothing is written in that case.
/// - [`StoreError::Io`] / [`StoreError::Csv`] on write failure.
pub fn write_scored_table(
    path: impl AsRef<Path>,
    table: &CommentTable,
    extra_headers: &[&str],
    extra_cells: &[Vec<String>],
) -> Result<usize, StoreError> {
    if extra_cells.len() != table.len() {
        return Err(StoreError::RowCountMismatch {
            expected: table.len(),
            actual: extra_cells.len(),
        });
    }

    let mut headers = table.output_headers();
    headers.extend_from_slice(extra_headers);
    let mut sink = CsvSink::create(path, &headers)?;

    for (row, extra) in table.rows.iter().zip(extra_cells) {
        let cells = table
            .output_cells(row)
            .chain(extra.iter().map(String::as_str));
        sink.write_cells(cells)?;
    }

    sink.finish()
}
