//! Local file storage for `ytwatch` jobs: run checkpoint, channel lists,
//! and CSV tables.
//!
//! Every writer stages output in a sibling `.partial` file and renames it
//! over the target only when the job finishes, so an aborted run never
//! clobbers the previous output.

pub mod channels;
pub mod checkpoint;
pub mod comment_table;
pub mod error;
pub mod sink;

pub use channels::read_channel_handles;
pub use checkpoint::{read_checkpoint, write_checkpoint, CheckpointRead};
pub use comment_table::{read_comment_table, write_scored_table, CommentTable, COMMENT_COLUMN};
pub use error::StoreError;
pub use sink::{CsvSink, COMMENT_COLUMNS, VIDEO_COLUMNS};
