//! Row types emitted by the harvesting jobs.
//!
//! Field order matches the CSV column order; `serde` renames carry the
//! exact header names downstream tools expect.

use serde::{Serialize, Serializer};

/// Sentinel written wherever a value could not be obtained.
pub const NOT_AVAILABLE: &str = "N/A";

/// Result of probing a video for at least one comment thread.
///
/// `Unknown` means the probe itself failed and must never be read as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasComments {
    Yes,
    No,
    Unknown,
}

impl HasComments {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HasComments::Yes => "Yes",
            HasComments::No => "No",
            HasComments::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for HasComments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HasComments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One uploaded video published after the run checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Video_URL")]
    pub video_url: String,
    /// Publish timestamp exactly as the API returned it.
    #[serde(rename = "Publish_Date")]
    pub publish_date: String,
    #[serde(rename = "Has_Comments")]
    pub has_comments: HasComments,
}

impl VideoRecord {
    #[must_use]
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }
}

/// One top-level comment or reply, flattened.
///
/// Replies carry `parent_id` and always have `reply_count == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    /// Handle of the channel the comment was harvested for.
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "AuthorDisplayName")]
    pub author_display_name: String,
    #[serde(rename = "AuthorProfileImageUrl")]
    pub author_profile_image_url: String,
    #[serde(rename = "AuthorChannelUrl")]
    pub author_channel_url: String,
    #[serde(rename = "AuthorChannelId", serialize_with = "or_not_available")]
    pub author_channel_id: Option<String>,
    #[serde(rename = "ReplyCount")]
    pub reply_count: u64,
    #[serde(rename = "LikeCount")]
    pub like_count: u64,
    #[serde(rename = "PublishedAt")]
    pub published_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "CommentId")]
    pub comment_id: String,
    #[serde(rename = "ParentId", serialize_with = "or_not_available")]
    pub parent_id: Option<String>,
    #[serde(rename = "VideoId")]
    pub video_id: String,
    #[serde(rename = "VideoDate", serialize_with = "or_not_available")]
    pub video_date: Option<String>,
}

#[allow(clippy::ref_option)]
fn or_not_available<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
}
