//! Data API response types.
//!
//! Only the fields the harvesters read are modelled. List endpoints share
//! the [`ListResponse`] envelope; its `items` are kept as raw JSON so each
//! item can be validated on its own and a single malformed entry does not
//! sink the whole page.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

/// Envelope shared by every `*.list` endpoint.
///
/// `items` is `None` when the key is absent, which is distinct from an
/// empty page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error body: `{"error": {"code", "message", "errors": [...]}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// channels / search
// ---------------------------------------------------------------------------

/// `channels.list` item; only the id is needed.
#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    pub id: String,
}

/// `search.list` item with `type=channel`.
#[derive(Debug, Deserialize)]
pub struct ChannelSearchItem {
    pub id: ChannelSearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSearchId {
    pub channel_id: String,
}

/// `search.list` item with `type=video`.
#[derive(Debug, Deserialize)]
pub struct VideoSearchItem {
    pub id: VideoSearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchId {
    pub video_id: String,
}

// ---------------------------------------------------------------------------
// playlistItems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub published_at: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

// ---------------------------------------------------------------------------
// commentThreads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub id: String,
    pub snippet: CommentThreadSnippet,
    #[serde(default)]
    pub replies: Option<CommentThreadReplies>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: Comment,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThreadReplies {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    pub text_display: String,
    #[serde(default)]
    pub author_profile_image_url: String,
    #[serde(default)]
    pub author_channel_url: String,
    #[serde(default)]
    pub author_channel_id: Option<AuthorChannelId>,
    #[serde(default)]
    pub like_count: u64,
    pub published_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorChannelId {
    pub value: String,
}

// ---------------------------------------------------------------------------
// videos
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub published_at: String,
}

// ---------------------------------------------------------------------------
// request parameters
// ---------------------------------------------------------------------------

/// Publish-date window for video search: `after` inclusive, `before` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishWindow {
    pub after: DateTime<Utc>,
    pub before: DateTime<Utc>,
}

impl PublishWindow {
    #[must_use]
    pub fn published_after(&self) -> String {
        self.after.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    #[must_use]
    pub fn published_before(&self) -> String {
        self.before.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
