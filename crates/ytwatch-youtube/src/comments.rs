//! Comment-thread flattening.
//!
//! Each thread becomes one row for the top-level comment plus one row per
//! inlined reply. Every row carries the source video's publish date, which
//! is looked up at most once per video id for the whole job.

use std::collections::HashMap;

use futures::StreamExt;
use ytwatch_core::CommentRecord;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::pagination::paginate;
use crate::types::{Comment, CommentThread};

/// Per-job cache of video publish dates.
///
/// A failed or empty lookup is cached as `None` too, so a broken video is
/// not re-queried for every comment.
#[derive(Debug, Default)]
pub struct VideoDates {
    cache: HashMap<String, Option<String>>,
    lookups: usize,
}

impl VideoDates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the publish date for `video_id`, fetching it on first use.
    pub async fn get(&mut self, client: &YoutubeClient, video_id: &str) -> Option<String> {
        if let Some(cached) = self.cache.get(video_id) {
            return cached.clone();
        }

        self.lookups += 1;
        let date = match client.video_published_at(video_id).await {
            Ok(Some(date)) => Some(date),
            Ok(None) => {
                tracing::warn!(video_id, "video lookup returned no items");
                None
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "video publish date lookup failed");
                None
            }
        };
        self.cache.insert(video_id.to_owned(), date.clone());
        date
    }

    /// Number of remote lookups issued so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

/// Rows harvested for one video and the error that cut pagination short.
#[derive(Debug, Default)]
pub struct VideoComments {
    pub rows: Vec<CommentRecord>,
    pub error: Option<YoutubeError>,
}

/// Flattens one thread into `1 + replies` rows.
///
/// Reply rows have `parent_id` set to the thread's top-level comment id
/// and a reply count of zero.
#[must_use]
pub fn flatten_thread(
    thread: &CommentThread,
    handle: &str,
    video_id: &str,
    video_date: Option<&str>,
) -> Vec<CommentRecord> {
    let reply_comments = thread
        .replies
        .as_ref()
        .map_or(&[][..], |r| r.comments.as_slice());

    let mut rows = Vec::with_capacity(1 + reply_comments.len());
    rows.push(to_record(
        &thread.snippet.top_level_comment,
        &thread.id,
        None,
        thread.snippet.total_reply_count,
        handle,
        video_id,
        video_date,
    ));
    for reply in reply_comments {
        rows.push(to_record(
            reply,
            &reply.id,
            Some(&thread.id),
            0,
            handle,
            video_id,
            video_date,
        ));
    }
    rows
}

fn to_record(
    comment: &Comment,
    comment_id: &str,
    parent_id: Option<&str>,
    reply_count: u64,
    handle: &str,
    video_id: &str,
    video_date: Option<&str>,
) -> CommentRecord {
    let s = &comment.snippet;
    CommentRecord {
        username: handle.to_owned(),
        comment: s.text_display.clone(),
        author_display_name: s.author_display_name.clone(),
        author_profile_image_url: s.author_profile_image_url.clone(),
        author_channel_url: s.author_channel_url.clone(),
        author_channel_id: s.author_channel_id.as_ref().map(|a| a.value.clone()),
        reply_count,
        like_count: s.like_count,
        published_at: s.published_at.clone(),
        updated_at: s.updated_at.clone(),
        comment_id: comment_id.to_owned(),
        parent_id: parent_id.map(str::to_owned),
        video_id: video_id.to_owned(),
        video_date: video_date.map(str::to_owned),
    }
}

/// Pages through every comment thread of `video_id` and flattens it.
///
/// A failing page ends the walk for this video; rows gathered before it
/// are kept and the error is returned alongside them.
pub async fn harvest_video_comments(
    client: &YoutubeClient,
    handle: &str,
    video_id: &str,
    dates: &mut VideoDates,
) -> VideoComments {
    let pages = paginate(format!("commentThreads({video_id})"), |token: Option<String>| {
        async move { client.comment_threads_page(video_id, token.as_deref()).await }
    });
    let mut pages = std::pin::pin!(pages);

    let mut out = VideoComments::default();
    while let Some(page) = pages.next().await {
        let threads = match page {
            Ok(threads) => threads,
            Err(e) => {
                out.error = Some(e);
                break;
            }
        };
        if threads.is_empty() {
            continue;
        }
        let video_date = dates.get(client, video_id).await;
        for thread in &threads {
            out.rows
                .extend(flatten_thread(thread, handle, video_id, video_date.as_deref()));
        }
    }
    out
}
