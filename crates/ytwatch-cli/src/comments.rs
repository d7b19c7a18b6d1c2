//! `ytwatch comments`: flattened comments for a channel's videos in a window.

use std::path::Path;

use anyhow::Context;
use ytwatch_store::{CsvSink, COMMENT_COLUMNS};
use ytwatch_youtube::{
    collect_pages, harvest_video_comments, paginate, search_channel, PublishWindow, VideoDates,
    YoutubeClient,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CommentsSummary {
    pub channels_skipped: usize,
    pub videos: usize,
    pub rows: usize,
}

/// Harvests every comment and inlined reply on the videos each handle's
/// channel published inside `window`.
///
/// Handles are resolved by channel search. A handle that cannot be
/// resolved, a video listing that breaks off, or a video whose comments
/// cannot be listed is logged and skipped; rows already gathered are kept.
/// Quota exhaustion is the exception: every later call would fail the same
/// way, so it ends the run instead of being handled per video.
///
/// # Errors
///
/// Returns an error if the output file cannot be written or the API
/// reports its quota as spent. The staged `.partial` file keeps the rows
/// written up to that point.
pub(crate) async fn run_comments(
    client: &YoutubeClient,
    handles: &[String],
    window: &PublishWindow,
    output: &Path,
) -> anyhow::Result<CommentsSummary> {
    let mut sink = CsvSink::create(output, COMMENT_COLUMNS)?;
    let mut summary = CommentsSummary::default();
    let mut dates = VideoDates::new();

    for handle in handles {
        let channel = match search_channel(client, handle).await {
            Ok(channel) => channel,
            Err(e) if e.is_quota_exceeded() => return Err(e).context("API quota exhausted"),
            Err(e) => {
                tracing::warn!(handle = %handle, error = %e, "skipping channel, could not resolve");
                summary.channels_skipped += 1;
                continue;
            }
        };
        let channel_id = channel.channel_id.as_str();

        let pages = paginate(format!("search(channelId={channel_id})"), |token: Option<String>| {
            async move {
                client
                    .search_videos_page(channel_id, window, token.as_deref())
                    .await
            }
        });
        let (video_ids, error) = collect_pages(pages).await;
        if let Some(e) = error {
            if e.is_quota_exceeded() {
                return Err(e).context("API quota exhausted");
            }
            tracing::warn!(
                handle = %handle,
                channel_id,
                found = video_ids.len(),
                error = %e,
                "video listing ended early, continuing with videos found so far"
            );
        }
        tracing::info!(
            handle = %handle,
            channel_id,
            videos = video_ids.len(),
            after = %window.published_after(),
            before = %window.published_before(),
            "listing comments"
        );

        for video_id in &video_ids {
            let harvested = harvest_video_comments(client, handle, video_id, &mut dates).await;
            if let Some(e) = harvested.error {
                if e.is_quota_exceeded() {
                    return Err(e).context("API quota exhausted");
                }
                tracing::warn!(
                    video_id = %video_id,
                    kept = harvested.rows.len(),
                    error = %e,
                    "comment listing ended early"
                );
            }
            for row in &harvested.rows {
                sink.write(row)?;
            }
            summary.videos += 1;
        }
    }

    summary.rows = sink.finish()?;
    Ok(summary)
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
