//! `ytwatch videos`: new uploads per channel since the last run.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use futures::StreamExt;
use ytwatch_core::{is_after_cutoff, parse_utc_timestamp, VideoRecord};
use ytwatch_store::{
    read_channel_handles, read_checkpoint, write_checkpoint, CsvSink, VIDEO_COLUMNS,
};
use ytwatch_youtube::{paginate, probe_comments, resolve_channel, YoutubeClient};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VideosSummary {
    pub channels: usize,
    pub channels_skipped: usize,
    pub videos: usize,
}

/// Walks every channel's uploads playlist and writes one row per video
/// published strictly after the checkpoint.
///
/// The checkpoint is read once up front and rewritten with the current
/// time only after the output file has been published. When it is absent
/// or unreadable as a timestamp, the cutoff is "now", so a first run emits
/// nothing older than the run itself.
///
/// Failures are handled per channel or per video, except quota exhaustion,
/// which ends the run and leaves the checkpoint where it was.
///
/// # Errors
///
/// Returns an error if the channel list or checkpoint cannot be read, if
/// the output or checkpoint cannot be written, or if the API reports its
/// quota as spent. Other resolution and paging failures are logged and
/// skipped.
pub(crate) async fn run_videos(
    client: &YoutubeClient,
    channels: &Path,
    checkpoint: &Path,
    output: &Path,
) -> anyhow::Result<VideosSummary> {
    let handles = read_channel_handles(channels)
        .with_context(|| format!("failed to read channel list {}", channels.display()))?;
    let cutoff = read_checkpoint(checkpoint)
        .with_context(|| format!("failed to read checkpoint {}", checkpoint.display()))?
        .cutoff_or(Utc::now());
    tracing::info!(%cutoff, channels = handles.len(), "filtering videos published after cutoff");

    let mut sink = CsvSink::create(output, VIDEO_COLUMNS)?;
    let mut summary = VideosSummary::default();

    for handle in &handles {
        let resolved = match resolve_channel(client, handle).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_quota_exceeded() => {
                return Err(e).context("API quota exhausted; checkpoint left unchanged");
            }
            Err(e) => {
                tracing::warn!(handle = %handle, error = %e, "skipping channel, could not resolve");
                summary.channels_skipped += 1;
                continue;
            }
        };
        let Some(playlist_id) = resolved.uploads_playlist_id() else {
            tracing::warn!(
                handle = %handle,
                channel_id = %resolved.channel_id,
                "skipping channel, no uploads playlist id"
            );
            summary.channels_skipped += 1;
            continue;
        };
        tracing::debug!(
            handle = %handle,
            channel_id = %resolved.channel_id,
            via = ?resolved.via,
            "resolved channel"
        );

        let playlist = playlist_id.as_str();
        let pages = paginate(format!("playlistItems({playlist})"), |token: Option<String>| {
            async move { client.playlist_items_page(playlist, token.as_deref()).await }
        });
        let mut pages = std::pin::pin!(pages);

        while let Some(page) = pages.next().await {
            let items = match page {
                Ok(items) => items,
                Err(e) if e.is_quota_exceeded() => {
                    return Err(e).context("API quota exhausted; checkpoint left unchanged");
                }
                Err(e) => {
                    tracing::warn!(
                        handle = %handle,
                        playlist_id = playlist,
                        error = %e,
                        "stopping playlist walk"
                    );
                    break;
                }
            };
            for item in items {
                let raw_date = item.snippet.published_at;
                let published = match parse_utc_timestamp(&raw_date) {
                    Ok(ts) => ts,
                    Err(e) => {
                        tracing::warn!(
                            video_id = %item.content_details.video_id,
                            error = %e,
                            "skipping video with unreadable publish date"
                        );
                        continue;
                    }
                };
                if !is_after_cutoff(cutoff, published) {
                    continue;
                }

                let video_id = item.content_details.video_id;
                let has_comments = probe_comments(client, &video_id).await;
                sink.write(&VideoRecord {
                    username: handle.clone(),
                    title: item.snippet.title,
                    video_url: VideoRecord::watch_url(&video_id),
                    publish_date: raw_date,
                    has_comments,
                })?;
            }
        }
        summary.channels += 1;
    }

    summary.videos = sink.finish()?;
    write_checkpoint(checkpoint, Utc::now())
        .with_context(|| format!("failed to write checkpoint {}", checkpoint.display()))?;
    Ok(summary)
}

#[cfg(test)]
#[path = "videos_test.rs"]
mod tests;
