use ytwatch_core::HasComments;

use crate::client::YoutubeClient;

/// Checks whether `video_id` has at least one comment thread.
///
/// Any failure, including a response without an `items` key, yields
/// [`HasComments::Unknown`] rather than `No`.
pub async fn probe_comments(client: &YoutubeClient, video_id: &str) -> HasComments {
    match client.comment_threads_probe(video_id).await {
        Ok(response) => match response.items {
            Some(items) if items.is_empty() => HasComments::No,
            Some(_) => HasComments::Yes,
            None => {
                tracing::warn!(video_id, "comment probe response has no items collection");
                HasComments::Unknown
            }
        },
        Err(e) => {
            tracing::warn!(video_id, error = %e, "comment probe failed");
            HasComments::Unknown
        }
    }
}
