//! Channel handle resolution.
//!
//! A handle is first tried as a legacy username; if that call fails or
//! matches nothing, the handle is used as a channel search query and the
//! top result is accepted as-is.

use crate::client::YoutubeClient;
use crate::error::YoutubeError;

/// How a handle was mapped to a channel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Username,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub channel_id: String,
    pub via: Resolution,
}

impl ResolvedChannel {
    /// The channel's uploads playlist id, when it can be derived.
    #[must_use]
    pub fn uploads_playlist_id(&self) -> Option<String> {
        uploads_playlist_id(&self.channel_id)
    }
}

/// Resolves `handle` to a channel id, falling back to search.
///
/// # Errors
///
/// - [`YoutubeError::ChannelNotFound`] when both strategies return nothing.
/// - Any transient error from the search call when the username lookup
///   also failed or came back empty.
pub async fn resolve_channel(
    client: &YoutubeClient,
    handle: &str,
) -> Result<ResolvedChannel, YoutubeError> {
    match client.channel_id_for_username(handle).await {
        Ok(Some(channel_id)) => {
            return Ok(ResolvedChannel {
                channel_id,
                via: Resolution::Username,
            })
        }
        Ok(None) => {
            tracing::info!(handle, "no channel for username, falling back to search");
        }
        Err(e) => {
            tracing::warn!(handle, error = %e, "username lookup failed, falling back to search");
        }
    }

    search_channel(client, handle).await
}

/// Resolves `handle` by channel search alone.
///
/// # Errors
///
/// - [`YoutubeError::ChannelNotFound`] when the search returns nothing.
/// - Any transient error from the search call.
pub async fn search_channel(
    client: &YoutubeClient,
    handle: &str,
) -> Result<ResolvedChannel, YoutubeError> {
    match client.search_channel_id(handle).await? {
        Some(channel_id) => Ok(ResolvedChannel {
            channel_id,
            via: Resolution::Search,
        }),
        None => Err(YoutubeError::ChannelNotFound {
            handle: handle.to_owned(),
        }),
    }
}

/// Derives the uploads playlist id from a channel id.
///
/// Channel ids start `UC`; the matching uploads playlist swaps the second
/// character for `U`. Returns `None` for ids shorter than two characters.
#[must_use]
pub fn uploads_playlist_id(channel_id: &str) -> Option<String> {
    let mut chars = channel_id.chars();
    let first = chars.next()?;
    chars.next()?;
    let mut playlist = String::with_capacity(channel_id.len());
    playlist.push(first);
    playlist.push('U');
    playlist.extend(chars);
    Some(playlist)
}
