//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API-key handling, retry on transient failures, and
//! typed decoding. Non-success responses are decoded from Google's error
//! envelope into [`YoutubeError::Api`]. Every list method returns a
//! [`Page`] whose `items` is `None` when the response lacked the key.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::YoutubeError;
use crate::pagination::Page;
use crate::retry::retry_with_backoff;
use crate::types::{
    ChannelItem, ChannelSearchItem, CommentThread, ErrorEnvelope, ListResponse, PlaylistItem,
    PublishWindow, VideoItem, VideoSearchItem,
};

/// Page size for playlist and search listings (the API maximum).
pub const LIST_PAGE_SIZE: &str = "50";

/// Page size for comment-thread listings (the API maximum).
pub const COMMENT_PAGE_SIZE: &str = "100";

/// Client for the YouTube Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YoutubeClient {
    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`YoutubeError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash makes `Url::join` append the resource name
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retry on transient errors.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Looks up a channel id by legacy username (`channels?forUsername=`).
    ///
    /// Returns `Ok(None)` when the call succeeds but matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn channel_id_for_username(
        &self,
        username: &str,
    ) -> Result<Option<String>, YoutubeError> {
        let url = self.build_url("channels", &[("part", "id"), ("forUsername", username)]);
        let page: Page<ChannelItem> = self
            .list(&url, &format!("channels(forUsername={username})"))
            .await?;
        Ok(first_item(page).map(|c| c.id))
    }

    /// Searches for a channel by keyword and returns the top hit's id.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn search_channel_id(&self, query: &str) -> Result<Option<String>, YoutubeError> {
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "channel"),
                ("maxResults", "1"),
            ],
        );
        let page: Page<ChannelSearchItem> =
            self.list(&url, &format!("search(channel, q={query})")).await?;
        Ok(first_item(page).map(|c| c.id.channel_id))
    }

    /// Fetches one page of a playlist (50 items).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, YoutubeError> {
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", LIST_PAGE_SIZE),
            (
                "fields",
                "items(contentDetails(videoId,videoPublishedAt),snippet(publishedAt,title)),nextPageToken",
            ),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.build_url("playlistItems", &params);
        self.list(&url, &format!("playlistItems(playlistId={playlist_id})"))
            .await
    }

    /// Fetches one page of a channel's videos published inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn search_videos_page(
        &self,
        channel_id: &str,
        window: &PublishWindow,
        page_token: Option<&str>,
    ) -> Result<Page<String>, YoutubeError> {
        let after = window.published_after();
        let before = window.published_before();
        let mut params = vec![
            ("part", "id"),
            ("channelId", channel_id),
            ("maxResults", LIST_PAGE_SIZE),
            ("type", "video"),
            ("publishedAfter", after.as_str()),
            ("publishedBefore", before.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.build_url("search", &params);
        let page: Page<VideoSearchItem> = self
            .list(&url, &format!("search(video, channelId={channel_id})"))
            .await?;
        Ok(Page {
            items: page
                .items
                .map(|items| items.into_iter().map(|i| i.id.video_id).collect()),
            next_page_token: page.next_page_token,
        })
    }

    /// Fetches one page of comment threads with replies inlined.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    /// Videos with comments disabled answer 403 `commentsDisabled`.
    pub async fn comment_threads_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>, YoutubeError> {
        let mut params = vec![
            ("part", "snippet,replies"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", COMMENT_PAGE_SIZE),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.build_url("commentThreads", &params);
        self.list(&url, &format!("commentThreads(videoId={video_id})"))
            .await
    }

    /// Fetches the first page of comment threads as raw JSON, for probing.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn comment_threads_probe(&self, video_id: &str) -> Result<ListResponse, YoutubeError> {
        let url = self.build_url(
            "commentThreads",
            &[("part", "snippet"), ("videoId", video_id), ("maxResults", "1")],
        );
        let body = self.get_json(&url).await?;
        decode(body, &format!("commentThreads(videoId={video_id})"))
    }

    /// Looks up a video's publish timestamp.
    ///
    /// Returns `Ok(None)` when no video matches `video_id`.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] on network, status, or decoding failure.
    pub async fn video_published_at(&self, video_id: &str) -> Result<Option<String>, YoutubeError> {
        let url = self.build_url("videos", &[("part", "snippet"), ("id", video_id)]);
        let page: Page<VideoItem> = self.list(&url, &format!("videos(id={video_id})")).await?;
        Ok(first_item(page).map(|v| v.snippet.published_at))
    }

    /// Builds `{base}/{resource}?key=...&...` with percent-encoded parameters.
    fn build_url(&self, resource: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(resource)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Fetches a list endpoint and validates each item individually.
    ///
    /// Items that fail to decode are logged and dropped.
    async fn list<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Page<T>, YoutubeError> {
        let body = self.get_json(url).await?;
        let envelope: ListResponse = decode(body, context)?;
        let items = envelope.items.map(|raw| {
            raw.into_iter()
                .enumerate()
                .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        tracing::warn!(context, index, error = %e, "skipping malformed list item");
                        None
                    }
                })
                .collect()
        });
        Ok(Page {
            items,
            next_page_token: envelope.next_page_token,
        })
    }

    /// GETs `url` with retry and parses the body as JSON.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, YoutubeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                let body = response.text().await?;
                if !status.is_success() {
                    return Err(api_error(status.as_u16(), &body));
                }
                serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
                    context: redact_key(&url),
                    source: e,
                })
            }
        })
        .await
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value, context: &str) -> Result<T, YoutubeError> {
    serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

fn first_item<T>(page: Page<T>) -> Option<T> {
    page.items.and_then(|items| items.into_iter().next())
}

/// Maps a non-success response onto [`YoutubeError::Api`], reading
/// Google's error envelope when the body has one.
pub(crate) fn api_error(status: u16, body: &str) -> YoutubeError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => YoutubeError::Api {
            status,
            reason: envelope
                .error
                .errors
                .into_iter()
                .map(|d| d.reason)
                .find(|r| !r.is_empty())
                .unwrap_or_else(|| "unknown".to_owned()),
            message: envelope.error.message,
        },
        Err(_) => YoutubeError::Api {
            status,
            reason: "unknown".to_owned(),
            message: body.chars().take(200).collect(),
        },
    }
}

/// Renders `url` without its `key` parameter for diagnostics.
fn redact_key(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
