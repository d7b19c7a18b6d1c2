//! Page-token pagination as a lazy stream of pages.
//!
//! Every list endpoint returns `items` plus an optional `nextPageToken`.
//! [`paginate`] turns a page-fetch closure into a finite [`Stream`] that
//! walks the token chain once. The stream owns the cursor, so it cannot be
//! restarted; build a new one to re-read a resource.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt};

use crate::error::YoutubeError;

/// Upper bound on pages per resource so a cycling token cannot loop forever.
pub const MAX_PAGES: usize = 500;

/// One page of a list response.
///
/// `items` is `None` when the response lacked the items collection
/// entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Option<Vec<T>>,
    pub next_page_token: Option<String>,
}

enum Cursor {
    Start,
    Next(String),
    Exhausted,
}

/// Streams the pages of `resource`, calling `fetch` with each page token.
///
/// The stream ends when a page has no next token, when a page has no
/// items collection (logged, treated as zero items), or after yielding an
/// error. Exceeding [`MAX_PAGES`] yields
/// [`YoutubeError::PaginationLimit`].
pub fn paginate<T, F, Fut>(
    resource: impl Into<String>,
    fetch: F,
) -> impl Stream<Item = Result<Vec<T>, YoutubeError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, YoutubeError>>,
{
    let resource: String = resource.into();
    stream::unfold(
        (Cursor::Start, 0usize, fetch),
        move |(cursor, fetched, mut fetch)| {
            let resource = resource.clone();
            async move {
                let token = match cursor {
                    Cursor::Exhausted => return None,
                    Cursor::Start => None,
                    Cursor::Next(token) => Some(token),
                };

                if fetched >= MAX_PAGES {
                    let err = YoutubeError::PaginationLimit {
                        resource,
                        max_pages: MAX_PAGES,
                    };
                    return Some((Err(err), (Cursor::Exhausted, fetched, fetch)));
                }

                let page = match fetch(token).await {
                    Ok(page) => page,
                    Err(err) => return Some((Err(err), (Cursor::Exhausted, fetched + 1, fetch))),
                };

                let Some(items) = page.items else {
                    tracing::warn!(
                        resource = %resource,
                        page = fetched + 1,
                        "list response has no items collection; ending pagination"
                    );
                    return None;
                };

                let next = match page.next_page_token {
                    Some(token) if !token.is_empty() => Cursor::Next(token),
                    _ => Cursor::Exhausted,
                };
                Some((Ok(items), (next, fetched + 1, fetch)))
            }
        },
    )
}

/// Drains a page stream, keeping everything fetched before a failure.
///
/// Returns the accumulated items and the error that cut the walk short, if
/// any.
pub async fn collect_pages<T, S>(pages: S) -> (Vec<T>, Option<YoutubeError>)
where
    S: Stream<Item = Result<Vec<T>, YoutubeError>>,
{
    let mut pages = std::pin::pin!(pages);
    let mut all = Vec::new();
    while let Some(page) = pages.next().await {
        match page {
            Ok(items) => all.extend(items),
            Err(err) => return (all, Some(err)),
        }
    }
    (all, None)
}
