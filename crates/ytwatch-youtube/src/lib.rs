//! YouTube Data API v3 client and the harvesting building blocks built on it.

pub mod client;
pub mod comments;
pub mod error;
pub mod pagination;
pub mod probe;
pub mod resolve;
pub mod types;

mod retry;

pub use client::YoutubeClient;
pub use comments::{flatten_thread, harvest_video_comments, VideoComments, VideoDates};
pub use error::YoutubeError;
pub use pagination::{collect_pages, paginate, Page, MAX_PAGES};
pub use probe::probe_comments;
pub use resolve::{
    resolve_channel, search_channel, uploads_playlist_id, ResolvedChannel, Resolution,
};
pub use types::{PlaylistItem, PublishWindow};
