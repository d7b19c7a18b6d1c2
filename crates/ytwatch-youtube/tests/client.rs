//! Integration tests for `YoutubeClient` and the harvesting helpers, using
//! wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytwatch_core::HasComments;
use ytwatch_youtube::{
    collect_pages, harvest_video_comments, paginate, probe_comments, resolve_channel,
    PublishWindow, Resolution, VideoDates, YoutubeClient, YoutubeError,
};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 5, "ytwatch-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn comment_snippet(author: &str, text: &str) -> serde_json::Value {
    json!({
        "authorDisplayName": author,
        "textDisplay": text,
        "authorProfileImageUrl": "https://yt3.example/p.jpg",
        "authorChannelUrl": "http://www.youtube.com/@someone",
        "authorChannelId": { "value": "UCsomeone" },
        "likeCount": 1,
        "publishedAt": "2024-12-03T09:00:00Z",
        "updatedAt": "2024-12-03T09:00:00Z"
    })
}

// ---------------------------------------------------------------------------
// channel resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolves_channel_by_username() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("forUsername", "JustinTrudeau"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [{ "id": "UCdirect" }] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = resolve_channel(&client, "JustinTrudeau").await.unwrap();
    assert_eq!(resolved.channel_id, "UCdirect");
    assert_eq!(resolved.via, Resolution::Username);
    assert_eq!(resolved.uploads_playlist_id().as_deref(), Some("UUdirect"));
}

#[tokio::test]
async fn falls_back_to_search_when_username_has_no_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "youtube#channelListResponse" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "@SomeMP"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": { "kind": "youtube#channel", "channelId": "UCsearch1" } },
                { "id": { "kind": "youtube#channel", "channelId": "UCsearch2" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = resolve_channel(&client, "@SomeMP").await.unwrap();
    assert_eq!(resolved.channel_id, "UCsearch1");
    assert_eq!(resolved.via, Resolution::Search);
}

#[tokio::test]
async fn falls_back_to_search_when_username_lookup_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "bad", "errors": [{ "reason": "invalidParameter" }] }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": { "channelId": "UCfallback" } }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = resolve_channel(&client, "weird handle").await.unwrap();
    assert_eq!(resolved.channel_id, "UCfallback");
}

#[tokio::test]
async fn unresolvable_handle_is_channel_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = resolve_channel(&client, "@ghost").await.unwrap_err();
    assert!(
        matches!(err, YoutubeError::ChannelNotFound { ref handle } if handle == "@ghost"),
        "got {err:?}"
    );
}

// ---------------------------------------------------------------------------
// comment-existence probe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn probe_reports_yes_no_and_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "has"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [{ "id": "t1" }] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "noitems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pageInfo": {} })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "disabled"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "disabled", "errors": [{ "reason": "commentsDisabled" }] }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(probe_comments(&client, "has").await, HasComments::Yes);
    assert_eq!(probe_comments(&client, "none").await, HasComments::No);
    assert_eq!(probe_comments(&client, "noitems").await, HasComments::Unknown);
    assert_eq!(probe_comments(&client, "disabled").await, HasComments::Unknown);
}

// ---------------------------------------------------------------------------
// paginated listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn playlist_items_follow_next_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UUchan"))
        .and(query_param("pageToken", "PAGE2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": { "publishedAt": "2024-08-02T00:00:00Z", "title": "Second" },
                "contentDetails": { "videoId": "v2" }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UUchan"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "PAGE2",
            "items": [{
                "snippet": { "publishedAt": "2024-08-01T00:00:00Z", "title": "First" },
                "contentDetails": { "videoId": "v1" }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let pages = paginate("UUchan", |token: Option<String>| {
        let client = &client;
        async move { client.playlist_items_page("UUchan", token.as_deref()).await }
    });
    let (items, err) = collect_pages(pages).await;
    assert!(err.is_none(), "unexpected error: {err:?}");
    let ids: Vec<&str> = items
        .iter()
        .map(|i| i.content_details.video_id.as_str())
        .collect();
    assert_eq!(ids, vec!["v1", "v2"]);
    assert_eq!(items[1].snippet.title, "Second");
}

#[tokio::test]
async fn malformed_playlist_item_is_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "snippet": { "title": "no date" }, "contentDetails": { "videoId": "bad" } },
                {
                    "snippet": { "publishedAt": "2024-08-01T00:00:00Z", "title": "ok" },
                    "contentDetails": { "videoId": "good" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client.playlist_items_page("UUchan", None).await.unwrap();
    let items = page.items.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content_details.video_id, "good");
}

#[tokio::test]
async fn search_videos_sends_window_and_flattens_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", "UCchan"))
        .and(query_param("type", "video"))
        .and(query_param("publishedAfter", "2024-12-01T00:00:00Z"))
        .and(query_param("publishedBefore", "2024-12-08T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": { "kind": "youtube#video", "videoId": "a" } },
                { "id": { "kind": "youtube#video", "videoId": "b" } }
            ]
        })))
        .mount(&server)
        .await;

    let window = PublishWindow {
        after: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
        before: Utc.with_ymd_and_hms(2024, 12, 8, 0, 0, 0).unwrap(),
    };
    let client = test_client(&server.uri());
    let page = client
        .search_videos_page("UCchan", &window, None)
        .await
        .unwrap();
    assert_eq!(page.items, Some(vec!["a".to_owned(), "b".to_owned()]));
    assert!(page.next_page_token.is_none());
}

// ---------------------------------------------------------------------------
// comment harvesting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn harvest_flattens_threads_and_fetches_video_date_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid1"))
        .and(query_param("pageToken", "NEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "t2",
                "snippet": {
                    "topLevelComment": { "id": "t2", "snippet": comment_snippet("Dan", "second page") },
                    "totalReplyCount": 0
                }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid1"))
        .and(query_param("textFormat", "plainText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "NEXT",
            "items": [{
                "id": "t1",
                "snippet": {
                    "topLevelComment": { "id": "t1", "snippet": comment_snippet("Ann", "top") },
                    "totalReplyCount": 2
                },
                "replies": { "comments": [
                    { "id": "t1.a", "snippet": comment_snippet("Bo", "r1") },
                    { "id": "t1.b", "snippet": comment_snippet("Cy", "r2") }
                ]}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "snippet": { "publishedAt": "2024-12-02T15:00:00Z" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut dates = VideoDates::new();
    let harvested = harvest_video_comments(&client, "@mp", "vid1", &mut dates).await;

    assert!(harvested.error.is_none());
    assert_eq!(harvested.rows.len(), 4);
    assert_eq!(dates.lookups(), 1);
    assert!(harvested
        .rows
        .iter()
        .all(|r| r.video_date.as_deref() == Some("2024-12-02T15:00:00Z")));
    assert_eq!(harvested.rows[1].parent_id.as_deref(), Some("t1"));
    assert_eq!(harvested.rows[3].comment, "second page");
}

#[tokio::test]
async fn harvest_keeps_rows_when_a_later_page_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "NEXT"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "gone", "errors": [{ "reason": "videoNotFound" }] }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "NEXT",
            "items": [{
                "id": "t1",
                "snippet": {
                    "topLevelComment": { "id": "t1", "snippet": comment_snippet("Ann", "top") },
                    "totalReplyCount": 0
                }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut dates = VideoDates::new();
    let harvested = harvest_video_comments(&client, "@mp", "vid9", &mut dates).await;

    assert_eq!(harvested.rows.len(), 1);
    assert!(harvested.rows[0].video_date.is_none());
    assert!(matches!(
        harvested.error,
        Some(YoutubeError::Api { status: 404, .. })
    ));
}

#[tokio::test]
async fn harvest_skips_date_lookup_for_video_without_comments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut dates = VideoDates::new();
    let harvested = harvest_video_comments(&client, "@mp", "quiet", &mut dates).await;
    assert!(harvested.rows.is_empty());
    assert!(harvested.error.is_none());
    assert_eq!(dates.lookups(), 0);
}
