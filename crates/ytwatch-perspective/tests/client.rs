//! Integration tests for `PerspectiveClient` and `BatchScorer` against a
//! wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytwatch_perspective::{
    Attribute, BatchScorer, Pause, PerspectiveClient, PerspectiveError, RatePolicy,
};

fn test_client(base_url: &str) -> PerspectiveClient {
    PerspectiveClient::with_base_url("test-key", 5, "ytwatch-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn scores_body(toxicity: f64) -> serde_json::Value {
    json!({
        "attributeScores": {
            "TOXICITY": { "summaryScore": { "value": toxicity, "type": "PROBABILITY" } },
            "SEVERE_TOXICITY": { "summaryScore": { "value": 0.01, "type": "PROBABILITY" } },
            "INSULT": { "summaryScore": { "value": 0.02, "type": "PROBABILITY" } },
            "SEXUALLY_EXPLICIT": { "summaryScore": { "value": 0.03, "type": "PROBABILITY" } },
            "PROFANITY": { "summaryScore": { "value": 0.04, "type": "PROBABILITY" } },
            "THREAT": { "summaryScore": { "value": 0.05, "type": "PROBABILITY" } },
            "FLIRTATION": { "summaryScore": { "value": 0.06, "type": "PROBABILITY" } }
        },
        "languages": ["en"]
    })
}

struct NoPause;

impl Pause for NoPause {
    async fn pause(&self, _duration: Duration) {}
}

#[tokio::test]
async fn analyze_posts_comment_and_reads_summary_scores() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "comment": { "text": "you are great" },
            "requestedAttributes": { "TOXICITY": {}, "FLIRTATION": {} }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(scores_body(0.12)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let scores = client.analyze("you are great").await.unwrap();
    assert_eq!(scores.get(Attribute::Toxicity), Some(0.12));
    assert_eq!(scores.get(Attribute::Flirtation), Some(0.06));
    assert!(Attribute::ALL.iter().all(|a| scores.get(*a).is_some()));
}

#[tokio::test]
async fn analyze_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Attribute THREAT does not support request languages: xx",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze("???").await.unwrap_err();
    assert!(
        matches!(err, PerspectiveError::Api { status: 400, ref reason, .. } if reason == "INVALID_ARGUMENT"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn rate_limited_call_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scores_body(0.5)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let scores = client.analyze("hello").await.unwrap();
    assert_eq!(scores.get(Attribute::Toxicity), Some(0.5));
}

#[tokio::test]
async fn batch_scorer_keeps_row_count_when_a_call_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .and(body_partial_json(json!({ "comment": { "text": "bad row" } })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/comments:analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scores_body(0.3)))
        .mount(&server)
        .await;

    let scorer = BatchScorer::new(
        test_client(&server.uri()),
        NoPause,
        RatePolicy::new(2, Duration::from_secs(61)),
    );
    let run = scorer.score_all(&["first", "bad row", "third"]).await;

    assert_eq!(run.scores.len(), 3);
    assert_eq!(run.scores[0].get(Attribute::Toxicity), Some(0.3));
    assert!(run.scores[1].to_cells().iter().all(|c| c == "N/A"));
    assert_eq!(run.scores[2].get(Attribute::Toxicity), Some(0.3));
    assert_eq!(run.report.batches, 2);
    assert_eq!(run.report.cooldowns, 1);
    assert_eq!(run.report.skipped, 1);
}
