//! Request/response contract of `ApiClient` against a mock backend.
//!
//! Run with: cargo test -p picam-proto --test client_contract

use picam_mock::MockBackend;
use picam_proto::client::{ApiClient, ApiError, EpisodeQuery};
use picam_proto::protocol::ConfigUpdate;
use serde_json::json;

#[tokio::test]
async fn status_decodes_snapshot() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.base_url);

    let status = client.status().await.expect("status should decode");
    assert!(status.camera_active);
    assert!(!status.motion_detected);
    assert_eq!(status.total_episodes, 3);
    assert_eq!(status.total_events, 9);
    assert!((status.fps - 14.96).abs() < f64::EPSILON);
}

#[tokio::test]
async fn status_non_success_is_http_status_error() {
    let backend = MockBackend::start().await;
    backend.fail_status_once(500);
    let client = ApiClient::new(&backend.base_url);

    match client.status().await {
        Err(ApiError::HttpStatus(code)) => assert_eq!(code, 500),
        other => panic!("expected HttpStatus(500), got {:?}", other),
    }
    // The failure was scripted for one request only.
    assert!(client.status().await.is_ok());
}

#[tokio::test]
async fn status_malformed_body_is_parse_error() {
    let backend = MockBackend::start().await;
    backend.set_status_raw("<html>not json</html>");
    let client = ApiClient::new(&backend.base_url);

    assert!(matches!(client.status().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}", addr));
    assert!(matches!(client.status().await, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn episodes_sends_limit_and_motion_filter() {
    let backend = MockBackend::start().await;
    backend.set_episodes(json!([
        {
            "id": 2,
            "episode_id": "ep_002",
            "file_path": "/data/ep_002",
            "start_time": "2024-01-15T10:31:00",
            "end_time": null,
            "duration_seconds": null,
            "motion_detected": true,
            "object_detected": null
        },
        {
            "id": 1,
            "episode_id": "ep_001",
            "file_path": "/data/ep_001",
            "start_time": "2024-01-15T10:30:00",
            "end_time": "2024-01-15T10:30:12",
            "duration_seconds": 12.34,
            "motion_detected": true,
            "object_detected": ["person"]
        }
    ]));
    let client = ApiClient::new(&backend.base_url);

    let episodes = client
        .episodes(EpisodeQuery::default())
        .await
        .expect("episodes should decode");
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].episode_id, "ep_002");
    assert!(episodes[0].in_progress());
    assert_eq!(episodes[1].duration_seconds, Some(12.34));

    let queries = backend.episode_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("5"));
    assert_eq!(queries[0].get("motion_only").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn episodes_empty_list() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.base_url);
    let episodes = client.episodes(EpisodeQuery::default()).await.unwrap();
    assert!(episodes.is_empty());
}

#[tokio::test]
async fn episodes_non_success_is_http_status_error() {
    let backend = MockBackend::start().await;
    backend.fail_episodes_once(502);
    let client = ApiClient::new(&backend.base_url);

    match client.episodes(EpisodeQuery::default()).await {
        Err(ApiError::HttpStatus(code)) => assert_eq!(code, 502),
        other => panic!("expected HttpStatus(502), got {:?}", other),
    }
    assert_eq!(backend.episode_queries().len(), 1);
    assert!(client.episodes(EpisodeQuery::default()).await.is_ok());
}

#[tokio::test]
async fn config_post_body_and_content_type() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(&backend.base_url);

    let ack = client
        .update_config(&ConfigUpdate::new(50, 500))
        .await
        .expect("config update should be acknowledged");
    assert_eq!(ack.status.as_deref(), Some("success"));

    let posts = backend.config_posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        String::from_utf8(posts[0].body.clone()).unwrap(),
        r#"{"motion_threshold":50,"min_area":500}"#
    );
}

#[tokio::test]
async fn config_rejection_is_http_status_error() {
    let backend = MockBackend::start().await;
    backend.fail_config_once(503);
    let client = ApiClient::new(&backend.base_url);

    let err = client
        .update_config(&ConfigUpdate::new(25, 500))
        .await
        .expect_err("503 should fail");
    assert_eq!(err.to_string(), "HTTP error! status: 503");
}

#[tokio::test]
async fn events_decode() {
    let backend = MockBackend::start().await;
    backend.set_events(json!([
        {
            "id": 4,
            "event_type": "motion_start",
            "timestamp": "2024-01-15T10:30:00",
            "episode_id": 1,
            "message": "Movimiento detectado",
            "severity": "warning"
        }
    ]));
    let client = ApiClient::new(&backend.base_url);

    let events = client.events(10).await.expect("events should decode");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "motion_start");
    assert_eq!(events[0].episode_id, Some(1));
}
