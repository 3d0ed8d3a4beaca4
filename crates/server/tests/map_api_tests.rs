//! Integration tests for the mapping API endpoints

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use video_mapper::{Payload, PublicationEvent, VideoMapper};
use video_mapper_broker::ConnectivityCheck;
use video_mapper_server::{create_routes, AppState};

struct StubCheck(Result<(), String>);

impl ConnectivityCheck for StubCheck {
    fn name(&self) -> &str {
        "message queue proxy reachable"
    }

    fn check(&self) -> Result<(), String> {
        self.0.clone()
    }
}

/// Helper to create a test server with a reachable stub proxy
fn create_test_server() -> TestServer {
    let state = AppState {
        mapper: Arc::new(VideoMapper::default()),
        connectivity: Arc::new(StubCheck(Ok(()))),
    };
    TestServer::new(create_routes(state)).expect("Failed to create test server")
}

fn metadata_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-1"),
        ),
        (
            HeaderName::from_static("message-timestamp"),
            HeaderValue::from_static("ts-1"),
        ),
    ]
}

#[tokio::test]
async fn test_map_round_trip_matches_content_uri() {
    let server = create_test_server();
    let [(id_name, id_value), (ts_name, ts_value)] = metadata_headers();

    let body = json!({
        "uuid": "abc-1",
        "id": "999",
        "updated_at": "2020-01-01T00:00:00Z",
        "name": "clip.mp4"
    })
    .to_string();

    let response = server
        .post("/map")
        .add_header(id_name, id_value)
        .add_header(ts_name, ts_value)
        .text(body)
        .await;

    response.assert_status_ok();

    let event: PublicationEvent = serde_json::from_str(&response.text()).unwrap();
    let payload: Payload = serde_json::from_str(&event.payload).unwrap();

    // The uuid inside the payload matches the uuid embedded in contentUri.
    assert_eq!(
        event.content_uri,
        format!(
            "http://video-mapper-iw-uk-p.svc.ft.com/video/model/{}",
            payload.uuid
        )
    );
    assert_eq!(payload.publish_reference, "req-1");
    assert_eq!(event.last_modified, "ts-1");
}

#[tokio::test]
async fn test_map_without_headers_is_rejected_not_hung() {
    let server = create_test_server();

    let body = json!({
        "uuid": "abc-1",
        "id": "999",
        "updated_at": "2020-01-01T00:00:00Z"
    })
    .to_string();

    // No metadata headers at all: the request gets an explicit 400 with a
    // reason, never a silently abandoned connection.
    let response = server.post("/map").text(body).await;

    response.assert_status_bad_request();
    let reason: serde_json::Value = response.json();
    assert!(reason["error"].as_str().unwrap().contains("X-Request-Id"));
}

#[tokio::test]
async fn test_map_empty_body_is_rejected() {
    let server = create_test_server();
    let [(id_name, id_value), (ts_name, ts_value)] = metadata_headers();

    let response = server
        .post("/map")
        .add_header(id_name, id_value)
        .add_header(ts_name, ts_value)
        .text("")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_gtg_follows_proxy_state() {
    let up = create_test_server();
    up.get("/__gtg").await.assert_status_ok();

    let state = AppState {
        mapper: Arc::new(VideoMapper::default()),
        connectivity: Arc::new(StubCheck(Err("connection refused".to_string()))),
    };
    let down = TestServer::new(create_routes(state)).expect("Failed to create test server");
    down.get("/__gtg")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
