//! Integration tests for the offline queue working through the full
//! orchestrator: divert while offline, replay on flush.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};
use wayfarer_client::{
    ApiClient, ClientConfig, ConnectivityMonitor, RequestBody, SharedConnectivity,
};
use wayfarer_common::{ErrorKind, RetryStrategy};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn offline_client(server: &MockServer, connectivity: &SharedConnectivity) -> ApiClient {
    offline_client_with_capacity(server, connectivity, 1000)
}

fn offline_client_with_capacity(
    server: &MockServer,
    connectivity: &SharedConnectivity,
    capacity: usize,
) -> ApiClient {
    let mut config = ClientConfig::new(server.uri()).unwrap();
    config.queue_capacity = capacity;
    let retry = RetryStrategy::new()
        .with_max_attempts(2)
        .unwrap()
        .with_base_delay(Duration::from_millis(1))
        .unwrap();
    ApiClient::builder(config)
        .retry_strategy(retry)
        .connectivity(Arc::new(connectivity.clone()) as Arc<dyn ConnectivityMonitor>)
        .build()
        .unwrap()
}

/// Validates the offline divert for the mutating request scenario.
///
/// Assertions:
/// - Confirms the caller gets an immediate Offline failure.
/// - Ensures the request is buffered, not sent.
#[tokio::test]
async fn offline_mutation_fails_immediately_and_is_queued() {
    let server = MockServer::start().await;
    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let response = client.post::<Value, _>("/trips", &json!({"destination": "Oslo"})).await;

    assert!(!response.success);
    assert_eq!(
        response.message.as_deref(),
        Some("Queued for replay when connectivity returns")
    );
    assert_eq!(response.error.unwrap().kind(), ErrorKind::Offline);
    assert_eq!(client.queued_requests().await, 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Validates the offline divert for the multipart upload scenario.
///
/// Assertions:
/// - Ensures an offline upload is buffered instead of failing outright.
/// - Ensures `flush` replays it as multipart with the original bytes.
#[tokio::test]
async fn offline_upload_is_queued_and_replayed_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trips/7/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "photo-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let response = client
        .upload::<Value>("/trips/7/photos", "file", "beach.jpg", "image/jpeg", b"jpeg-bytes".to_vec())
        .await;
    assert!(!response.success);
    assert_eq!(response.error.unwrap().kind(), ErrorKind::Offline);
    assert_eq!(client.queued_requests().await, 1);

    connectivity.set_online(true);
    assert_eq!(client.flush().await, 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(String::from_utf8_lossy(&requests[0].body).contains("jpeg-bytes"));
}

/// Validates the offline gate for the read request scenario.
///
/// Assertions:
/// - Ensures reads fail immediately while offline and are not queued.
#[tokio::test]
async fn offline_read_fails_without_queueing() {
    let server = MockServer::start().await;
    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let response = client.get::<Value>("/trips").await;

    assert_eq!(response.error.unwrap().kind(), ErrorKind::Offline);
    assert_eq!(client.queued_requests().await, 0);
}

/// Validates `ApiClient::flush` behavior for the reconnect scenario.
///
/// Assertions:
/// - Ensures the buffered request is replayed exactly once with its
///   original body.
/// - Ensures the replay ticket resolves to the backend's response.
#[tokio::test]
async fn flush_replays_queued_request_and_resolves_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trips"))
        .and(body_json(json!({"destination": "Oslo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let (response, ticket) = client
        .request_with_replay::<Value>(
            Method::POST,
            "/trips",
            Some(RequestBody::Json(json!({"destination": "Oslo"}))),
        )
        .await;
    assert!(!response.success);
    let ticket = ticket.expect("offline mutation should hand back a ticket");

    connectivity.set_online(true);
    let replayed = client.flush().await;
    assert_eq!(replayed, 1);
    assert_eq!(client.queued_requests().await, 0);

    let outcome = ticket.outcome().await.expect("flush should resolve the ticket");
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()["id"], 9);
}

/// Validates `ApiClient::flush` behavior for the replay ordering
/// scenario.
///
/// Assertions:
/// - Ensures queued requests are replayed in submission order.
#[tokio::test]
async fn flush_replays_in_submission_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    for name in ["first", "second", "third"] {
        let _ = client.post::<Value, _>(&format!("/trips/{name}"), &json!({})).await;
    }

    connectivity.set_online(true);
    assert_eq!(client.flush().await, 3);

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, ["/trips/first", "/trips/second", "/trips/third"]);
}

/// Validates `ApiClient::flush` behavior for the still-offline scenario.
///
/// Assertions:
/// - Ensures flushing while offline replays nothing and keeps entries.
#[tokio::test]
async fn flush_is_a_noop_while_offline() {
    let server = MockServer::start().await;
    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let _ = client.post::<Value, _>("/trips", &json!({})).await;

    assert_eq!(client.flush().await, 0);
    assert_eq!(client.queued_requests().await, 1);
}

/// Validates the capacity bound for the full queue scenario.
///
/// Assertions:
/// - Ensures the mutation beyond capacity fails without a ticket.
/// - Ensures earlier entries survive.
#[tokio::test]
async fn full_queue_rejects_mutation_without_ticket() {
    let server = MockServer::start().await;
    let connectivity = SharedConnectivity::new(false);
    let client = offline_client_with_capacity(&server, &connectivity, 1);

    let _ = client.post::<Value, _>("/trips/a", &json!({})).await;
    let (response, ticket) = client
        .request_with_replay::<Value>(Method::POST, "/trips/b", None)
        .await;

    assert_eq!(response.error.unwrap().kind(), ErrorKind::Offline);
    assert!(ticket.is_none());
    assert_eq!(client.queued_requests().await, 1);
}

/// Validates `ApiClient::flush` behavior for the failed replay scenario.
///
/// Assertions:
/// - Ensures a failed replay resolves the ticket with a classified
///   error instead of re-queueing the entry.
#[tokio::test]
async fn failed_replay_resolves_ticket_with_classified_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trips"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Trip is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connectivity = SharedConnectivity::new(false);
    let client = offline_client(&server, &connectivity);

    let (_, ticket) = client
        .request_with_replay::<Value>(
            Method::POST,
            "/trips",
            Some(RequestBody::Json(json!({}))),
        )
        .await;
    let ticket = ticket.expect("offline mutation should hand back a ticket");

    connectivity.set_online(true);
    assert_eq!(client.flush().await, 1);
    assert_eq!(client.queued_requests().await, 0);

    let outcome = ticket.outcome().await.expect("flush should resolve the ticket");
    assert!(!outcome.success);
    assert_eq!(outcome.error.unwrap().kind(), ErrorKind::Validation);
}
