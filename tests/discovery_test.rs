//! Endpoint discovery probes against mocked servers.

use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bragi::discovery::{LOCAL_PROBE_TIMEOUT, discover_among, normalize_endpoint, probe_endpoint};

#[tokio::test]
async fn probe_accepts_server_that_identifies_itself() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/extra/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "KoboldCpp"})),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let found = probe_endpoint(&client, &server.uri(), LOCAL_PROBE_TIMEOUT).await;
    assert_eq!(found, Some(server.uri()));
}

#[tokio::test]
async fn probe_falls_back_to_loaded_model_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/extra/version"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/model"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": "MythoMax-L2-13b"})),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let found = probe_endpoint(&client, &server.uri(), LOCAL_PROBE_TIMEOUT).await;
    assert_eq!(found, Some(server.uri()));
}

#[tokio::test]
async fn probe_rejects_idle_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/extra/version"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/model"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "ReadOnly"})),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let found = probe_endpoint(&client, &server.uri(), LOCAL_PROBE_TIMEOUT).await;
    assert_eq!(found, None);
}

#[tokio::test]
async fn discovery_with_all_probes_failing_returns_none_promptly() {
    let unidentified = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&unidentified)
        .await;

    // One candidate answers with 404s, one refuses the connection.
    let candidates = vec![unidentified.uri(), "http://127.0.0.1:9".to_string()];

    let client = reqwest::Client::new();
    let started = Instant::now();
    let found = discover_among(&client, &candidates, LOCAL_PROBE_TIMEOUT).await;
    assert_eq!(found, None);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn discovery_returns_first_identified_candidate() {
    let winner = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/extra/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "koboldcpp"})),
        )
        .mount(&winner)
        .await;

    let candidates = vec!["http://127.0.0.1:9".to_string(), winner.uri()];
    let client = reqwest::Client::new();
    let found = discover_among(&client, &candidates, LOCAL_PROBE_TIMEOUT).await;
    assert_eq!(found, Some(winner.uri()));
}

#[test]
fn normalize_endpoint_handles_bare_hosts() {
    assert_eq!(normalize_endpoint("localhost:5001"), "http://localhost:5001");
    assert_eq!(
        normalize_endpoint("http://127.0.0.1:5000/"),
        "http://127.0.0.1:5000"
    );
}
