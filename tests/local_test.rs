//! Wiremock tests for the local-compatible server adapter.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bragi::providers::LocalClient;
use bragi::{
    BragiError, CharacterProfile, CompletionBackend, ConversationTurn, GenerationRequest,
    SamplingParams,
};

fn request() -> GenerationRequest {
    GenerationRequest {
        instruction: "You are Mira.".to_string(),
        turns: vec![ConversationTurn::user("Hello?")],
        character: CharacterProfile::new("Mira"),
        persona: None,
        sampling: SamplingParams::default(),
    }
}

async fn mount_healthy_model(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/model"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": "MythoMax-L2-13b"})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn check_model_returns_loaded_model_name() {
    let server = MockServer::start().await;
    mount_healthy_model(&server).await;

    let client = LocalClient::new(reqwest::Client::new(), server.uri());
    let model = client.check_model().await.expect("health check passes");
    assert_eq!(model, "MythoMax-L2-13b");
}

#[tokio::test]
async fn idle_server_fails_fast_with_no_model_loaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/model"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "ReadOnly"})),
        )
        .mount(&server)
        .await;

    let client = LocalClient::new(reqwest::Client::new(), server.uri());
    let err = client.generate(&request()).await.expect_err("no model");
    assert!(matches!(err, BragiError::NoModelLoaded { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_typed_error() {
    let client = LocalClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
    let err = client.generate(&request()).await.expect_err("refused");
    match err {
        BragiError::EndpointUnreachable { endpoint, .. } => {
            assert_eq!(endpoint, "http://127.0.0.1:9");
        }
        other => panic!("expected EndpointUnreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_sends_flattened_prompt_with_trailing_cue() {
    let server = MockServer::start().await;
    mount_healthy_model(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate"))
        .and(body_string_contains("You are Mira."))
        .and(body_string_contains("User: Hello?"))
        .and(body_string_contains("Mira:"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": [{"text": "*looks up* You again."}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = LocalClient::new(reqwest::Client::new(), server.uri());
    let text = client.generate(&request()).await.expect("generation succeeds");
    assert_eq!(text, "*looks up* You again.");
}

#[tokio::test]
async fn empty_results_surface_as_empty_result() {
    let server = MockServer::start().await;
    mount_healthy_model(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": [{"text": ""}]})),
        )
        .mount(&server)
        .await;

    let client = LocalClient::new(reqwest::Client::new(), server.uri());
    let err = client.generate(&request()).await.expect_err("blank reply");
    assert!(matches!(err, BragiError::EmptyResult));
}

#[tokio::test]
async fn generation_error_status_maps_to_api_error() {
    let server = MockServer::start().await;
    mount_healthy_model(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = LocalClient::new(reqwest::Client::new(), server.uri());
    let err = client.generate(&request()).await.expect_err("5xx maps");
    assert!(matches!(err, BragiError::Api { status: 503, .. }));
}
