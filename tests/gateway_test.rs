//! End-to-end facade wiring against mocked backends.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bragi::{BackendFamily, Bragi, BragiError, CharacterProfile, ConversationTurn, PersonaProfile};

fn character() -> CharacterProfile {
    CharacterProfile::new("Mira")
        .personality("wry, protective")
        .greeting("So you came back after all.")
}

async fn mount_local_server(server: &MockServer, reply: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/model"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"result": "MythoMax-L2-13b"})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": [{"text": reply}]})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn pinned_local_endpoint_drives_generation_end_to_end() {
    let server = MockServer::start().await;
    mount_local_server(&server, "Of course I waited. *smiles*").await;

    let client = Bragi::builder().local_endpoint(server.uri()).build();
    let text = client
        .generate_response(
            &character(),
            &[ConversationTurn::user("Did you wait for me?")],
            Some(&PersonaProfile::new("Jo")),
        )
        .await
        .expect("generation succeeds");

    // The bare action span was elaborated by the post-processor.
    assert!(text.starts_with("Of course I waited."));
    assert!(!text.contains("*smiles*"));
    assert!(text.contains("smiles slowly"));
}

#[tokio::test]
async fn persona_breaks_are_reported_without_altering_text() {
    let server = MockServer::start().await;
    mount_local_server(&server, "I am an AI, I cannot feel things.").await;

    let client = Bragi::builder().local_endpoint(server.uri()).build();
    let generation = client
        .generate_with_diagnostics(&character(), &[ConversationTurn::user("Talk to me.")], None)
        .await
        .expect("generation succeeds");

    assert_eq!(generation.text, "I am an AI, I cannot feel things.");
    assert!(generation.persona_breaks.contains(&"i am an ai".to_string()));
}

#[tokio::test]
async fn switch_to_hosted_without_credential_fails_before_any_call() {
    let client = Bragi::builder()
        .local_endpoint("http://127.0.0.1:9")
        .build();
    client.switch_backend(BackendFamily::Hosted, None).await;

    let err = client
        .generate_response(&character(), &[ConversationTurn::user("Hello?")], None)
        .await
        .expect_err("no credential configured");
    assert!(matches!(err, BragiError::NoCredentials));
}

#[tokio::test]
async fn switch_to_distributed_uses_the_switched_endpoint() {
    let horde = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/generate/text/async"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({"id": "job-9"})))
        .mount(&horde)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/generate/text/status/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "done": true,
            "generations": [{"text": "From the network, with love."}]
        })))
        .mount(&horde)
        .await;

    let client = Bragi::builder()
        .local_endpoint("http://127.0.0.1:9")
        .build();
    let state = client
        .switch_backend(BackendFamily::DistributedNetwork, Some(horde.uri()))
        .await;
    assert_eq!(state.family, BackendFamily::DistributedNetwork);

    let text = client
        .generate_response(&character(), &[ConversationTurn::user("Anyone there?")], None)
        .await
        .expect("distributed generation succeeds");
    assert_eq!(text, "From the network, with love.");
}

#[tokio::test]
async fn hosted_credential_routes_through_the_chat_api() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello from the gateway."}}]
        })))
        .mount(&gateway)
        .await;

    let client = Bragi::builder()
        .hosted_credential("test_key")
        .hosted_base_url(gateway.uri())
        .build();
    let text = client
        .generate_response(&character(), &[ConversationTurn::user("Hello?")], None)
        .await
        .expect("hosted generation succeeds");
    assert_eq!(text, "Hello from the gateway.");
}

#[tokio::test]
async fn long_history_is_compressed_before_dispatch() {
    let server = MockServer::start().await;
    mount_local_server(&server, "A reply that is long enough to pass untouched.").await;

    // 40 turns against the default budget of 20.
    let turns: Vec<ConversationTurn> = (0..40)
        .map(|i| ConversationTurn::user(format!("turn {i}")))
        .collect();

    let client = Bragi::builder().local_endpoint(server.uri()).build();
    let text = client
        .generate_response(&character(), &turns, None)
        .await
        .expect("generation succeeds");
    assert!(!text.is_empty());
}
