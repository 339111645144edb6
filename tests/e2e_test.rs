//! End-to-end generation against a fake provider.
//!
//! The provider is a local wiremock server, so these tests need neither API
//! keys nor network access.

use serde_json::json;
use std::fs;
use taskgen::contexts::exporter::{self, ExportFormat};
use taskgen::contexts::{
    FileStorage, GenerateError, HistoryStore, LlmGateway, LlmStatus, SpecSession, generate,
};
use taskgen::data::GenerationRequest;
use taskgen::registries::{FileProviderRegistry, ProviderKind, ProviderSettings};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ONE_STORY_ONE_TASK: &str = r#"{
  "userStories": [
    {"id": "US-001", "title": "Search the catalogue", "description": "As a shopper, I want to search so that I find products", "priority": "high", "group": "search"}
  ],
  "engineeringTasks": [
    {"id": "TASK-001", "title": "Build search index", "description": "Index product titles", "priority": "high", "estimatedHours": 6, "dependencies": [], "group": "search"}
  ],
  "risks": []
}"#;

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}

fn gateway_for(server: &MockServer) -> LlmGateway {
    LlmGateway::new(ProviderSettings {
        kind: ProviderKind::Groq,
        completions_url: format!("{}/v1/chat/completions", server.uri()),
        models_url: format!("{}/v1/models", server.uri()),
        model: "mixtral-8x7b-32768".to_string(),
        api_key: Some("test-key".to_string()),
    })
}

fn add_search() -> GenerationRequest {
    GenerationRequest::new("Add search", "Shoppers", "Must be fast", None)
}

#[tokio::test]
async fn e2e_add_search_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "mixtral-8x7b-32768",
            "max_tokens": 2000
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(&format!("```json\n{}\n```", ONE_STORY_ONE_TASK))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let history = HistoryStore::new(FileStorage::new(Some(data_dir.path().to_path_buf())));
    let mut session = SpecSession::new(history);

    let record = session
        .generate(&gateway_for(&server), add_search())
        .await
        .unwrap()
        .clone();

    assert_eq!(record.spec.goal, "Add search");
    assert_eq!(record.data().user_stories.len(), 1);
    assert_eq!(record.data().engineering_tasks.len(), 1);
    assert_eq!(record.data().risks.len(), 0);
    assert_eq!(record.data().engineering_tasks[0].estimated_hours, Some(6.0));

    let markdown = exporter::export(&record, ExportFormat::Markdown);
    assert!(markdown.contains("## User Stories"));
    assert!(markdown.contains("## Engineering Tasks"));
    assert!(!markdown.contains("Risks"));

    // The record survives a fresh store over the same directory.
    assert!(data_dir.path().join("taskGeneratorSpecs.json").exists());
    let reopened = HistoryStore::new(FileStorage::new(Some(data_dir.path().to_path_buf())));
    let specs = reopened.list();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0], record);
}

#[tokio::test]
async fn e2e_prompt_carries_request_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(ONE_STORY_ONE_TASK)))
        .mount(&server)
        .await;

    generate(&gateway_for(&server), &add_search()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Add search"));
    assert!(prompt.contains("Shoppers"));
    assert!(prompt.contains("Must be fast"));
}

#[tokio::test]
async fn e2e_upstream_status_is_forwarded_and_nothing_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let mut session = SpecSession::new(HistoryStore::new(FileStorage::new(Some(
        data_dir.path().to_path_buf(),
    ))));

    let err = session
        .generate(&gateway_for(&server), add_search())
        .await
        .unwrap_err();

    assert_eq!(err.status(), 429);
    assert_eq!(err.user_message(), "Failed to generate tasks from LLM");
    assert!(session.current().is_none());
    assert!(session.history().list().is_empty());
}

#[tokio::test]
async fn e2e_prose_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Here are your tasks: userStories ...")),
        )
        .mount(&server)
        .await;

    let err = generate(&gateway_for(&server), &add_search()).await.unwrap_err();
    assert!(matches!(err, GenerateError::MalformedResponse(_)));
    assert_eq!(err.status(), 500);
    assert_eq!(err.user_message(), "Invalid response format from LLM");
}

#[tokio::test]
async fn e2e_registry_file_redirects_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(ONE_STORY_ONE_TASK)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("providers.yml");
    fs::write(
        &registry_path,
        format!("openai:\n  base_url: {}/v1\n  model: test-model\n", server.uri()),
    )
    .unwrap();

    let settings = FileProviderRegistry::new(Some(registry_path))
        .resolve(|name| match name {
            "LLM_PROVIDER" => Some("openai".to_string()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(settings.kind, ProviderKind::OpenAi);

    let result = generate(&LlmGateway::new(settings), &add_search()).await.unwrap();
    assert_eq!(result.user_stories.len(), 1);
}

#[tokio::test]
async fn e2e_health_probe_follows_models_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    assert_eq!(gateway_for(&server).probe().await, LlmStatus::Healthy);

    let rejecting = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&rejecting)
        .await;

    assert_eq!(gateway_for(&rejecting).probe().await, LlmStatus::Error);
}
