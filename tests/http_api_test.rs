//! The HTTP endpoints, driven in-process through the router.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use taskgen::contexts::LlmGateway;
use taskgen::registries::{ProviderKind, ProviderSettings};
use taskgen::server::{AppState, router};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state(base_url: &str, api_key: Option<&str>) -> AppState {
    AppState::new(LlmGateway::new(ProviderSettings {
        kind: ProviderKind::Groq,
        completions_url: format!("{}/chat/completions", base_url),
        models_url: format!("{}/models", base_url),
        model: "mixtral-8x7b-32768".to_string(),
        api_key: api_key.map(str::to_string),
    }))
}

fn offline_state(api_key: Option<&str>) -> AppState {
    // Nothing listens here.
    state("http://127.0.0.1:9", api_key)
}

fn post_generate(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate-tasks")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn generate_rejects_missing_fields() {
    let response = router(offline_state(Some("key")))
        .oneshot(post_generate(json!({ "goal": "Add search", "users": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Missing required fields: users, constraints" })
    );
}

#[tokio::test]
async fn generate_without_credential_names_variable() {
    let response = router(offline_state(None))
        .oneshot(post_generate(json!({
            "goal": "Add search",
            "users": "Shoppers",
            "constraints": "Must be fast"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "LLM API key not configured. Set GROQ_API_KEY in .env.local"
    );
}

#[tokio::test]
async fn generate_returns_data_on_success() {
    let server = MockServer::start().await;
    let content = r#"{"userStories":[{"id":"US-001","title":"Search","priority":"high"}],"engineeringTasks":[],"risks":[]}"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .mount(&server)
        .await;

    let response = router(state(&server.uri(), Some("key")))
        .oneshot(post_generate(json!({
            "goal": "Add search",
            "targetUsers": "Shoppers",
            "constraints": "Must be fast",
            "template": "web_app"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userStories"][0]["title"], "Search");
    assert_eq!(body["data"]["userStories"][0]["priority"], "high");
    assert!(body["data"]["risks"].as_array().unwrap().is_empty());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn generate_forwards_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let response = router(state(&server.uri(), Some("key")))
        .oneshot(post_generate(json!({
            "goal": "Add search",
            "users": "Shoppers",
            "constraints": "Must be fast"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["error"], "Failed to generate tasks from LLM");
}

#[tokio::test]
async fn generate_with_unreadable_body_is_internal_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate-tasks")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = router(offline_state(Some("key"))).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Internal server error");
}

#[tokio::test]
async fn status_reports_unconfigured_provider() {
    let request = Request::builder()
        .uri("/api/status")
        .body(Body::empty())
        .unwrap();

    let response = router(offline_state(None)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["backend"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["llm"], "not_configured");
    assert_eq!(body["llmProvider"], "groq");
}
