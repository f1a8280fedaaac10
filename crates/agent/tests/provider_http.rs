use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use toolfinder_agent::{CandidateSource, GatewayModel, ProviderClient, ProviderKind};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl Captured {
    fn take(&self) -> Vec<(HeaderMap, Value)> {
        std::mem::take(&mut *self.requests.lock().expect("capture lock"))
    }
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test router");
    });
    format!("http://{addr}")
}

fn client(kind: ProviderKind, base_url: &str, timeout: Duration) -> ProviderClient {
    ProviderClient::new(kind, "test-key".to_string().into(), base_url, timeout)
        .expect("provider client")
}

fn chat_router(captured: Captured, content: &'static str) -> Router {
    Router::new()
        .route(
            "/chat/completions",
            post(move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                captured.requests.lock().expect("capture lock").push((headers, body));
                Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
            }),
        )
        .with_state(captured)
}

#[tokio::test]
async fn openai_client_sends_bearer_auth_and_returns_message_content() {
    let captured = Captured::default();
    let base_url = spawn(chat_router(captured.clone(), "[]")).await;
    let openai = client(ProviderKind::OpenAi, &base_url, Duration::from_secs(5));

    let answer = openai.attempt("convert csv to pdf").await;

    assert_eq!(answer.as_deref(), Some("[]"));
    let requests = captured.take();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer test-key");
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["max_tokens"], 1000);
    let prompt = body["messages"][0]["content"].as_str().expect("prompt text");
    assert!(prompt.contains(r#""convert csv to pdf""#));
}

#[tokio::test]
async fn anthropic_client_sends_api_key_and_version_headers() {
    let captured = Captured::default();
    let router = Router::new()
        .route(
            "/messages",
            post(|State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                captured.requests.lock().expect("capture lock").push((headers, body));
                Json(json!({"content": [{"type": "text", "text": "Name: Foo"}]}))
            }),
        )
        .with_state(captured.clone());
    let base_url = spawn(router).await;
    let claude = client(ProviderKind::Anthropic, &base_url, Duration::from_secs(5));

    assert_eq!(claude.attempt("foo").await.as_deref(), Some("Name: Foo"));

    let requests = captured.take();
    let (headers, body) = &requests[0];
    assert_eq!(headers["x-api-key"], "test-key");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert!(headers.get("authorization").is_none());
    assert_eq!(body["model"], "claude-3-sonnet-20240229");
}

#[tokio::test]
async fn gateway_models_share_a_client_and_send_their_own_model_name() {
    let captured = Captured::default();
    let base_url = spawn(chat_router(captured.clone(), "[{\"name\": \"x\"}]")).await;
    let shared = Arc::new(client(ProviderKind::Gateway, &base_url, Duration::from_secs(5)));
    let mini = GatewayModel::new(shared.clone(), "gpt-4o-mini");
    let llama = GatewayModel::new(shared, "Meta-Llama-3.1-8B-Instruct");

    assert!(mini.attempt("q").await.is_some());
    assert!(llama.attempt("q").await.is_some());

    let models: Vec<Value> =
        captured.take().into_iter().map(|(_, body)| body["model"].clone()).collect();
    assert_eq!(models, [json!("gpt-4o-mini"), json!("Meta-Llama-3.1-8B-Instruct")]);
}

#[tokio::test]
async fn non_success_status_is_reported_as_no_answer() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))) }),
    );
    let base_url = spawn(router).await;
    let deepseek = client(ProviderKind::DeepSeek, &base_url, Duration::from_secs(5));

    assert_eq!(deepseek.attempt("anything").await, None);
}

#[tokio::test]
async fn malformed_envelope_and_blank_text_are_reported_as_no_answer() {
    let router = Router::new()
        .route("/chat/completions", post(|| async { Json(json!({"choices": []})) }))
        .route("/messages", post(|| async { Json(json!({"content": [{"text": "   "}]})) }));
    let base_url = spawn(router).await;

    let openai = client(ProviderKind::OpenAi, &base_url, Duration::from_secs(5));
    let claude = client(ProviderKind::Anthropic, &base_url, Duration::from_secs(5));

    assert_eq!(openai.attempt("anything").await, None);
    assert_eq!(claude.attempt("anything").await, None);
}

#[tokio::test]
async fn unreachable_endpoint_is_reported_as_no_answer() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let openai = client(ProviderKind::OpenAi, &format!("http://{addr}"), Duration::from_secs(2));
    assert_eq!(openai.attempt("anything").await, None);
}

#[tokio::test]
async fn slow_provider_is_cut_off_by_client_timeout() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": [{"message": {"content": "[]"}}]}))
        }),
    );
    let base_url = spawn(router).await;
    let openai = client(ProviderKind::OpenAi, &base_url, Duration::from_secs(1));

    let started = std::time::Instant::now();
    assert_eq!(openai.attempt("anything").await, None);
    assert!(started.elapsed() < Duration::from_secs(4));
}
