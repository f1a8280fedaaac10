//! HTTP clients for the external language-model APIs.
//!
//! Each call is a single POST with a bounded timeout. There is no retry: a
//! failed call is logged and reported as "no response".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{build_prompt, CandidateSource, SYSTEM_PROMPT};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    DeepSeek,
    Gateway,
}

impl ProviderKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI GPT",
            Self::Anthropic => "Claude",
            Self::DeepSeek => "DeepSeek",
            Self::Gateway => "GitHub Models",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-3-sonnet-20240229",
            Self::DeepSeek => "deepseek-chat",
            Self::Gateway => "gpt-4o-mini",
        }
    }

    fn endpoint_path(self) -> &'static str {
        match self {
            Self::Anthropic => "/messages",
            Self::OpenAi | Self::DeepSeek | Self::Gateway => "/chat/completions",
        }
    }

    fn text_pointer(self) -> &'static str {
        match self {
            Self::Anthropic => "/content/0/text",
            Self::OpenAi | Self::DeepSeek | Self::Gateway => "/choices/0/message/content",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(StatusCode),
    #[error("malformed response envelope: {0}")]
    Envelope(String),
}

pub fn request_body(kind: ProviderKind, model: &str, prompt: &str) -> Value {
    match kind {
        ProviderKind::OpenAi => json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        }),
        ProviderKind::Anthropic => json!({
            "model": model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        }),
        ProviderKind::DeepSeek => json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
        }),
        ProviderKind::Gateway => json!({
            "model": model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        }),
    }
}

/// Pulls the generated text out of a provider's success envelope.
pub fn extract_text(kind: ProviderKind, envelope: &Value) -> Result<String, ProviderError> {
    envelope
        .pointer(kind.text_pointer())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::Envelope(format!("no text at `{}`", kind.text_pointer()))
        })
}

pub struct ProviderClient {
    kind: ProviderKind,
    client: Client,
    endpoint: String,
    credential: SecretString,
    model: String,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    pub fn new(
        kind: ProviderKind,
        credential: SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build().map_err(ProviderError::Client)?;
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), kind.endpoint_path());
        Ok(Self { kind, client, endpoint, credential, model: kind.default_model().to_string() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn query(&self, text: &str) -> Option<String> {
        self.query_with_model(text, &self.model).await
    }

    pub async fn query_with_model(&self, text: &str, model: &str) -> Option<String> {
        match self.complete(model, &build_prompt(text)).await {
            Ok(answer) if !answer.trim().is_empty() => Some(answer),
            Ok(_) => {
                warn!(
                    event_name = "provider.empty_answer",
                    provider = self.kind.label(),
                    model,
                    "provider answered with empty text"
                );
                None
            }
            Err(error) => {
                warn!(
                    event_name = "provider.call_failed",
                    provider = self.kind.label(),
                    model,
                    error = %error,
                    "provider call failed"
                );
                None
            }
        }
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        debug!(
            event_name = "provider.call_started",
            provider = self.kind.label(),
            model,
            endpoint = %self.endpoint,
            "calling provider"
        );

        let request = self.client.post(&self.endpoint).json(&request_body(self.kind, model, prompt));
        let response =
            self.authorize(request).send().await.map_err(ProviderError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|error| ProviderError::Envelope(error.to_string()))?;
        extract_text(self.kind, &envelope)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let credential = self.credential.expose_secret();
        match self.kind {
            ProviderKind::Anthropic => request
                .header("x-api-key", credential)
                .header("anthropic-version", ANTHROPIC_VERSION),
            ProviderKind::OpenAi | ProviderKind::DeepSeek | ProviderKind::Gateway => {
                request.bearer_auth(credential)
            }
        }
    }
}

#[async_trait]
impl CandidateSource for ProviderClient {
    fn label(&self) -> &str {
        self.kind.label()
    }

    async fn attempt(&self, query: &str) -> Option<String> {
        self.query(query).await
    }
}

/// One entry of the gateway model rotation; all entries share a client.
#[derive(Debug, Clone)]
pub struct GatewayModel {
    client: Arc<ProviderClient>,
    model: String,
}

impl GatewayModel {
    pub fn new(client: Arc<ProviderClient>, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CandidateSource for GatewayModel {
    fn label(&self) -> &str {
        &self.model
    }

    async fn attempt(&self, query: &str) -> Option<String> {
        self.client.query_with_model(query, &self.model).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::{extract_text, request_body, ProviderClient, ProviderError, ProviderKind};

    #[test]
    fn chat_completion_envelopes_expose_message_content() {
        let envelope = json!({"choices": [{"message": {"role": "assistant", "content": "[]"}}]});
        for kind in [ProviderKind::OpenAi, ProviderKind::DeepSeek, ProviderKind::Gateway] {
            assert_eq!(extract_text(kind, &envelope).expect("text"), "[]");
        }
    }

    #[test]
    fn anthropic_envelope_exposes_first_text_block() {
        let envelope = json!({"content": [{"type": "text", "text": "hello"}]});
        assert_eq!(extract_text(ProviderKind::Anthropic, &envelope).expect("text"), "hello");
    }

    #[test]
    fn envelope_without_text_is_malformed() {
        let envelope = json!({"choices": []});
        assert!(matches!(
            extract_text(ProviderKind::OpenAi, &envelope),
            Err(ProviderError::Envelope(_))
        ));
        assert!(extract_text(ProviderKind::Anthropic, &json!({"content": [{"text": 5}]})).is_err());
    }

    #[test]
    fn request_bodies_follow_provider_shapes() {
        let openai = request_body(ProviderKind::OpenAi, "gpt-3.5-turbo", "p");
        assert_eq!(openai["max_tokens"], 1000);
        assert_eq!(openai["temperature"], 0.3);
        assert_eq!(openai["messages"][0]["content"], "p");

        let anthropic = request_body(ProviderKind::Anthropic, "claude-3-sonnet-20240229", "p");
        assert_eq!(anthropic["max_tokens"], 1000);
        assert!(anthropic.get("temperature").is_none());

        let deepseek = request_body(ProviderKind::DeepSeek, "deepseek-chat", "p");
        assert_eq!(deepseek["stream"], false);

        let gateway = request_body(ProviderKind::Gateway, "gpt-4o", "p");
        assert_eq!(gateway["model"], "gpt-4o");
        assert_eq!(gateway["messages"][0]["role"], "system");
        assert_eq!(gateway["messages"][1]["content"], "p");
    }

    #[test]
    fn endpoints_join_base_url_and_provider_path() {
        let timeout = Duration::from_secs(30);
        let openai = ProviderClient::new(
            ProviderKind::OpenAi,
            "sk".to_string().into(),
            "https://api.openai.com/v1/",
            timeout,
        )
        .expect("client");
        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(openai.model(), "gpt-3.5-turbo");

        let anthropic = ProviderClient::new(
            ProviderKind::Anthropic,
            "key".to_string().into(),
            "https://api.anthropic.com/v1",
            timeout,
        )
        .expect("client");
        assert_eq!(anthropic.endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn debug_output_hides_credential() {
        let client = ProviderClient::new(
            ProviderKind::DeepSeek,
            "very-secret-key".to_string().into(),
            "https://api.deepseek.com/v1",
            Duration::from_secs(5),
        )
        .expect("client");
        assert!(!format!("{client:?}").contains("very-secret-key"));
    }
}
