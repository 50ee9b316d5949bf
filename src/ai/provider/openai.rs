//! Chat-Completions-Compatible Provider
//!
//! Any API that mimics OpenAI's chat format: OpenAI itself, Groq, Mistral,
//! local gateways. The system prompt travels as a `system` role message.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{build_client, send_json, validate_base_url};
use super::{BackendDescriptor, ExplainBackend};
use crate::ai::Deadline;
use crate::constants::provider::OPENAI_API_BASE;
use crate::types::{BackendError, Result};

/// Chat-completions provider with secure API key handling
pub struct OpenAiProvider {
    name: String,
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(descriptor: &BackendDescriptor, api_key: SecretString) -> Result<Self> {
        let api_base = validate_base_url(
            &descriptor.name,
            descriptor.base_url.as_deref().unwrap_or(OPENAI_API_BASE),
        )?;

        Ok(Self {
            name: descriptor.name.clone(),
            api_key,
            api_base,
            model: descriptor.model.clone(),
            client: build_client()?,
        })
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl ExplainBackend for OpenAiProvider {
    async fn explain(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: &Deadline,
    ) -> std::result::Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.api_base);
        debug!(backend = %self.name, model = %self.model, "Sending chat completion request");

        let request = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.build_request(system_prompt, user_prompt));

        let response: ChatCompletionResponse = send_json(request, deadline).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(BackendError::EmptyResponse)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ProviderKind;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        let descriptor = BackendDescriptor::new("Groq", ProviderKind::OpenAi, "llama-3.3", "GROQ_API_KEY")
            .with_base_url(server.uri());
        OpenAiProvider::new(&descriptor, SecretString::from("sk-test".to_string())).unwrap()
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_request_shape_and_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "llama-3.3",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "main.c:1:1: error"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Add a semicolon."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server)
            .explain("be brief", "main.c:1:1: error", &deadline())
            .await
            .unwrap();
        assert_eq!(text, "Add a semicolon.");
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::HttpStatus {
                status: 401,
                body: "invalid api key".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_deadline_cancels_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &Deadline::after(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(err.is_deadline_exceeded());
    }

    #[test]
    fn test_debug_redacts_key() {
        let descriptor = BackendDescriptor::new("OpenAI", ProviderKind::OpenAi, "gpt-4o-mini", "K");
        let provider =
            OpenAiProvider::new(&descriptor, SecretString::from("sk-secret".to_string())).unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("https://api.openai.com/v1"));
    }
}
