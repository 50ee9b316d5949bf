//! Gemini generateContent Provider
//!
//! The protocol has no separate system slot in the shape used here, so the
//! persona and the user prompt are joined into one text blob. The API key is
//! passed as the `key` query parameter.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::http::{build_client, send_json, validate_base_url};
use super::{BackendDescriptor, ExplainBackend};
use crate::ai::Deadline;
use crate::constants::provider::GEMINI_API_BASE;
use crate::types::{BackendError, ExplainError, Result};

pub struct GeminiProvider {
    name: String,
    api_key: SecretString,
    /// `{base}/models/{model}:generateContent`, without the key
    endpoint: Url,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(descriptor: &BackendDescriptor, api_key: SecretString) -> Result<Self> {
        let api_base = validate_base_url(
            &descriptor.name,
            descriptor.base_url.as_deref().unwrap_or(GEMINI_API_BASE),
        )?;
        let invalid = |reason: String| {
            ExplainError::Config(format!(
                "Invalid endpoint for backend '{}': {}",
                descriptor.name, reason
            ))
        };
        let mut endpoint = Url::parse(&api_base).map_err(|e| invalid(e.to_string()))?;
        // Model names go in as one escaped segment so `/`, `?` or `#` cannot
        // change the path or smuggle in a query.
        endpoint
            .path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{}:generateContent", descriptor.model));

        Ok(Self {
            name: descriptor.name.clone(),
            api_key,
            endpoint,
            model: descriptor.model.clone(),
            client: build_client()?,
        })
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{}\n\nUser Error:\n{}", system_prompt, user_prompt),
                }],
            }],
        }
    }
}

#[async_trait]
impl ExplainBackend for GeminiProvider {
    async fn explain(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: &Deadline,
    ) -> std::result::Result<String, BackendError> {
        debug!(backend = %self.name, model = %self.model, "Sending generateContent request");

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());

        let request = self
            .client
            .post(url)
            .json(&self.build_request(system_prompt, user_prompt));

        let response: GenerateResponse = send_json(request, deadline).await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
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
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ProviderKind;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GeminiProvider {
        let descriptor = BackendDescriptor::new(
            "Gemini",
            ProviderKind::Gemini,
            "gemini-2.5-flash",
            "GEMINI_API_KEY",
        )
        .with_base_url(server.uri());
        GeminiProvider::new(&descriptor, SecretString::from("g-key".to_string())).unwrap()
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_request_shape_and_key_in_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "g-key"))
            .and(body_json(json!({
                "contents": [{"parts": [{"text": "persona\n\nUser Error:\nmain.go:4:2: undefined: x"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Declare x."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server)
            .explain("persona", "main.go:4:2: undefined: x", &deadline())
            .await
            .unwrap();
        assert_eq!(text, "Declare x.");
    }

    #[tokio::test]
    async fn test_missing_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_candidate_without_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "MAX_TOKENS"}]
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .explain("s", "u", &deadline())
            .await
            .unwrap_err();
        assert_eq!(err.category().to_string(), "RATE_LIMIT");
    }

    #[test]
    fn test_endpoint_and_debug_hide_key() {
        let descriptor =
            BackendDescriptor::new("Gemini", ProviderKind::Gemini, "gemini-2.5-flash", "K");
        let provider =
            GeminiProvider::new(&descriptor, SecretString::from("g-secret".to_string())).unwrap();

        assert_eq!(
            provider.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("g-secret"));
    }

    #[test]
    fn test_model_name_is_escaped_into_one_segment() {
        let descriptor = BackendDescriptor::new("Gemini", ProviderKind::Gemini, "a/b?key=x#c", "K")
            .with_base_url("https://proxy.example.com/v1beta/");
        let provider =
            GeminiProvider::new(&descriptor, SecretString::from("g".to_string())).unwrap();

        assert_eq!(provider.endpoint.host_str(), Some("proxy.example.com"));
        assert_eq!(provider.endpoint.query(), None);
        assert_eq!(provider.endpoint.fragment(), None);
        assert_eq!(
            provider.endpoint.path(),
            "/v1beta/models/a%2Fb%3Fkey=x%23c:generateContent"
        );
    }
}
