//! Anthropic Messages Provider
//!
//! System prompt goes in a top-level `system` field next to a single user
//! message. The API requires `max_tokens` and a pinned `anthropic-version`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{build_client, send_json, validate_base_url};
use super::{BackendDescriptor, ExplainBackend};
use crate::ai::Deadline;
use crate::constants::provider::{ANTHROPIC_API_BASE, ANTHROPIC_MAX_TOKENS, ANTHROPIC_VERSION};
use crate::types::{BackendError, Result};

/// Messages API provider
pub struct AnthropicProvider {
    name: String,
    api_key: SecretString,
    api_base: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(descriptor: &BackendDescriptor, api_key: SecretString) -> Result<Self> {
        let api_base = validate_base_url(
            &descriptor.name,
            descriptor.base_url.as_deref().unwrap_or(ANTHROPIC_API_BASE),
        )?;

        Ok(Self {
            name: descriptor.name.clone(),
            api_key,
            api_base,
            model: descriptor.model.clone(),
            max_tokens: descriptor.max_tokens.unwrap_or(ANTHROPIC_MAX_TOKENS),
            client: build_client()?,
        })
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system_prompt.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            }],
        }
    }
}

#[async_trait]
impl ExplainBackend for AnthropicProvider {
    async fn explain(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: &Deadline,
    ) -> std::result::Result<String, BackendError> {
        let url = format!("{}/messages", self.api_base);
        debug!(backend = %self.name, model = %self.model, "Sending messages request");

        let request = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(system_prompt, user_prompt));

        let response: MessagesResponse = send_json(request, deadline).await?;

        if let Some(error) = response.error {
            return Err(BackendError::ProviderReported(error.message));
        }

        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
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
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
