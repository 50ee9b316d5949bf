//! AI Backend Abstraction
//!
//! Defines the ExplainBackend trait: one `explain` capability over three wire
//! protocols. The protocol is a tagged variant chosen when configuration is
//! loaded; the failover chain only ever sees the trait.
//!
//! ## Modules
//!
//! - `chain`: ordered failover across backends under one deadline
//! - `openai`: chat-completions-compatible APIs (OpenAI, Groq, Mistral, ...)
//! - `anthropic`: messages API with a top-level system field
//! - `gemini`: single text blob, key in the query string

mod anthropic;
mod chain;
mod gemini;
mod http;
mod openai;

pub use anthropic::AnthropicProvider;
pub use chain::{ChainStats, FailoverChain};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::Deadline;
use crate::types::{BackendError, ExplainError, Result};

// =============================================================================
// Backend Descriptor
// =============================================================================

/// Wire protocol spoken by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// `POST <base>/chat/completions` with a system and a user message
    #[serde(rename = "openai")]
    OpenAi,
    /// `POST <base>/messages` with a top-level `system` field
    #[serde(rename = "anthropic")]
    Anthropic,
    /// `POST <base>/models/<model>:generateContent` with one text blob
    #[serde(rename = "gemini")]
    Gemini,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// One configured backend
///
/// Holds the *name* of the environment variable carrying the credential,
/// never the credential itself. List order is failover priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Display name (e.g., "Groq", "My Local LLM")
    pub name: String,
    /// Protocol variant
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Model identifier (provider-specific)
    pub model: String,
    /// Endpoint base; each protocol has a default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Output token bound (messages API only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl BackendDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: ProviderKind,
        model: impl Into<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            model: model.into(),
            base_url: None,
            api_key_env: api_key_env.into(),
            max_tokens: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Shared backend type held by the failover chain
pub type SharedBackend = Arc<dyn ExplainBackend>;

// =============================================================================
// Explain Backend Trait
// =============================================================================

/// A single AI explanation backend
///
/// Implementations perform exactly one request per call. Retry and fallback
/// belong to [`FailoverChain`].
#[async_trait]
pub trait ExplainBackend: Send + Sync {
    /// Send one request and return the response text
    async fn explain(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: &Deadline,
    ) -> std::result::Result<String, BackendError>;

    /// Display name for logging and failure reports
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}

/// Create a backend from its descriptor and a resolved credential
pub fn create_backend(descriptor: &BackendDescriptor, api_key: SecretString) -> Result<SharedBackend> {
    if descriptor.model.trim().is_empty() {
        return Err(ExplainError::Config(format!(
            "Backend '{}' has no model",
            descriptor.name
        )));
    }

    match descriptor.kind {
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(descriptor, api_key)?)),
        ProviderKind::Anthropic => Ok(Arc::new(AnthropicProvider::new(descriptor, api_key)?)),
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(descriptor, api_key)?)),
    }
}
