//! Configuration Types
//!
//! The effective configuration: deadline budget, default persona, and the
//! ordered backend list. Every field has a built-in default so an empty or
//! missing config file still yields a working setup.

use serde::{Deserialize, Serialize};

use crate::ai::{BackendDescriptor, ProviderKind};
use crate::constants::chain::DEFAULT_TIMEOUT_SECS;
use crate::prompt::Mode;
use crate::types::{ExplainError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Total budget for the whole failover traversal
    pub timeout_secs: u64,

    /// Persona used when `--mode` is not given
    pub mode: Mode,

    /// Backends in failover order; `providers` is accepted as the key too
    #[serde(alias = "providers", skip_serializing_if = "Vec::is_empty")]
    pub backends: Vec<BackendDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mode: Mode::default(),
            backends: default_backends(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    /// Returns `ExplainError::Config` on the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(ExplainError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (idx, backend) in self.backends.iter().enumerate() {
            let field = if backend.name.trim().is_empty() {
                "name"
            } else if backend.model.trim().is_empty() {
                "model"
            } else if backend.api_key_env.trim().is_empty() {
                "api_key_env"
            } else {
                continue;
            };

            return Err(ExplainError::Config(format!(
                "backends[{}] has an empty {}",
                idx, field
            )));
        }

        Ok(())
    }

    /// Replace an empty backend list with the built-in one
    pub(super) fn with_default_backends(mut self) -> Self {
        if self.backends.is_empty() {
            self.backends = default_backends();
        }
        self
    }
}

/// Built-in failover order: Groq, Gemini, Anthropic, OpenAI
pub fn default_backends() -> Vec<BackendDescriptor> {
    vec![
        BackendDescriptor::new(
            "Groq",
            ProviderKind::OpenAi,
            "llama-3.3-70b-versatile",
            "GROQ_API_KEY",
        )
        .with_base_url("https://api.groq.com/openai/v1"),
        BackendDescriptor::new(
            "Gemini",
            ProviderKind::Gemini,
            "gemini-2.5-flash",
            "GEMINI_API_KEY",
        ),
        BackendDescriptor::new(
            "Anthropic",
            ProviderKind::Anthropic,
            "claude-3-5-sonnet-20240620",
            "ANTHROPIC_API_KEY",
        ),
        BackendDescriptor::new(
            "OpenAI",
            ProviderKind::OpenAi,
            "gpt-4o-mini",
            "OPENAI_API_KEY",
        )
        .with_base_url("https://api.openai.com/v1"),
    ]
}
