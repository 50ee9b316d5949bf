//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Layers
//!
//! - **BackendError**: one failed attempt against one AI backend. Recorded by
//!   the failover chain, never fatal on its own.
//! - **AggregateFailure**: every backend in the chain failed; carries the
//!   ordered list of per-backend errors.
//! - **ExplainError**: the crate-wide error returned by fallible operations.
//!
//! Source-window read failures never surface here: the context miner turns
//! them into an inline warning string.

use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse classification of a backend failure, used for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Authentication or authorization rejected
    Auth,
    /// Connectivity issue or deadline expiry
    Network,
    /// Provider-side outage or unknown endpoint
    Unavailable,
    /// Request rejected as invalid
    BadRequest,
    /// Response could not be understood
    ParseError,
    /// Anything else
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Classify an HTTP status code
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            400 | 413 | 422 => Self::BadRequest,
            404 | 500..=599 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// Backend Error
// =============================================================================

/// Message used for attempts cancelled by the shared deadline
pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Failure of a single backend attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// DNS, connection refused, TLS, or deadline expiry
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Response parsed but carried no text
    #[error("empty response")]
    EmptyResponse,

    /// Provider returned an explicit error object
    #[error("provider reported error: {0}")]
    ProviderReported(String),
}

impl BackendError {
    /// Attempt cancelled because the shared deadline elapsed
    pub fn deadline_exceeded() -> Self {
        Self::Transport(DEADLINE_EXCEEDED.to_string())
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::Transport(msg) if msg == DEADLINE_EXCEEDED)
    }

    /// Category used for log routing
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Network,
            Self::HttpStatus { status, .. } => ErrorCategory::from_http_status(*status),
            Self::Decode(_) | Self::EmptyResponse => ErrorCategory::ParseError,
            Self::ProviderReported(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("rate limit") || lower.contains("overloaded") {
                    ErrorCategory::RateLimit
                } else if lower.contains("api key") || lower.contains("auth") {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::Unknown
                }
            }
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

// =============================================================================
// Aggregate Failure
// =============================================================================

/// One recorded failure in the chain, in attempt order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    /// Display name of the backend
    pub backend: String,
    pub error: BackendError,
}

impl BackendFailure {
    pub fn new(backend: impl Into<String>, error: BackendError) -> Self {
        Self {
            backend: backend.into(),
            error,
        }
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.error)
    }
}

/// Every backend in the chain failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFailure {
    pub failures: Vec<BackendFailure>,
}

impl AggregateFailure {
    pub fn new(failures: Vec<BackendFailure>) -> Self {
        Self { failures }
    }

    /// The failure recorded for the last backend attempted
    pub fn last(&self) -> Option<&BackendFailure> {
        self.failures.last()
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} backends failed", self.failures.len())?;
        for (idx, failure) in self.failures.iter().enumerate() {
            write!(f, "\n  {}. {}", idx + 1, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ExplainError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// The failover chain was asked to run with nothing in it
    #[error("No backends configured. Check your API keys")]
    NoBackends,

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    AllBackendsFailed(AggregateFailure),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("No command provided")]
    EmptyCommand,
}

impl From<AggregateFailure> for ExplainError {
    fn from(err: AggregateFailure) -> Self {
        ExplainError::AllBackendsFailed(err)
    }
}

pub type Result<T> = std::result::Result<T, ExplainError>;

impl ExplainError {
    /// Configuration problems stop the explanation step, never the wrapped command
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::NoBackends)
    }
}

// =============================================================================
// Tests
// =============================================================================
