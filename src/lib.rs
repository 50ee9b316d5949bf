//! error-explain - AI Explanations for Failed Builds
//!
//! Wraps a build command, captures its stderr, and when it fails sends the
//! first error plus the surrounding source lines to an ordered chain of AI
//! backends.
//!
//! ## Core Features
//!
//! - **Context Mining**: first `file:line:col:` location, ±5 line window
//! - **Prompt Assembly**: diagnostic, source context, user extra context
//! - **Failover Chain**: OpenAI-compatible, Anthropic and Gemini backends
//!   tried in order under one shared deadline
//! - **Layered Config**: defaults, global, project and environment
//!
//! ## Quick Start
//!
//! ```ignore
//! use error_explain::ai::{Deadline, FailoverChain};
//! use error_explain::config::ConfigLoader;
//! use error_explain::prompt::{Mode, assemble};
//!
//! let config = ConfigLoader::load()?;
//! let chain = FailoverChain::from_descriptors(&config.backends, |var| std::env::var(var).ok());
//! let user = assemble(&stderr, &error_explain::context::mine(&stderr), &[]);
//! let deadline = Deadline::after(Duration::from_secs(config.timeout_secs));
//! let (text, _stats) = chain.execute(&Mode::Direct.system_prompt(), &user, &deadline).await?;
//! ```
//!
//! ## Modules
//!
//! - [`context`]: error location and source window extraction
//! - [`prompt`]: user prompt assembly and personas
//! - [`ai`]: backend trait, protocol adapters, failover chain
//! - [`config`]: layered configuration
//! - [`runner`]: wrapped command execution with stderr capture

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod prompt;
pub mod runner;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{AggregateFailure, BackendError, ErrorCategory, ExplainError, Result};

// Pipeline
pub use ai::{Deadline, ExplainBackend, FailoverChain};
pub use context::mine;
pub use prompt::{Mode, assemble};
pub use runner::CommandOutput;
