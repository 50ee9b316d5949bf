//! AI Integration Layer
//!
//! Backend abstraction, the three protocol adapters, and the failover chain
//! that drives them under one shared deadline.

pub mod deadline;
pub mod provider;

pub use deadline::Deadline;
pub use provider::{
    AnthropicProvider, BackendDescriptor, ChainStats, ExplainBackend, FailoverChain,
    GeminiProvider, OpenAiProvider, ProviderKind, SharedBackend, create_backend,
};
