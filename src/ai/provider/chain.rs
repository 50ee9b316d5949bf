//! Ordered Failover Chain
//!
//! Backends are tried strictly in configuration order, one attempt each,
//! under a single shared [`Deadline`]. The first successful response wins.
//!
//! ## Strategy
//!
//! 1. Fail fast with `NoBackends` when nothing is configured
//! 2. Try the next backend under the remaining deadline
//! 3. On failure, record it and move on
//! 4. When every backend has failed, return the ordered failure list
//!
//! Once the deadline has elapsed the remaining backends fail immediately
//! with a deadline error instead of being skipped, so the failure list
//! always has one entry per backend.

use std::time::Instant;

use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use super::{BackendDescriptor, SharedBackend, create_backend};
use crate::ai::Deadline;
use crate::types::{AggregateFailure, BackendFailure, ExplainError, Result};

/// Execution statistics for one chain run
#[derive(Debug, Default, Clone)]
pub struct ChainStats {
    pub attempts: usize,
    pub successful_backend: Option<String>,
    /// Failures before the winning attempt, in attempt order
    pub failures: Vec<BackendFailure>,
    pub total_duration_ms: u64,
}

/// Ordered list of backends tried one after another
pub struct FailoverChain {
    backends: Vec<SharedBackend>,
}

impl FailoverChain {
    pub fn new(backends: Vec<SharedBackend>) -> Self {
        Self { backends }
    }

    /// Build a chain from descriptors, resolving credentials through `lookup`
    ///
    /// Descriptors whose variable is unset or empty are left out, as are
    /// descriptors that fail to build (a malformed `base_url`, for one).
    /// Relative order of the remaining backends is preserved.
    pub fn from_descriptors<F>(descriptors: &[BackendDescriptor], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut backends = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let key = match lookup(&descriptor.api_key_env) {
                Some(key) if !key.trim().is_empty() => key,
                _ => {
                    debug!(
                        backend = %descriptor.name,
                        env = %descriptor.api_key_env,
                        "Skipping backend without credential"
                    );
                    continue;
                }
            };

            match create_backend(descriptor, SecretString::from(key)) {
                Ok(backend) => backends.push(backend),
                Err(err) => warn!(
                    backend = %descriptor.name,
                    error = %err,
                    "Skipping misconfigured backend"
                ),
            }
        }

        Self::new(backends)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Try each backend in order until one answers
    #[instrument(skip_all, fields(backends = self.backends.len()))]
    pub async fn execute(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: &Deadline,
    ) -> Result<(String, ChainStats)> {
        if self.backends.is_empty() {
            return Err(ExplainError::NoBackends);
        }

        let mut stats = ChainStats::default();
        let start_time = Instant::now();

        for backend in &self.backends {
            let name = backend.name();
            stats.attempts += 1;

            debug!(
                attempt = stats.attempts,
                backend = %name,
                model = %backend.model(),
                remaining_ms = deadline.remaining().as_millis() as u64,
                "Chain attempt"
            );

            match backend.explain(system_prompt, user_prompt, deadline).await {
                Ok(text) => {
                    stats.successful_backend = Some(name.to_string());
                    stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

                    info!(
                        backend = %name,
                        attempts = stats.attempts,
                        duration_ms = stats.total_duration_ms,
                        "Chain succeeded"
                    );

                    return Ok((text, stats));
                }
                Err(err) => {
                    warn!(
                        backend = %name,
                        category = %err.category(),
                        error = %err,
                        "Backend failed"
                    );
                    stats.failures.push(BackendFailure::new(name, err));
                }
            }
        }

        warn!(
            attempts = stats.attempts,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "All backends failed"
        );

        Err(AggregateFailure::new(stats.failures).into())
    }
}
