//! Shared Deadline
//!
//! One time budget for the whole failover traversal. It is created once per
//! run and passed by reference into every backend attempt, so the total wait
//! is bounded regardless of how many backends are configured.
//!
//! ## Usage
//!
//! ```ignore
//! use error_explain::ai::Deadline;
//!
//! let deadline = Deadline::after(Duration::from_secs(30));
//! let text = deadline.run(async { /* HTTP call */ }).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::BackendError;

/// Absolute expiry point shared by every attempt in a run
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline expiring `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// The budget this deadline was created with
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before expiry (zero once expired)
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Run `future` until it completes or the deadline passes
    ///
    /// An already-expired deadline fails without polling the future. On
    /// expiry the future is dropped, which cancels any in-flight request.
    pub async fn run<T, F>(&self, future: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        if self.is_expired() {
            return Err(BackendError::deadline_exceeded());
        }

        match tokio::time::timeout_at(self.at, future).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::deadline_exceeded()),
        }
    }
}
