//! HTTP plumbing shared by every protocol adapter

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::ai::Deadline;
use crate::constants::chain::CONNECT_TIMEOUT_SECS;
use crate::types::{BackendError, ExplainError, Result};

/// Build the HTTP client used by one adapter
///
/// No overall request timeout is set: the shared deadline bounds each call.
pub(super) fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| ExplainError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Validate an endpoint base and strip trailing slashes
///
/// Only http/https are accepted. Plain http to a non-loopback host is
/// allowed (self-hosted gateways) but logged, since the key travels in clear.
pub(super) fn validate_base_url(backend: &str, base: &str) -> Result<String> {
    let url = Url::parse(base).map_err(|e| {
        ExplainError::Config(format!(
            "Invalid endpoint URL '{}' for backend '{}': {}",
            base, backend, e
        ))
    })?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if let Some(host) = url.host_str()
                && !matches!(host, "localhost" | "127.0.0.1" | "[::1]")
            {
                warn!(backend, host, "Endpoint uses plain http to a remote host");
            }
        }
        other => {
            return Err(ExplainError::Config(format!(
                "Endpoint for backend '{}' must use http or https, got: {}",
                backend, other
            )));
        }
    }

    Ok(base.trim_end_matches('/').to_string())
}

/// Send a prepared request under the deadline and decode a JSON body
///
/// Non-2xx responses become `HttpStatus` carrying the raw body.
pub(super) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    deadline: &Deadline,
) -> std::result::Result<T, BackendError> {
    deadline
        .run(async move {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let body = response.text().await.map_err(transport_error)?;

            if !status.is_success() {
                return Err(BackendError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!(status = status.as_u16(), bytes = body.len(), "Response received");
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
        })
        .await
}

/// Drop the URL from reqwest errors so query-string keys never reach logs
fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::from(err.without_url())
}
