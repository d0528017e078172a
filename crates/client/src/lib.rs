//! HTTP save endpoint for Decider.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. HTTP error statuses are not treated as
//! transport errors: the status, content type, and body are handed back to
//! [`decider_core::interpret_response`], which owns the response contract.

use async_trait::async_trait;
use decider_core::{EndpointResponse, SaveEndpoint, SubmissionPayload, TransportError, SUBMIT_PATH};
use tracing::debug;

/// Posts submission payloads to `{base_url}{submit_path}`.
#[derive(Debug, Clone)]
pub struct HttpSaveEndpoint {
    base_url: String,
    submit_path: String,
}

impl HttpSaveEndpoint {
    /// An endpoint at `base_url` using the standard submit path.
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpSaveEndpoint {
            base_url: base_url.into(),
            submit_path: SUBMIT_PATH.to_string(),
        }
    }

    /// Override the path appended to the base URL.
    pub fn with_submit_path(mut self, path: impl Into<String>) -> Self {
        self.submit_path = path.into();
        self
    }

    /// The full URL requests are sent to.
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.submit_path.starts_with('/') {
            format!("{}{}", base, self.submit_path)
        } else {
            format!("{}/{}", base, self.submit_path)
        }
    }
}

#[async_trait]
impl SaveEndpoint for HttpSaveEndpoint {
    async fn post(&self, payload: &SubmissionPayload) -> Result<EndpointResponse, TransportError> {
        let url = self.url();
        let body = payload.clone();
        debug!(%url, "posting decision");

        tokio::task::spawn_blocking(move || {
            let config = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build();
            let agent: ureq::Agent = config.into();

            let response = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send_json(&body)
                .map_err(|e| TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let body = response
                .into_body()
                .read_to_string()
                .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

            Ok(EndpointResponse {
                status,
                content_type,
                body,
            })
        })
        .await
        .map_err(|e| TransportError(format!("task join error: {}", e)))?
    }
}
