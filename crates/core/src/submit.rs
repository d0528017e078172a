//! Final submission: the save endpoint seam, the response contract, and the
//! coordinator that runs exactly one request per attempt.
//!
//! Two levels of abstraction:
//! - [`SaveEndpoint`] -- moves one payload over some transport and returns the
//!   raw [`EndpointResponse`]
//! - [`interpret_response`] -- turns a raw response into a [`SaveReceipt`] or
//!   a [`SubmitError`], independent of transport
//!
//! [`submit_decision`] ties them to a [`Session`]. There is no retry; every
//! failure is terminal for that attempt and the session keeps all its data.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{FinalSubmitError, SubmitError, TransportError};
use crate::model::SubmissionPayload;
use crate::session::Session;

/// Path of the save endpoint, relative to its base URL.
pub const SUBMIT_PATH: &str = "/decision/submit";

/// Non-JSON bodies are cut to this many characters before display.
const RAW_BODY_LIMIT: usize = 200;

/// A transport-level response from the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl EndpointResponse {
    /// A JSON response, as a well-behaved endpoint would send it.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        EndpointResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Where final submissions go.
///
/// Implementations send the payload as a JSON body and report whatever came
/// back. Interpreting the answer is not their job.
#[async_trait]
pub trait SaveEndpoint: Send + Sync {
    async fn post(&self, payload: &SubmissionPayload) -> Result<EndpointResponse, TransportError>;
}

/// A successfully saved decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub decision_id: String,
}

#[derive(Debug, Deserialize)]
struct SaveResponseBody {
    #[serde(default)]
    ok: serde_json::Value,
    #[serde(default)]
    decision_id: Option<serde_json::Value>,
    #[serde(default)]
    error: serde_json::Value,
}

/// Classify a raw endpoint response.
pub fn interpret_response(response: EndpointResponse) -> Result<SaveReceipt, SubmitError> {
    if !response.is_json() {
        let truncated: String = response.body.chars().take(RAW_BODY_LIMIT).collect();
        let detail = if truncated.trim().is_empty() {
            format!("Submit failed (HTTP {})", response.status)
        } else {
            truncated
        };
        return Err(SubmitError::NotJson(detail));
    }

    let body: SaveResponseBody = serde_json::from_str(&response.body)
        .map_err(|e| SubmitError::MalformedJson(e.to_string()))?;

    if !response.is_success() || body.ok != serde_json::Value::Bool(true) {
        let message = body
            .error
            .as_str()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or("Submit failed")
            .to_string();
        return Err(SubmitError::Rejected {
            status: response.status,
            message,
        });
    }

    let decision_id = match body.decision_id {
        Some(serde_json::Value::String(id)) => id,
        Some(serde_json::Value::Null) | None => return Err(SubmitError::MissingDecisionId),
        Some(other) => other.to_string(),
    };
    Ok(SaveReceipt { decision_id })
}

/// An in-flight final submission.
///
/// While this guard exists the session's submit trigger is disabled. It is
/// re-enabled on every exit path: [`Submission::finish`], an early return,
/// a cancelled future, or a panic unwinding through the holder.
///
/// The guard borrows the session mutably, so a second submission cannot
/// begin while one is in flight. A guard dropped before
/// [`Submission::finish`] marks the attempt as cancelled.
pub struct Submission<'a> {
    session: &'a mut Session,
    payload: SubmissionPayload,
    finished: bool,
}

impl<'a> Submission<'a> {
    pub(crate) fn new(session: &'a mut Session, payload: SubmissionPayload) -> Self {
        Submission {
            session,
            payload,
            finished: false,
        }
    }

    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Read access to the session while the request is in flight.
    pub fn session(&self) -> &Session {
        &*self.session
    }

    /// Record the outcome on the session and release the trigger.
    pub fn finish(
        mut self,
        outcome: Result<SaveReceipt, SubmitError>,
        now: Instant,
    ) -> Result<SaveReceipt, SubmitError> {
        self.session.record_outcome(&outcome, now);
        self.finished = true;
        outcome
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.session.record_abandoned();
        }
        self.session.release_trigger();
    }
}

/// Run the final submission for `session` against `endpoint`.
///
/// Preconditions are checked in order (locked, options submitted, criteria
/// submitted) and the first failure is returned as
/// [`FinalSubmitError::Blocked`] without touching the network. Otherwise
/// exactly one request is made.
pub async fn submit_decision<E>(
    session: &mut Session,
    endpoint: &E,
) -> Result<SaveReceipt, FinalSubmitError>
where
    E: SaveEndpoint + ?Sized,
{
    let submission = session.begin_submission(Instant::now())?;
    let payload = submission.payload();
    info!(
        options = payload.options.len(),
        criteria = payload.criteria.len(),
        "submitting decision"
    );

    let outcome = match endpoint.post(payload).await {
        Ok(response) => interpret_response(response),
        Err(e) => Err(SubmitError::from(e)),
    };
    match &outcome {
        Ok(receipt) => info!(decision_id = %receipt.decision_id, "decision saved"),
        Err(e) => warn!(error = %e, "decision submission failed"),
    }

    Ok(submission.finish(outcome, Instant::now())?)
}
