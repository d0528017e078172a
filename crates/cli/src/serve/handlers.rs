//! HTTP route handlers: health, decision submit, decision debug view.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use decider_core::{Importance, WireCriterion};
use decider_storage::{NewDecision, StorageError, StoredCriterion};
use serde::Deserialize;
use tracing::{info, warn};

use super::json_error;
use super::state::AppState;

/// Options required by the endpoint, independent of client configuration.
const MIN_OPTIONS: usize = 2;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubmitRequest {
    question: Option<String>,
    options: Option<Vec<String>>,
    criteria: Option<Vec<WireCriterion>>,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// POST /decision/submit
pub(crate) async fn handle_submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => {
            let message = format!("Invalid JSON body: {}", rejection.body_text());
            return json_error(StatusCode::BAD_REQUEST, &message).into_response();
        }
    };

    let decision = match validate(request) {
        Ok(d) => d,
        Err(message) => {
            warn!(%message, "decision rejected");
            return json_error(StatusCode::BAD_REQUEST, &message).into_response();
        }
    };

    match state.store.insert_decision(decision).await {
        Ok(record) => {
            info!(decision_id = record.id, "decision saved");
            let response = serde_json::json!({"ok": true, "decision_id": record.id});
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(StorageError::Invalid(message)) => {
            json_error(StatusCode::BAD_REQUEST, &message).into_response()
        }
        Err(e) => {
            warn!(error = %e, "failed to store decision");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response()
        }
    }
}

/// Check a submission in the order the workflow reports problems and turn it
/// into a storable decision. Plain criteria get the default importance.
fn validate(request: SubmitRequest) -> Result<NewDecision, String> {
    let question = request.question.unwrap_or_default().trim().to_string();
    if question.is_empty() {
        return Err("Missing question".to_string());
    }

    let options: Vec<String> = request
        .options
        .unwrap_or_default()
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if options.len() < MIN_OPTIONS {
        return Err(format!("Add at least {} options", MIN_OPTIONS));
    }

    let wires = request.criteria.unwrap_or_default();
    let mut criteria = Vec::with_capacity(wires.len());
    for wire in &wires {
        let name = wire.name().trim();
        if name.is_empty() {
            continue;
        }
        let importance = match wire.importance() {
            Some(value) => Importance::new(value).map_err(|e| e.to_string())?,
            None => Importance::default(),
        };
        criteria.push(StoredCriterion {
            name: name.to_string(),
            importance: importance.get(),
        });
    }
    if criteria.is_empty() {
        return Err("Add at least 1 criterion".to_string());
    }

    Ok(NewDecision {
        question,
        options,
        criteria,
    })
}

/// GET /decision/{id}/debug
pub(crate) async fn handle_debug_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = id.parse::<u64>() else {
        return json_error(
            StatusCode::NOT_FOUND,
            &format!("decision '{}' not found", id),
        )
        .into_response();
    };

    match state.store.get_decision(id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(StorageError::DecisionNotFound { id }) => json_error(
            StatusCode::NOT_FOUND,
            &format!("decision '{}' not found", id),
        )
        .into_response(),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response(),
    }
}
