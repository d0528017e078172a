//! `decider serve` -- reference save endpoint.
//!
//! Accepts the same payload the workflow sends and stores decisions in a
//! process-local [`InMemoryStore`].
//!
//! Endpoints:
//! - GET  /health               - Server status
//! - POST /decision/submit      - Validate and store a decision
//! - GET  /decision/{id}/debug  - A stored decision, as saved
//!
//! All responses use Content-Type: application/json. CORS is permissive so a
//! browser-hosted widget on another origin can post to it.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use decider_core::SUBMIT_PATH;
use decider_storage::{DecisionStore, InMemoryStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use self::handlers::{handle_debug_decision, handle_health, handle_not_found, handle_submit};
use self::state::AppState;

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response in the save endpoint's failure shape.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"ok": false, "error": message})))
}

/// Build the router over `store`.
pub(crate) fn router(store: Arc<dyn DecisionStore>) -> Router {
    let state = Arc::new(AppState { store });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route(SUBMIT_PATH, post(handle_submit))
        .route("/decision/{id}/debug", get(handle_debug_decision))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Serve on `0.0.0.0:{port}` until Ctrl+C.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(InMemoryStore::new()));

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "decider endpoint listening");
    eprintln!("Decider endpoint listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for Ctrl+C. If the handler cannot be installed, run until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;
    use decider_client::HttpSaveEndpoint;
    use decider_core::{submit_decision, Action, ListKind, Session};

    async fn spawn(store: Arc<InMemoryStore>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(store)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn workflow_saves_into_store() {
        let store = Arc::new(InMemoryStore::new());
        let base = spawn(store.clone()).await;

        let mut session = Session::default();
        session
            .dispatch(Action::EditDecision("Rent or buy?".to_string()))
            .unwrap();
        session.dispatch(Action::LockDecision).unwrap();
        for kind in [ListKind::Options, ListKind::Criteria] {
            session.dispatch(Action::AddSuggested(kind)).unwrap();
            session.dispatch(Action::SubmitList(kind)).unwrap();
        }

        let receipt = submit_decision(&mut session, &HttpSaveEndpoint::new(base))
            .await
            .unwrap();
        assert_eq!(receipt.decision_id, "1");

        let stored = store.get_decision(1).await.unwrap();
        assert_eq!(stored.question, "Rent or buy?");
        assert_eq!(stored.options, vec!["Option A", "Option B", "Option C"]);
        assert_eq!(stored.criteria[0].name, "Cost");
        assert_eq!(stored.criteria[0].importance, 5);
    }

    #[tokio::test]
    async fn endpoint_rejection_reaches_session_status() {
        let base = spawn(Arc::new(InMemoryStore::new())).await;

        let rules = decider_core::WorkflowRules {
            min_options: 1,
            ..Default::default()
        };
        let mut session = Session::new(rules);
        session
            .dispatch(Action::EditDecision("Solo?".to_string()))
            .unwrap();
        session.dispatch(Action::LockDecision).unwrap();
        session
            .dispatch(Action::EditManualEntry(ListKind::Options, "Only".to_string()))
            .unwrap();
        session.dispatch(Action::AddManual(ListKind::Options)).unwrap();
        session.dispatch(Action::SubmitList(ListKind::Options)).unwrap();
        session.dispatch(Action::AddSuggested(ListKind::Criteria)).unwrap();
        session.dispatch(Action::SubmitList(ListKind::Criteria)).unwrap();

        let result = submit_decision(&mut session, &HttpSaveEndpoint::new(base)).await;
        assert!(result.is_err());
        assert_eq!(session.final_status(), "Add at least 2 options");
        assert_eq!(
            session.notices().last().map(|n| n.message.as_str()),
            Some("Add at least 2 options")
        );
    }
}
