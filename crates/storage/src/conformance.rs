//! Conformance test suite for `DecisionStore` implementations.
//!
//! Backend-agnostic checks any store can run:
//!
//! - **Ids**: assigned from 1, increasing, never reused
//! - **Round trip**: a stored decision reads back unchanged
//! - **Ordering**: options and criteria keep submission order
//! - **Errors**: unknown ids and blank questions produce the right variants
//!
//! # Usage
//!
//! ```ignore
//! use decider_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn my_store_conformance() {
//!     let report = run_conformance_suite(|| async { MyStore::connect().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

use std::fmt;
use std::future::Future;

use crate::record::{NewDecision, StoredCriterion};
use crate::{DecisionStore, StorageError};

/// Result of a single conformance check.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => Self {
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}]: {}",
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run every check against fresh stores built by `factory`.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: DecisionStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let results = vec![
        TestResult::from_result(
            "ids_start_at_one_and_increase",
            ids_start_at_one_and_increase(factory().await).await,
        ),
        TestResult::from_result(
            "stored_decision_reads_back",
            stored_decision_reads_back(factory().await).await,
        ),
        TestResult::from_result(
            "list_is_in_id_order",
            list_is_in_id_order(factory().await).await,
        ),
        TestResult::from_result(
            "unknown_id_is_not_found",
            unknown_id_is_not_found(factory().await).await,
        ),
        TestResult::from_result(
            "blank_question_is_invalid",
            blank_question_is_invalid(factory().await).await,
        ),
    ];

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_decision(question: &str) -> NewDecision {
    NewDecision {
        question: question.to_string(),
        options: vec!["Stay".to_string(), "Go".to_string(), "Stay".to_string()],
        criteria: vec![
            StoredCriterion {
                name: "Cost".to_string(),
                importance: 5,
            },
            StoredCriterion {
                name: "Comfort".to_string(),
                importance: 3,
            },
        ],
    }
}

// ── Checks ───────────────────────────────────────────────────────────────────

async fn ids_start_at_one_and_increase<S: DecisionStore>(store: S) -> Result<(), String> {
    let first = store
        .insert_decision(make_decision("first"))
        .await
        .map_err(|e| e.to_string())?;
    let second = store
        .insert_decision(make_decision("second"))
        .await
        .map_err(|e| e.to_string())?;
    if first.id != 1 {
        return Err(format!("first id should be 1, got {}", first.id));
    }
    if second.id <= first.id {
        return Err(format!(
            "ids must increase: {} then {}",
            first.id, second.id
        ));
    }
    Ok(())
}

async fn stored_decision_reads_back<S: DecisionStore>(store: S) -> Result<(), String> {
    let input = make_decision("Should we move?");
    let stored = store
        .insert_decision(input.clone())
        .await
        .map_err(|e| e.to_string())?;
    let read = store
        .get_decision(stored.id)
        .await
        .map_err(|e| e.to_string())?;
    if read != stored {
        return Err(format!("read {:?} differs from stored {:?}", read, stored));
    }
    if read.question != input.question
        || read.options != input.options
        || read.criteria != input.criteria
    {
        return Err("stored decision does not match input".to_string());
    }
    if read.created_at.is_empty() {
        return Err("created_at is empty".to_string());
    }
    Ok(())
}

async fn list_is_in_id_order<S: DecisionStore>(store: S) -> Result<(), String> {
    for q in ["a", "b", "c"] {
        store
            .insert_decision(make_decision(q))
            .await
            .map_err(|e| e.to_string())?;
    }
    let all = store.list_decisions().await.map_err(|e| e.to_string())?;
    let questions: Vec<&str> = all.iter().map(|d| d.question.as_str()).collect();
    if questions != ["a", "b", "c"] {
        return Err(format!("unexpected order: {:?}", questions));
    }
    Ok(())
}

async fn unknown_id_is_not_found<S: DecisionStore>(store: S) -> Result<(), String> {
    match store.get_decision(99).await {
        Err(StorageError::DecisionNotFound { id: 99 }) => Ok(()),
        other => Err(format!("expected DecisionNotFound, got {:?}", other)),
    }
}

async fn blank_question_is_invalid<S: DecisionStore>(store: S) -> Result<(), String> {
    match store.insert_decision(make_decision("   ")).await {
        Err(StorageError::Invalid(_)) => {}
        other => return Err(format!("expected Invalid, got {:?}", other)),
    }
    let all = store.list_decisions().await.map_err(|e| e.to_string())?;
    if !all.is_empty() {
        return Err("rejected decision was written".to_string());
    }
    Ok(())
}
