use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{DecisionRecord, NewDecision};

/// The storage trait behind the save endpoint.
///
/// A decision, its options, and its criteria are written together: a failed
/// insert leaves nothing behind. Ids are assigned by the store, start at 1,
/// and are never reused.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait DecisionStore: Send + Sync + 'static {
    /// Write a decision and return the stored record with its new id.
    async fn insert_decision(&self, decision: NewDecision) -> Result<DecisionRecord, StorageError>;

    /// Read one decision.
    ///
    /// Returns `Err(StorageError::DecisionNotFound)` if the id is unknown.
    async fn get_decision(&self, id: u64) -> Result<DecisionRecord, StorageError>;

    /// All decisions in id order.
    async fn list_decisions(&self) -> Result<Vec<DecisionRecord>, StorageError>;
}
