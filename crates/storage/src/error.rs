/// All errors that can be returned by a DecisionStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No decision with the given id.
    #[error("decision not found: {id}")]
    DecisionNotFound { id: u64 },

    /// The decision was rejected before anything was written.
    #[error("invalid decision: {0}")]
    Invalid(String),

    /// A backend-specific storage error (clock, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
