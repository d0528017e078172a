mod error;
mod memory;
mod record;
mod traits;

pub mod conformance;

pub use error::StorageError;
pub use memory::InMemoryStore;
pub use record::{DecisionRecord, NewDecision, StoredCriterion};
pub use traits::DecisionStore;
