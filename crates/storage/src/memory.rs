use std::collections::BTreeMap;

use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StorageError;
use crate::record::{DecisionRecord, NewDecision};
use crate::traits::DecisionStore;

#[derive(Debug)]
struct Inner {
    next_id: u64,
    decisions: BTreeMap<u64, DecisionRecord>,
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                decisions: BTreeMap::new(),
            }),
        }
    }
}

#[async_trait]
impl DecisionStore for InMemoryStore {
    async fn insert_decision(&self, decision: NewDecision) -> Result<DecisionRecord, StorageError> {
        if decision.question.trim().is_empty() {
            return Err(StorageError::Invalid("question is empty".to_string()));
        }
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let record = DecisionRecord {
            id,
            question: decision.question,
            options: decision.options,
            criteria: decision.criteria,
            created_at,
        };
        inner.decisions.insert(id, record.clone());
        debug!(id, "decision stored");
        Ok(record)
    }

    async fn get_decision(&self, id: u64) -> Result<DecisionRecord, StorageError> {
        let inner = self.inner.lock().await;
        inner
            .decisions
            .get(&id)
            .cloned()
            .ok_or(StorageError::DecisionNotFound { id })
    }

    async fn list_decisions(&self) -> Result<Vec<DecisionRecord>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.decisions.values().cloned().collect())
    }
}
