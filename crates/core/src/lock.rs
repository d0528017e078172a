//! The decision statement and its one-way lock.

use crate::error::WorkflowError;

/// The decision statement: free text until locked, then a fixed snapshot.
///
/// There is no transition back from `Locked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionLock {
    Editable { draft: String },
    Locked { text: String },
}

impl Default for DecisionLock {
    fn default() -> Self {
        DecisionLock::Editable {
            draft: String::new(),
        }
    }
}

impl DecisionLock {
    /// Replace the draft text. Refused once locked.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        match self {
            DecisionLock::Editable { draft } => {
                *draft = text.into();
                Ok(())
            }
            DecisionLock::Locked { .. } => Err(WorkflowError::DecisionLocked),
        }
    }

    /// Snapshot the trimmed draft and lock it.
    ///
    /// A blank draft leaves the lock editable. Locking an already locked
    /// decision is a no-op that returns the existing snapshot.
    pub fn lock(&mut self) -> Result<&str, WorkflowError> {
        if let DecisionLock::Editable { draft } = self {
            let text = draft.trim().to_string();
            if text.is_empty() {
                return Err(WorkflowError::EmptyDecision);
            }
            *self = DecisionLock::Locked { text };
        }
        match self {
            DecisionLock::Locked { text } => Ok(text),
            DecisionLock::Editable { .. } => Err(WorkflowError::EmptyDecision),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, DecisionLock::Locked { .. })
    }

    /// The locked snapshot, if any.
    pub fn locked_text(&self) -> Option<&str> {
        match self {
            DecisionLock::Locked { text } => Some(text),
            DecisionLock::Editable { .. } => None,
        }
    }

    /// The live draft, if still editable.
    pub fn draft(&self) -> Option<&str> {
        match self {
            DecisionLock::Editable { draft } => Some(draft),
            DecisionLock::Locked { .. } => None,
        }
    }
}

/// Error from a clipboard write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Destination for the "copy decision" affordance.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_draft_stays_editable() {
        let mut lock = DecisionLock::default();
        lock.edit("   \n").unwrap();
        assert_eq!(lock.lock(), Err(WorkflowError::EmptyDecision));
        assert!(!lock.is_locked());
        assert_eq!(lock.draft(), Some("   \n"));
    }

    #[test]
    fn lock_snapshots_trimmed_text() {
        let mut lock = DecisionLock::default();
        lock.edit("  Should we migrate?  ").unwrap();
        assert_eq!(lock.lock(), Ok("Should we migrate?"));
        assert!(lock.is_locked());
        assert_eq!(lock.locked_text(), Some("Should we migrate?"));
        assert_eq!(lock.draft(), None);
    }

    #[test]
    fn locked_text_cannot_be_edited() {
        let mut lock = DecisionLock::default();
        lock.edit("Move house?").unwrap();
        lock.lock().unwrap();
        assert_eq!(lock.edit("Something else"), Err(WorkflowError::DecisionLocked));
        assert_eq!(lock.locked_text(), Some("Move house?"));
    }

    #[test]
    fn relock_keeps_snapshot() {
        let mut lock = DecisionLock::default();
        lock.edit("Move house?").unwrap();
        lock.lock().unwrap();
        assert_eq!(lock.lock(), Ok("Move house?"));
    }
}
