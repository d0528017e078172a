use serde::{Deserialize, Serialize};

/// A criterion as stored: plain-name criteria are stored at importance 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCriterion {
    pub name: String,
    pub importance: u8,
}

/// A validated decision waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDecision {
    pub question: String,
    pub options: Vec<String>,
    pub criteria: Vec<StoredCriterion>,
}

/// A saved decision with its options and criteria, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub criteria: Vec<StoredCriterion>,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub created_at: String,
}
