//! Value types: options, criteria, and the payload sent to the save endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Which of the two lists an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Options,
    Criteria,
}

impl ListKind {
    /// Capitalized list name used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            ListKind::Options => "Options",
            ListKind::Criteria => "Criteria",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ListKind::Options => "option",
            ListKind::Criteria => "criterion",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            ListKind::Options => "options",
            ListKind::Criteria => "criteria",
        }
    }
}

/// Weight of a criterion, always within `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Importance(u8);

impl Importance {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, WorkflowError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Importance(value))
        } else {
            Err(WorkflowError::ImportanceOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance(3)
    }
}

impl TryFrom<u8> for Importance {
    type Error = WorkflowError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Importance::new(value)
    }
}

impl From<Importance> for u8 {
    fn from(importance: Importance) -> u8 {
        importance.0
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One candidate answer to the decision. Never empty, always trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionOption(String);

impl DecisionOption {
    /// Trim `raw`; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(DecisionOption(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecisionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, weighted yardstick for comparing options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    name: String,
    #[serde(default)]
    importance: Importance,
}

impl Criterion {
    /// Trim `raw`; `None` when nothing is left.
    pub fn new(raw: &str, importance: Importance) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Criterion {
            name: trimmed.to_string(),
            importance,
        })
    }

    /// A criterion at the default importance.
    pub fn named(raw: &str) -> Option<Self> {
        Criterion::new(raw, Importance::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }
}

/// How criteria are written into the submission payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaStyle {
    /// Each criterion is its bare name.
    Plain,
    /// Each criterion is `{name, importance}`.
    #[default]
    Weighted,
}

/// A criterion as it appears on the wire.
///
/// Both shapes are accepted when reading a payload, so an endpoint can serve
/// clients configured with either [`CriteriaStyle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireCriterion {
    Name(String),
    Weighted { name: String, importance: u8 },
}

impl WireCriterion {
    pub fn from_criterion(criterion: &Criterion, style: CriteriaStyle) -> Self {
        match style {
            CriteriaStyle::Plain => WireCriterion::Name(criterion.name.clone()),
            CriteriaStyle::Weighted => WireCriterion::Weighted {
                name: criterion.name.clone(),
                importance: criterion.importance.get(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WireCriterion::Name(name) => name,
            WireCriterion::Weighted { name, .. } => name,
        }
    }

    /// The stated importance, or `None` for a bare name.
    pub fn importance(&self) -> Option<u8> {
        match self {
            WireCriterion::Name(_) => None,
            WireCriterion::Weighted { importance, .. } => Some(*importance),
        }
    }
}

/// The body of the single final submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub question: String,
    pub options: Vec<String>,
    pub criteria: Vec<WireCriterion>,
}
