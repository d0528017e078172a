use crate::model::ListKind;

/// Errors raised by workflow transitions.
///
/// The `Display` text of each variant is exactly the notice shown to the
/// user when the transition is refused. A refused transition never changes
/// session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Locking was attempted with an empty or whitespace-only draft.
    #[error("Type a decision first")]
    EmptyDecision,

    /// The decision text was edited after it had been locked.
    #[error("Decision is locked")]
    DecisionLocked,

    /// A list was submitted with fewer entries than its minimum.
    #[error("{}", too_few_message(.kind, .min))]
    TooFewItems { kind: ListKind, min: usize },

    /// Removal targeted a position outside the current list. Displayed
    /// 1-based, like rendered pills.
    #[error("No such {}: {}", .kind.singular(), .index + 1)]
    NoSuchItem { kind: ListKind, index: usize },

    /// An importance outside `[1, 5]` was supplied.
    #[error("Importance must be between 1 and 5 (got {value})")]
    ImportanceOutOfRange { value: u8 },

    /// Final submit before the decision was locked.
    #[error("Lock the decision first")]
    NotLocked,

    /// Final submit while the options gate is closed.
    #[error("Submit options first")]
    OptionsNotSubmitted,

    /// Final submit while the criteria gate is closed.
    #[error("Submit criteria first")]
    CriteriaNotSubmitted,
}

fn too_few_message(kind: &ListKind, min: &usize) -> String {
    let noun = if *min == 1 {
        kind.singular()
    } else {
        kind.plural()
    };
    format!("Add at least {} {}", min, noun)
}

/// The save endpoint could not be reached, or the exchange broke off.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// A final submission reached the network but did not produce a saved decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The endpoint answered with `ok: false` or a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The endpoint answered with a non-JSON body; carries the truncated body.
    #[error("{0}")]
    NotJson(String),

    /// The endpoint claimed JSON but the body did not parse.
    #[error("invalid JSON response: {0}")]
    MalformedJson(String),

    /// The endpoint reported success without a decision id.
    #[error("response is missing decision_id")]
    MissingDecisionId,

    /// The request never completed.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// The transient notice shown for this failure.
    ///
    /// Rejections carry the endpoint's own message; everything else gets a
    /// generic notice and the detail goes to the status line.
    pub fn notice(&self) -> String {
        match self {
            SubmitError::Rejected { message, .. } => message.clone(),
            _ => "Error while saving".to_string(),
        }
    }
}

/// Everything that can stop [`submit_decision`](crate::submit_decision).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinalSubmitError {
    /// A precondition refused the submission before any request was sent.
    #[error(transparent)]
    Blocked(#[from] WorkflowError),

    /// The request was sent and failed.
    #[error(transparent)]
    Failed(#[from] SubmitError),
}
