//! decider-core: the decision submission workflow.
//!
//! A [`Session`] owns the decision statement, the options and criteria
//! lists, and the two submission gates. All mutation goes through
//! [`Session::dispatch`]; [`render()`] projects the current state into a
//! [`View`] after every transition.
//!
//! # Public API
//!
//! - [`Session`], [`Action`], [`WorkflowRules`] -- the state machine
//! - [`ItemList`] -- an ordered list with its submission gate
//! - [`DecisionLock`], [`Clipboard`] -- the one-way decision lock
//! - [`NoticeBoard`] -- transient, auto-dismissing notices
//! - [`SaveEndpoint`], [`submit_decision`] -- the final network submission
//! - [`render()`], [`View`] -- pure projection of a session

pub mod error;
pub mod list;
pub mod lock;
pub mod model;
pub mod notice;
pub mod render;
pub mod session;
pub mod submit;

pub use error::{FinalSubmitError, SubmitError, TransportError, WorkflowError};
pub use list::{suggested_criteria, suggested_options, ItemList};
pub use lock::{Clipboard, ClipboardError, DecisionLock};
pub use model::{
    CriteriaStyle, Criterion, DecisionOption, Importance, ListKind, SubmissionPayload,
    WireCriterion,
};
pub use notice::{Notice, NoticeBoard, DEFAULT_NOTICE_TTL};
pub use render::{render, DecisionView, ListView, Pill, View};
pub use session::{Action, ManualEntry, Session, WorkflowRules};
pub use submit::{
    interpret_response, submit_decision, EndpointResponse, SaveEndpoint, SaveReceipt,
    Submission, SUBMIT_PATH,
};
