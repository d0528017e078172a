//! The workflow session: one explicit state container per decision.
//!
//! All user-driven mutation goes through [`Session::dispatch`], which applies
//! an [`Action`] and, when the action is refused, posts the error as a
//! transient notice. The final network submission is driven separately by
//! [`submit_decision`](crate::submit_decision).

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{SubmitError, WorkflowError};
use crate::list::{suggested_criteria, suggested_options, ItemList};
use crate::lock::{Clipboard, DecisionLock};
use crate::model::{
    CriteriaStyle, Criterion, DecisionOption, Importance, ListKind, SubmissionPayload,
    WireCriterion,
};
use crate::notice::{NoticeBoard, DEFAULT_NOTICE_TTL};
use crate::submit::{SaveReceipt, Submission};

/// Knobs that differ between deployments of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRules {
    /// Entries required before the options gate can open.
    pub min_options: usize,
    /// Entries required before the criteria gate can open.
    pub min_criteria: usize,
    /// Wire shape of criteria in the payload.
    pub criteria_style: CriteriaStyle,
    /// Lifetime of transient notices.
    pub notice_ttl: Duration,
}

impl Default for WorkflowRules {
    fn default() -> Self {
        WorkflowRules {
            min_options: 2,
            min_criteria: 1,
            criteria_style: CriteriaStyle::Weighted,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

/// The manual-entry affordance attached to one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    pub visible: bool,
    pub input: String,
    /// Only meaningful for criteria.
    pub importance: Importance,
}

/// A user-triggered transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EditDecision(String),
    LockDecision,
    OpenAddDialog(ListKind),
    CloseAddDialog,
    /// Close the dialog and reveal the manual entry for its list.
    ChooseManual,
    /// Close the dialog and append the suggestions for its list.
    ChooseSuggested,
    EditManualEntry(ListKind, String),
    SetManualImportance(Importance),
    AddManual(ListKind),
    AddSuggested(ListKind),
    Remove(ListKind, usize),
    SubmitList(ListKind),
}

#[derive(Debug, Clone)]
pub struct Session {
    rules: WorkflowRules,
    decision: DecisionLock,
    options: ItemList<DecisionOption>,
    criteria: ItemList<Criterion>,
    option_entry: ManualEntry,
    criterion_entry: ManualEntry,
    dialog: Option<ListKind>,
    final_status: String,
    saving: bool,
    notices: NoticeBoard,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(WorkflowRules::default())
    }
}

impl Session {
    pub fn new(rules: WorkflowRules) -> Self {
        let notices = NoticeBoard::new(rules.notice_ttl);
        Session {
            rules,
            decision: DecisionLock::default(),
            options: ItemList::new(ListKind::Options),
            criteria: ItemList::new(ListKind::Criteria),
            option_entry: ManualEntry::default(),
            criterion_entry: ManualEntry::default(),
            dialog: None,
            final_status: String::new(),
            saving: false,
            notices,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn rules(&self) -> &WorkflowRules {
        &self.rules
    }

    pub fn decision(&self) -> &DecisionLock {
        &self.decision
    }

    pub fn options(&self) -> &ItemList<DecisionOption> {
        &self.options
    }

    pub fn criteria(&self) -> &ItemList<Criterion> {
        &self.criteria
    }

    pub fn manual_entry(&self, kind: ListKind) -> &ManualEntry {
        match kind {
            ListKind::Options => &self.option_entry,
            ListKind::Criteria => &self.criterion_entry,
        }
    }

    /// The list whose add dialog is open, if any.
    pub fn dialog(&self) -> Option<ListKind> {
        self.dialog
    }

    /// The persistent status line next to the final submit trigger.
    pub fn final_status(&self) -> &str {
        &self.final_status
    }

    /// Whether a final submission is in flight (the trigger is disabled).
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// The gate for `kind`.
    pub fn is_submitted(&self, kind: ListKind) -> bool {
        match kind {
            ListKind::Options => self.options.is_submitted(),
            ListKind::Criteria => self.criteria.is_submitted(),
        }
    }

    /// Whether the final submit trigger would currently be accepted.
    pub fn can_submit(&self) -> bool {
        self.check_submission().is_ok()
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Apply `action` now.
    pub fn dispatch(&mut self, action: Action) -> Result<(), WorkflowError> {
        self.dispatch_at(action, Instant::now())
    }

    /// Apply `action` as of `now`. A refused action posts its notice and
    /// leaves the session unchanged.
    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> Result<(), WorkflowError> {
        debug!(?action, "dispatch");
        let result = self.apply(action, now);
        if let Err(e) = &result {
            debug!(error = %e, "action refused");
            self.notices.post(e.to_string(), now);
        }
        result
    }

    fn apply(&mut self, action: Action, now: Instant) -> Result<(), WorkflowError> {
        match action {
            Action::EditDecision(text) => self.decision.edit(text),
            Action::LockDecision => {
                self.decision.lock()?;
                Ok(())
            }
            Action::OpenAddDialog(kind) => {
                self.dialog = Some(kind);
                Ok(())
            }
            Action::CloseAddDialog => {
                self.dialog = None;
                Ok(())
            }
            Action::ChooseManual => {
                if let Some(kind) = self.dialog.take() {
                    self.entry_mut(kind).visible = true;
                }
                Ok(())
            }
            Action::ChooseSuggested => {
                if let Some(kind) = self.dialog.take() {
                    self.add_suggested(kind);
                }
                Ok(())
            }
            Action::EditManualEntry(kind, text) => {
                self.entry_mut(kind).input = text;
                Ok(())
            }
            Action::SetManualImportance(importance) => {
                self.criterion_entry.importance = importance;
                Ok(())
            }
            Action::AddManual(kind) => {
                self.add_manual(kind);
                Ok(())
            }
            Action::AddSuggested(kind) => {
                self.add_suggested(kind);
                Ok(())
            }
            Action::Remove(kind, index) => match kind {
                ListKind::Options => self.options.remove(index).map(|_| ()),
                ListKind::Criteria => self.criteria.remove(index).map(|_| ()),
            },
            Action::SubmitList(kind) => {
                match kind {
                    ListKind::Options => self.options.submit(self.rules.min_options)?,
                    ListKind::Criteria => self.criteria.submit(self.rules.min_criteria)?,
                };
                self.notices.post(format!("{} submitted", kind.label()), now);
                Ok(())
            }
        }
    }

    fn entry_mut(&mut self, kind: ListKind) -> &mut ManualEntry {
        match kind {
            ListKind::Options => &mut self.option_entry,
            ListKind::Criteria => &mut self.criterion_entry,
        }
    }

    /// Blank input is ignored without a notice.
    fn add_manual(&mut self, kind: ListKind) {
        match kind {
            ListKind::Options => {
                let Some(option) = DecisionOption::new(&self.option_entry.input) else {
                    return;
                };
                self.options.push(option);
            }
            ListKind::Criteria => {
                let entry = &self.criterion_entry;
                let Some(criterion) = Criterion::new(&entry.input, entry.importance) else {
                    return;
                };
                self.criteria.push(criterion);
            }
        }
        let entry = self.entry_mut(kind);
        entry.input.clear();
        entry.visible = false;
    }

    fn add_suggested(&mut self, kind: ListKind) {
        match kind {
            ListKind::Options => self.options.extend_suggested(suggested_options()),
            ListKind::Criteria => self.criteria.extend_suggested(suggested_criteria()),
        }
    }

    /// Copy the locked decision to `clipboard`.
    ///
    /// Failures only produce a notice. Before locking there is nothing to
    /// copy and the call does nothing.
    pub fn copy_decision(&mut self, clipboard: &dyn Clipboard, now: Instant) {
        let Some(text) = self.decision.locked_text() else {
            return;
        };
        match clipboard.write_text(text) {
            Ok(()) => self.notices.post("Decision copied to clipboard", now),
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.notices.post("Copy failed", now);
            }
        }
    }

    // ── Final submission ─────────────────────────────────────────────────

    /// Preconditions for the final submit, in the order they are reported.
    fn check_submission(&self) -> Result<(), WorkflowError> {
        if !self.decision.is_locked() {
            return Err(WorkflowError::NotLocked);
        }
        if !self.options.is_submitted() {
            return Err(WorkflowError::OptionsNotSubmitted);
        }
        if !self.criteria.is_submitted() {
            return Err(WorkflowError::CriteriaNotSubmitted);
        }
        Ok(())
    }

    /// Build the payload from the locked snapshot.
    pub fn payload(&self) -> Option<SubmissionPayload> {
        let question = self.decision.locked_text()?.to_string();
        let style = self.rules.criteria_style;
        Some(SubmissionPayload {
            question,
            options: self
                .options
                .items()
                .iter()
                .map(|o| o.as_str().to_string())
                .collect(),
            criteria: self
                .criteria
                .items()
                .iter()
                .map(|c| WireCriterion::from_criterion(c, style))
                .collect(),
        })
    }

    /// Check the preconditions and, if they hold, disable the trigger and
    /// hand out the in-flight [`Submission`].
    ///
    /// The trigger is re-enabled when the returned guard is finished or
    /// dropped, whichever comes first.
    pub fn begin_submission(&mut self, now: Instant) -> Result<Submission<'_>, WorkflowError> {
        if let Err(e) = self.check_submission() {
            self.notices.post(e.to_string(), now);
            return Err(e);
        }
        let payload = self.payload().ok_or(WorkflowError::NotLocked)?;
        self.saving = true;
        self.final_status = "Saving...".to_string();
        Ok(Submission::new(self, payload))
    }

    pub(crate) fn record_outcome(
        &mut self,
        outcome: &Result<SaveReceipt, SubmitError>,
        now: Instant,
    ) {
        match outcome {
            Ok(receipt) => {
                self.notices.post("Saved", now);
                self.final_status = format!("Saved. Decision ID: {}", receipt.decision_id);
            }
            Err(e) => {
                self.notices.post(e.notice(), now);
                self.final_status = e.to_string();
            }
        }
    }

    /// The request never produced an outcome.
    pub(crate) fn record_abandoned(&mut self) {
        self.final_status = "Submit cancelled".to_string();
    }

    pub(crate) fn release_trigger(&mut self) {
        self.saving = false;
    }
}
