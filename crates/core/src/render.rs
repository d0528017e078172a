//! Pure projection of a [`Session`] into what the presentation layer shows.
//!
//! `render` reads state and never changes it, so rendering twice with no
//! transition in between yields identical views.

use std::fmt;
use std::time::Instant;

use crate::lock::DecisionLock;
use crate::model::{CriteriaStyle, ListKind};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub decision: DecisionView,
    pub options: ListView,
    pub criteria: ListView,
    /// Title of the open add dialog.
    pub dialog: Option<String>,
    pub final_status: String,
    pub submit_enabled: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionView {
    Editing { draft: String },
    /// The locked snapshot with its copy affordance.
    Locked { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub kind: ListKind,
    pub status: String,
    pub pills: Vec<Pill>,
    /// Current text of the manual entry, when it is shown.
    pub manual_entry: Option<String>,
}

/// One removable entry. `index` is what a remove action must name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pill {
    pub index: usize,
    pub label: String,
}

pub fn render(session: &Session, now: Instant) -> View {
    let decision = match session.decision() {
        DecisionLock::Editable { draft } => DecisionView::Editing {
            draft: draft.clone(),
        },
        DecisionLock::Locked { text } => DecisionView::Locked { text: text.clone() },
    };

    let options = ListView {
        kind: ListKind::Options,
        status: session.options().status().to_string(),
        pills: session
            .options()
            .items()
            .iter()
            .enumerate()
            .map(|(index, option)| Pill {
                index,
                label: option.as_str().to_string(),
            })
            .collect(),
        manual_entry: manual_entry_text(session, ListKind::Options),
    };

    let weighted = session.rules().criteria_style == CriteriaStyle::Weighted;
    let criteria = ListView {
        kind: ListKind::Criteria,
        status: session.criteria().status().to_string(),
        pills: session
            .criteria()
            .items()
            .iter()
            .enumerate()
            .map(|(index, criterion)| Pill {
                index,
                label: if weighted {
                    format!("{} [{}/5]", criterion.name(), criterion.importance())
                } else {
                    criterion.name().to_string()
                },
            })
            .collect(),
        manual_entry: manual_entry_text(session, ListKind::Criteria),
    };

    View {
        decision,
        options,
        criteria,
        dialog: session.dialog().map(|kind| match kind {
            ListKind::Options => "Add Option".to_string(),
            ListKind::Criteria => "Add Criterion".to_string(),
        }),
        final_status: session.final_status().to_string(),
        submit_enabled: !session.is_saving(),
        notice: session
            .notices()
            .current(now)
            .map(|notice| notice.message.clone()),
    }
}

fn manual_entry_text(session: &Session, kind: ListKind) -> Option<String> {
    let entry = session.manual_entry(kind);
    entry.visible.then(|| entry.input.clone())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decision {
            DecisionView::Editing { draft } => writeln!(f, "Decision: {} (editing)", draft)?,
            DecisionView::Locked { text } => writeln!(f, "Decision: {} (locked, copy)", text)?,
        }
        writeln!(f)?;
        write!(f, "{}", self.options)?;
        writeln!(f)?;
        write!(f, "{}", self.criteria)?;
        writeln!(f)?;
        if let Some(title) = &self.dialog {
            writeln!(f, "[{}] manual | suggest | cancel", title)?;
        }
        let trigger = if self.submit_enabled {
            "ready"
        } else {
            "disabled"
        };
        writeln!(f, "Final submit ({}): {}", trigger, self.final_status)?;
        if let Some(notice) = &self.notice {
            writeln!(f, ">> {}", notice)?;
        }
        Ok(())
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind.label(), self.status)?;
        if self.pills.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for pill in &self.pills {
            writeln!(f, "  [{}] {} x", pill.index + 1, pill.label)?;
        }
        if let Some(input) = &self.manual_entry {
            writeln!(f, "  + {}_", input)?;
        }
        Ok(())
    }
}
