//! Ordered item lists with a submission gate.
//!
//! Every structural change closes the gate. The gate opens again only
//! through [`ItemList::submit`], and only when the list meets its minimum.

use tracing::debug;

use crate::error::WorkflowError;
use crate::model::{Criterion, DecisionOption, Importance, ListKind};

/// Placeholder options appended by "suggest". Stand-ins for a future
/// recommendation feature.
const SUGGESTED_OPTIONS: [&str; 3] = ["Option A", "Option B", "Option C"];

/// Placeholder criteria appended by "suggest", with preset importance.
const SUGGESTED_CRITERIA: [(&str, u8); 3] = [("Cost", 5), ("Performance", 4), ("Convenience", 3)];

pub fn suggested_options() -> Vec<DecisionOption> {
    SUGGESTED_OPTIONS
        .iter()
        .filter_map(|name| DecisionOption::new(name))
        .collect()
}

pub fn suggested_criteria() -> Vec<Criterion> {
    SUGGESTED_CRITERIA
        .iter()
        .filter_map(|(name, weight)| {
            let importance = Importance::new(*weight).ok()?;
            Criterion::new(name, importance)
        })
        .collect()
}

/// An ordered list of entries plus the gate recording whether the current
/// contents have been explicitly accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList<T> {
    kind: ListKind,
    items: Vec<T>,
    submitted: bool,
    status: String,
}

impl<T> ItemList<T> {
    pub fn new(kind: ListKind) -> Self {
        ItemList {
            kind,
            items: Vec::new(),
            submitted: false,
            status: format!("{} not submitted yet.", kind.label()),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `submit` has succeeded since the last add or remove.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// The status line shown under the list.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Append one manually entered item.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.invalidate(format!("{} updated (not submitted yet).", self.kind.label()));
    }

    /// Append the suggestion placeholders.
    pub fn extend_suggested(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
        self.invalidate(format!(
            "System suggested {} added (prototype).",
            self.kind.plural()
        ));
    }

    /// Remove the entry at `index`.
    ///
    /// An index outside the list is refused and nothing changes.
    pub fn remove(&mut self, index: usize) -> Result<T, WorkflowError> {
        if index >= self.items.len() {
            return Err(WorkflowError::NoSuchItem {
                kind: self.kind,
                index,
            });
        }
        let removed = self.items.remove(index);
        self.invalidate(format!("{} updated (not submitted yet).", self.kind.label()));
        Ok(removed)
    }

    /// Accept the current contents if there are at least `min` entries.
    ///
    /// On success returns the accepted count. On failure the gate is left
    /// exactly as it was.
    pub fn submit(&mut self, min: usize) -> Result<usize, WorkflowError> {
        if self.items.len() < min {
            return Err(WorkflowError::TooFewItems {
                kind: self.kind,
                min,
            });
        }
        self.submitted = true;
        self.status = format!("{} submitted ({})", self.kind.label(), self.items.len());
        debug!(list = self.kind.plural(), count = self.items.len(), "list submitted");
        Ok(self.items.len())
    }

    fn invalidate(&mut self, status: String) {
        self.submitted = false;
        self.status = status;
        debug!(list = self.kind.plural(), count = self.items.len(), "gate reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(names: &[&str]) -> ItemList<DecisionOption> {
        let mut list = ItemList::new(ListKind::Options);
        for name in names {
            list.push(DecisionOption::new(name).unwrap());
        }
        list
    }

    #[test]
    fn new_list_is_closed() {
        let list: ItemList<DecisionOption> = ItemList::new(ListKind::Options);
        assert!(list.is_empty());
        assert!(!list.is_submitted());
        assert_eq!(list.status(), "Options not submitted yet.");
    }

    #[test]
    fn submit_below_minimum_leaves_gate_closed() {
        let mut list = options(&["A"]);
        let err = list.submit(2).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::TooFewItems {
                kind: ListKind::Options,
                min: 2
            }
        );
        assert!(!list.is_submitted());
        assert_eq!(list.status(), "Options updated (not submitted yet).");
    }

    #[test]
    fn submit_below_minimum_keeps_open_gate_open() {
        let mut list = options(&["A", "B"]);
        list.submit(2).unwrap();
        // A stricter minimum on a second submit does not close the gate.
        assert!(list.submit(3).is_err());
        assert!(list.is_submitted());
    }

    #[test]
    fn submit_opens_gate_with_count() {
        let mut list = options(&["A", "B"]);
        assert_eq!(list.submit(2), Ok(2));
        assert!(list.is_submitted());
        assert_eq!(list.status(), "Options submitted (2)");
    }

    #[test]
    fn every_mutation_closes_gate() {
        let mut list = options(&["A", "B"]);
        list.submit(1).unwrap();
        list.push(DecisionOption::new("C").unwrap());
        assert!(!list.is_submitted());

        list.submit(1).unwrap();
        list.remove(0).unwrap();
        assert!(!list.is_submitted());

        list.submit(1).unwrap();
        list.extend_suggested(suggested_options());
        assert!(!list.is_submitted());
        assert_eq!(list.status(), "System suggested options added (prototype).");
    }

    #[test]
    fn remove_out_of_range_changes_nothing() {
        let mut list = options(&["A", "B"]);
        list.submit(2).unwrap();
        let err = list.remove(2).unwrap_err();
        assert_eq!(err.to_string(), "No such option: 3");
        assert_eq!(list.len(), 2);
        assert!(list.is_submitted());
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let mut list = options(&["A", "B", "C", "B"]);
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.as_str(), "B");
        let names: Vec<&str> = list.items().iter().map(|o| o.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn suggestions_are_fixed() {
        let names: Vec<String> = suggested_options()
            .iter()
            .map(|o| o.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["Option A", "Option B", "Option C"]);

        let criteria = suggested_criteria();
        assert_eq!(criteria.len(), 3);
        assert_eq!(criteria[0].name(), "Cost");
        assert_eq!(criteria[0].importance().get(), 5);
        assert_eq!(criteria[2].name(), "Convenience");
    }
}
