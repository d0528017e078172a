//! `decider submit` -- replay a decision file through the workflow and save it.
//!
//! The file goes through the same actions an interactive session would use,
//! so it is held to the same rules (lock, minimums, importance range).
//!
//! ```toml
//! question = "Which city?"
//! options = ["Oslo", "Lisbon"]
//! criteria = ["Climate", { name = "Rent", importance = 5 }]
//! ```

use std::path::Path;
use std::time::Instant;

use decider_client::HttpSaveEndpoint;
use decider_core::{
    submit_decision, Action, Importance, ListKind, SaveEndpoint, Session, WireCriterion,
    WorkflowRules,
};
use serde::Deserialize;
use tracing::info;

use crate::config::DeciderConfig;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DecisionFile {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub criteria: Vec<WireCriterion>,
}

impl DecisionFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("invalid decision file '{}': {}", path.display(), e))
    }

    /// Build a session ready for final submit. The first refused action
    /// aborts the replay with its notice text.
    pub fn replay(&self, rules: WorkflowRules) -> Result<Session, String> {
        let mut session = Session::new(rules);
        let now = Instant::now();
        let step = |session: &mut Session, action: Action| {
            session.dispatch_at(action, now).map_err(|e| e.to_string())
        };

        step(&mut session, Action::EditDecision(self.question.clone()))?;
        step(&mut session, Action::LockDecision)?;

        for option in &self.options {
            step(
                &mut session,
                Action::EditManualEntry(ListKind::Options, option.clone()),
            )?;
            step(&mut session, Action::AddManual(ListKind::Options))?;
        }
        step(&mut session, Action::SubmitList(ListKind::Options))?;

        for criterion in &self.criteria {
            let importance = match criterion.importance() {
                Some(value) => Importance::new(value).map_err(|e| e.to_string())?,
                None => Importance::default(),
            };
            step(&mut session, Action::SetManualImportance(importance))?;
            step(
                &mut session,
                Action::EditManualEntry(ListKind::Criteria, criterion.name().to_string()),
            )?;
            step(&mut session, Action::AddManual(ListKind::Criteria))?;
        }
        step(&mut session, Action::SubmitList(ListKind::Criteria))?;

        Ok(session)
    }
}

/// Submit `file` and return the final status line.
pub async fn submit_file<E>(
    file: &DecisionFile,
    rules: WorkflowRules,
    endpoint: &E,
) -> Result<String, String>
where
    E: SaveEndpoint + ?Sized,
{
    let mut session = file.replay(rules)?;
    match submit_decision(&mut session, endpoint).await {
        Ok(receipt) => {
            info!(decision_id = %receipt.decision_id, "decision file saved");
            Ok(session.final_status().to_string())
        }
        Err(e) => {
            let status = session.final_status();
            Err(if status.is_empty() || status == "Saving..." {
                e.to_string()
            } else {
                status.to_string()
            })
        }
    }
}

pub async fn run_submit(path: &Path, config: &DeciderConfig) -> Result<String, String> {
    let file = DecisionFile::load(path)?;
    let endpoint = HttpSaveEndpoint::new(config.endpoint.base_url.clone())
        .with_submit_path(config.endpoint.submit_path.clone());
    submit_file(&file, config.rules(), &endpoint).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use decider_core::{CriteriaStyle, EndpointResponse, SubmissionPayload, TransportError};
    use std::sync::Mutex;

    struct Recorder {
        response: EndpointResponse,
        seen: Mutex<Vec<serde_json::Value>>,
    }

    impl Recorder {
        fn ok() -> Self {
            Recorder {
                response: EndpointResponse::json(
                    200,
                    &serde_json::json!({"ok": true, "decision_id": "abc"}),
                ),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SaveEndpoint for Recorder {
        async fn post(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<EndpointResponse, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push(serde_json::to_value(payload).unwrap());
            Ok(self.response.clone())
        }
    }

    fn parse(text: &str) -> DecisionFile {
        toml::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn file_is_saved_with_both_criterion_shapes() {
        let file = parse(
            r#"
question = " Which city? "
options = ["Oslo", "Lisbon"]
criteria = ["Climate", { name = "Rent", importance = 5 }]
"#,
        );
        let endpoint = Recorder::ok();
        let status = submit_file(&file, WorkflowRules::default(), &endpoint)
            .await
            .unwrap();
        assert_eq!(status, "Saved. Decision ID: abc");
        assert_eq!(
            endpoint.seen.lock().unwrap()[0],
            serde_json::json!({
                "question": "Which city?",
                "options": ["Oslo", "Lisbon"],
                "criteria": [
                    {"name": "Climate", "importance": 3},
                    {"name": "Rent", "importance": 5},
                ],
            })
        );
    }

    #[tokio::test]
    async fn plain_style_sends_names() {
        let file = parse("question = \"q\"\noptions = [\"a\", \"b\"]\ncriteria = [\"c\"]\n");
        let endpoint = Recorder::ok();
        let rules = WorkflowRules {
            criteria_style: CriteriaStyle::Plain,
            ..WorkflowRules::default()
        };
        submit_file(&file, rules, &endpoint).await.unwrap();
        assert_eq!(
            endpoint.seen.lock().unwrap()[0]["criteria"],
            serde_json::json!(["c"])
        );
    }

    #[test]
    fn too_few_options_stops_replay() {
        let file = parse("question = \"q\"\noptions = [\"a\", \"  \"]\ncriteria = [\"c\"]\n");
        let err = file.replay(WorkflowRules::default()).unwrap_err();
        assert_eq!(err, "Add at least 2 options");
    }

    #[test]
    fn blank_question_stops_replay() {
        let file = parse("question = \" \"\noptions = [\"a\", \"b\"]\n");
        assert_eq!(
            file.replay(WorkflowRules::default()).unwrap_err(),
            "Type a decision first"
        );
    }

    #[test]
    fn missing_criteria_stops_replay() {
        let file = parse("question = \"q\"\noptions = [\"a\", \"b\"]\n");
        assert_eq!(
            file.replay(WorkflowRules::default()).unwrap_err(),
            "Add at least 1 criterion"
        );
    }

    #[tokio::test]
    async fn endpoint_failure_returns_status() {
        let file = parse("question = \"q\"\noptions = [\"a\", \"b\"]\ncriteria = [\"c\"]\n");
        let endpoint = Recorder {
            response: EndpointResponse::json(
                500,
                &serde_json::json!({"ok": false, "error": "db down"}),
            ),
            seen: Mutex::new(Vec::new()),
        };
        let err = submit_file(&file, WorkflowRules::default(), &endpoint)
            .await
            .unwrap_err();
        assert_eq!(err, "db down");
    }
}
