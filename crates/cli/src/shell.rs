//! `decider session` -- interactive shell over one workflow session.
//!
//! Each command maps to one workflow action. After every command the session
//! is rendered again, so refused actions show up as the current notice.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use decider_client::HttpSaveEndpoint;
use decider_core::{
    render, submit_decision, Action, Clipboard, Importance, ListKind, SaveEndpoint, Session,
};
use tracing::debug;

use crate::clipboard::CommandClipboard;
use crate::config::DeciderConfig;

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Render,
    Print(String),
    Quit,
}

pub(crate) struct Shell {
    session: Session,
    endpoint: Box<dyn SaveEndpoint>,
    clipboard: Box<dyn Clipboard>,
    runtime: tokio::runtime::Runtime,
}

impl Shell {
    pub(crate) fn new(
        session: Session,
        endpoint: Box<dyn SaveEndpoint>,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("failed to start runtime: {}", e))?;
        Ok(Shell {
            session,
            endpoint,
            clipboard,
            runtime,
        })
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command line. `Err` carries a usage message.
    pub(crate) fn execute(&mut self, line: &str) -> Result<Outcome, String> {
        let (cmd, rest) = match line.trim().split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.trim().to_lowercase(), ""),
        };

        match cmd.as_str() {
            "help" => Ok(Outcome::Print(help_text())),
            "show" => Ok(Outcome::Render),
            "decide" => {
                self.apply(Action::EditDecision(rest.to_string()));
                Ok(Outcome::Render)
            }
            "lock" => {
                self.apply(Action::LockDecision);
                Ok(Outcome::Render)
            }
            "copy" => {
                self.session
                    .copy_decision(self.clipboard.as_ref(), Instant::now());
                Ok(Outcome::Render)
            }
            "option" | "options" => self.list_command(ListKind::Options, rest),
            "criterion" | "criteria" => self.list_command(ListKind::Criteria, rest),
            "importance" => {
                let value = rest
                    .parse::<u8>()
                    .map_err(|_| "usage: importance <1-5>".to_string())?;
                let importance = Importance::new(value).map_err(|e| e.to_string())?;
                self.apply(Action::SetManualImportance(importance));
                Ok(Outcome::Render)
            }
            "dialog" => {
                let kind = parse_kind(rest).ok_or("usage: dialog option|criterion")?;
                self.apply(Action::OpenAddDialog(kind));
                Ok(Outcome::Render)
            }
            "manual" => {
                self.apply(Action::ChooseManual);
                Ok(Outcome::Render)
            }
            "suggest" => {
                self.apply(Action::ChooseSuggested);
                Ok(Outcome::Render)
            }
            "cancel" => {
                self.apply(Action::CloseAddDialog);
                Ok(Outcome::Render)
            }
            "submit" => {
                let endpoint = self.endpoint.as_ref();
                let session = &mut self.session;
                if let Err(e) = self.runtime.block_on(submit_decision(session, endpoint)) {
                    debug!(error = %e, "final submit did not complete");
                }
                Ok(Outcome::Render)
            }
            "quit" | "exit" => Ok(Outcome::Quit),
            _ => Err(format!(
                "unknown command: {}. Type 'help' for available commands.",
                cmd
            )),
        }
    }

    /// `option|criterion <verb> [args]`
    fn list_command(&mut self, kind: ListKind, rest: &str) -> Result<Outcome, String> {
        let (verb, arg) = rest
            .split_once(char::is_whitespace)
            .map(|(v, a)| (v, a.trim()))
            .unwrap_or((rest, ""));
        let noun = kind.singular();

        match verb {
            "add" => {
                if !arg.is_empty() {
                    self.apply(Action::EditManualEntry(kind, arg.to_string()));
                }
                self.apply(Action::AddManual(kind));
            }
            "type" => self.apply(Action::EditManualEntry(kind, arg.to_string())),
            "suggest" => self.apply(Action::AddSuggested(kind)),
            "rm" | "remove" => {
                let position = arg
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| format!("usage: {} rm <number>", noun))?;
                self.apply(Action::Remove(kind, position - 1));
            }
            "submit" => self.apply(Action::SubmitList(kind)),
            _ => {
                return Err(format!(
                    "usage: {} add [text] | type <text> | suggest | rm <number> | submit",
                    noun
                ))
            }
        }
        Ok(Outcome::Render)
    }

    /// Refused actions already surface as the session's notice.
    fn apply(&mut self, action: Action) {
        let _ = self.session.dispatch(action);
    }
}

fn parse_kind(word: &str) -> Option<ListKind> {
    match word {
        "option" | "options" => Some(ListKind::Options),
        "criterion" | "criteria" => Some(ListKind::Criteria),
        _ => None,
    }
}

fn help_text() -> String {
    [
        "",
        "  decide <text>              Edit the decision statement",
        "  lock                       Lock the decision",
        "  copy                       Copy the locked decision to the clipboard",
        "  option add [text]          Add an option (or the typed entry)",
        "  option type <text>         Type into the option entry",
        "  option suggest             Add suggested options",
        "  option rm <n>              Remove option n",
        "  option submit              Submit the options",
        "  criterion ...              Same verbs for criteria",
        "  importance <1-5>           Importance for the next manual criterion",
        "  dialog option|criterion    Open the add dialog",
        "  manual | suggest | cancel  Answer the open dialog",
        "  submit                     Save the decision",
        "  show                       Show the session",
        "  quit                       Leave",
        "",
    ]
    .join("\n")
}

/// Run the interactive shell on stdin/stdout.
pub fn run_shell(config: &DeciderConfig) -> Result<(), String> {
    let endpoint = HttpSaveEndpoint::new(config.endpoint.base_url.clone())
        .with_submit_path(config.endpoint.submit_path.clone());
    let clipboard = CommandClipboard::from_command_line(config.clipboard.command.as_deref());
    let mut shell = Shell::new(
        Session::new(config.rules()),
        Box::new(endpoint),
        Box::new(clipboard),
    )?;

    println!();
    println!("  Decider session (saving to {})", config.endpoint.base_url);
    println!("  Type 'help' for commands.");
    println!();
    print!("{}", render(shell.session(), Instant::now()));

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("decider> ");
        if io::stdout().flush().is_err() {
            break;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(format!("error reading input: {}", e)),
        }
        if line.trim().is_empty() {
            continue;
        }

        match shell.execute(&line) {
            Ok(Outcome::Render) => {
                println!();
                print!("{}", render(shell.session(), Instant::now()));
            }
            Ok(Outcome::Print(text)) => println!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(usage) => eprintln!("{}", usage),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use decider_core::{
        ClipboardError, EndpointResponse, SubmissionPayload, TransportError,
    };

    struct CannedEndpoint {
        response: EndpointResponse,
        seen: Mutex<Vec<SubmissionPayload>>,
    }

    #[async_trait]
    impl SaveEndpoint for CannedEndpoint {
        async fn post(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<EndpointResponse, TransportError> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(self.response.clone())
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        text: RefCell<Option<String>>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    fn shell() -> Shell {
        let endpoint = CannedEndpoint {
            response: EndpointResponse::json(
                200,
                &serde_json::json!({"ok": true, "decision_id": 5}),
            ),
            seen: Mutex::new(Vec::new()),
        };
        Shell::new(
            Session::default(),
            Box::new(endpoint),
            Box::new(MemoryClipboard::default()),
        )
        .unwrap()
    }

    fn run(shell: &mut Shell, lines: &[&str]) {
        for line in lines {
            shell.execute(line).unwrap();
        }
    }

    fn notice(shell: &Shell) -> String {
        render(shell.session(), Instant::now())
            .notice
            .unwrap_or_default()
    }

    #[test]
    fn full_walkthrough_saves() {
        let mut sh = shell();
        run(
            &mut sh,
            &[
                "decide Which bike?",
                "lock",
                "option add Road",
                "option add Gravel",
                "option submit",
                "importance 4",
                "criterion add Weight",
                "criterion submit",
                "submit",
            ],
        );
        assert_eq!(sh.session().final_status(), "Saved. Decision ID: 5");
        assert_eq!(notice(&sh), "Saved");
    }

    #[test]
    fn remove_uses_one_based_positions() {
        let mut sh = shell();
        run(&mut sh, &["option suggest", "option rm 1"]);
        let labels: Vec<&str> = sh
            .session()
            .options()
            .items()
            .iter()
            .map(|o| o.as_str())
            .collect();
        assert_eq!(labels, vec!["Option B", "Option C"]);

        run(&mut sh, &["option rm 9"]);
        assert_eq!(notice(&sh), "No such option: 9");
        assert!(sh.execute("option rm 0").is_err());
    }

    #[test]
    fn dialog_manual_then_typed_entry() {
        let mut sh = shell();
        run(
            &mut sh,
            &["dialog criterion", "manual", "criterion type Noise", "criterion add"],
        );
        assert_eq!(sh.session().criteria().items()[0].name(), "Noise");
        assert!(!sh.session().manual_entry(ListKind::Criteria).visible);
    }

    #[test]
    fn submit_before_lock_is_refused_with_notice() {
        let mut sh = shell();
        run(&mut sh, &["submit"]);
        assert_eq!(notice(&sh), "Lock the decision first");
        assert_eq!(sh.session().final_status(), "");
    }

    #[test]
    fn copy_after_lock() {
        let mut sh = shell();
        run(&mut sh, &["copy", "decide  Sell the car? ", "lock", "copy"]);
        assert_eq!(notice(&sh), "Decision copied to clipboard");
    }

    #[test]
    fn usage_errors_and_quit() {
        let mut sh = shell();
        assert!(sh.execute("frobnicate").is_err());
        assert!(sh.execute("importance 7").is_err());
        assert!(sh.execute("dialog nothing").is_err());
        assert!(sh.execute("option").is_err());
        assert_eq!(sh.execute("help").unwrap(), Outcome::Print(help_text()));
        assert_eq!(sh.execute("QUIT").unwrap(), Outcome::Quit);
    }
}
