//! Line-oriented command input from stdin.
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use report_core::{Msg, ReportId};

/// What the main loop receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbox {
    Msg(Msg),
    /// A line typed on stdin, interpreted by the main loop.
    Line(String),
    Quit,
}

/// Delete prompts waiting for a y/n answer, oldest first.
///
/// Owned by the main loop, which opens prompts and reads typed lines in the
/// same order the user produced them.
#[derive(Debug, Default)]
pub struct Confirmations {
    pending: VecDeque<ReportId>,
}

impl Confirmations {
    pub fn ask(&mut self, id: ReportId) {
        self.pending.push_back(id);
    }

    pub fn front(&self) -> Option<ReportId> {
        self.pending.front().copied()
    }

    /// Answers the oldest open prompt with `line`, or parses it as a command
    /// when no prompt is open.
    pub fn interpret(&mut self, line: &str, default_title: &str) -> Option<Inbox> {
        match self.pending.pop_front() {
            Some(id) => Some(parse_answer(id, line)),
            None => parse_command(line, default_title),
        }
    }
}

/// Forwards stdin lines to the main loop until EOF.
pub fn spawn_reader(inbox_tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if inbox_tx.send(Inbox::Line(line)).is_err() {
                return;
            }
        }
        let _ = inbox_tx.send(Inbox::Quit);
    });
}

pub const HELP: &str = "commands: new [title] | del <id> | refresh | dismiss | quit";

pub fn parse_command(line: &str, default_title: &str) -> Option<Inbox> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb.to_ascii_lowercase().as_str() {
        "new" | "n" => {
            let title = if rest.is_empty() { default_title } else { rest };
            Msg::CreateClicked {
                title: title.to_string(),
            }
        }
        "del" | "delete" | "d" => Msg::DeleteClicked {
            id: rest.trim_start_matches('#').parse().ok()?,
        },
        "refresh" | "r" => Msg::PollTick,
        "dismiss" => Msg::NoticeDismissed,
        "quit" | "exit" | "q" => return Some(Inbox::Quit),
        _ => return None,
    };
    Some(Inbox::Msg(msg))
}

/// Only an explicit yes confirms.
pub fn parse_answer(id: ReportId, line: &str) -> Inbox {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Inbox::Msg(Msg::DeleteConfirmed { id }),
        _ => Inbox::Msg(Msg::DeleteCancelled { id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_title_when_none_given() {
        assert_eq!(
            parse_command("new", "Generated from UI"),
            Some(Inbox::Msg(Msg::CreateClicked {
                title: "Generated from UI".to_string()
            }))
        );
        assert_eq!(
            parse_command("  new   Monthly numbers ", "x"),
            Some(Inbox::Msg(Msg::CreateClicked {
                title: "Monthly numbers".to_string()
            }))
        );
    }

    #[test]
    fn delete_requires_numeric_id() {
        assert_eq!(
            parse_command("del #12", "x"),
            Some(Inbox::Msg(Msg::DeleteClicked { id: 12 }))
        );
        assert_eq!(parse_command("del twelve", "x"), None);
        assert_eq!(parse_command("del", "x"), None);
    }

    #[test]
    fn other_verbs() {
        assert_eq!(parse_command("refresh", "x"), Some(Inbox::Msg(Msg::PollTick)));
        assert_eq!(parse_command("QUIT", "x"), Some(Inbox::Quit));
        assert_eq!(parse_command("dance", "x"), None);
    }

    #[test]
    fn only_yes_confirms() {
        assert_eq!(parse_answer(3, "Y"), Inbox::Msg(Msg::DeleteConfirmed { id: 3 }));
        assert_eq!(parse_answer(3, "yes "), Inbox::Msg(Msg::DeleteConfirmed { id: 3 }));
        assert_eq!(parse_answer(3, ""), Inbox::Msg(Msg::DeleteCancelled { id: 3 }));
        assert_eq!(parse_answer(3, "nope"), Inbox::Msg(Msg::DeleteCancelled { id: 3 }));
    }

    #[test]
    fn confirmations_are_answered_in_order() {
        let mut confirmations = Confirmations::default();
        confirmations.ask(4);
        confirmations.ask(9);
        assert_eq!(confirmations.front(), Some(4));
        assert_eq!(
            confirmations.interpret("y", "x"),
            Some(Inbox::Msg(Msg::DeleteConfirmed { id: 4 }))
        );
        assert_eq!(
            confirmations.interpret("n", "x"),
            Some(Inbox::Msg(Msg::DeleteCancelled { id: 9 }))
        );
        assert_eq!(confirmations.front(), None);
    }

    #[test]
    fn answer_typed_ahead_of_the_prompt_still_answers_it() {
        let mut confirmations = Confirmations::default();
        // Both lines are queued before the main loop gets to either one.
        let lines = ["del 3", "y"];

        let clicked = confirmations.interpret(lines[0], "x");
        assert_eq!(clicked, Some(Inbox::Msg(Msg::DeleteClicked { id: 3 })));
        // Handling the click opens the prompt before the next line is read.
        confirmations.ask(3);

        assert_eq!(
            confirmations.interpret(lines[1], "x"),
            Some(Inbox::Msg(Msg::DeleteConfirmed { id: 3 }))
        );
    }

    #[test]
    fn without_prompt_n_is_the_new_command() {
        let mut confirmations = Confirmations::default();
        assert_eq!(
            confirmations.interpret("n", "Generated from UI"),
            Some(Inbox::Msg(Msg::CreateClicked {
                title: "Generated from UI".to_string()
            }))
        );
    }
}
