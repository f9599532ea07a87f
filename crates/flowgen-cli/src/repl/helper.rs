use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use super::command::COMMAND_NAMES;

const VIEW_ARGS: [&str; 3] = ["preview", "code", "toggle"];

/// Completion, highlighting and hints for the REPL.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<&'static str>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.to_vec(),
        }
    }

    fn is_command(&self, word: &str) -> bool {
        let word = word.strip_prefix('/').unwrap_or(word);
        self.commands.iter().any(|cmd| *cmd == word)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(arg) = line.strip_prefix("view ") {
            let start = pos - arg.len();
            let candidates = VIEW_ARGS
                .iter()
                .filter(|a| a.starts_with(arg))
                .map(|a| Pair {
                    display: a.to_string(),
                    replacement: a.to_string(),
                })
                .collect();
            return Ok((start, candidates));
        }

        if line.contains(char::is_whitespace) {
            return Ok((0, vec![]));
        }

        let (start, word) = match line.strip_prefix('/') {
            Some(word) => (1, word),
            None => (0, line),
        };
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split(char::is_whitespace).next().unwrap_or("");
        if self.is_command(first) {
            let rest = &line[first.len()..];
            Owned(format!("{}{}", first.bright_cyan(), rest))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        let word = line.strip_prefix('/').unwrap_or(line);

        if word.is_empty() || word.contains(char::is_whitespace) {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(word) && cmd.len() > word.len())
            .map(|cmd| cmd[word.len()..].to_string())
    }
}

impl Validator for CliHelper {}
