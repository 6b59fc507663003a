//! Transaction script parsing.
//!
//! A script is one command per line:
//!
//! ```text
//! # comment
//! BEGIN
//! PUT A 1
//! GET A
//! COMMIT
//! ```
//!
//! Verbs are case-insensitive. The value of `PUT` is the rest of the line,
//! so it may contain spaces.

use crate::error::CliError;

/// A single script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a transaction.
    Begin,
    /// Write a key in the open transaction.
    Put {
        /// Key to write.
        key: String,
        /// Value to write.
        value: String,
    },
    /// Read a key.
    Get {
        /// Key to read.
        key: String,
    },
    /// Commit the open transaction.
    Commit,
    /// Roll back the open transaction.
    Rollback,
    /// Print the store's counters.
    Stats,
}

impl Command {
    /// Returns the upper-case verb of this command.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Put { .. } => "PUT",
            Self::Get { .. } => "GET",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
            Self::Stats => "STATS",
        }
    }
}

/// A parsed command with its source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based line number.
    pub line: usize,
    /// The command on that line.
    pub command: Command,
}

/// Parses a whole script.
///
/// Blank lines and lines starting with `#` are skipped. The first malformed
/// line aborts parsing.
pub fn parse(source: &str) -> Result<Vec<Statement>, CliError> {
    let mut statements = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let command = parse_line(text).map_err(|message| CliError::parse(line, message))?;
        statements.push(Statement { line, command });
    }
    Ok(statements)
}

fn parse_line(text: &str) -> Result<Command, String> {
    let (verb, rest) = split_token(text);
    match verb.to_ascii_uppercase().as_str() {
        "BEGIN" => no_args(Command::Begin, rest),
        "COMMIT" => no_args(Command::Commit, rest),
        "ROLLBACK" => no_args(Command::Rollback, rest),
        "STATS" => no_args(Command::Stats, rest),
        "GET" => {
            let (key, extra) = split_token(rest);
            if key.is_empty() {
                return Err("GET requires a key".to_string());
            }
            if !extra.is_empty() {
                return Err(format!("unexpected argument after GET {key}: {extra}"));
            }
            Ok(Command::Get {
                key: key.to_string(),
            })
        }
        "PUT" => {
            let (key, value) = split_token(rest);
            if key.is_empty() || value.is_empty() {
                return Err("PUT requires a key and a value".to_string());
            }
            Ok(Command::Put {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
        other => Err(format!("unknown command: {other}")),
    }
}

fn no_args(command: Command, rest: &str) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("{} takes no arguments", command.verb()))
    }
}

/// Splits off the first whitespace-delimited token; the remainder is trimmed.
fn split_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (text, ""),
    }
}
