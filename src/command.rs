//! Parsing of session command lines.

use std::str::FromStr;

use shelf_catalog::{Condition, Edition};
use shelf_store::CopyId;

use crate::error::{ErrorKind, Result, explain};

pub const USAGE: &str = "\
commands:
  acquire <title> | <author>[, <author>...] | <year>   add a new copy, prints its handle
  checkout <copy>                                      lend an available copy
  checkin <copy> [good|damaged]                        return a copy (default: good)
  inspect <copy> <good|damaged>                        record a copy's condition
  lose <copy>                                          forget a copy, lent or not
  dispose <copy>                                       withdraw a copy from the shelf
  status <copy>                                        describe one copy
  copies <title> | <authors> | <year>                  list the copies of an edition
  find <query>                                         editions by exact title or author
  search <word> [<word>...]                            editions whose title has any word
  stats                                                store counts
  help                                                 this message
  quit                                                 end the session";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Acquire(Edition),
    Checkout(CopyId),
    Checkin(CopyId, Condition),
    Inspect(CopyId, Condition),
    Lose(CopyId),
    Dispose(CopyId),
    Status(CopyId),
    Copies(Edition),
    Find(String),
    Search(Vec<String>),
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb.to_lowercase().as_str() {
            "acquire" | "add" => Self::Acquire(edition(rest, "acquire")?),
            "checkout" | "out" => Self::Checkout(copy(rest, "checkout")?),
            "checkin" | "in" => {
                let (handle, condition) = split_last(rest);
                let condition = match condition {
                    Some(condition) => parse_condition(condition)?,
                    None => Condition::default(),
                };
                Self::Checkin(copy(handle, "checkin")?, condition)
            },
            "inspect" => match split_last(rest) {
                (handle, Some(condition)) => Self::Inspect(copy(handle, "inspect")?, parse_condition(condition)?),
                (_, None) => exn::bail!(usage("inspect <copy> <good|damaged>")),
            },
            "lose" => Self::Lose(copy(rest, "lose")?),
            "dispose" => Self::Dispose(copy(rest, "dispose")?),
            "status" => Self::Status(copy(rest, "status")?),
            "copies" => Self::Copies(edition(rest, "copies")?),
            "find" => match rest.is_empty() {
                true => exn::bail!(usage("find <query>")),
                false => Self::Find(rest.to_string()),
            },
            "search" => {
                let words: Vec<String> = shelf_tokenize::words(rest).map(str::to_string).collect();
                if words.is_empty() {
                    exn::bail!(usage("search <word> [<word>...]"));
                }
                Self::Search(words)
            },
            "stats" => no_arguments(rest, Self::Stats, "stats")?,
            "help" | "?" => Self::Help,
            "quit" | "exit" => no_arguments(rest, Self::Quit, "quit")?,
            other => exn::bail!(ErrorKind::Command(format!("unknown command: {other} (try `help`)"))),
        };
        Ok(Some(command))
    }
}

impl FromStr for Command {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)?.ok_or_else(|| exn::Exn::from(ErrorKind::Command("empty command".to_string())))
    }
}

fn usage(form: &str) -> ErrorKind {
    ErrorKind::Command(format!("usage: {form}"))
}

fn no_arguments(rest: &str, command: Command, verb: &str) -> Result<Command> {
    match rest.is_empty() {
        true => Ok(command),
        false => exn::bail!(usage(verb)),
    }
}

/// Split off the last whitespace-separated word, if there are at least two.
fn split_last(text: &str) -> (&str, Option<&str>) {
    match text.rsplit_once(char::is_whitespace) {
        Some((head, last)) => (head.trim(), Some(last)),
        None => (text, None),
    }
}

fn copy(text: &str, verb: &str) -> Result<CopyId> {
    if text.is_empty() {
        exn::bail!(usage(&format!("{verb} <copy>")));
    }
    explain(text.parse::<CopyId>(), ErrorKind::Command)
}

fn parse_condition(text: &str) -> Result<Condition> {
    explain(text.parse::<Condition>(), ErrorKind::Command)
}

/// `<title> | <author>[, <author>...] | <year>`
fn edition(text: &str, verb: &str) -> Result<Edition> {
    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    let [title, authors, year] = fields[..] else {
        exn::bail!(usage(&format!("{verb} <title> | <author>[, <author>...] | <year>")));
    };
    let authors: Vec<&str> = match authors.is_empty() {
        true => Vec::new(),
        false => authors.split(',').map(str::trim).collect(),
    };
    let Ok(year) = year.parse::<i32>() else {
        exn::bail!(ErrorKind::Command(format!("not a year: {year:?}")));
    };
    explain(Edition::new(title, authors, year), ErrorKind::Command)
}
