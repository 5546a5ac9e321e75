//! The line-oriented session: read a command, apply it to the store, reply.

use std::io::{BufRead, Write};

use exn::ResultExt;
use shelf_catalog::Edition;
use shelf_store::{Library, Store};
use tracing::instrument;

use crate::command::{Command, USAGE};
use crate::error::{ErrorKind, Result, explain};

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct Session {
    store: Store,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Read commands from `input` until it ends or a `quit`, writing replies
    /// to `out` and per-command errors to `diag`.
    ///
    /// Bad commands and refused operations are reported and skipped; only
    /// I/O failures end the session early.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, diag: &mut impl Write) -> Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line.or_raise(|| ErrorKind::Io)?;
            let outcome = Command::parse(&line).and_then(|command| match command {
                Some(command) => self.execute(command, out),
                None => Ok(Flow::Continue),
            });
            match outcome {
                Ok(Flow::Continue) => {},
                Ok(Flow::Quit) => break,
                Err(err) if err.is_recoverable() => {
                    let kind: &ErrorKind = &err;
                    tracing::debug!(line = number + 1, error = %kind, "command failed");
                    writeln!(diag, "error: {kind}").or_raise(|| ErrorKind::Io)?;
                },
                Err(err) => return Err(err),
            }
        }
        out.flush().or_raise(|| ErrorKind::Io)?;
        Ok(())
    }

    /// Apply one command.
    #[instrument(level = "debug", skip_all)]
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Acquire(edition) => {
                let copy = self.store.acquire(&edition);
                writeln!(out, "acquired {copy} {edition}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Checkout(copy) => {
                explain(self.store.checkout(copy), ErrorKind::Refused)?;
                writeln!(out, "checked out {copy}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Checkin(copy, condition) => {
                explain(self.store.checkin(copy, condition), ErrorKind::Refused)?;
                writeln!(out, "checked in {copy} ({condition})").or_raise(|| ErrorKind::Io)?;
            },
            Command::Inspect(copy, condition) => {
                explain(self.store.inspect(copy, condition), ErrorKind::Refused)?;
                writeln!(out, "{copy} is {condition}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Lose(copy) => {
                explain(self.store.lose(copy), ErrorKind::Refused)?;
                writeln!(out, "lost {copy}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Dispose(copy) => {
                explain(self.store.dispose(copy), ErrorKind::Refused)?;
                writeln!(out, "disposed of {copy}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Status(copy) => {
                let status = explain(self.store.status(copy), ErrorKind::Refused)?;
                writeln!(out, "{status}").or_raise(|| ErrorKind::Io)?;
            },
            Command::Copies(edition) => {
                let mut copies: Vec<_> = self.store.all_copies(&edition).into_iter().collect();
                if copies.is_empty() {
                    writeln!(out, "no copies of {edition}").or_raise(|| ErrorKind::Io)?;
                }
                copies.sort();
                for copy in copies {
                    let status = explain(self.store.status(copy), ErrorKind::Refused)?;
                    writeln!(out, "{status}").or_raise(|| ErrorKind::Io)?;
                }
            },
            Command::Find(query) => {
                let found = self.store.find(&query);
                if found.is_empty() {
                    writeln!(out, "nothing found for {query:?}").or_raise(|| ErrorKind::Io)?;
                }
                for edition in &found {
                    writeln!(out, "{}", self.holding(edition)).or_raise(|| ErrorKind::Io)?;
                }
            },
            Command::Search(words) => {
                let mut editions: Vec<_> = self.store.editions().collect();
                editions.sort();
                let found = shelf_tokenize::containing(&editions, &words, |edition| edition.title());
                if found.is_empty() {
                    writeln!(out, "no titles mention {}", words.join(" or ")).or_raise(|| ErrorKind::Io)?;
                }
                for edition in found {
                    writeln!(out, "{}", self.holding(edition)).or_raise(|| ErrorKind::Io)?;
                }
            },
            Command::Stats => writeln!(out, "{}", self.store.stats()).or_raise(|| ErrorKind::Io)?,
            Command::Help => writeln!(out, "{USAGE}").or_raise(|| ErrorKind::Io)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// `<edition>: <available>/<all> available`
    fn holding(&self, edition: &Edition) -> String {
        let all = self.store.all_copies(edition).len();
        let available = self.store.available_copies(edition).len();
        format!("{edition}: {available}/{all} available")
    }
}
