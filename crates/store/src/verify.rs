//! Internal consistency checking.
//!
//! [`Store::check_invariants`] walks the whole representation, so it is far
//! too slow for the lending hot path. [`Verification`] decides whether a store
//! runs it after each mutation.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{ErrorKind, Result};
use crate::store::Store;

/// When a store checks its own invariants after a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verification {
    /// Never check.
    Never,
    /// Check only in builds with debug assertions enabled (tests, dev builds).
    #[default]
    Debug,
    /// Check after every mutation, even in release builds.
    Always,
}
impl Verification {
    /// Returns `true` if the check should run in this build.
    pub fn enabled(&self) -> bool {
        match self {
            Self::Never => false,
            Self::Debug => cfg!(debug_assertions),
            Self::Always => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Debug => "debug",
            Self::Always => "always",
        }
    }
}
impl Display for Verification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! ensure {
    ($condition:expr, $($reason:tt)+) => {
        if !$condition {
            exn::bail!(ErrorKind::Inconsistent(format!($($reason)+)));
        }
    };
}

impl Store {
    /// Check every representation invariant, in time linear in the size of
    /// the store:
    ///
    /// - every live copy is either available or checked out, never both,
    ///   and nothing else is in either set;
    /// - each edition's holding holds exactly its live copies, and no
    ///   holding is empty;
    /// - an edition is indexed (under its title and every author) if and
    ///   only if it has a holding, and under no other key.
    ///
    /// Fails with [`Inconsistent`](ErrorKind::Inconsistent) describing the
    /// first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        let (smaller, larger) = match self.available.len() <= self.checked_out.len() {
            true => (&self.available, &self.checked_out),
            false => (&self.checked_out, &self.available),
        };
        if let Some(copy) = smaller.iter().find(|copy| larger.contains(copy)) {
            exn::bail!(ErrorKind::Inconsistent(format!("copy {copy} is both available and checked out")));
        }
        for (copy, _) in self.copies.iter() {
            ensure!(
                self.available.contains(&copy) || self.checked_out.contains(&copy),
                "record {copy} is neither available nor checked out"
            );
        }
        ensure!(
            self.available.len() + self.checked_out.len() == self.copies.len(),
            "{} available + {} checked out != {} live copies",
            self.available.len(),
            self.checked_out.len(),
            self.copies.len()
        );
        if let Some(copy) = self.available.iter().chain(&self.checked_out).find(|copy| !self.copies.contains(**copy)) {
            exn::bail!(ErrorKind::Inconsistent(format!("copy {copy} is shelved but has no record")));
        }

        let mut held = 0;
        for (edition, bucket) in &self.holdings {
            ensure!(!bucket.is_empty(), "empty holding kept for {edition}");
            for copy in bucket {
                let record = self.copies.get(*copy);
                ensure!(
                    record.is_some_and(|record| record.edition == *edition),
                    "copy {copy} is held under {edition} but isn't a copy of it"
                );
            }
            ensure!(self.index.contains(edition), "{edition} has copies but isn't fully indexed");
            held += bucket.len();
        }
        ensure!(held == self.copies.len(), "{held} held copies != {} live copies", self.copies.len());

        for (key, edition) in self.index.entries() {
            ensure!(self.holdings.contains_key(edition), "{edition} is indexed under {key:?} without any copies");
            ensure!(key.fits(edition), "{edition} is filed under {key:?}, which doesn't name it");
        }
        if let Some(key) = self.index.empty_bucket() {
            exn::bail!(ErrorKind::Inconsistent(format!("empty index bucket kept for {key:?}")));
        }
        Ok(())
    }
}
