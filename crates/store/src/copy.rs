//! Copy handles and records.
//!
//! A copy is one physical, individually trackable instance of an
//! [`Edition`]. Copies are owned by the store; callers only ever hold a
//! [`CopyId`], so two copies of the same edition are always distinguishable.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use shelf_catalog::{Condition, Edition};

use crate::error::{Error, ErrorKind};

/// Opaque handle to a copy held by a store.
///
/// Equality is handle equality. Handles are generational: once a copy is lost
/// or disposed of, its handle stays dead even if the store reuses the slot for
/// a later acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl Display for CopyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Parses the [`Display`] form, `#<index>.<generation>`. The leading `#` is
/// optional.
impl FromStr for CopyId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidCopyId(s.to_string());
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let Some((index, generation)) = digits.split_once('.') else {
            exn::bail!(invalid());
        };
        match (index.parse(), generation.parse()) {
            (Ok(index), Ok(generation)) => Ok(Self { index, generation }),
            _ => exn::bail!(invalid()),
        }
    }
}

/// State of one live copy.
#[derive(Debug, Clone)]
pub(crate) struct CopyRecord {
    pub(crate) edition: Arc<Edition>,
    pub(crate) condition: Condition,
}
impl CopyRecord {
    /// New copies always start in [`Condition::Good`].
    pub(crate) fn new(edition: Arc<Edition>) -> Self {
        Self { edition, condition: Condition::default() }
    }
}

/// Point-in-time view of a copy, as reported by [`Store::status`](crate::Store::status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStatus {
    pub copy: CopyId,
    pub edition: Arc<Edition>,
    pub condition: Condition,
    /// `true` if on the shelf, `false` if checked out.
    pub available: bool,
}

impl Display for CopyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let state = match self.available {
            true => "available",
            false => "checked out",
        };
        write!(f, "{} {} [{}, {state}]", self.copy, self.edition, self.condition)
    }
}
