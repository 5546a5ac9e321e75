//! The indexed, single-writer lending store.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use exn::OptionExt;
use shelf_catalog::{Condition, Edition};
use tracing::{Span, field, instrument};

use crate::arena::Arena;
use crate::copy::{CopyId, CopyRecord, CopyStatus};
use crate::error::{ErrorKind, Result};
use crate::index::Index;
use crate::library::Library;
use crate::verify::Verification;

#[cfg(test)]
mod tests;

/// A large collection of copies (think city or university library, millions
/// of books) where every operation runs in sub-linear time.
///
/// # Representation
///
/// - `copies`: arena of every live copy record, addressed by [`CopyId`].
/// - `available` / `checked_out`: disjoint partition of the live handles.
/// - `holdings`: edition to the handles of its live copies. Answers
///   [`all_copies`](Library::all_copies) without touching other editions.
/// - `index`: title and author lookups for [`find`](Library::find), holding
///   exactly the editions that have a key in `holdings`.
///
/// Mutations take `&mut self`. For concurrent access wrap the store in a
/// [`SharedStore`](crate::SharedStore).
#[derive(Debug, Default)]
pub struct Store {
    pub(crate) copies: Arena,
    pub(crate) available: HashSet<CopyId>,
    pub(crate) checked_out: HashSet<CopyId>,
    pub(crate) holdings: HashMap<Arc<Edition>, HashSet<CopyId>>,
    pub(crate) index: Index,
    verification: Verification,
}

/// Counts describing a store, all maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Live copies (available + checked out)
    pub copies: usize,
    pub available: usize,
    pub checked_out: usize,
    /// Distinct editions with at least one live copy
    pub editions: usize,
    /// Distinct indexed titles
    pub titles: usize,
    /// Distinct indexed author names
    pub authors: usize,
}
impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} copies ({} available, {} checked out) of {} editions; {} titles, {} authors indexed",
            self.copies, self.available, self.checked_out, self.editions, self.titles, self.authors
        )
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `capacity` copies.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            copies: Arena::with_capacity(capacity),
            available: HashSet::with_capacity(capacity),
            checked_out: HashSet::new(),
            holdings: HashMap::new(),
            index: Index::default(),
            verification: Verification::default(),
        }
    }

    /// Choose when the consistency check runs after a mutation.
    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    pub fn verification(&self) -> Verification {
        self.verification
    }

    /// Number of live copies.
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.len() == 0
    }

    pub fn stats(&self) -> Stats {
        Stats {
            copies: self.copies.len(),
            available: self.available.len(),
            checked_out: self.checked_out.len(),
            editions: self.holdings.len(),
            titles: self.index.title_count(),
            authors: self.index.author_count(),
        }
    }

    /// Every edition with at least one live copy, in no particular order.
    pub fn editions(&self) -> impl Iterator<Item = &Arc<Edition>> {
        self.holdings.keys()
    }

    /// The edition a live copy was printed from.
    pub fn edition(&self, copy: CopyId) -> Result<Arc<Edition>> {
        let record = self.copies.get(copy).ok_or_raise(|| ErrorKind::UnknownCopy(copy))?;
        Ok(Arc::clone(&record.edition))
    }

    /// The condition recorded at the last inspection of a live copy.
    pub fn condition(&self, copy: CopyId) -> Result<Condition> {
        let record = self.copies.get(copy).ok_or_raise(|| ErrorKind::UnknownCopy(copy))?;
        Ok(record.condition)
    }

    pub fn status(&self, copy: CopyId) -> Result<CopyStatus> {
        let record = self.copies.get(copy).ok_or_raise(|| ErrorKind::UnknownCopy(copy))?;
        Ok(CopyStatus {
            copy,
            edition: Arc::clone(&record.edition),
            condition: record.condition,
            available: self.available.contains(&copy),
        })
    }

    /// Record the outcome of inspecting a live copy, on the shelf or not.
    #[instrument(level = "debug", skip_all, fields(%copy, %condition))]
    pub fn inspect(&mut self, copy: CopyId, condition: Condition) -> Result<()> {
        let record = self.copies.get_mut(copy).ok_or_raise(|| ErrorKind::UnknownCopy(copy))?;
        record.condition = condition;
        self.verify_after("inspect");
        Ok(())
    }

    /// Withdraw a copy that is on the shelf, typically because inspection
    /// found it damaged.
    ///
    /// Unlike [`lose`](Library::lose), a checked-out copy can't be disposed
    /// of; that fails with [`NotAvailable`](ErrorKind::NotAvailable).
    #[instrument(level = "debug", skip_all, fields(%copy))]
    pub fn dispose(&mut self, copy: CopyId) -> Result<()> {
        if self.checked_out.contains(&copy) {
            exn::bail!(ErrorKind::NotAvailable(copy));
        }
        if !self.available.contains(&copy) {
            exn::bail!(ErrorKind::UnknownCopy(copy));
        }
        self.forget(copy)?;
        self.available.remove(&copy);
        self.verify_after("dispose");
        Ok(())
    }

    /// Drop a copy's record and its holding entry, unindexing the edition if
    /// that was its last copy. The caller removes the handle from the
    /// availability partition.
    fn forget(&mut self, copy: CopyId) -> Result<Arc<Edition>> {
        let record = self
            .copies
            .remove(copy)
            .ok_or_raise(|| ErrorKind::Inconsistent(format!("copy {copy} is shelved but has no record")))?;
        if let Some(bucket) = self.holdings.get_mut(&record.edition) {
            bucket.remove(&copy);
            if bucket.is_empty() {
                self.holdings.remove(&record.edition);
                self.index.remove(&record.edition);
                tracing::debug!(edition = %record.edition, "last copy gone; edition dropped from index");
            }
        }
        Ok(record.edition)
    }

    /// Run the consistency check if this store's [`Verification`] asks for it.
    ///
    /// A failure here means a bug in the store itself, never bad input, so
    /// it is treated like a failed assertion.
    fn verify_after(&self, operation: &'static str) {
        if !self.verification.enabled() {
            return;
        }
        if let Err(err) = self.check_invariants() {
            let kind: &ErrorKind = &err;
            tracing::error!(operation, error = %kind, "store invariants violated");
            panic!("store invariants violated after {operation}: {kind}");
        }
    }
}

impl Library for Store {
    #[instrument(level = "debug", skip_all, fields(edition = %edition, copy))]
    fn acquire(&mut self, edition: &Edition) -> CopyId {
        let edition = match self.holdings.get_key_value(edition) {
            Some((shared, _)) => Arc::clone(shared),
            None => {
                let shared = Arc::new(edition.clone());
                self.index.insert(&shared);
                tracing::debug!("first copy of edition; indexed");
                shared
            },
        };
        let copy = self.copies.insert(CopyRecord::new(Arc::clone(&edition)));
        self.holdings.entry(edition).or_default().insert(copy);
        self.available.insert(copy);
        Span::current().record("copy", field::display(copy));
        self.verify_after("acquire");
        copy
    }

    #[instrument(level = "debug", skip_all, fields(%copy))]
    fn checkout(&mut self, copy: CopyId) -> Result<()> {
        if !self.available.remove(&copy) {
            exn::bail!(ErrorKind::NotAvailable(copy));
        }
        self.checked_out.insert(copy);
        self.verify_after("checkout");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(%copy, %condition))]
    fn checkin(&mut self, copy: CopyId, condition: Condition) -> Result<()> {
        if !self.checked_out.contains(&copy) {
            exn::bail!(ErrorKind::NotCheckedOut(copy));
        }
        let record = self
            .copies
            .get_mut(copy)
            .ok_or_raise(|| ErrorKind::Inconsistent(format!("copy {copy} is checked out but has no record")))?;
        record.condition = condition;
        self.checked_out.remove(&copy);
        self.available.insert(copy);
        self.verify_after("checkin");
        Ok(())
    }

    fn is_available(&self, copy: CopyId) -> bool {
        self.available.contains(&copy)
    }

    fn all_copies(&self, edition: &Edition) -> HashSet<CopyId> {
        self.holdings.get(edition).cloned().unwrap_or_default()
    }

    fn available_copies(&self, edition: &Edition) -> HashSet<CopyId> {
        let Some(bucket) = self.holdings.get(edition) else {
            return HashSet::new();
        };
        bucket.iter().filter(|copy| self.available.contains(copy)).copied().collect()
    }

    #[instrument(level = "trace", skip(self), fields(found))]
    fn find(&self, query: &str) -> Vec<Arc<Edition>> {
        let mut found: Vec<_> = self.index.lookup(query).into_iter().collect();
        found.sort();
        Span::current().record("found", found.len());
        found
    }

    #[instrument(level = "debug", skip_all, fields(%copy))]
    fn lose(&mut self, copy: CopyId) -> Result<()> {
        let shelved = self.available.contains(&copy);
        if !shelved && !self.checked_out.contains(&copy) {
            exn::bail!(ErrorKind::UnknownCopy(copy));
        }
        self.forget(copy)?;
        match shelved {
            true => self.available.remove(&copy),
            false => self.checked_out.remove(&copy),
        };
        self.verify_after("lose");
        Ok(())
    }
}
