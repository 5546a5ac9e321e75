//! A [`Store`] behind a single reader/writer lock.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use shelf_catalog::{Condition, Edition};

use crate::copy::{CopyId, CopyStatus};
use crate::error::Result;
use crate::library::Library;
use crate::store::{Stats, Store};

/// Thread-safe handle to a [`Store`].
///
/// One lock covers the availability partition, the holdings and the indexes
/// together, so a reader never sees an edition indexed without copies, or a
/// copy that is in neither (or both) availability sets. Mutations take the
/// write lock; lookups take the read lock and run concurrently with each
/// other.
///
/// Cloning is cheap and every clone refers to the same store, so each thread
/// can own a clone and call the `&mut self` [`Library`] methods on it.
///
/// # Examples
///
/// ```
/// use shelf_catalog::Edition;
/// use shelf_store::{Library, SharedStore, Store};
/// use std::thread;
///
/// let library = SharedStore::new(Store::new());
/// let book = Edition::new("What", ["Arthur"], 2009).unwrap();
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let mut library = library.clone();
///         let book = book.clone();
///         thread::spawn(move || library.acquire(&book))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(library.all_copies(&book).len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    /// Hold the read lock across several lookups, for a consistent view.
    pub fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.read()
    }

    /// Hold the write lock across several mutations, applying them as one.
    pub fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.write()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> Stats {
        self.inner.read().stats()
    }

    /// Snapshot of [`Store::editions`].
    pub fn editions(&self) -> Vec<Arc<Edition>> {
        self.inner.read().editions().cloned().collect()
    }

    pub fn edition(&self, copy: CopyId) -> Result<Arc<Edition>> {
        self.inner.read().edition(copy)
    }

    pub fn condition(&self, copy: CopyId) -> Result<Condition> {
        self.inner.read().condition(copy)
    }

    pub fn status(&self, copy: CopyId) -> Result<CopyStatus> {
        self.inner.read().status(copy)
    }

    pub fn inspect(&self, copy: CopyId, condition: Condition) -> Result<()> {
        self.inner.write().inspect(copy, condition)
    }

    pub fn dispose(&self, copy: CopyId) -> Result<()> {
        self.inner.write().dispose(copy)
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.inner.read().check_invariants()
    }
}

impl From<Store> for SharedStore {
    fn from(store: Store) -> Self {
        Self::new(store)
    }
}

impl Library for SharedStore {
    fn acquire(&mut self, edition: &Edition) -> CopyId {
        self.inner.write().acquire(edition)
    }

    fn checkout(&mut self, copy: CopyId) -> Result<()> {
        self.inner.write().checkout(copy)
    }

    fn checkin(&mut self, copy: CopyId, condition: Condition) -> Result<()> {
        self.inner.write().checkin(copy, condition)
    }

    fn is_available(&self, copy: CopyId) -> bool {
        self.inner.read().is_available(copy)
    }

    fn all_copies(&self, edition: &Edition) -> HashSet<CopyId> {
        self.inner.read().all_copies(edition)
    }

    fn available_copies(&self, edition: &Edition) -> HashSet<CopyId> {
        self.inner.read().available_copies(edition)
    }

    fn find(&self, query: &str) -> Vec<Arc<Edition>> {
        self.inner.read().find(query)
    }

    fn lose(&mut self, copy: CopyId) -> Result<()> {
        self.inner.write().lose(copy)
    }
}
