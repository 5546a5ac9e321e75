//! The lending capability shared by every store flavour.

use std::collections::HashSet;
use std::sync::Arc;

use shelf_catalog::{Condition, Edition};

use crate::copy::CopyId;
use crate::error::Result;

/// A mutable collection of physical copies that can be lent out and searched.
///
/// Every copy is either available (on the shelf) or checked out, never both.
/// Implementations must answer every call in time sub-linear in the number
/// of copies held, so no operation may scan the whole collection.
///
/// Failed calls leave the collection exactly as it was.
///
/// # Examples
///
/// ```
/// use shelf_catalog::{Condition, Edition};
/// use shelf_store::{Library, Store};
///
/// let mut library = Store::new();
/// let book = Edition::new("What", ["Arthur"], 2009).unwrap();
/// let copy = library.acquire(&book);
///
/// library.checkout(copy).unwrap();
/// assert!(!library.is_available(copy));
/// assert!(library.checkout(copy).is_err());
///
/// library.checkin(copy, Condition::Damaged).unwrap();
/// assert_eq!(library.available_copies(&book).len(), 1);
/// assert_eq!(library.find("Arthur").len(), 1);
/// ```
pub trait Library {
    /// Buy a new copy of `edition`, in good condition and available.
    fn acquire(&mut self, edition: &Edition) -> CopyId;

    /// Lend out an available copy.
    ///
    /// Fails with [`NotAvailable`](crate::error::ErrorKind::NotAvailable) if
    /// the copy is already checked out, or isn't held at all.
    fn checkout(&mut self, copy: CopyId) -> Result<()>;

    /// Return a checked-out copy to the shelf, recording the condition it was
    /// found in on inspection.
    ///
    /// Fails with [`NotCheckedOut`](crate::error::ErrorKind::NotCheckedOut)
    /// if the copy isn't currently checked out.
    fn checkin(&mut self, copy: CopyId, condition: Condition) -> Result<()>;

    /// Returns `true` if the copy is held and currently on the shelf.
    fn is_available(&self, copy: CopyId) -> bool;

    /// Every copy of exactly this edition, available or checked out.
    fn all_copies(&self, edition: &Edition) -> HashSet<CopyId>;

    /// Copies of exactly this edition that are on the shelf.
    fn available_copies(&self, edition: &Edition) -> HashSet<CopyId>;

    /// Editions with at least one copy held whose title is exactly `query`,
    /// or with an author named exactly `query` (case-sensitive). Each edition
    /// appears once; results are in [`Edition`] order (title, then newest
    /// first).
    fn find(&self, query: &str) -> Vec<Arc<Edition>>;

    /// Remove a copy that has gone missing, whether or not it was checked out.
    ///
    /// Fails with [`UnknownCopy`](crate::error::ErrorKind::UnknownCopy) if the
    /// copy isn't held.
    fn lose(&mut self, copy: CopyId) -> Result<()>;
}
