//! Indexed in-memory lending store.
//!
//! Tracks physical copies of book [`Edition`](shelf_catalog::Edition)s
//! through acquisition, checkout, check-in and loss, and finds editions by
//! exact title or author. Every operation runs in time sub-linear in the
//! number of copies held: lookups go through per-edition holdings and
//! title/author indexes that are maintained incrementally, never by scanning.
//!
//! # Architecture
//! - [`Store`]: the single-writer store. Owns the copy arena, the
//!   available/checked-out partition, the holdings and the indexes.
//! - [`SharedStore`]: the same store behind one reader/writer lock, for
//!   concurrent callers.
//! - [`Library`]: the lending operations, implemented by both.
//! - [`CopyId`]: opaque generational handle to a copy; copies are compared
//!   by handle, never by value.
//!
//! Consistency of the representation can be checked at any time with
//! [`Store::check_invariants`], and is checked automatically after each
//! mutation according to the store's [`Verification`] setting.

mod arena;
mod copy;
pub mod error;
mod index;
mod library;
mod shared;
mod store;
mod verify;

pub use crate::copy::{CopyId, CopyStatus};
pub use crate::library::Library;
pub use crate::shared::SharedStore;
pub use crate::store::{Stats, Store};
pub use crate::verify::Verification;
