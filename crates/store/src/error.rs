//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every lending error is a precondition violation reported straight back to
//! the caller. A failed call never leaves a partial mutation behind, so the
//! store is always safe to keep using afterwards.

use derive_more::{Display, Error};

use crate::copy::CopyId;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The copy isn't on the shelf: already checked out, lost, or never acquired.
    #[display("copy {_0} is not available")]
    NotAvailable(#[error(not(source))] CopyId),
    /// The copy can't be checked in because it isn't checked out.
    #[display("copy {_0} is not checked out")]
    NotCheckedOut(#[error(not(source))] CopyId),
    /// The store never acquired this copy, or it has since been lost or disposed of.
    #[display("unknown copy: {_0}")]
    UnknownCopy(#[error(not(source))] CopyId),
    /// Text that doesn't parse as a copy handle.
    #[display("invalid copy handle: {_0}")]
    InvalidCopyId(#[error(not(source))] String),
    /// The consistency check found broken internal state. This is a bug in
    /// the store, not something the caller did.
    #[display("store is inconsistent: {_0}")]
    Inconsistent(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Retrying the same call against the same state fails the same way;
        // the caller has to change the arguments (or the state) first.
        false
    }
}
