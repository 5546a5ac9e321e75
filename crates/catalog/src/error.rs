//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every error here is raised while
//! constructing a value, never later.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The title is empty, or only whitespace.
    #[display("invalid edition: title must contain a non-space character")]
    EmptyTitle,
    /// An edition must have at least one author.
    #[display("invalid edition: at least one author is required")]
    NoAuthors,
    /// The author at the given (zero-based) position is empty, or only whitespace.
    #[display("invalid edition: author #{_0} must contain a non-space character")]
    EmptyAuthor(#[error(not(source))] usize),
    /// Publication year before the Common Era.
    #[display("invalid edition: year must be non-negative, found {_0}")]
    NegativeYear(#[error(not(source))] i32),
    /// Text that doesn't name a copy condition.
    #[display("unknown condition: {_0}")]
    ParseCondition(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if the edition was rejected by validation.
    pub fn is_invalid_edition(&self) -> bool {
        !matches!(self, Self::ParseCondition(_))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Validation is deterministic, the same input fails the same way.
        false
    }
}
