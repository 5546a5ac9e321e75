//! Word matching over free text.
//!
//! Text is split into words on runs of whitespace, and words are compared to
//! a list of targets case-insensitively. This is the loose matching used for
//! filtering short posts and notes; the lending store's own search is exact
//! and case-sensitive and doesn't use this crate.

mod matcher;

pub use crate::matcher::{WordMatcher, contains_any, containing, words};
