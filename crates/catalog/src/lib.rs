//! Value types for the shelf lending store.
//!
//! - [`Edition`]: the immutable identity of a book printing (title, authors,
//!   year), validated on construction and ordered for search results.
//! - [`Condition`]: the inspected state of a physical copy.
//!
//! Copies themselves are owned by the store (see `shelf-store`), which hands
//! out opaque handles rather than values.

pub mod error;
pub mod models;

pub use crate::models::{Condition, Edition};
