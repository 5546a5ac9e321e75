//! Configuration loading and validation for shelf.
//!
//! Configuration is layered with `figment` (defaults, user configuration
//! directory, an explicit file, then `SHELF_` environment variables) and
//! extracted into a typed [`Config`]. See [`Loader`] for the exact order.

pub mod error;
mod load;
mod schema;

pub use crate::load::{ENV_PREFIX, Loader};
pub use crate::schema::{Config, LogConfig, LogFormat, StoreConfig};
