//! Session-scoped cache of note pages.
//!
//! Pages are keyed by `(search, page)`, considered fresh for a configurable
//! window, marked stale (never deleted) on invalidation so they can still be
//! shown as placeholders, and dropped once unused for longer than the
//! retention window.

mod key;
mod store;

pub use key::QueryKey;
pub use store::{Lookup, QueryCache};
