//! Local menu cache.
//!
//! This module provides the `MenuStore`, a single SQLite-backed table of
//! menu items plus a version marker (`PRAGMA user_version`), and the
//! `CacheLoader` that fills it from the remote source exactly once.
//!
//! The store is either empty with a marker below `TARGET_VERSION` or fully
//! populated with the marker at `TARGET_VERSION`. Population and the marker
//! bump commit in one transaction.

pub mod error;
pub mod loader;
pub mod store;

pub use error::{PersistenceError, StoreError};
pub use loader::{CacheLoader, MenuSnapshot, PersistenceTask, SnapshotOrigin};
pub use store::{MenuStore, TARGET_VERSION};
