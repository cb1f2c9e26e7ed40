//! Little Lemon core library.
//!
//! Local-first menu data for the Little Lemon restaurant app: the remote
//! menu client, the versioned SQLite cache, the query engine behind the
//! search bar and category filters, and the onboarding/profile store.
//!
//! The front end calls two operations:
//! - [`CacheLoader::ensure_menu_loaded`] once at start
//! - [`QueryEngine::query`] on every debounced text change or filter toggle

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod profile;
pub mod query;
pub mod search;
pub mod utils;

pub use api::{FetchError, MenuClient, MenuSource};
pub use cache::{
    CacheLoader, MenuSnapshot, MenuStore, PersistenceError, PersistenceTask, SnapshotOrigin,
    StoreError, TARGET_VERSION,
};
pub use config::Config;
pub use models::{MenuDocument, MenuItem, Section};
pub use profile::{
    NotificationKind, NotificationPrefs, Profile, ProfileChanges, ProfileError, ProfileStore,
};
pub use query::{FilterSelections, MenuQuery, QueryEngine, QueryError};
pub use search::{ApplyResult, Debouncer, QueryOutcome, QueryTicket, SearchState};
