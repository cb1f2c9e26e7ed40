//! Search input handling for the menu screen.
//!
//! Raw keystrokes go through a `Debouncer` so the query engine runs at most
//! once per idle interval. Each query gets a `QueryTicket`; `SearchState`
//! only lets the newest ticket replace the displayed list.

pub mod debounce;
pub mod state;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use state::{spawn_query, ApplyResult, QueryOutcome, QueryTicket, SearchState};
