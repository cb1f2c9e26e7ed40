//! Data models for the Little Lemon menu.
//!
//! - `MenuItem`: one dish as stored locally and shown in the list
//! - `MenuDocument`: the remote `{ "menu": [...] }` document
//! - `Section`: the fixed set of menu categories used by the filters

pub mod menu;

pub use menu::{InvalidRecord, MenuDocument, MenuItem, RawMenuItem, Section};
