//! Remote menu source.
//!
//! The menu is published as a single read-only JSON document. `MenuClient`
//! fetches it over HTTP; `MenuSource` is the seam the cache loader depends
//! on so tests can substitute a canned document.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::MenuItem;

pub use client::{MenuClient, DEFAULT_MENU_URL};
pub use error::FetchError;

/// Something that can produce the authoritative menu.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetch the full menu. One request, no retries.
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FetchError>;
}
