//! Onboarding and profile settings.
//!
//! This module provides:
//! - `Profile`: the customer's details and notification preferences
//! - `ProfileStore`: JSON persistence of the profile on disk
//!
//! A stored profile with `onboarded_at` set means onboarding is complete.
//! Edits are applied to a copy with `Profile::with_changes` and only reach
//! disk through `ProfileStore::save`/`update`. Logging out deletes the file.

pub mod model;
pub mod store;

pub use model::{
    is_valid_email, is_valid_name, NotificationKind, NotificationPrefs, Profile, ProfileChanges,
    ProfileError,
};
pub use store::ProfileStore;
