//! Screen-specific rendering.

pub mod menu;
pub mod profile;
