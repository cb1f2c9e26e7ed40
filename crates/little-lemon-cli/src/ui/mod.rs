//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title and status bars, overlays
//! - `input`: keyboard event handling
//! - `styles`: Little Lemon colors and text styling
//! - `screens`: menu list and the onboarding/profile forms

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
