//! Display helpers for the menu list and profile screen.

pub mod format;

pub use format::{
    format_phone, format_price, image_url, mask_phone, truncate_description,
    DEFAULT_IMAGE_BASE_URL, DESCRIPTION_PREVIEW_CHARS,
};
