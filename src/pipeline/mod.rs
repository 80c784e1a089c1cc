//! Page Pipeline
//!
//! Connects content, configuration and sections into one mounted page.
//!
//! ```text
//! PageContent + MotionConfig → VariantRegistry → sections → layout → viewport pass
//! ```
//!
//! Host events flow the other way: `scroll_to` / `resize` / `advance` on
//! the [`MountHandle`] update the viewport and let every section's reveal
//! controller re-check its elements.

pub mod mount;

pub use mount::{mount_page, mount_page_with, MountHandle, REQUIRED_VARIANTS};
