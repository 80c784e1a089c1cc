//! Motion - the animation variant registry.
//!
//! Pure data, no behavior:
//! - [`VariantSpec`] - rest state, active state, timing, stagger policy
//! - [`Easing`] - timing curves
//! - [`VariantRegistry`] - named lookup, fail-fast on missing names
//! - [`Timeline`] - explicit per-child start offsets for a stagger chain
//! - [`presets`] - the site's built-in variants

mod easing;
mod registry;
mod timeline;
mod variant;
pub mod presets;

pub use easing::{Easing, SITE_CURVE};
pub use registry::VariantRegistry;
pub use timeline::{Timeline, TimelineEntry};
pub use variant::{MotionState, PropertySet, VariantBuilder, VariantDefinition, VariantSpec};
