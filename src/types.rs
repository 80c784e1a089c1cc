//! Core types shared by every module.
//!
//! - [`ElementId`] - generational handle into the element registry
//! - [`Rect`] / [`Viewport`] - page-space geometry, in CSS pixels
//! - [`RootMargin`] - viewport inset used for reveal triggers
//! - [`Direction`] - carousel scroll direction

use serde::{Deserialize, Serialize};

// =============================================================================
// ElementId
// =============================================================================

/// Handle to a mounted element.
///
/// Slots are reused after release, so the generation distinguishes a live
/// element from a stale handle that happens to share its index. Every
/// deferred callback holds one of these and checks it before touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Slot index (stable only while the element is attached).
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// A rect is usable for intersection only if every field is finite and
    /// the size is non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// The visible scroll window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Vertical scroll position of the document.
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self { scroll_y, width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 1280.0, 800.0)
    }
}

/// Inset applied to the viewport before testing intersection.
///
/// Negative values shrink the root, so an element must be that far inside
/// the visible window before it counts as entered. Mirrors the
/// IntersectionObserver `rootMargin` convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum RootMargin {
    Px(f64),
    /// Percentage of viewport height.
    Percent(f64),
}

impl Default for RootMargin {
    fn default() -> Self {
        RootMargin::Px(0.0)
    }
}

impl RootMargin {
    /// Resolve to pixels for a given viewport height.
    pub fn resolve(&self, viewport_height: f64) -> f64 {
        match *self {
            RootMargin::Px(px) => px,
            RootMargin::Percent(pct) => viewport_height * pct / 100.0,
        }
    }

    /// True when `rect` intersects `viewport` after applying the margin.
    ///
    /// Zero-height elements count as intersecting when their edge lies
    /// strictly inside the adjusted root.
    pub fn intersects(&self, rect: &Rect, viewport: &Viewport) -> bool {
        let margin = self.resolve(viewport.height);
        let root_top = viewport.scroll_y - margin;
        let root_bottom = viewport.scroll_y + viewport.height + margin;
        if root_bottom <= root_top {
            return false;
        }
        (rect.top() < root_bottom && rect.bottom() > root_top)
            || (rect.height == 0.0 && rect.top() > root_top && rect.top() < root_bottom)
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Horizontal scroll direction for the carousel controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Sign applied to the scroll step.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_margin_delays_entry() {
        let viewport = Viewport::new(0.0, 1280.0, 800.0);
        let margin = RootMargin::Px(-100.0);

        // Top edge 50px above the fold: inside the raw viewport but not
        // inside the shrunken root.
        let rect = Rect::new(0.0, 750.0, 100.0, 400.0);
        assert!(!margin.intersects(&rect, &viewport));
        assert!(RootMargin::Px(0.0).intersects(&rect, &viewport));

        let rect = Rect::new(0.0, 650.0, 100.0, 400.0);
        assert!(margin.intersects(&rect, &viewport));
    }

    #[test]
    fn test_percent_margin_resolves_against_height() {
        let margin = RootMargin::Percent(-10.0);
        assert_eq!(margin.resolve(800.0), -80.0);
    }

    #[test]
    fn test_element_above_viewport_is_outside() {
        let viewport = Viewport::new(2000.0, 1280.0, 800.0);
        let rect = Rect::new(0.0, 100.0, 100.0, 400.0);
        assert!(!RootMargin::default().intersects(&rect, &viewport));
    }

    #[test]
    fn test_rect_well_formed() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_well_formed());
        assert!(!Rect::new(0.0, f64::NAN, 10.0, 10.0).is_well_formed());
        assert!(!Rect::new(0.0, 0.0, -1.0, 10.0).is_well_formed());
    }
}
