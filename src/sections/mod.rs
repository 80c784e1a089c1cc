//! Section Renderers - the page, one block at a time.
//!
//! Each section mounts its elements under its own root, wires them to the
//! controllers it needs (reveal, menu, carousel, selection) and describes
//! its output as a [`Node`] tree. Sections never share mutable state with
//! each other.
//!
//! # Lifecycle
//!
//! ```text
//! mount(ctx) ──▶ layout(top, viewport) ──▶ on_viewport(..)* ──▶ unmount()
//!                     ▲                          │
//!                     └──── resize ──────────────┘
//! ```
//!
//! `unmount()` (and `Drop`) disposes the reveal controller, cancels every
//! timer the section owns and detaches its root, which drops the playback
//! of every descendant.

mod footer;
mod hero;
mod navbar;
mod pricing;
mod testimonials;
mod why_us;
mod works;

use std::rc::Rc;

use crate::config::MotionConfig;
use crate::content::PageContent;
use crate::engine::{self, OwnerId};
use crate::error::Result;
use crate::motion::{VariantRegistry, VariantSpec};
use crate::primitives::Node;
use crate::state::RevealController;
use crate::types::{ElementId, Rect, RootMargin, Viewport};

pub use footer::FooterSection;
pub use hero::HeroSection;
pub use navbar::NavbarSection;
pub use pricing::PricingSection;
pub use testimonials::TestimonialsSection;
pub use why_us::WhyUsSection;
pub use works::WorksSection;

/// Horizontal page padding.
pub(crate) const PAGE_PADDING_PX: f64 = 40.0;

// =============================================================================
// Section trait
// =============================================================================

pub trait Section {
    fn name(&self) -> &'static str;

    fn root(&self) -> ElementId;

    /// Position every element starting at `top`. Returns the section height.
    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64;

    /// The visible window moved or changed size.
    fn on_viewport(&self, viewport: Viewport);

    /// Snapshot of the output, or `None` once unmounted.
    fn render(&self) -> Option<Node>;

    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;
}

/// What every section is built from.
#[derive(Clone)]
pub struct SectionContext {
    pub content: Rc<PageContent>,
    pub variants: Rc<VariantRegistry>,
    pub config: Rc<MotionConfig>,
    /// Page root the section mounts under.
    pub parent: Option<ElementId>,
}

impl SectionContext {
    pub fn new(content: Rc<PageContent>, variants: Rc<VariantRegistry>, config: Rc<MotionConfig>) -> Self {
        Self { content, variants, config, parent: None }
    }

    pub fn variant(&self, name: &str) -> Result<Rc<VariantSpec>> {
        self.variants.get(name)
    }

    pub fn section_margin(&self) -> RootMargin {
        self.config.reveal.section_margin
    }

    pub fn element_margin(&self) -> RootMargin {
        self.config.reveal.element_margin
    }
}

// =============================================================================
// Shared plumbing
// =============================================================================

/// Root element, reveal controller and timer owner of one section.
pub(crate) struct SectionBase {
    pub name: &'static str,
    pub root: ElementId,
    pub reveal: RevealController,
    pub owner: OwnerId,
    mounted: bool,
}

impl SectionBase {
    pub fn mount(name: &'static str, tag: &'static str, ctx: &SectionContext) -> Self {
        let root = engine::mount_keyed(tag, ctx.parent, name);
        tracing::debug!(section = name, root = %root, "section mounted");
        Self {
            name,
            root,
            reveal: RevealController::new(ctx.section_margin()),
            owner: engine::allocate_owner(),
            mounted: true,
        }
    }

    /// Child element of the root (or of `parent`).
    pub fn element(&self, tag: &'static str, parent: Option<ElementId>) -> ElementId {
        engine::mount_element(tag, Some(parent.unwrap_or(self.root)))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.reveal.dispose();
        let cancelled = engine::cancel_owner(self.owner);
        engine::detach_element(self.root);
        tracing::debug!(section = self.name, cancelled, "section unmounted");
    }
}

impl Drop for SectionBase {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Vertical layout cursor.
pub(crate) struct Column {
    top: f64,
    cursor: f64,
    left: f64,
    width: f64,
}

impl Column {
    pub fn new(top: f64, viewport: &Viewport) -> Self {
        let width = (viewport.width - 2.0 * PAGE_PADDING_PX).max(0.0);
        Self { top, cursor: top, left: PAGE_PADDING_PX, width }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn gap(&mut self, px: f64) {
        self.cursor += px;
    }

    /// Full-width block.
    pub fn place(&mut self, id: ElementId, height: f64) -> Rect {
        let rect = Rect::new(self.left, self.cursor, self.width, height);
        engine::set_bounds(id, rect);
        self.cursor += height;
        rect
    }

    /// `ids` in rows of `columns`; `container` (if any) covers the grid.
    pub fn place_grid(
        &mut self,
        container: Option<ElementId>,
        ids: &[ElementId],
        columns: usize,
        row_height: f64,
        gap: f64,
    ) -> Rect {
        let columns = columns.max(1);
        let cell_width = (self.width - gap * (columns - 1) as f64) / columns as f64;
        for (index, id) in ids.iter().enumerate() {
            let row = (index / columns) as f64;
            let col = (index % columns) as f64;
            engine::set_bounds(
                *id,
                Rect::new(
                    self.left + col * (cell_width + gap),
                    self.cursor + row * (row_height + gap),
                    cell_width,
                    row_height,
                ),
            );
        }
        let rows = ids.len().div_ceil(columns) as f64;
        let height = if rows > 0.0 { rows * row_height + (rows - 1.0) * gap } else { 0.0 };
        let rect = Rect::new(self.left, self.cursor, self.width, height);
        if let Some(container) = container {
            engine::set_bounds(container, rect);
        }
        self.cursor += height;
        rect
    }

    pub fn height(&self) -> f64 {
        self.cursor - self.top
    }
}

/// Bounds of the section root.
pub(crate) fn place_root(root: ElementId, top: f64, height: f64, viewport: &Viewport) {
    engine::set_bounds(root, Rect::new(0.0, top, viewport.width, height));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_grid() {
        engine::reset_registry();
        let ids: Vec<ElementId> = (0..5).map(|_| engine::mount_element("div", None)).collect();
        let viewport = Viewport::new(0.0, 1080.0, 800.0);
        let mut column = Column::new(100.0, &viewport);

        let grid = column.place_grid(None, &ids, 2, 200.0, 20.0);
        assert_eq!(grid.height, 3.0 * 200.0 + 2.0 * 20.0);
        assert_eq!(engine::bounds(ids[0]).unwrap().y, 100.0);
        assert_eq!(engine::bounds(ids[3]).unwrap().y, 100.0 + 220.0);
        assert_eq!(engine::bounds(ids[1]).unwrap().x, 40.0 + 490.0 + 20.0);
        assert_eq!(column.height(), grid.height);
    }
}
