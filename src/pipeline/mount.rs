//! Mount API - page lifecycle and host event routing.
//!
//! This module provides the entry point for mounting the whole landing
//! page. It builds the variant registry, mounts every section under one
//! page root in document order, stacks them vertically and routes host
//! events to them.
//!
//! # Example
//!
//! ```ignore
//! use spark_landing::pipeline::mount_page;
//!
//! let mut page = mount_page(PageContent::placeholder()?, MotionConfig::default())?;
//!
//! page.scroll_to(1200.0);
//! page.advance(16);
//! page.navbar().toggle_menu();
//! println!("{}", page.render());
//!
//! page.unmount();
//! ```

use std::rc::Rc;

use crate::config::MotionConfig;
use crate::content::PageContent;
use crate::engine;
use crate::error::Result;
use crate::primitives::Node;
use crate::sections::{
    FooterSection, HeroSection, NavbarSection, PricingSection, Section, SectionContext,
    TestimonialsSection, WhyUsSection, WorksSection,
};
use crate::state::{is_scroll_locked, Store};
use crate::types::{ElementId, Rect, Viewport};

/// Every variant some section asks for. Checked up front so a bad override
/// file fails the mount instead of a section halfway through.
pub const REQUIRED_VARIANTS: &[&str] = &[
    "fade-up",
    "headline",
    "stagger-container",
    "card",
    "testimonial-card",
    "slide-in-left",
    "slide-in-right",
    "fade-up-delayed",
    "slide-in-right-delayed",
    "logo-item",
    "letter",
    "letter-container",
    "feature-item",
    "feature-list",
    "header-drop",
    "menu-panel",
    "menu-panel-exit",
    "menu-stagger",
    "menu-item",
    "menu-image",
    "menu-footer",
    "icon-swap",
];

// =============================================================================
// Sections
// =============================================================================

struct PageSections {
    navbar: NavbarSection,
    hero: HeroSection,
    works: WorksSection,
    why_us: WhyUsSection,
    pricing: PricingSection,
    testimonials: TestimonialsSection,
    footer: FooterSection,
}

impl PageSections {
    fn mount(ctx: &SectionContext) -> Result<Self> {
        Ok(Self {
            navbar: NavbarSection::mount(ctx)?,
            hero: HeroSection::mount(ctx)?,
            works: WorksSection::mount(ctx)?,
            why_us: WhyUsSection::mount(ctx)?,
            pricing: PricingSection::mount(ctx)?,
            testimonials: TestimonialsSection::mount(ctx)?,
            footer: FooterSection::mount(ctx)?,
        })
    }

    /// Document order.
    fn iter(&self) -> [&dyn Section; 7] {
        [
            &self.navbar,
            &self.hero,
            &self.works,
            &self.why_us,
            &self.pricing,
            &self.testimonials,
            &self.footer,
        ]
    }

    fn iter_mut(&mut self) -> [&mut dyn Section; 7] {
        [
            &mut self.navbar,
            &mut self.hero,
            &mut self.works,
            &mut self.why_us,
            &mut self.pricing,
            &mut self.testimonials,
            &mut self.footer,
        ]
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount_page`].
///
/// Owns every section. Unmounting (explicitly or on drop) tears them down
/// in reverse order and detaches the page root.
pub struct MountHandle {
    root: ElementId,
    sections: PageSections,
    viewport: Store<Viewport>,
    document_height: f64,
    mounted: bool,
}

impl MountHandle {
    /// Current scroll window.
    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    /// Observable scroll window, for hosts that sync native scrolling.
    pub fn viewport_store(&self) -> Store<Viewport> {
        self.viewport.clone()
    }

    /// Sum of the section heights from the last layout.
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Scroll the document to `scroll_y`, clamped to the document.
    ///
    /// Ignored (returns false) while the scroll lock is held.
    pub fn scroll_to(&self, scroll_y: f64) -> bool {
        if !self.mounted {
            return false;
        }
        if is_scroll_locked() {
            tracing::trace!(scroll_y, "scroll ignored: page is scroll-locked");
            return false;
        }
        let mut viewport = self.viewport.get();
        viewport.scroll_y = clamp_scroll(scroll_y, self.document_height, viewport.height);
        self.viewport.set(viewport);
        self.dispatch_viewport();
        true
    }

    /// The window changed size: lay the page out again.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !self.mounted {
            return;
        }
        let mut viewport = self.viewport.get();
        viewport.width = width.max(0.0);
        viewport.height = height.max(0.0);
        self.document_height = layout_sections(&mut self.sections, self.root, &viewport);
        viewport.scroll_y = clamp_scroll(viewport.scroll_y, self.document_height, viewport.height);
        self.viewport.set(viewport);
        tracing::debug!(width, height, document_height = self.document_height, "page resized");
        self.dispatch_viewport();
    }

    /// Advance the host clock by `ms`, firing due timers, then re-check
    /// element visibility. Returns how many timers fired.
    pub fn advance(&self, ms: u64) -> usize {
        let fired = engine::advance(ms);
        if self.mounted {
            self.dispatch_viewport();
        }
        fired
    }

    /// Snapshot of the whole page.
    pub fn render(&self) -> Node {
        let mut page = Node::element(self.root, "main");
        if is_scroll_locked() {
            page = page.attr("style", "overflow:hidden");
        }
        page.children(self.sections.iter().into_iter().filter_map(|section| section.render()))
    }

    pub fn navbar(&self) -> &NavbarSection {
        &self.sections.navbar
    }

    pub fn hero(&self) -> &HeroSection {
        &self.sections.hero
    }

    pub fn works(&self) -> &WorksSection {
        &self.sections.works
    }

    pub fn why_us(&self) -> &WhyUsSection {
        &self.sections.why_us
    }

    pub fn pricing(&self) -> &PricingSection {
        &self.sections.pricing
    }

    pub fn testimonials(&self) -> &TestimonialsSection {
        &self.sections.testimonials
    }

    pub fn footer(&self) -> &FooterSection {
        &self.sections.footer
    }

    /// Tear the page down. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        for section in self.sections.iter_mut().into_iter().rev() {
            section.unmount();
        }
        engine::detach_element(self.root);
        tracing::info!(pending = engine::pending_count(), "page unmounted");
    }

    fn dispatch_viewport(&self) {
        let viewport = self.viewport.get();
        for section in self.sections.iter() {
            section.on_viewport(viewport);
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the landing page with the default viewport.
pub fn mount_page(content: Rc<PageContent>, config: MotionConfig) -> Result<MountHandle> {
    mount_page_with(content, config, Viewport::default())
}

/// Mount the landing page into `viewport`.
///
/// This sets up:
/// 1. The variant registry (presets plus config overrides), checked for
///    every name a section needs
/// 2. The page root and all sections in document order
/// 3. Stacked layout and the first visibility pass
pub fn mount_page_with(content: Rc<PageContent>, config: MotionConfig, viewport: Viewport) -> Result<MountHandle> {
    let variants = config.variant_registry()?;
    variants.require(REQUIRED_VARIANTS)?;

    let root = engine::mount_keyed("main", None, "page");
    let mut ctx = SectionContext::new(content, Rc::new(variants), Rc::new(config));
    ctx.parent = Some(root);

    let mut sections = match PageSections::mount(&ctx) {
        Ok(sections) => sections,
        Err(err) => {
            engine::detach_element(root);
            tracing::warn!(error = %err, "page mount failed");
            return Err(err);
        }
    };

    let document_height = layout_sections(&mut sections, root, &viewport);
    let mut viewport = viewport;
    viewport.scroll_y = clamp_scroll(viewport.scroll_y, document_height, viewport.height);

    let handle = MountHandle {
        root,
        sections,
        viewport: Store::new(viewport),
        document_height,
        mounted: true,
    };
    handle.dispatch_viewport();
    tracing::info!(document_height, sections = 7, "page mounted");
    Ok(handle)
}

fn layout_sections(sections: &mut PageSections, root: ElementId, viewport: &Viewport) -> f64 {
    let mut top = 0.0;
    for section in sections.iter_mut() {
        top += section.layout(top, viewport);
    }
    engine::set_bounds(root, Rect::new(0.0, 0.0, viewport.width, top));
    top
}

fn clamp_scroll(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let max = (document_height - viewport_height).max(0.0);
    if scroll_y.is_finite() { scroll_y.clamp(0.0, max) } else { 0.0 }
}
