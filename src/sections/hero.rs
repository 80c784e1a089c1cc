//! Hero - brand mark, client logos and lead image.
//!
//! Everything above the fold animates on mount rather than on entry: the
//! brand name rises, the client logos stagger in behind it. Only the lead
//! image waits for the viewport.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::{Icon, PageContent};
use crate::engine;
use crate::error::Result;
use crate::motion::Timeline;
use crate::primitives::Node;
use crate::state::{animate, TriggerPolicy};
use crate::types::{ElementId, Viewport};

pub struct HeroSection {
    base: SectionBase,
    content: Rc<PageContent>,
    brand: ElementId,
    description: ElementId,
    logos: ElementId,
    logo_items: Vec<ElementId>,
    rating: ElementId,
    image: ElementId,
}

impl HeroSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let base = SectionBase::mount("hero", "section", ctx);
        let hero = &ctx.content.hero;

        let brand = base.element("h1", None);
        let description = base.element("p", None);
        let logos = base.element("div", None);
        let logo_items: Vec<ElementId> = hero
            .logos
            .iter()
            .map(|logo| engine::mount_keyed("div", Some(logos), logo.name.clone()))
            .collect();
        let rating = base.element("div", None);
        let image = base.element("figure", None);

        let headline = ctx.variant("headline")?;
        let fade_up = ctx.variant("fade-up")?;
        let intro = [
            Timeline::single(brand, headline),
            Timeline::single(description, fade_up.clone()),
            Timeline::staggered(logos, ctx.variant("stagger-container")?, &logo_items, ctx.variant("logo-item")?),
            Timeline::single(rating, fade_up.clone()),
        ];
        let started: usize = intro.iter().map(|timeline| animate::play_timeline(timeline, base.owner)).sum();
        tracing::debug!(started, "hero intro queued");

        base.reveal.observe(image, fade_up, TriggerPolicy::Once);

        Ok(Self {
            base,
            content: ctx.content.clone(),
            brand,
            description,
            logos,
            logo_items,
            rating,
            image,
        })
    }

    pub fn brand(&self) -> ElementId {
        self.brand
    }

    pub fn logo_items(&self) -> &[ElementId] {
        &self.logo_items
    }

    pub fn image(&self) -> ElementId {
        self.image
    }
}

impl Section for HeroSection {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        column.gap(96.0);
        column.place(self.brand, 240.0);
        column.place(self.description, 72.0);
        column.gap(24.0);
        let columns = self.logo_items.len().max(1);
        column.place_grid(Some(self.logos), &self.logo_items, columns, 40.0, 24.0);
        column.gap(24.0);
        column.place(self.rating, 32.0);
        column.gap(48.0);
        column.place(self.image, (column.width() * 0.5).max(320.0));

        let height = column.height();
        place_root(self.base.root, top, height, viewport);
        height
    }

    fn on_viewport(&self, viewport: Viewport) {
        self.base.reveal.update_viewport(viewport);
    }

    fn render(&self) -> Option<Node> {
        if !self.base.is_mounted() {
            return None;
        }
        let hero = &self.content.hero;
        let logos = hero.logos.iter().zip(&self.logo_items).map(|(logo, id)| {
            let mut node = Node::element(*id, "div").text(&logo.name);
            if let Some(icon) = Icon::from_name(&logo.icon) {
                node = node.child(Node::new("i").attr("data-icon", icon.asset()));
            }
            node
        });
        let stars = (0..5).map(|_| Node::new("i").attr("data-icon", Icon::Star.asset()));

        Some(
            Node::element(self.base.root, "section")
                .attr("id", "hero")
                .child(
                    Node::element(self.brand, "h1")
                        .text(&hero.brand_name)
                        .child(Node::new("sup").text(&hero.brand_mark)),
                )
                .child(Node::element(self.description, "p").text(&hero.description))
                .child(Node::element(self.logos, "div").attr("class", "logos").children(logos))
                .child(
                    Node::element(self.rating, "div")
                        .children(stars)
                        .child(Node::new("span").text(&hero.clients.rating))
                        .child(
                            Node::new("p")
                                .text(format!("{} ", hero.clients.trust_text))
                                .child(Node::new("strong").text(&hero.clients.trust_highlight)),
                        ),
                )
                .maybe_child((!hero.image.is_empty()).then(|| {
                    Node::element(self.image, "figure")
                        .child(Node::new("img").attr("src", &hero.image).attr("alt", &hero.brand_name))
                })),
        )
    }

    fn unmount(&mut self) {
        self.base.unmount();
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }
}
