//! Works - portfolio grid.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::PageContent;
use crate::engine;
use crate::error::Result;
use crate::primitives::Node;
use crate::state::{RevealOptions, TriggerPolicy};
use crate::types::{ElementId, Viewport};

const CARD_HEIGHT_PX: f64 = 420.0;
const GRID_GAP_PX: f64 = 20.0;

pub struct WorksSection {
    base: SectionBase,
    content: Rc<PageContent>,
    number: ElementId,
    title: ElementId,
    description: ElementId,
    grid: ElementId,
    items: Vec<ElementId>,
    view_all: ElementId,
}

impl WorksSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let base = SectionBase::mount("works", "section", ctx);
        let works = &ctx.content.works;

        let number = base.element("span", None);
        let title = base.element("h2", None);
        let description = base.element("p", None);
        let grid = base.element("div", None);
        let items: Vec<ElementId> = works
            .items
            .iter()
            .map(|item| engine::mount_keyed("article", Some(grid), item.id.clone()))
            .collect();
        let view_all = base.element("a", None);

        base.reveal.observe(number, ctx.variant("slide-in-right")?, TriggerPolicy::Once);
        base.reveal.observe(title, ctx.variant("headline")?, TriggerPolicy::Once);
        base.reveal.observe(description, ctx.variant("fade-up")?, TriggerPolicy::Once);
        base.reveal.observe_group(
            grid,
            &items,
            ctx.variant("stagger-container")?,
            ctx.variant("card")?,
            RevealOptions::once().margin(ctx.element_margin()),
        );
        base.reveal.observe(view_all, ctx.variant("fade-up")?, TriggerPolicy::Once);

        Ok(Self {
            base,
            content: ctx.content.clone(),
            number,
            title,
            description,
            grid,
            items,
            view_all,
        })
    }

    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    pub fn grid(&self) -> ElementId {
        self.grid
    }
}

impl Section for WorksSection {
    fn name(&self) -> &'static str {
        "works"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        column.gap(80.0);
        column.place(self.number, 24.0);
        column.place(self.title, 120.0);
        column.place(self.description, 60.0);
        column.gap(40.0);
        let columns = if viewport.width >= 768.0 { 2 } else { 1 };
        column.place_grid(Some(self.grid), &self.items, columns, CARD_HEIGHT_PX, GRID_GAP_PX);
        column.gap(40.0);
        column.place(self.view_all, 48.0);
        column.gap(80.0);

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
        let works = &self.content.works;
        let cards = works.items.iter().zip(&self.items).map(|(item, id)| {
            Node::element(*id, "article")
                .child(Node::new("img").attr("src", &item.image).attr("alt", &item.title))
                .child(Node::new("h3").text(&item.title))
                .child(Node::new("span").text(format!("{} · {}", item.category, item.year)))
        });

        Some(
            Node::element(self.base.root, "section")
                .attr("id", "works")
                .child(Node::element(self.number, "span").text(format!("({})", works.section_number)))
                .child(Node::element(self.title, "h2").text(&works.section_title))
                .child(Node::element(self.description, "p").text(&works.section_description))
                .child(Node::element(self.grid, "div").attr("class", "works-grid").children(cards))
                .child(
                    Node::element(self.view_all, "a")
                        .attr("href", &works.view_all_link.href)
                        .text(&works.view_all_link.label),
                ),
        )
    }

    fn unmount(&mut self) {
        self.base.unmount();
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }
}
