//! Why Us - feature grid with icon cards.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::{Icon, PageContent};
use crate::engine;
use crate::error::Result;
use crate::primitives::Node;
use crate::state::{RevealOptions, TriggerPolicy};
use crate::types::{ElementId, Viewport};

pub struct WhyUsSection {
    base: SectionBase,
    content: Rc<PageContent>,
    label: ElementId,
    headline: ElementId,
    grid: ElementId,
    features: Vec<ElementId>,
}

impl WhyUsSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let base = SectionBase::mount("why-us", "section", ctx);

        let label = base.element("div", None);
        let headline = base.element("h2", None);
        let grid = base.element("div", None);
        let features: Vec<ElementId> = ctx
            .content
            .why_us
            .features
            .iter()
            .map(|feature| engine::mount_keyed("div", Some(grid), feature.id.clone()))
            .collect();

        base.reveal.observe(label, ctx.variant("slide-in-left")?, TriggerPolicy::Once);
        base.reveal.observe(headline, ctx.variant("headline")?, TriggerPolicy::Once);
        base.reveal.observe_group(
            grid,
            &features,
            ctx.variant("stagger-container")?,
            ctx.variant("card")?,
            RevealOptions::once().margin(ctx.element_margin()),
        );

        Ok(Self { base, content: ctx.content.clone(), label, headline, grid, features })
    }

    pub fn features(&self) -> &[ElementId] {
        &self.features
    }
}

impl Section for WhyUsSection {
    fn name(&self) -> &'static str {
        "why-us"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        column.gap(80.0);
        column.place(self.label, 24.0);
        column.place(self.headline, 140.0);
        column.gap(48.0);
        let columns = if viewport.width >= 1024.0 { 3 } else { 1 };
        column.place_grid(Some(self.grid), &self.features, columns, 220.0, 16.0);
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
        let why_us = &self.content.why_us;
        let cards = why_us.features.iter().zip(&self.features).map(|(feature, id)| {
            let icon = Icon::resolve(&feature.icon, Icon::Zap);
            Node::element(*id, "div")
                .child(Node::new("i").attr("data-icon", icon.asset()))
                .child(Node::new("h3").text(&feature.title))
                .child(Node::new("p").text(&feature.description))
        });

        Some(
            Node::element(self.base.root, "section")
                .attr("id", "why-us")
                .child(
                    Node::element(self.label, "div")
                        .text(format!("{} ({})", why_us.section_label, why_us.section_number)),
                )
                .child(
                    Node::element(self.headline, "h2")
                        .text(format!("{} ", why_us.headline.main))
                        .child(Node::new("em").text(&why_us.headline.highlight)),
                )
                .child(Node::element(self.grid, "div").attr("class", "features").children(cards)),
        )
    }

    fn unmount(&mut self) {
        self.base.unmount();
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::motion::VariantRegistry;

    fn mount(content: PageContent) -> WhyUsSection {
        engine::reset_registry();
        engine::reset_scheduler();
        crate::state::animate::reset_playback();
        let ctx = SectionContext::new(
            Rc::new(content),
            Rc::new(VariantRegistry::with_presets()),
            Rc::new(MotionConfig::default()),
        );
        WhyUsSection::mount(&ctx).unwrap()
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        let content = PageContent::from_json_str(
            r#"{ "whyUs": { "features": [ { "id": "f1", "icon": "sparkles", "title": "Fast" } ] } }"#,
        )
        .unwrap();
        let section = mount(content);
        let node = section.render().unwrap();
        assert!(node.find_attr("data-icon", Icon::Zap.asset()).is_some());
    }

    #[test]
    fn test_three_columns_on_desktop() {
        let mut section = mount((*PageContent::placeholder().unwrap()).clone());
        section.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));
        let rows: Vec<f64> = section.features().iter().map(|id| engine::bounds(*id).unwrap().y).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|y| *y == rows[0]));
    }
}
