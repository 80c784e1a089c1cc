//! Footer - letter-by-letter brand line, newsletter form and link groups.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::PageContent;
use crate::engine;
use crate::error::Result;
use crate::primitives::Node;
use crate::state::{RevealOptions, Store, TriggerPolicy};
use crate::types::{ElementId, Rect, RootMargin, Viewport};

const LETTER_WIDTH_PX: f64 = 96.0;
const LETTER_HEIGHT_PX: f64 = 180.0;

pub struct FooterSection {
    base: SectionBase,
    content: Rc<PageContent>,
    description: ElementId,
    newsletter: ElementId,
    groups: ElementId,
    brand_line: ElementId,
    letters: Vec<ElementId>,
    email: Store<String>,
}

impl FooterSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let base = SectionBase::mount("footer", "footer", ctx);
        let footer = &ctx.content.footer;

        let description = base.element("p", None);
        let newsletter = base.element("form", None);
        let groups = base.element("div", None);
        let brand_line = base.element("div", None);
        let letters: Vec<ElementId> = footer
            .brand
            .display_text()
            .chars()
            .enumerate()
            .map(|(index, _)| engine::mount_keyed("span", Some(brand_line), format!("letter-{index}")))
            .collect();

        base.reveal.observe_with(
            description,
            ctx.variant("fade-up")?,
            RevealOptions::once().margin(RootMargin::Px(0.0)),
        );
        base.reveal.observe(newsletter, ctx.variant("fade-up")?, TriggerPolicy::Once);
        base.reveal.observe_group(
            brand_line,
            &letters,
            ctx.variant("letter-container")?,
            ctx.variant("letter")?,
            RevealOptions::once(),
        );

        Ok(Self {
            base,
            content: ctx.content.clone(),
            description,
            newsletter,
            groups,
            brand_line,
            letters,
            email: Store::new(String::new()),
        })
    }

    pub fn letters(&self) -> &[ElementId] {
        &self.letters
    }

    pub fn brand_line(&self) -> ElementId {
        self.brand_line
    }

    pub fn description(&self) -> ElementId {
        self.description
    }

    /// Input event on the newsletter field.
    pub fn set_email(&self, value: impl Into<String>) {
        self.email.set(value.into());
    }

    pub fn email(&self) -> String {
        self.email.get()
    }

    /// Submit the newsletter form.
    ///
    /// Returns the trimmed address and clears the field, or `None` if the
    /// field is blank.
    pub fn submit(&self) -> Option<String> {
        let value = self.email.get();
        let address = value.trim();
        if address.is_empty() {
            tracing::trace!("newsletter submit ignored: empty field");
            return None;
        }
        let address = address.to_string();
        self.email.set(String::new());
        tracing::info!("newsletter signup submitted");
        Some(address)
    }
}

impl Section for FooterSection {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        column.gap(120.0);
        column.place(self.description, 96.0);
        column.gap(48.0);
        column.place(self.newsletter, 64.0);
        column.gap(48.0);
        column.place(self.groups, 160.0);
        column.gap(64.0);
        let line = column.place(self.brand_line, LETTER_HEIGHT_PX);
        for (index, id) in self.letters.iter().enumerate() {
            engine::set_bounds(
                *id,
                Rect::new(line.x + index as f64 * LETTER_WIDTH_PX, line.y, LETTER_WIDTH_PX, LETTER_HEIGHT_PX),
            );
        }
        column.gap(40.0);

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
        let footer = &self.content.footer;

        let groups = footer.link_groups.iter().map(|group| {
            let links = group
                .links
                .iter()
                .map(|link| Node::new("li").child(Node::new("a").attr("href", &link.href).text(&link.name)));
            Node::new("div")
                .child(Node::new("h4").text(&group.title))
                .child(Node::new("ul").children(links))
        });

        let display = footer.brand.display_text();
        let letters = display.chars().zip(&self.letters).map(|(ch, id)| {
            let text = if ch == ' ' { '\u{a0}'.to_string() } else { ch.to_string() };
            Node::element(*id, "span").text(text)
        });

        Some(
            Node::element(self.base.root, "footer")
                .attr("id", "contact")
                .child(
                    Node::element(self.description, "p")
                        .text(format!("{} ", footer.description.text))
                        .child(Node::new("em").text(&footer.description.highlight)),
                )
                .child(
                    Node::new("address")
                        .child(
                            Node::new("a")
                                .attr("href", format!("mailto:{}", footer.contact.email))
                                .text(&footer.contact.email),
                        )
                        .child(Node::new("span").text(&footer.contact.phone)),
                )
                .child(
                    Node::element(self.newsletter, "form")
                        .child(Node::new("h4").text(&footer.newsletter.heading))
                        .child(
                            Node::new("input")
                                .attr("type", "email")
                                .attr("placeholder", &footer.newsletter.placeholder)
                                .attr("value", self.email.get()),
                        )
                        .child(Node::new("button").attr("type", "submit").text(&footer.newsletter.button_label)),
                )
                .child(Node::element(self.groups, "div").children(groups))
                .child(
                    Node::element(self.brand_line, "div")
                        .attr("aria-label", display.as_str())
                        .children(letters),
                )
                .child(Node::new("small").text(&footer.copyright)),
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
    use crate::state::animate::{self, Phase};

    fn setup() -> FooterSection {
        engine::reset_registry();
        engine::reset_scheduler();
        animate::reset_playback();
        let ctx = SectionContext::new(
            PageContent::placeholder().unwrap(),
            Rc::new(VariantRegistry::with_presets()),
            Rc::new(MotionConfig::default()),
        );
        FooterSection::mount(&ctx).unwrap()
    }

    #[test]
    fn test_one_letter_per_character() {
        let section = setup();
        assert_eq!(section.letters().len(), "Lumen® Studio".chars().count());
        assert_eq!(engine::key_of(section.letters()[0]).as_deref(), Some("letter-0"));
    }

    #[test]
    fn test_letters_stagger_after_entry() {
        let mut section = setup();
        let height = section.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));
        let revealed = section.base.reveal.update_viewport(Viewport::new((height - 800.0).max(0.0), 1280.0, 800.0));
        assert!(revealed > 0);

        let letters = section.letters().to_vec();
        // 200ms lead-in, then 100ms between letters.
        engine::advance(200);
        assert_eq!(animate::phase(letters[0]), Some(Phase::Running));
        assert_eq!(animate::phase(letters[1]), Some(Phase::Pending));
        engine::advance(100);
        assert_eq!(animate::phase(letters[1]), Some(Phase::Running));
        assert_eq!(animate::phase(letters[2]), Some(Phase::Pending));
    }

    #[test]
    fn test_submit_clears_field() {
        let section = setup();
        section.set_email("  jo@example.com ");
        assert_eq!(section.submit().as_deref(), Some("jo@example.com"));
        assert_eq!(section.email(), "");
    }

    #[test]
    fn test_blank_submit_ignored() {
        let section = setup();
        assert_eq!(section.submit(), None);
        section.set_email("   ");
        assert_eq!(section.submit(), None);
        assert_eq!(section.email(), "   ");
    }

    #[test]
    fn test_render_spaces_as_nbsp() {
        let section = setup();
        let node = section.render().unwrap();
        let line = node.find_element(section.brand_line()).unwrap();
        assert_eq!(line.text_content(), "Lumen®\u{a0}Studio");
        assert!(node.find_attr("aria-label", "Lumen® Studio").is_some());
    }
}
