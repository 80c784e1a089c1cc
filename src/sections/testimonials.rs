//! Testimonials - horizontally scrolling card strip with prev/next buttons.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::{Icon, PageContent, Testimonial, TestimonialKind};
use crate::engine;
use crate::error::Result;
use crate::primitives::Node;
use crate::state::{CarouselButtons, CarouselNavigator, RevealOptions, ScrollStrip, TriggerPolicy};
use crate::types::{Direction, ElementId, Rect, Viewport};

/// Space between cards.
pub const CARD_GAP_PX: f64 = 20.0;

const CARD_HEIGHT_PX: f64 = 480.0;

const MAX_STARS: usize = 5;

pub struct TestimonialsSection {
    base: SectionBase,
    content: Rc<PageContent>,
    label: ElementId,
    headline: ElementId,
    controls: ElementId,
    strip: ElementId,
    cards: Vec<ElementId>,
    navigator: CarouselNavigator<ScrollStrip>,
}

/// Total scrollable width of the cards.
fn content_width(kinds: impl IntoIterator<Item = TestimonialKind>) -> f64 {
    let (width, count) = kinds
        .into_iter()
        .fold((0.0, 0usize), |(width, count), kind| (width + kind.card_width_px(), count + 1));
    width + CARD_GAP_PX * count.saturating_sub(1) as f64
}

impl TestimonialsSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let base = SectionBase::mount("testimonials", "section", ctx);
        let items = &ctx.content.testimonials.items;

        let label = base.element("div", None);
        let headline = base.element("h2", None);
        let controls = base.element("div", None);
        let strip = base.element("div", None);
        let cards: Vec<ElementId> = items
            .iter()
            .map(|item| engine::mount_keyed("article", Some(strip), item.id.clone()))
            .collect();

        base.reveal.observe(label, ctx.variant("slide-in-left")?, TriggerPolicy::Once);
        base.reveal.observe(headline, ctx.variant("headline")?, TriggerPolicy::Once);
        base.reveal.observe(controls, ctx.variant("fade-up")?, TriggerPolicy::Once);
        base.reveal.observe_group(
            strip,
            &cards,
            ctx.variant("stagger-container")?,
            ctx.variant("testimonial-card")?,
            RevealOptions::once().margin(ctx.element_margin()),
        );

        // Viewport width is unknown until the first layout; start with the
        // content fully visible so both buttons begin disabled.
        let width = content_width(items.iter().map(|item| item.kind));
        let surface = ScrollStrip::new(width, width, ctx.config.carousel.scroll_animation_ms);
        let navigator = CarouselNavigator::new(surface, ctx.config.carousel_settings());

        Ok(Self {
            base,
            content: ctx.content.clone(),
            label,
            headline,
            controls,
            strip,
            cards,
            navigator,
        })
    }

    /// Previous/next button. No-op at the boundary.
    pub fn scroll(&self, direction: Direction) -> bool {
        self.navigator.scroll_by(direction)
    }

    /// The user dragged or wheeled the strip to `offset`.
    pub fn user_scroll(&self, offset: f64) {
        self.navigator.with_surface(|strip| strip.set_offset(offset));
        self.navigator.on_scroll();
    }

    pub fn buttons(&self) -> CarouselButtons {
        self.navigator.buttons()
    }

    pub fn navigator(&self) -> &CarouselNavigator<ScrollStrip> {
        &self.navigator
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }

    fn content_width(&self) -> f64 {
        content_width(self.content.testimonials.items.iter().map(|item| item.kind))
    }
}

/// Whole stars for the card's rating (five when unrated), then the
/// rating caption if there is one.
fn rating_row(item: &Testimonial) -> Node {
    let count = item.rating.map_or(MAX_STARS, |rating| rating.clamp(0.0, MAX_STARS as f32).round() as usize);
    let stars = (0..count).map(|_| Node::new("i").attr("data-icon", Icon::Star.asset()));
    Node::new("div")
        .attr("class", "rating")
        .attr("aria-label", format!("{count} out of {MAX_STARS} stars"))
        .children(stars)
        .maybe_child(item.rating_text.as_ref().map(|text| Node::new("span").text(text)))
}

impl Section for TestimonialsSection {
    fn name(&self) -> &'static str {
        "testimonials"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        column.gap(80.0);
        column.place(self.label, 24.0);
        column.place(self.headline, 120.0);
        column.place(self.controls, 48.0);
        column.gap(32.0);
        let strip = column.place(self.strip, CARD_HEIGHT_PX);
        column.gap(80.0);

        let mut x = strip.x;
        for (item, id) in self.content.testimonials.items.iter().zip(&self.cards) {
            let width = item.kind.card_width_px();
            engine::set_bounds(*id, Rect::new(x, strip.y, width, CARD_HEIGHT_PX));
            x += width + CARD_GAP_PX;
        }

        let content = self.content_width();
        self.navigator.with_surface(|surface| surface.resize(content, strip.width));
        self.navigator.on_resize();

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
        let testimonials = &self.content.testimonials;
        let buttons = self.navigator.buttons();
        let offset = self.navigator.view_state().scroll_offset_px;

        let cards = testimonials.items.iter().zip(&self.cards).map(|(item, id)| {
            let card = Node::element(*id, "article")
                .attr("data-kind", format!("{:?}", item.kind).to_lowercase())
                .attr("style", format!("width:{}px", item.kind.card_width_px()));
            match item.kind {
                TestimonialKind::Video => card
                    .maybe_child(
                        item.video_thumbnail
                            .as_ref()
                            .map(|src| Node::new("img").attr("src", src).attr("alt", &item.name)),
                    )
                    .child(rating_row(item))
                    .child(Node::new("i").attr("data-icon", Icon::Play.asset()))
                    .child(Node::new("p").text(format!("{}, {}", item.name, item.role))),
                TestimonialKind::Text => card
                    .child(rating_row(item))
                    .maybe_child(item.quote.as_ref().map(|quote| Node::new("blockquote").text(quote)))
                    .child(Node::new("img").attr("src", &item.avatar).attr("alt", &item.name))
                    .child(Node::new("p").text(format!("{}, {}", item.name, item.role))),
            }
        });

        Some(
            Node::element(self.base.root, "section")
                .attr("id", "testimonials")
                .child(
                    Node::element(self.label, "div")
                        .text(format!("{} ({})", testimonials.section_label, testimonials.section_number)),
                )
                .child(Node::element(self.headline, "h2").text(&testimonials.headline))
                .child(
                    Node::element(self.controls, "div")
                        .child(
                            Node::new("button")
                                .attr("aria-label", "Previous")
                                .attr("disabled", (!buttons.can_scroll_left).to_string())
                                .child(Node::new("i").attr("data-icon", Icon::ChevronLeft.asset())),
                        )
                        .child(
                            Node::new("button")
                                .attr("aria-label", "Next")
                                .attr("disabled", (!buttons.can_scroll_right).to_string())
                                .child(Node::new("i").attr("data-icon", Icon::ChevronRight.asset())),
                        ),
                )
                .child(
                    Node::element(self.strip, "div")
                        .attr("data-scroll-left", format!("{offset:.0}"))
                        .children(cards),
                ),
        )
    }

    fn unmount(&mut self) {
        self.navigator.dispose();
        self.navigator.with_surface(|strip| strip.stop());
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
    use crate::state::{animate, SCROLL_SETTLE_MS};

    fn setup() -> TestimonialsSection {
        engine::reset_registry();
        engine::reset_scheduler();
        animate::reset_playback();
        let ctx = SectionContext::new(
            PageContent::placeholder().unwrap(),
            Rc::new(VariantRegistry::with_presets()),
            Rc::new(MotionConfig::default()),
        );
        TestimonialsSection::mount(&ctx).unwrap()
    }

    #[test]
    fn test_content_width_from_card_kinds() {
        let width = content_width([TestimonialKind::Video, TestimonialKind::Text, TestimonialKind::Text]);
        assert_eq!(width, 380.0 + 340.0 + 340.0 + 2.0 * CARD_GAP_PX);
        assert_eq!(content_width(Vec::<TestimonialKind>::new()), 0.0);
    }

    #[test]
    fn test_buttons_disabled_before_layout() {
        let section = setup();
        assert_eq!(section.buttons(), CarouselButtons::default());
    }

    #[test]
    fn test_layout_seeds_buttons() {
        let mut section = setup();
        section.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));
        let buttons = section.buttons();
        assert!(!buttons.can_scroll_left);
        assert!(buttons.can_scroll_right);
    }

    #[test]
    fn test_scroll_through_to_end() {
        let mut section = setup();
        section.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));

        let mut steps = 0;
        while section.scroll(Direction::Right) {
            engine::advance(SCROLL_SETTLE_MS);
            steps += 1;
            assert!(steps < 20);
        }
        assert!(steps > 0);
        assert!(section.buttons().can_scroll_left);
        assert!(!section.buttons().can_scroll_right);
        assert!(!section.scroll(Direction::Right));
    }

    #[test]
    fn test_wide_viewport_disables_both() {
        let mut section = setup();
        section.layout(0.0, &Viewport::new(0.0, 4000.0, 800.0));
        assert_eq!(section.buttons(), CarouselButtons::default());
    }

    #[test]
    fn test_unmount_stops_settle() {
        let mut section = setup();
        section.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));
        section.scroll(Direction::Right);
        section.unmount();

        assert_eq!(engine::pending_count(), 0);
        assert!(!section.navigator().is_settling());
        assert!(section.render().is_none());
    }

    #[test]
    fn test_cards_show_star_rating() {
        let section = setup();
        let node = section.render().unwrap();
        let stars = |index: usize| {
            let card = node.find_element(section.cards()[index]).unwrap();
            let row = card.find_attr("class", "rating").unwrap();
            (row.find_all("i").len(), row.text_content())
        };

        // Video cards carry the rating too.
        assert_eq!(stars(0), (5, "5.0 rating".to_string()));
        assert_eq!(stars(3), (4, "4.8 rating".to_string()));
        assert_eq!(stars(1).0, 5);
    }

    #[test]
    fn test_unrated_card_shows_full_row() {
        let item = Testimonial { rating: None, rating_text: None, ..Testimonial::default() };
        let row = rating_row(&item);
        assert_eq!(row.find_all("i").len(), MAX_STARS);
        assert!(row.find_all("span").is_empty());

        let item = Testimonial { rating: Some(12.0), ..Testimonial::default() };
        assert_eq!(rating_row(&item).find_all("i").len(), MAX_STARS);
    }
}
