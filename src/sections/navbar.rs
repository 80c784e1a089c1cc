//! Navbar - fixed header plus the full-screen overlay menu.
//!
//! The header drops in on mount. The overlay is driven by an
//! [`OverlayMenu`]: the panel fades in on Opening and out on Closing, the
//! featured image settles a beat after the links, the contact block
//! arrives last, and the link list replays its stagger on every open. The overlay is only part of the
//! output while the menu is visible.

use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext, PAGE_PADDING_PX};
use crate::content::{Icon, PageContent};
use crate::engine;
use crate::error::Result;
use crate::motion::{Timeline, VariantSpec};
use crate::primitives::{Cleanup, Node};
use crate::state::{animate, MenuState, NavigationRequest, OverlayMenu};
use crate::types::{ElementId, Rect, Viewport};

const HEADER_HEIGHT_PX: f64 = 88.0;

/// Variants the overlay plays as the menu moves between states.
struct OverlayMotion {
    panel: Rc<VariantSpec>,
    panel_exit: Rc<VariantSpec>,
    image: Rc<VariantSpec>,
    contact: Rc<VariantSpec>,
    icon: Rc<VariantSpec>,
}

pub struct NavbarSection {
    base: SectionBase,
    content: Rc<PageContent>,
    header: ElementId,
    brand: ElementId,
    bar: ElementId,
    toggle: ElementId,
    toggle_icon: ElementId,
    overlay: ElementId,
    link_list: ElementId,
    links: Vec<ElementId>,
    image: ElementId,
    contact: ElementId,
    menu: OverlayMenu,
    unsubscribe: Option<Cleanup>,
}

impl NavbarSection {
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        // Claim the scroll lock before mounting anything.
        let menu = OverlayMenu::new(ctx.config.menu_timings())?;
        let base = SectionBase::mount("navbar", "nav", ctx);
        let navbar = &ctx.content.navbar;

        let header = base.element("header", None);
        let brand = base.element("a", Some(header));
        let bar = base.element("ul", Some(header));
        let toggle = base.element("button", Some(header));
        let toggle_icon = base.element("i", Some(toggle));

        let overlay = base.element("div", None);
        let link_list = base.element("ul", Some(overlay));
        let links: Vec<ElementId> = navbar
            .menu_links
            .iter()
            .map(|link| engine::mount_keyed("li", Some(link_list), link.href.clone()))
            .collect();
        let image = base.element("figure", Some(overlay));
        let contact = base.element("address", Some(overlay));

        animate::play_timeline(&Timeline::single(header, ctx.variant("header-drop")?), base.owner);

        menu.bind_items(link_list, links.clone(), ctx.variant("menu-stagger")?, ctx.variant("menu-item")?);

        let motion = OverlayMotion {
            panel: ctx.variant("menu-panel")?,
            panel_exit: ctx.variant("menu-panel-exit")?,
            image: ctx.variant("menu-image")?,
            contact: ctx.variant("menu-footer")?,
            icon: ctx.variant("icon-swap")?,
        };
        animate::set_rest(overlay, motion.panel.clone());
        animate::set_rest(image, motion.image.clone());
        animate::set_rest(contact, motion.contact.clone());
        animate::set_rest(toggle_icon, motion.icon.clone());

        let owner = base.owner;
        let unsubscribe = menu.store().subscribe(move |state| match state {
            MenuState::Opening => {
                animate::play(overlay, motion.panel.clone(), 0, owner);
                animate::play(image, motion.image.clone(), motion.image.delay_ms(), owner);
                animate::play(contact, motion.contact.clone(), motion.contact.delay_ms(), owner);
                animate::play(toggle_icon, motion.icon.clone(), 0, owner);
            }
            MenuState::Closing => {
                animate::play(overlay, motion.panel_exit.clone(), 0, owner);
                animate::set_rest(toggle_icon, motion.icon.clone());
            }
            MenuState::Closed => {
                animate::set_rest(overlay, motion.panel.clone());
                animate::set_rest(image, motion.image.clone());
                animate::set_rest(contact, motion.contact.clone());
                animate::set_rest(toggle_icon, motion.icon.clone());
            }
            MenuState::Open => {}
        });

        Ok(Self {
            base,
            content: ctx.content.clone(),
            header,
            brand,
            bar,
            toggle,
            toggle_icon,
            overlay,
            link_list,
            links,
            image,
            contact,
            menu,
            unsubscribe: Some(unsubscribe),
        })
    }

    /// The hamburger / close button.
    pub fn toggle_menu(&self) {
        self.menu.toggle();
    }

    /// Escape key or backdrop click.
    pub fn close_menu(&self) {
        self.menu.close();
    }

    /// A menu link was clicked.
    pub fn activate_link(&self, href: &str) -> NavigationRequest {
        self.menu.activate_link(href)
    }

    pub fn menu(&self) -> &OverlayMenu {
        &self.menu
    }

    pub fn header(&self) -> ElementId {
        self.header
    }

    pub fn overlay(&self) -> ElementId {
        self.overlay
    }

    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    pub fn image(&self) -> ElementId {
        self.image
    }

    /// Contact details and social links at the foot of the overlay.
    pub fn contact(&self) -> ElementId {
        self.contact
    }

    fn render_overlay(&self) -> Node {
        let navbar = &self.content.navbar;
        let links = navbar.menu_links.iter().zip(&self.links).map(|(link, id)| {
            Node::element(*id, "li").child(
                Node::new("a")
                    .attr("href", &link.href)
                    .maybe_child(link.number.as_ref().map(|number| Node::new("span").text(number)))
                    .child(Node::new("strong").text(&link.name)),
            )
        });
        let social = navbar
            .social_links
            .iter()
            .map(|link| Node::new("a").attr("href", &link.href).text(&link.name));

        Node::element(self.overlay, "div")
            .attr("role", "dialog")
            .attr("data-state", format!("{:?}", self.menu.state()).to_lowercase())
            .child(Node::element(self.link_list, "ul").children(links))
            .child(
                Node::element(self.image, "figure")
                    .child(
                        Node::new("img")
                            .attr("src", &navbar.featured.image)
                            .attr("alt", &navbar.featured.studio_name),
                    )
                    .child(Node::new("figcaption").text(&navbar.featured.copyright)),
            )
            .child(
                Node::element(self.contact, "address")
                    .child(Node::new("a").attr("href", format!("mailto:{}", navbar.contact.email)).text(&navbar.contact.email))
                    .child(Node::new("span").text(&navbar.contact.phone))
                    .children(social),
            )
    }
}

impl Section for NavbarSection {
    fn name(&self) -> &'static str {
        "navbar"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let mut column = Column::new(top, viewport);
        let header = column.place(self.header, HEADER_HEIGHT_PX);
        engine::set_bounds(self.brand, Rect::new(header.x, header.y, 160.0, header.height));
        engine::set_bounds(self.toggle, Rect::new(header.x + header.width - 48.0, header.y + 20.0, 48.0, 48.0));
        engine::set_bounds(self.toggle_icon, Rect::new(header.x + header.width - 36.0, header.y + 32.0, 24.0, 24.0));
        engine::set_bounds(self.bar, Rect::new(header.x + 200.0, header.y, (header.width - 300.0).max(0.0), header.height));

        // The overlay covers the viewport, not the document flow.
        engine::set_bounds(self.overlay, Rect::new(0.0, top, viewport.width, viewport.height));
        let inner = Rect::new(PAGE_PADDING_PX, top + HEADER_HEIGHT_PX, column.width(), viewport.height - HEADER_HEIGHT_PX);
        engine::set_bounds(self.link_list, Rect::new(inner.x, inner.y, inner.width * 0.6, inner.height.max(0.0)));
        let row = 64.0;
        for (index, id) in self.links.iter().enumerate() {
            engine::set_bounds(*id, Rect::new(inner.x, inner.y + index as f64 * row, inner.width * 0.6, row));
        }
        engine::set_bounds(
            self.image,
            Rect::new(inner.x + inner.width * 0.6, inner.y, inner.width * 0.4, (inner.height * 0.6).max(0.0)),
        );
        engine::set_bounds(
            self.contact,
            Rect::new(inner.x, (inner.y + inner.height - 96.0).max(inner.y), inner.width, 96.0),
        );

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
        let navbar = &self.content.navbar;
        let state = self.menu.state();
        let icon = if state.locks_scroll() { Icon::Close } else { Icon::Plus };
        let bar_links = navbar
            .bar_links
            .iter()
            .map(|link| Node::new("li").child(Node::new("a").attr("href", &link.href).text(&link.name)));

        let header = Node::element(self.header, "header")
            .child(
                Node::element(self.brand, "a")
                    .attr("href", "/")
                    .text(&navbar.brand_name)
                    .child(Node::new("sup").text(&navbar.brand_mark)),
            )
            .child(Node::element(self.bar, "ul").children(bar_links))
            .child(Node::new("a").attr("href", &navbar.cta.href).text(&navbar.cta.label))
            .child(
                Node::element(self.toggle, "button")
                    .attr("aria-label", "Menu")
                    .attr("aria-expanded", state.locks_scroll().to_string())
                    .child(Node::element(self.toggle_icon, "i").attr("data-icon", icon.asset())),
            );

        let overlay = state.is_visible().then(|| self.render_overlay());
        Some(Node::element(self.base.root, "nav").child(header).maybe_child(overlay))
    }

    fn unmount(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
        self.menu.teardown();
        self.base.unmount();
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }
}

impl Drop for NavbarSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::motion::VariantRegistry;
    use crate::state::animate::Phase;
    use crate::state::is_scroll_locked;
    use crate::state::scroll_lock::reset_scroll_lock;

    fn context() -> SectionContext {
        SectionContext::new(
            PageContent::placeholder().unwrap(),
            Rc::new(VariantRegistry::with_presets()),
            Rc::new(MotionConfig::default()),
        )
    }

    fn setup() -> NavbarSection {
        engine::reset_registry();
        engine::reset_scheduler();
        animate::reset_playback();
        reset_scroll_lock();
        NavbarSection::mount(&context()).unwrap()
    }

    #[test]
    fn test_header_drops_in_on_mount() {
        let section = setup();
        assert_eq!(animate::variant_name(section.header()).as_deref(), Some("header-drop"));
        engine::advance(600);
        assert_eq!(animate::phase(section.header()), Some(Phase::Active));
    }

    #[test]
    fn test_overlay_hidden_while_closed() {
        let section = setup();
        let node = section.render().unwrap();
        assert!(node.find_element(section.overlay()).is_none());
        assert!(node.find_attr("aria-expanded", "false").is_some());
    }

    #[test]
    fn test_open_plays_panel_links_and_image() {
        let section = setup();
        section.toggle_menu();

        assert_eq!(section.menu().state(), MenuState::Opening);
        assert!(is_scroll_locked());
        assert_eq!(animate::variant_name(section.overlay()).as_deref(), Some("menu-panel"));
        assert_eq!(animate::phase(section.image()), Some(Phase::Pending));
        assert_eq!(animate::phase(section.links()[0]), Some(Phase::Pending));

        engine::advance(400);
        assert_eq!(section.menu().state(), MenuState::Open);
        assert_eq!(animate::phase(section.image()), Some(Phase::Running));

        let node = section.render().unwrap();
        assert!(node.find_element(section.overlay()).is_some());
        assert!(node.find_attr("aria-expanded", "true").is_some());
        assert_eq!(node.find_element(section.overlay()).unwrap().find_all("li").len(), 6);
    }

    #[test]
    fn test_contact_block_arrives_last() {
        let section = setup();
        section.toggle_menu();
        assert_eq!(animate::variant_name(section.contact()).as_deref(), Some("menu-footer"));

        engine::advance(400);
        assert_eq!(animate::phase(section.image()), Some(Phase::Running));
        assert_eq!(animate::phase(section.contact()), Some(Phase::Pending));
        engine::advance(100);
        assert_eq!(animate::phase(section.contact()), Some(Phase::Running));

        let node = section.render().unwrap();
        let contact = node.find_element(section.contact()).unwrap();
        assert!(contact.find_all("a").len() > 1);

        section.close_menu();
        engine::advance(300);
        assert_eq!(animate::phase(section.contact()), Some(Phase::Rest));
    }

    #[test]
    fn test_close_plays_exit_then_unlocks() {
        let section = setup();
        section.toggle_menu();
        engine::advance(400);
        section.close_menu();

        assert_eq!(animate::variant_name(section.overlay()).as_deref(), Some("menu-panel-exit"));
        assert!(section.render().unwrap().find_element(section.overlay()).is_some());

        engine::advance(300);
        assert_eq!(section.menu().state(), MenuState::Closed);
        assert!(!is_scroll_locked());
        assert_eq!(animate::phase(section.overlay()), Some(Phase::Rest));
        assert!(section.render().unwrap().find_element(section.overlay()).is_none());
    }

    #[test]
    fn test_activate_link_closes_and_navigates() {
        let section = setup();
        section.toggle_menu();
        engine::advance(400);

        let request = section.activate_link("#pricing");
        assert_eq!(request.href, "#pricing");
        assert_eq!(section.menu().state(), MenuState::Closing);
        engine::advance(300);
        assert!(!is_scroll_locked());
    }

    #[test]
    fn test_unmount_while_open_releases_lock() {
        let mut section = setup();
        section.toggle_menu();
        assert!(is_scroll_locked());

        section.unmount();
        assert!(!is_scroll_locked());
        assert_eq!(engine::pending_count(), 0);
        assert!(section.render().is_none());
        assert_eq!(section.menu().store().listener_count(), 0);
    }

    #[test]
    fn test_second_navbar_cannot_claim_lock() {
        let _first = setup();
        assert!(NavbarSection::mount(&context()).is_err());
    }
}
