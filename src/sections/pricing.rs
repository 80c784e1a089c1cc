//! Pricing - package picker with a per-package feature list.
//!
//! Two selection controllers: the package (starting at the popular one) and
//! the plan tab. The feature list under the chosen package is keyed
//! `{package}-{index}`: on every package change the old bullets are
//! detached and new ones mounted, so their stagger replays from the top
//! instead of diffing against the previous package's list.

use std::cell::RefCell;
use std::rc::Rc;

use super::{place_root, Column, Section, SectionBase, SectionContext};
use crate::content::{Icon, Package, PageContent, PlanTab};
use crate::engine;
use crate::error::{MotionError, Result};
use crate::motion::{Timeline, VariantSpec};
use crate::primitives::{Cleanup, Node};
use crate::state::{animate, RevealOptions, SelectionController, TriggerPolicy};
use crate::types::{ElementId, Rect, Viewport};

const FEATURE_ROW_PX: f64 = 52.0;

/// Bullets currently mounted for the selected package.
struct FeatureList {
    container: ElementId,
    items: Vec<ElementId>,
    top: f64,
    left: f64,
    width: f64,
}

pub struct PricingSection {
    base: SectionBase,
    content: Rc<PageContent>,
    picker: Option<Picker>,
    unsubscribe: Option<Cleanup>,
}

/// Elements and controllers of a pricing block with something to pick.
struct Picker {
    title: ElementId,
    description: ElementId,
    number: ElementId,
    tab_bar: ElementId,
    tab_buttons: Vec<ElementId>,
    panel: ElementId,
    package_buttons: Vec<ElementId>,
    packages: SelectionController<Package>,
    tabs: SelectionController<PlanTab>,
    features: Rc<RefCell<FeatureList>>,
    feature_container: Rc<VariantSpec>,
    feature_item: Rc<VariantSpec>,
}

impl Picker {
    fn remount_features(&self, owner: engine::OwnerId) {
        let package = self.packages.current();
        mount_features(
            &mut self.features.borrow_mut(),
            &package,
            &self.feature_container,
            &self.feature_item,
            owner,
        );
    }
}

impl PricingSection {
    /// Mount the pricing block.
    ///
    /// Content with no packages or no plan tabs mounts an empty root that
    /// lays out at zero height and renders nothing.
    pub fn mount(ctx: &SectionContext) -> Result<Self> {
        let pricing = &ctx.content.pricing;
        if pricing.packages.is_empty() || pricing.tabs.is_empty() {
            tracing::warn!(
                packages = pricing.packages.len(),
                tabs = pricing.tabs.len(),
                "pricing content incomplete, section omitted"
            );
            return Ok(Self {
                base: SectionBase::mount("pricing", "section", ctx),
                content: ctx.content.clone(),
                picker: None,
                unsubscribe: None,
            });
        }
        let packages = SelectionController::new("package", pricing.packages.clone())?;
        let tabs = SelectionController::new("plan-tab", pricing.tabs.clone())?;

        let base = SectionBase::mount("pricing", "section", ctx);
        let title = base.element("h2", None);
        let description = base.element("p", None);
        let number = base.element("span", None);
        let tab_bar = base.element("div", None);
        let tab_buttons: Vec<ElementId> = pricing
            .tabs
            .iter()
            .map(|tab| engine::mount_keyed("button", Some(tab_bar), tab.id.clone()))
            .collect();
        let panel = base.element("div", None);
        let package_buttons: Vec<ElementId> = pricing
            .packages
            .iter()
            .map(|package| engine::mount_keyed("button", Some(panel), package.id.clone()))
            .collect();
        let container = engine::mount_element("ul", Some(panel));

        let fade_up = ctx.variant("fade-up")?;
        base.reveal.observe(title, fade_up.clone(), TriggerPolicy::Once);
        base.reveal.observe(description, ctx.variant("fade-up-delayed")?, TriggerPolicy::Once);
        base.reveal.observe(number, ctx.variant("slide-in-right-delayed")?, TriggerPolicy::Once);
        base.reveal.observe(tab_bar, fade_up.clone(), TriggerPolicy::Once);
        base.reveal.observe_with(panel, fade_up, RevealOptions::once().margin(ctx.element_margin()));

        // Container spacing comes from config; the bullet motion from the
        // registry.
        let preset = ctx.variant("feature-list")?;
        let feature_container = Rc::new(
            VariantSpec::builder(preset.name())
                .rest(*preset.rest())
                .active(*preset.active())
                .stagger_ms(ctx.config.pricing.feature_stagger_ms)
                .child_delay_ms(preset.child_delay_ms().unwrap_or(0))
                .build()?,
        );

        let picker = Picker {
            title,
            description,
            number,
            tab_bar,
            tab_buttons,
            panel,
            package_buttons,
            packages,
            tabs,
            features: Rc::new(RefCell::new(FeatureList {
                container,
                items: Vec::new(),
                top: 0.0,
                left: 0.0,
                width: 0.0,
            })),
            feature_container,
            feature_item: ctx.variant("feature-item")?,
        };

        picker.remount_features(base.owner);
        let weak = Rc::downgrade(&picker.features);
        let package_list = pricing.packages.clone();
        let container = picker.feature_container.clone();
        let item = picker.feature_item.clone();
        let owner = base.owner;
        let unsubscribe = picker.packages.subscribe(move |key| {
            let Some(features) = weak.upgrade() else { return };
            let Some(package) = package_list.iter().find(|p| p.id == key) else { return };
            mount_features(&mut features.borrow_mut(), package, &container, &item, owner);
        });

        Ok(Self {
            base,
            content: ctx.content.clone(),
            picker: Some(picker),
            unsubscribe: Some(unsubscribe),
        })
    }

    /// True when the content had nothing to pick and the block is left out.
    pub fn is_omitted(&self) -> bool {
        self.picker.is_none()
    }

    /// Choose a package. Unknown keys are rejected and change nothing.
    pub fn select_package(&self, key: &str) -> Result<bool> {
        match &self.picker {
            Some(picker) => picker.packages.select(key),
            None => Err(MotionError::EmptyOptions("package")),
        }
    }

    /// Choose a plan tab.
    pub fn select_tab(&self, key: &str) -> Result<bool> {
        match &self.picker {
            Some(picker) => picker.tabs.select(key),
            None => Err(MotionError::EmptyOptions("plan-tab")),
        }
    }

    pub fn selected_package(&self) -> Option<Package> {
        self.picker.as_ref().map(|picker| picker.packages.current())
    }

    pub fn selected_tab(&self) -> Option<PlanTab> {
        self.picker.as_ref().map(|picker| picker.tabs.current())
    }

    pub fn packages(&self) -> Option<&SelectionController<Package>> {
        self.picker.as_ref().map(|picker| &picker.packages)
    }

    pub fn tabs(&self) -> Option<&SelectionController<PlanTab>> {
        self.picker.as_ref().map(|picker| &picker.tabs)
    }

    pub fn description(&self) -> Option<ElementId> {
        self.picker.as_ref().map(|picker| picker.description)
    }

    pub fn number(&self) -> Option<ElementId> {
        self.picker.as_ref().map(|picker| picker.number)
    }

    /// Mounted feature bullets, in order.
    pub fn feature_items(&self) -> Vec<ElementId> {
        self.picker
            .as_ref()
            .map(|picker| picker.features.borrow().items.clone())
            .unwrap_or_default()
    }

    /// Keys of the mounted feature bullets.
    pub fn feature_keys(&self) -> Vec<String> {
        self.feature_items().into_iter().filter_map(engine::key_of).collect()
    }
}

/// Replace the bullets with `package`'s, keyed per package, and replay
/// their stagger.
fn mount_features(
    list: &mut FeatureList,
    package: &Package,
    container: &VariantSpec,
    item: &Rc<VariantSpec>,
    owner: engine::OwnerId,
) {
    if !engine::is_attached(list.container) {
        return;
    }
    for old in list.items.drain(..) {
        engine::detach_element(old);
    }
    list.items = (0..package.features.len())
        .map(|index| engine::mount_keyed("li", Some(list.container), format!("{}-{}", package.id, index)))
        .collect();
    place_features(list);

    let timeline = Timeline::list(&list.items, container, item.clone());
    let started = animate::play_timeline(&timeline, owner);
    tracing::debug!(package = %package.id, started, "feature list remounted");
}

fn place_features(list: &FeatureList) {
    for (index, id) in list.items.iter().enumerate() {
        engine::set_bounds(
            *id,
            Rect::new(list.left, list.top + index as f64 * FEATURE_ROW_PX, list.width, FEATURE_ROW_PX),
        );
    }
}

impl Section for PricingSection {
    fn name(&self) -> &'static str {
        "pricing"
    }

    fn root(&self) -> ElementId {
        self.base.root
    }

    fn layout(&mut self, top: f64, viewport: &Viewport) -> f64 {
        let Some(picker) = &self.picker else {
            place_root(self.base.root, top, 0.0, viewport);
            return 0.0;
        };
        let mut column = Column::new(top, viewport);
        column.gap(80.0);
        column.place(picker.title, 80.0);
        column.place(picker.description, 40.0);
        column.place(picker.number, 24.0);
        column.gap(24.0);
        column.place_grid(Some(picker.tab_bar), &picker.tab_buttons, picker.tab_buttons.len(), 44.0, 8.0);
        column.gap(24.0);

        let longest = self.content.pricing.packages.iter().map(|p| p.features.len()).max().unwrap_or(0);
        let buttons_height = picker.package_buttons.len() as f64 * 96.0;
        let features_height = 80.0 + longest as f64 * FEATURE_ROW_PX;
        let panel = column.place(picker.panel, buttons_height.max(features_height));

        let half = panel.width / 2.0;
        for (index, id) in picker.package_buttons.iter().enumerate() {
            engine::set_bounds(*id, Rect::new(panel.x, panel.y + index as f64 * 96.0, half - 8.0, 88.0));
        }
        {
            let mut features = picker.features.borrow_mut();
            features.left = panel.x + half;
            features.top = panel.y + 80.0;
            features.width = half;
            engine::set_bounds(
                features.container,
                Rect::new(features.left, features.top, half, longest as f64 * FEATURE_ROW_PX),
            );
            place_features(&features);
        }
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
        let picker = self.picker.as_ref()?;
        let pricing = &self.content.pricing;
        let selected = picker.packages.current();

        let tabs = pricing.tabs.iter().zip(&picker.tab_buttons).map(|(tab, id)| {
            Node::element(*id, "button")
                .attr("aria-selected", picker.tabs.is_selected(&tab.id).to_string())
                .text(&tab.label)
        });

        let buttons = pricing.packages.iter().zip(&picker.package_buttons).map(|(package, id)| {
            let is_selected = picker.packages.is_selected(&package.id);
            let mut button = Node::element(*id, "button")
                .attr("aria-pressed", is_selected.to_string())
                .child(Node::new("p").text(&package.name))
                .child(Node::new("p").attr("class", "price").text(format!("${}", package.price)));
            if is_selected {
                button = button.child(Node::new("i").attr("data-icon", Icon::Check.asset()));
            }
            if package.popular {
                button = button.child(Node::new("span").attr("class", "badge").text("Popular"));
            }
            button
        });

        let features = picker.features.borrow();
        let bullets = selected.features.iter().zip(&features.items).map(|(feature, id)| {
            Node::element(*id, "li")
                .child(Node::new("span").text(feature))
                .child(Node::new("i").attr("data-icon", Icon::Check.asset()))
        });

        Some(
            Node::element(self.base.root, "section")
                .attr("id", "pricing")
                .child(Node::element(picker.title, "h2").text(&pricing.section_title))
                .child(Node::element(picker.description, "p").text(&pricing.section_description))
                .child(Node::element(picker.number, "span").text(format!("({})", pricing.section_number)))
                .child(Node::element(picker.tab_bar, "div").attr("role", "tablist").children(tabs))
                .child(
                    Node::element(picker.panel, "div")
                        .children(buttons)
                        .child(Node::new("h3").text("Includes:"))
                        .child(Node::new("p").text(&selected.description))
                        .child(Node::element(features.container, "ul").children(bullets)),
                ),
        )
    }

    fn unmount(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
        self.base.unmount();
        if let Some(picker) = &self.picker {
            picker.features.borrow_mut().items.clear();
        }
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }
}

impl Drop for PricingSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::engine::pending_count;
    use crate::motion::VariantRegistry;
    use crate::state::animate::{phase, play_count, Phase};

    fn mount_with(content: Rc<PageContent>) -> PricingSection {
        engine::reset_registry();
        engine::reset_scheduler();
        animate::reset_playback();
        let ctx = SectionContext::new(
            content,
            Rc::new(VariantRegistry::with_presets()),
            Rc::new(MotionConfig::default()),
        );
        PricingSection::mount(&ctx).unwrap()
    }

    fn setup() -> PricingSection {
        mount_with(PageContent::placeholder().unwrap())
    }

    #[test]
    fn test_no_packages_omits_section() {
        let content = PageContent::from_json_str(r#"{ "pricing": { "sectionTitle": "Plans" } }"#).unwrap();
        let mut pricing = mount_with(Rc::new(content));

        assert!(pricing.is_omitted());
        assert!(pricing.is_mounted());
        assert!(pricing.render().is_none());
        assert_eq!(pricing.layout(500.0, &Viewport::new(0.0, 1280.0, 800.0)), 0.0);
        assert_eq!(pricing.selected_package(), None);
        assert!(matches!(pricing.select_package("pro"), Err(MotionError::EmptyOptions("package"))));
        assert!(pricing.feature_keys().is_empty());
        // Only the section root.
        assert_eq!(engine::attached_count(), 1);
    }

    #[test]
    fn test_no_tabs_omits_section() {
        let mut content = (*PageContent::placeholder().unwrap()).clone();
        content.pricing.tabs.clear();
        let pricing = mount_with(Rc::new(content));
        assert!(pricing.is_omitted());
        assert!(matches!(pricing.select_tab("monthly"), Err(MotionError::EmptyOptions("plan-tab"))));
    }

    #[test]
    fn test_copy_trails_headline() {
        let mut pricing = setup();
        pricing.layout(0.0, &Viewport::new(0.0, 1280.0, 800.0));
        pricing.on_viewport(Viewport::new(0.0, 1280.0, 800.0));

        let description = pricing.description().unwrap();
        let number = pricing.number().unwrap();
        assert_eq!(phase(description), Some(Phase::Pending));
        assert_eq!(phase(number), Some(Phase::Pending));
        engine::advance(100);
        assert_eq!(phase(description), Some(Phase::Running));
        assert_eq!(phase(number), Some(Phase::Pending));
        engine::advance(100);
        assert_eq!(phase(number), Some(Phase::Running));
    }

    #[test]
    fn test_initial_selection_is_popular() {
        let pricing = setup();
        assert_eq!(pricing.selected_package().unwrap().id, "pro");
        assert_eq!(pricing.selected_tab().unwrap().id, "monthly");
        assert_eq!(pricing.feature_keys(), vec!["pro-0", "pro-1", "pro-2", "pro-3"]);
    }

    #[test]
    fn test_select_remounts_features_keyed() {
        let pricing = setup();
        let old = pricing.feature_items();
        engine::advance(1_000);

        assert!(pricing.select_package("enterprise").unwrap());
        assert_eq!(pricing.selected_package().unwrap().id, "enterprise");
        assert!(old.iter().all(|id| !engine::is_attached(*id)));

        let keys = pricing.feature_keys();
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0], "enterprise-0");
        assert_eq!(keys[4], "enterprise-4");

        // Stagger: 50ms apart, first one immediately.
        let items = pricing.feature_items();
        assert_eq!(play_count(items[0]), 1);
        assert_eq!(phase(items[1]), Some(Phase::Pending));
        engine::advance(50);
        assert_eq!(play_count(items[1]), 1);
        assert_eq!(play_count(items[2]), 0);
    }

    #[test]
    fn test_unknown_package_changes_nothing() {
        let pricing = setup();
        let items = pricing.feature_items();
        assert!(pricing.select_package("nonexistent").is_err());
        assert_eq!(pricing.selected_package().unwrap().id, "pro");
        assert_eq!(pricing.feature_items(), items);
    }

    #[test]
    fn test_reselect_same_package_keeps_list() {
        let pricing = setup();
        let items = pricing.feature_items();
        assert!(!pricing.select_package("pro").unwrap());
        assert_eq!(pricing.feature_items(), items);
    }

    #[test]
    fn test_tab_selection() {
        let pricing = setup();
        assert!(pricing.select_tab("project").unwrap());
        assert_eq!(pricing.selected_tab().unwrap().id, "project");
        assert!(pricing.select_tab("yearly").is_err());
    }

    #[test]
    fn test_render_marks_selection() {
        let pricing = setup();
        pricing.select_package("starter").unwrap();
        let node = pricing.render().unwrap();

        let pressed: Vec<_> = node
            .find_all("button")
            .into_iter()
            .filter(|n| n.attrs.get("aria-pressed").map(String::as_str) == Some("true"))
            .collect();
        assert_eq!(pressed.len(), 1);
        assert_eq!(pressed[0].key.as_deref(), Some("starter"));
        assert_eq!(node.find_all("li").len(), 3);
    }

    #[test]
    fn test_unmount_cancels_stagger() {
        let mut pricing = setup();
        pricing.select_package("enterprise").unwrap();
        assert!(pending_count() > 0);

        pricing.unmount();
        assert_eq!(pending_count(), 0);
        assert!(pricing.render().is_none());
        assert!(pricing.select_package("starter").is_ok());
        assert!(pricing.feature_items().is_empty());
    }
}
