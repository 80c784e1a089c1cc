//! Viewport Reveal - play a variant when an element scrolls into view.
//!
//! Every section builds on this. A subscription binds an element (and,
//! for stagger chains, its ordered children) to a variant and a trigger
//! policy. Crossings come either from the host's intersection primitive via
//! [`RevealController::handle_intersection`] or from the built-in geometric
//! check in [`RevealController::update_viewport`].
//!
//! # Policies
//!
//! - [`TriggerPolicy::Once`]: first crossing-in plays, then the
//!   subscription is released; later crossings are ignored
//! - [`TriggerPolicy::EveryEntry`]: each crossing-in resets to rest and
//!   replays; crossing-out only animates if a hide variant is set
//!
//! # Lifecycle
//!
//! Subscriptions are released exactly once: by [`unobserve`], by policy
//! exhaustion, by the element being detached, or by the controller being
//! disposed/dropped. Disposal also cancels every timer the controller
//! scheduled, so nothing fires against an unmounted section.
//!
//! [`unobserve`]: RevealController::unobserve

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::animate;
use crate::engine::{self, OwnerId};
use crate::motion::{Timeline, VariantSpec};
use crate::types::{ElementId, RootMargin, Viewport};

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    #[default]
    Once,
    EveryEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevealOptions {
    pub policy: TriggerPolicy,
    /// Overrides the controller's default margin.
    pub margin: Option<RootMargin>,
}

impl RevealOptions {
    pub fn once() -> Self {
        Self { policy: TriggerPolicy::Once, margin: None }
    }

    pub fn every_entry() -> Self {
        Self { policy: TriggerPolicy::EveryEntry, margin: None }
    }

    pub fn margin(mut self, margin: RootMargin) -> Self {
        self.margin = Some(margin);
        self
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

struct Subscription {
    parent_variant: Rc<VariantSpec>,
    children: Vec<ElementId>,
    child_variant: Option<Rc<VariantSpec>>,
    hide_variant: Option<Rc<VariantSpec>>,
    policy: TriggerPolicy,
    margin: RootMargin,
    inside: bool,
    fired: u32,
}

impl Subscription {
    fn timeline(&self, root: ElementId) -> Timeline {
        match &self.child_variant {
            Some(child_variant) => Timeline::staggered(
                root,
                self.parent_variant.clone(),
                &self.children,
                child_variant.clone(),
            ),
            None => Timeline::single(root, self.parent_variant.clone()),
        }
    }

    fn targets(&self, root: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::once(root).chain(self.children.iter().copied())
    }
}

struct RevealInner {
    owner: OwnerId,
    default_margin: RootMargin,
    subscriptions: HashMap<ElementId, Subscription>,
    viewport: Option<Viewport>,
    released: u64,
    disposed: bool,
}

/// What a crossing event turned into.
enum Crossing {
    Ignored,
    Reveal { timeline: Timeline, reset_first: bool },
    Hide { root: ElementId, variant: Rc<VariantSpec> },
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Per-section reveal controller.
pub struct RevealController {
    inner: Rc<RefCell<RevealInner>>,
}

impl std::fmt::Debug for RevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RevealController")
            .field("observed", &inner.subscriptions.len())
            .field("released", &inner.released)
            .field("disposed", &inner.disposed)
            .finish()
    }
}

impl RevealController {
    pub fn new(default_margin: RootMargin) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RevealInner {
                owner: engine::allocate_owner(),
                default_margin,
                subscriptions: HashMap::new(),
                viewport: None,
                released: 0,
                disposed: false,
            })),
        }
    }

    /// Timer owner tag for everything this controller schedules.
    pub fn owner(&self) -> OwnerId {
        self.inner.borrow().owner
    }

    /// Watch `element` and play `variant` on entry.
    ///
    /// Returns false (and does nothing) if the element is detached or the
    /// controller was disposed.
    pub fn observe(&self, element: ElementId, variant: Rc<VariantSpec>, policy: TriggerPolicy) -> bool {
        self.subscribe(element, variant, Vec::new(), None, RevealOptions { policy, margin: None })
    }

    /// Like [`observe`](Self::observe) with explicit options.
    pub fn observe_with(&self, element: ElementId, variant: Rc<VariantSpec>, options: RevealOptions) -> bool {
        self.subscribe(element, variant, Vec::new(), None, options)
    }

    /// Watch a parent whose activation also plays `children`, in declared
    /// order, spaced by the parent variant's stagger policy.
    pub fn observe_group(
        &self,
        parent: ElementId,
        children: &[ElementId],
        parent_variant: Rc<VariantSpec>,
        child_variant: Rc<VariantSpec>,
        options: RevealOptions,
    ) -> bool {
        self.subscribe(parent, parent_variant, children.to_vec(), Some(child_variant), options)
    }

    fn subscribe(
        &self,
        element: ElementId,
        parent_variant: Rc<VariantSpec>,
        children: Vec<ElementId>,
        child_variant: Option<Rc<VariantSpec>>,
        options: RevealOptions,
    ) -> bool {
        if self.inner.borrow().disposed || !engine::is_attached(element) {
            tracing::trace!(element = %element, "observe skipped");
            return false;
        }

        // Re-observing replaces the previous binding.
        self.unobserve(element);

        animate::set_rest(element, parent_variant.clone());
        if let Some(child_variant) = &child_variant {
            for child in &children {
                animate::set_rest(*child, child_variant.clone());
            }
        }

        let viewport = {
            let mut inner = self.inner.borrow_mut();
            let margin = options.margin.unwrap_or(inner.default_margin);
            inner.subscriptions.insert(
                element,
                Subscription {
                    parent_variant,
                    children,
                    child_variant,
                    hide_variant: None,
                    policy: options.policy,
                    margin,
                    inside: false,
                    fired: 0,
                },
            );
            inner.viewport
        };

        let weak: Weak<RefCell<RevealInner>> = Rc::downgrade(&self.inner);
        engine::on_destroy(element, move || {
            if let Some(inner) = weak.upgrade() {
                release(&inner, element, true);
            }
        });

        // Like an intersection observer's initial callback: evaluate now if
        // we already know where the viewport is.
        if let Some(viewport) = viewport {
            self.check_element(element, &viewport);
        }
        true
    }

    /// Play `variant` on crossing-out for an `EveryEntry` subscription.
    pub fn with_hide_variant(&self, element: ElementId, variant: Rc<VariantSpec>) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.subscriptions.get_mut(&element) {
            Some(subscription) => {
                subscription.hide_variant = Some(variant);
                true
            }
            None => false,
        }
    }

    /// Stop watching `element` and cancel its pending playback.
    ///
    /// Returns true only for the call that actually released it.
    pub fn unobserve(&self, element: ElementId) -> bool {
        release(&self.inner, element, true)
    }

    /// Intersection callback from the host.
    ///
    /// Returns true if this crossing started a reveal.
    pub fn handle_intersection(&self, element: ElementId, is_intersecting: bool) -> bool {
        if !engine::is_attached(element) {
            // Element went away between the observation and the callback.
            return false;
        }

        let crossing = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return false;
            }
            let Some(subscription) = inner.subscriptions.get_mut(&element) else {
                return false;
            };

            if is_intersecting && !subscription.inside {
                subscription.inside = true;
                subscription.fired += 1;
                Crossing::Reveal {
                    timeline: subscription.timeline(element),
                    reset_first: subscription.fired > 1,
                }
            } else if !is_intersecting && subscription.inside {
                subscription.inside = false;
                match &subscription.hide_variant {
                    Some(variant) => Crossing::Hide { root: element, variant: variant.clone() },
                    None => Crossing::Ignored,
                }
            } else {
                Crossing::Ignored
            }
        };

        match crossing {
            Crossing::Ignored => false,
            Crossing::Hide { root, variant } => {
                let owner = self.owner();
                animate::play(root, variant, 0, owner);
                false
            }
            Crossing::Reveal { timeline, reset_first } => {
                let (owner, policy) = {
                    let inner = self.inner.borrow();
                    let policy = inner.subscriptions.get(&element).map(|s| s.policy);
                    (inner.owner, policy)
                };

                if reset_first {
                    for entry in timeline.entries() {
                        animate::reset(entry.target);
                    }
                }
                animate::play_timeline(&timeline, owner);
                tracing::debug!(element = %element, targets = timeline.len(), "reveal started");

                if policy == Some(TriggerPolicy::Once) {
                    // Exhausted: release the watch but let the reveal finish.
                    release(&self.inner, element, false);
                }
                true
            }
        }
    }

    /// Built-in intersection detection from element bounds.
    ///
    /// Stores the viewport and dispatches a crossing for every subscription
    /// whose inside/outside status changed. Returns how many reveals
    /// started.
    pub fn update_viewport(&self, viewport: Viewport) -> usize {
        let elements: Vec<ElementId> = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return 0;
            }
            inner.viewport = Some(viewport);
            let mut elements: Vec<ElementId> = inner.subscriptions.keys().copied().collect();
            elements.sort_unstable();
            elements
        };

        elements
            .into_iter()
            .filter(|element| self.check_element(*element, &viewport))
            .count()
    }

    fn check_element(&self, element: ElementId, viewport: &Viewport) -> bool {
        let Some(bounds) = engine::bounds(element) else { return false };
        if !bounds.is_well_formed() {
            tracing::trace!(element = %element, "ignoring malformed bounds");
            return false;
        }
        let state = {
            let inner = self.inner.borrow();
            inner.subscriptions.get(&element).map(|s| (s.margin, s.inside))
        };
        let Some((margin, inside)) = state else { return false };

        let intersecting = margin.intersects(&bounds, viewport);
        if intersecting == inside {
            return false;
        }
        self.handle_intersection(element, intersecting)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.inner.borrow().subscriptions.contains_key(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Total subscriptions released so far, by any path.
    pub fn released_count(&self) -> u64 {
        self.inner.borrow().released
    }

    /// Timers this controller still has queued.
    pub fn pending_timers(&self) -> usize {
        engine::pending_for(self.owner())
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    /// Release every subscription and cancel every timer. Idempotent.
    pub fn dispose(&self) {
        let (elements, owner) = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            let elements: Vec<ElementId> = inner.subscriptions.keys().copied().collect();
            (elements, inner.owner)
        };

        for element in elements {
            release(&self.inner, element, true);
        }
        let cancelled = engine::cancel_owner(owner);
        tracing::debug!(cancelled, "reveal controller disposed");
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Remove a subscription. With `cancel`, also stop its pending playback.
fn release(inner: &Rc<RefCell<RevealInner>>, element: ElementId, cancel: bool) -> bool {
    let removed = {
        let mut inner = inner.borrow_mut();
        let removed = inner.subscriptions.remove(&element);
        if removed.is_some() {
            inner.released += 1;
        }
        removed
    };
    let Some(subscription) = removed else { return false };

    if cancel {
        for target in subscription.targets(element) {
            animate::cancel(target);
        }
    }
    tracing::trace!(element = %element, cancel, "reveal subscription released");
    true
}
