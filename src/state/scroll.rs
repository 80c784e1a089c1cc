//! Carousel Navigator - horizontal scroll awareness for the testimonial strip.
//!
//! Manages:
//! - View state (offset, content width, viewport width), recomputed from the
//!   surface on every scroll, resize and mount
//! - Button enablement derived from the latest offset, never cached
//! - Fixed-step smooth scrolling with a settle re-poll
//!
//! Architecture:
//! - [`ScrollSurface`] = whatever actually scrolls (DOM node, test strip)
//! - [`CarouselNavigator`] = reads geometry, issues `smooth_scroll_by`
//! - [`ScrollStrip`] = in-memory surface with clamped, animated scrolling

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::store::Store;
use crate::engine::{self, OwnerId, TimerSlot};
use crate::types::Direction;

// =============================================================================
// CONSTANTS
// =============================================================================

/// One card width plus gap.
pub const SCROLL_STEP_PX: f64 = 360.0;

/// Tolerance absorbing sub-pixel noise at the right edge.
pub const SCROLL_EPSILON_PX: f64 = 10.0;

/// Delay before re-polling geometry after a programmatic scroll.
pub const SCROLL_SETTLE_MS: u64 = 300;

// =============================================================================
// VIEW STATE
// =============================================================================

/// Snapshot of the strip's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarouselViewState {
    pub scroll_offset_px: f64,
    pub content_width_px: f64,
    pub viewport_width_px: f64,
}

impl CarouselViewState {
    pub fn new(scroll_offset_px: f64, content_width_px: f64, viewport_width_px: f64) -> Self {
        Self { scroll_offset_px, content_width_px, viewport_width_px }
    }

    /// Usable geometry: finite, non-negative numbers.
    pub fn is_well_formed(&self) -> bool {
        [self.scroll_offset_px, self.content_width_px, self.viewport_width_px]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Largest reachable offset.
    pub fn max_offset_px(&self) -> f64 {
        (self.content_width_px - self.viewport_width_px).max(0.0)
    }

    pub fn can_scroll_left(&self) -> bool {
        self.scroll_offset_px > 0.0
    }

    pub fn can_scroll_right(&self, epsilon: f64) -> bool {
        self.scroll_offset_px < self.content_width_px - self.viewport_width_px - epsilon
    }
}

/// Enabled state of the two navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselButtons {
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

// =============================================================================
// SURFACE
// =============================================================================

/// Anything the navigator can measure and scroll.
pub trait ScrollSurface {
    /// Current offset, content width and viewport width.
    fn geometry(&self) -> CarouselViewState;

    /// Begin a smooth scroll by `dx` pixels. May complete later.
    fn smooth_scroll_by(&self, dx: f64);
}

struct StripInner {
    offset: f64,
    content_width: f64,
    viewport_width: f64,
    target: Option<f64>,
    animation_ms: u64,
    owner: OwnerId,
    animation: TimerSlot,
}

/// In-memory horizontal strip.
///
/// `smooth_scroll_by` clamps the target and lands on it after
/// `animation_ms` of scheduler time. Cloning shares the strip.
#[derive(Clone)]
pub struct ScrollStrip {
    inner: Rc<RefCell<StripInner>>,
}

impl std::fmt::Debug for ScrollStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollStrip").field("geometry", &self.geometry()).finish()
    }
}

impl ScrollStrip {
    pub fn new(content_width: f64, viewport_width: f64, animation_ms: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StripInner {
                offset: 0.0,
                content_width,
                viewport_width,
                target: None,
                animation_ms,
                owner: engine::allocate_owner(),
                animation: TimerSlot::new(),
            })),
        }
    }

    /// Jump to `offset` (clamped), as a user drag or wheel would.
    pub fn set_offset(&self, offset: f64) {
        let mut inner = self.inner.borrow_mut();
        let max = (inner.content_width - inner.viewport_width).max(0.0);
        inner.offset = offset.clamp(0.0, max);
        inner.target = None;
        inner.animation.cancel();
    }

    /// Change widths, re-clamping the offset.
    pub fn resize(&self, content_width: f64, viewport_width: f64) {
        let offset = {
            let mut inner = self.inner.borrow_mut();
            inner.content_width = content_width;
            inner.viewport_width = viewport_width;
            inner.offset
        };
        self.set_offset(offset);
    }

    /// Abandon any smooth scroll in flight, staying where we are.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.target = None;
        inner.animation.cancel();
    }

    /// True while a smooth scroll is in flight.
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().target.is_some()
    }
}

impl ScrollSurface for ScrollStrip {
    fn geometry(&self) -> CarouselViewState {
        let inner = self.inner.borrow();
        CarouselViewState::new(inner.offset, inner.content_width, inner.viewport_width)
    }

    fn smooth_scroll_by(&self, dx: f64) {
        let mut inner = self.inner.borrow_mut();
        let max = (inner.content_width - inner.viewport_width).max(0.0);
        let from = inner.target.unwrap_or(inner.offset);
        let target = (from + dx).clamp(0.0, max);
        inner.target = Some(target);

        let weak = Rc::downgrade(&self.inner);
        inner.animation.replace(inner.owner, inner.animation_ms, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.animation.clear();
                if let Some(target) = inner.target.take() {
                    inner.offset = target;
                }
            }
        });
    }
}

impl Drop for StripInner {
    fn drop(&mut self) {
        engine::cancel_owner(self.owner);
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Step, tolerance and settle delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    pub step_px: f64,
    pub epsilon_px: f64,
    pub settle_ms: u64,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            step_px: SCROLL_STEP_PX,
            epsilon_px: SCROLL_EPSILON_PX,
            settle_ms: SCROLL_SETTLE_MS,
        }
    }
}

struct NavigatorInner<S: ScrollSurface> {
    surface: S,
    settings: CarouselSettings,
    view: CarouselViewState,
    buttons: Store<CarouselButtons>,
    owner: OwnerId,
    settle: TimerSlot,
    disposed: bool,
}

/// Boundary-aware previous/next controls over a [`ScrollSurface`].
pub struct CarouselNavigator<S: ScrollSurface + 'static> {
    inner: Rc<RefCell<NavigatorInner<S>>>,
}

impl<S: ScrollSurface + 'static> CarouselNavigator<S> {
    /// Wrap `surface` and seed the button state from its geometry.
    pub fn new(surface: S, settings: CarouselSettings) -> Self {
        let navigator = Self {
            inner: Rc::new(RefCell::new(NavigatorInner {
                surface,
                settings,
                view: CarouselViewState::default(),
                buttons: Store::new(CarouselButtons::default()),
                owner: engine::allocate_owner(),
                settle: TimerSlot::new(),
                disposed: false,
            })),
        };
        navigator.recompute_view_state();
        navigator
    }

    /// Re-read geometry and recompute both buttons.
    ///
    /// Malformed geometry (NaN, negative) is ignored and the last good
    /// state kept.
    pub fn recompute_view_state(&self) -> CarouselButtons {
        recompute(&self.inner)
    }

    /// Smooth-scroll one step. No-op at the boundary in that direction.
    ///
    /// Returns true if a scroll was issued.
    pub fn scroll_by(&self, direction: Direction) -> bool {
        let buttons = self.recompute_view_state();
        let allowed = match direction {
            Direction::Left => buttons.can_scroll_left,
            Direction::Right => buttons.can_scroll_right,
        };
        if !allowed {
            tracing::trace!(?direction, "carousel at boundary, scroll ignored");
            return false;
        }

        let inner = self.inner.borrow();
        if inner.disposed {
            return false;
        }
        inner.surface.smooth_scroll_by(direction.sign() * inner.settings.step_px);

        let weak: Weak<RefCell<NavigatorInner<S>>> = Rc::downgrade(&self.inner);
        inner.settle.replace(inner.owner, inner.settings.settle_ms, move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow().settle.clear();
                recompute(&inner);
            }
        });
        tracing::debug!(?direction, "carousel scroll issued");
        true
    }

    /// Raw scroll event from the surface.
    pub fn on_scroll(&self) {
        self.recompute_view_state();
    }

    /// Viewport resized.
    pub fn on_resize(&self) {
        self.recompute_view_state();
    }

    /// Native scroll-end: re-poll now instead of waiting for the settle timer.
    pub fn on_scroll_end(&self) {
        self.inner.borrow().settle.cancel();
        self.recompute_view_state();
    }

    pub fn view_state(&self) -> CarouselViewState {
        self.inner.borrow().view
    }

    pub fn buttons(&self) -> CarouselButtons {
        self.inner.borrow().buttons.get()
    }

    /// Button state container, for renderers.
    pub fn buttons_store(&self) -> Store<CarouselButtons> {
        self.inner.borrow().buttons.clone()
    }

    pub fn is_settling(&self) -> bool {
        self.inner.borrow().settle.is_pending()
    }

    /// Run `f` against the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().surface)
    }

    /// Cancel the settle timer and stop responding to events.
    pub fn dispose(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.settle.cancel();
        engine::cancel_owner(inner.owner);
    }
}

impl<S: ScrollSurface + 'static> Drop for CarouselNavigator<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn recompute<S: ScrollSurface>(inner: &Rc<RefCell<NavigatorInner<S>>>) -> CarouselButtons {
    let (buttons, store) = {
        let mut inner = inner.borrow_mut();
        if inner.disposed {
            return inner.buttons.get();
        }
        let view = inner.surface.geometry();
        if !view.is_well_formed() {
            tracing::warn!(?view, "ignoring malformed carousel geometry");
            return inner.buttons.get();
        }
        inner.view = view;
        let buttons = CarouselButtons {
            can_scroll_left: view.can_scroll_left(),
            can_scroll_right: view.can_scroll_right(inner.settings.epsilon_px),
        };
        (buttons, inner.buttons.clone())
    };
    store.set(buttons);
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() {
        engine::reset_scheduler();
    }

    fn navigator(content: f64, viewport: f64) -> CarouselNavigator<ScrollStrip> {
        CarouselNavigator::new(ScrollStrip::new(content, viewport, 250), CarouselSettings::default())
    }

    /// Surface reporting whatever geometry the test dictates.
    struct FixedSurface {
        geometry: Cell<CarouselViewState>,
        scrolls: Cell<u32>,
    }

    impl ScrollSurface for Rc<FixedSurface> {
        fn geometry(&self) -> CarouselViewState {
            self.geometry.get()
        }

        fn smooth_scroll_by(&self, _dx: f64) {
            self.scrolls.set(self.scrolls.get() + 1);
        }
    }

    #[test]
    fn test_view_state_booleans() {
        let view = CarouselViewState::new(0.0, 2000.0, 800.0);
        assert!(!view.can_scroll_left());
        assert!(view.can_scroll_right(10.0));

        let view = CarouselViewState::new(1195.0, 2000.0, 800.0);
        assert!(view.can_scroll_left());
        assert!(!view.can_scroll_right(10.0));
    }

    #[test]
    fn test_initial_state_seeded_on_mount() {
        setup();
        let nav = navigator(2000.0, 800.0);
        assert_eq!(
            nav.buttons(),
            CarouselButtons { can_scroll_left: false, can_scroll_right: true }
        );
    }

    #[test]
    fn test_narrow_content_disables_both() {
        setup();
        let nav = navigator(600.0, 800.0);
        assert_eq!(nav.buttons(), CarouselButtons::default());
        assert!(!nav.scroll_by(Direction::Right));
        assert!(!nav.scroll_by(Direction::Left));
        assert_eq!(engine::pending_count(), 0);
    }

    #[test]
    fn test_scroll_right_until_end() {
        setup();
        let nav = navigator(2000.0, 800.0);

        let mut steps = 0;
        while nav.scroll_by(Direction::Right) {
            engine::advance(SCROLL_SETTLE_MS);
            steps += 1;
            assert!(steps < 10);
        }

        // 360 + 360 + 360 + clamp to 1200.
        assert_eq!(steps, 4);
        assert_eq!(nav.view_state().scroll_offset_px, 1200.0);
        assert!(!nav.buttons().can_scroll_right);
        assert!(nav.buttons().can_scroll_left);
    }

    #[test]
    fn test_scroll_left_at_start_is_noop() {
        setup();
        let nav = navigator(2000.0, 800.0);
        assert!(!nav.scroll_by(Direction::Left));
        assert!(!nav.with_surface(|strip| strip.is_animating()));
    }

    #[test]
    fn test_settle_repolls_after_delay() {
        setup();
        let nav = navigator(2000.0, 800.0);

        assert!(nav.scroll_by(Direction::Right));
        assert!(nav.is_settling());
        // Surface has not landed yet, so left stays disabled.
        assert!(!nav.buttons().can_scroll_left);

        engine::advance(SCROLL_SETTLE_MS);
        assert!(!nav.is_settling());
        assert!(nav.buttons().can_scroll_left);
        assert_eq!(nav.view_state().scroll_offset_px, 360.0);
    }

    #[test]
    fn test_scroll_end_cancels_settle() {
        setup();
        let nav = navigator(2000.0, 800.0);
        nav.scroll_by(Direction::Right);
        engine::advance(250);

        nav.on_scroll_end();
        assert!(!nav.is_settling());
        assert!(nav.buttons().can_scroll_left);
    }

    #[test]
    fn test_user_scroll_recomputes() {
        setup();
        let nav = navigator(2000.0, 800.0);
        nav.with_surface(|strip| strip.set_offset(1195.0));
        nav.on_scroll();
        assert!(!nav.buttons().can_scroll_right);
    }

    #[test]
    fn test_resize_recomputes() {
        setup();
        let nav = navigator(2000.0, 800.0);
        nav.with_surface(|strip| strip.resize(2000.0, 2400.0));
        nav.on_resize();
        assert_eq!(nav.buttons(), CarouselButtons::default());
    }

    #[test]
    fn test_malformed_geometry_keeps_last_state() {
        setup();
        let surface = Rc::new(FixedSurface {
            geometry: Cell::new(CarouselViewState::new(0.0, 2000.0, 800.0)),
            scrolls: Cell::new(0),
        });
        let nav = CarouselNavigator::new(surface.clone(), CarouselSettings::default());
        let before = nav.buttons();

        surface.geometry.set(CarouselViewState::new(f64::NAN, 2000.0, 800.0));
        nav.on_scroll();
        assert_eq!(nav.buttons(), before);

        surface.geometry.set(CarouselViewState::new(0.0, -5.0, 800.0));
        nav.on_scroll();
        assert_eq!(nav.buttons(), before);
        assert_eq!(nav.view_state().content_width_px, 2000.0);
    }

    #[test]
    fn test_scroll_by_uses_fresh_state() {
        setup();
        let surface = Rc::new(FixedSurface {
            geometry: Cell::new(CarouselViewState::new(0.0, 2000.0, 800.0)),
            scrolls: Cell::new(0),
        });
        let nav = CarouselNavigator::new(surface.clone(), CarouselSettings::default());

        // Surface moved to the end without a scroll event reaching us.
        surface.geometry.set(CarouselViewState::new(1200.0, 2000.0, 800.0));
        assert!(!nav.scroll_by(Direction::Right));
        assert_eq!(surface.scrolls.get(), 0);
    }

    #[test]
    fn test_dispose_cancels_settle() {
        setup();
        let nav = navigator(2000.0, 800.0);
        nav.scroll_by(Direction::Right);
        nav.dispose();

        let buttons = nav.buttons();
        engine::advance(1_000);
        assert_eq!(nav.buttons(), buttons);
        assert!(!nav.scroll_by(Direction::Right));
    }
}
