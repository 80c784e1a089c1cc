//! Overlay Menu - open/close state machine with scroll-lock lifecycle.
//!
//! ```text
//!            toggle()                 (open_ms)
//!   Closed ───────────▶ Opening ───────────────▶ Open
//!     ▲                   │  close()/toggle()      │ close()/toggle()/activate_link()
//!     │    (close_ms)     ▼                        ▼
//!     └─────────────── Closing ◀──────────────────┘
//!                         │ toggle()
//!                         └──────▶ Opening
//! ```
//!
//! - Entering Opening acquires the scroll lock; entering Closed releases it.
//!   The state changes first, so lock listeners always see a menu that
//!   agrees with the flag
//! - Lock and state listeners run with no borrow of the menu held, so they
//!   may read it freely
//! - One transition timer at a time: starting a transition cancels the
//!   previous completion callback
//! - `close()` while Closed or Closing does nothing
//! - `teardown()` (and `Drop`) force Closed, cancel timers and release the
//!   lock exactly once, whatever state the menu was in

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::animate;
use super::scroll_lock::ScrollLockWriter;
use super::store::Store;
use crate::engine::{self, OwnerId, TimerSlot};
use crate::error::Result;
use crate::motion::{Timeline, VariantSpec};
use crate::types::ElementId;

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl MenuState {
    /// True while the overlay is on screen (including its exit fade).
    pub fn is_visible(&self) -> bool {
        !matches!(self, MenuState::Closed)
    }

    /// True in the states that hold the scroll lock.
    pub fn locks_scroll(&self) -> bool {
        matches!(self, MenuState::Opening | MenuState::Open)
    }
}

/// Transition durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTimings {
    pub open_ms: u64,
    pub close_ms: u64,
}

impl Default for MenuTimings {
    fn default() -> Self {
        Self { open_ms: 400, close_ms: 300 }
    }
}

/// Returned by [`OverlayMenu::activate_link`] for the router to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub href: String,
}

/// Staggered link reveal replayed on every open.
struct MenuChoreography {
    container: ElementId,
    items: Vec<ElementId>,
    container_variant: Rc<VariantSpec>,
    item_variant: Rc<VariantSpec>,
}

struct MenuInner {
    owner: OwnerId,
    state: Store<MenuState>,
    timings: MenuTimings,
    transition: TimerSlot,
    lock: Option<Rc<ScrollLockWriter>>,
    choreography: Option<MenuChoreography>,
    torn_down: bool,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owner of the full-screen navigation overlay.
pub struct OverlayMenu {
    inner: Rc<RefCell<MenuInner>>,
}

impl std::fmt::Debug for OverlayMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayMenu")
            .field("state", &self.state())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

impl OverlayMenu {
    /// Create a closed menu and claim the scroll-lock writer.
    ///
    /// Fails if another live controller already writes the lock.
    pub fn new(timings: MenuTimings) -> Result<Self> {
        let lock = ScrollLockWriter::claim("overlay-menu")?;
        Ok(Self {
            inner: Rc::new(RefCell::new(MenuInner {
                owner: engine::allocate_owner(),
                state: Store::new(MenuState::Closed),
                timings,
                transition: TimerSlot::new(),
                lock: Some(Rc::new(lock)),
                choreography: None,
                torn_down: false,
            })),
        })
    }

    /// Replay a staggered reveal of `items` every time the menu opens.
    pub fn bind_items(
        &self,
        container: ElementId,
        items: Vec<ElementId>,
        container_variant: Rc<VariantSpec>,
        item_variant: Rc<VariantSpec>,
    ) {
        animate::set_rest(container, container_variant.clone());
        for item in &items {
            animate::set_rest(*item, item_variant.clone());
        }
        self.inner.borrow_mut().choreography = Some(MenuChoreography {
            container,
            items,
            container_variant,
            item_variant,
        });
    }

    pub fn state(&self) -> MenuState {
        self.inner.borrow().state.get()
    }

    /// The state container, for renderers to subscribe to.
    pub fn store(&self) -> Store<MenuState> {
        self.inner.borrow().state.clone()
    }

    pub fn timings(&self) -> MenuTimings {
        self.inner.borrow().timings
    }

    /// True while a transition completion is queued.
    pub fn has_pending_transition(&self) -> bool {
        self.inner.borrow().transition.is_pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.borrow().torn_down
    }

    /// Open if closed (or closing), close if open (or opening).
    pub fn toggle(&self) {
        match self.state() {
            MenuState::Closed | MenuState::Closing => self.begin_open(),
            MenuState::Opening | MenuState::Open => self.begin_close(),
        }
    }

    /// Start closing. No-op when already Closed or Closing.
    pub fn close(&self) {
        match self.state() {
            MenuState::Closed | MenuState::Closing => {
                tracing::trace!("close ignored: menu already closing or closed");
            }
            MenuState::Opening | MenuState::Open => self.begin_close(),
        }
    }

    /// A link inside the panel was clicked: close, then let the router
    /// navigate.
    pub fn activate_link(&self, href: impl Into<String>) -> NavigationRequest {
        self.close();
        NavigationRequest { href: href.into() }
    }

    fn begin_open(&self) {
        let (state, lock, choreography, owner) = {
            let inner = self.inner.borrow();
            if inner.torn_down {
                return;
            }

            let weak = Rc::downgrade(&self.inner);
            inner.transition.replace(inner.owner, inner.timings.open_ms, move || {
                complete(&weak, MenuState::Opening, MenuState::Open);
            });

            let choreography = inner.choreography.as_ref().map(|c| {
                Timeline::staggered(c.container, c.container_variant.clone(), &c.items, c.item_variant.clone())
            });
            (inner.state.clone(), inner.lock.clone(), choreography, inner.owner)
        };

        if let Some(timeline) = choreography {
            animate::play_timeline(&timeline, owner);
        }
        tracing::debug!("menu opening");
        state.set(MenuState::Opening);
        if let Some(lock) = lock {
            lock.acquire();
        }
    }

    fn begin_close(&self) {
        let inner = self.inner.borrow();
        if inner.torn_down {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        inner.transition.replace(inner.owner, inner.timings.close_ms, move || {
            complete(&weak, MenuState::Closing, MenuState::Closed);
        });
        let state = inner.state.clone();
        drop(inner);

        tracing::debug!("menu closing");
        state.set(MenuState::Closing);
    }

    /// Force the menu closed and release everything it holds.
    ///
    /// Safe to call in any state and more than once.
    pub fn teardown(&self) {
        let (state, lock) = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            inner.transition.cancel();
            engine::cancel_owner(inner.owner);
            reset_choreography(&inner);
            (inner.state.clone(), inner.lock.take())
        };

        state.set(MenuState::Closed);
        // Dropping the last writer frees the claim.
        if let Some(lock) = lock {
            lock.release();
        }
        tracing::debug!("menu torn down");
    }
}

impl Drop for OverlayMenu {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Timer body: move `from` -> `to` if nothing changed the state meanwhile.
///
/// Entering Closed puts the link choreography back at rest before
/// subscribers see the new state, and releases the lock after.
fn complete(weak: &Weak<RefCell<MenuInner>>, from: MenuState, to: MenuState) -> bool {
    let Some(inner) = weak.upgrade() else { return false };
    let (state, lock) = {
        let inner = inner.borrow();
        inner.transition.clear();
        if inner.torn_down || inner.state.get() != from {
            return false;
        }
        let lock = if to == MenuState::Closed {
            reset_choreography(&inner);
            inner.lock.clone()
        } else {
            None
        };
        (inner.state.clone(), lock)
    };
    state.set(to);
    if let Some(lock) = lock {
        lock.release();
    }
    true
}

fn reset_choreography(inner: &MenuInner) {
    if let Some(choreography) = &inner.choreography {
        animate::reset(choreography.container);
        for item in &choreography.items {
            animate::reset(*item);
        }
    }
}
