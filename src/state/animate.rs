//! Playback - per-element animation state.
//!
//! Tracks where each animated element is between its variant's rest and
//! active states, and drives the transitions with scheduler timers.
//!
//! # Pattern
//!
//! - `play()` resets the element to rest, then starts after the delay
//! - Every timer captures the element handle and a playback generation;
//!   if the element was detached or replayed in the meantime the callback
//!   does nothing
//! - Detaching an element drops its playback and cancels its timers
//!
//! # Example
//!
//! ```ignore
//! use spark_landing::state::animate::{play, phase, Phase};
//!
//! play(element, fade_up.clone(), 200, owner);
//! assert_eq!(phase(element), Some(Phase::Pending));
//! scheduler::advance(200);
//! assert_eq!(phase(element), Some(Phase::Running));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::{self, OwnerId, TimerId};
use crate::motion::{MotionState, Timeline, VariantSpec};
use crate::types::ElementId;

// =============================================================================
// PLAYBACK REGISTRY
// =============================================================================

/// Where an element is in its transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing the variant's rest state.
    Rest,
    /// Scheduled, still showing rest.
    Pending,
    /// Interpolating toward active.
    Running,
    /// Settled on the active state.
    Active,
}

struct Playback {
    variant: Rc<VariantSpec>,
    phase: Phase,
    started_at: u64,
    generation: u64,
    timer: Option<TimerId>,
    plays: u32,
}

thread_local! {
    static PLAYBACKS: RefCell<HashMap<ElementId, Playback>> = RefCell::new(HashMap::new());
}

fn ensure_entry(element: ElementId, variant: &Rc<VariantSpec>) {
    let inserted = PLAYBACKS.with(|map| {
        let mut map = map.borrow_mut();
        if map.contains_key(&element) {
            return false;
        }
        map.insert(
            element,
            Playback {
                variant: variant.clone(),
                phase: Phase::Rest,
                started_at: 0,
                generation: 0,
                timer: None,
                plays: 0,
            },
        );
        true
    });

    if inserted {
        engine::on_destroy(element, move || forget(element));
    }
}

/// Drop an element's playback, cancelling its timer.
fn forget(element: ElementId) {
    let removed = PLAYBACKS.with(|map| map.borrow_mut().remove(&element));
    if let Some(timer) = removed.and_then(|playback| playback.timer) {
        engine::clear_timeout(timer);
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Put an element at `variant`'s rest state, cancelling anything pending.
///
/// No-op for detached elements.
pub fn set_rest(element: ElementId, variant: Rc<VariantSpec>) {
    if !engine::is_attached(element) {
        return;
    }
    ensure_entry(element, &variant);
    let stale = PLAYBACKS.with(|map| {
        let mut map = map.borrow_mut();
        let playback = map.get_mut(&element)?;
        playback.variant = variant;
        playback.phase = Phase::Rest;
        playback.generation += 1;
        playback.timer.take()
    });
    if let Some(timer) = stale {
        engine::clear_timeout(timer);
    }
}

/// Return an element to the rest state of whatever variant it last used.
pub fn reset(element: ElementId) {
    let variant = PLAYBACKS.with(|map| map.borrow().get(&element).map(|p| p.variant.clone()));
    if let Some(variant) = variant {
        set_rest(element, variant);
    }
}

/// Start `variant` on `element` after `delay_ms`.
///
/// Always restarts from rest. With zero delay the transition starts
/// synchronously. Returns false if the element is detached.
pub fn play(element: ElementId, variant: Rc<VariantSpec>, delay_ms: u64, owner: OwnerId) -> bool {
    if !engine::is_attached(element) {
        tracing::trace!(element = %element, "play on detached element ignored");
        return false;
    }

    set_rest(element, variant);
    let generation = match current_generation(element) {
        Some(generation) => generation,
        None => return false,
    };

    if delay_ms == 0 {
        start(element, generation, owner);
    } else {
        let timer = engine::set_timeout(owner, delay_ms, move || start(element, generation, owner));
        PLAYBACKS.with(|map| {
            if let Some(playback) = map.borrow_mut().get_mut(&element) {
                playback.phase = Phase::Pending;
                playback.timer = Some(timer);
            }
        });
    }
    true
}

/// Queue every entry of a timeline relative to now.
pub fn play_timeline(timeline: &Timeline, owner: OwnerId) -> usize {
    timeline
        .entries()
        .iter()
        .filter(|entry| play(entry.target, entry.variant.clone(), entry.start_ms, owner))
        .count()
}

/// Cancel a pending or running transition.
///
/// Pending elements fall back to rest; running ones stay where the
/// variant's active state would leave them.
pub fn cancel(element: ElementId) {
    let stale = PLAYBACKS.with(|map| {
        let mut map = map.borrow_mut();
        let playback = map.get_mut(&element)?;
        playback.generation += 1;
        playback.phase = match playback.phase {
            Phase::Pending => Phase::Rest,
            Phase::Running => Phase::Active,
            other => other,
        };
        playback.timer.take()
    });
    if let Some(timer) = stale {
        engine::clear_timeout(timer);
    }
}

fn current_generation(element: ElementId) -> Option<u64> {
    PLAYBACKS.with(|map| map.borrow().get(&element).map(|p| p.generation))
}

/// Timer body: begin the transition if nothing superseded it.
fn start(element: ElementId, generation: u64, owner: OwnerId) {
    if !engine::is_attached(element) {
        return;
    }
    let duration = PLAYBACKS.with(|map| {
        let mut map = map.borrow_mut();
        let playback = map.get_mut(&element).filter(|p| p.generation == generation)?;
        playback.phase = Phase::Running;
        playback.started_at = engine::now();
        playback.plays += 1;
        playback.timer = None;
        Some(playback.variant.duration_ms())
    });
    let Some(duration) = duration else {
        tracing::trace!(element = %element, "superseded playback skipped");
        return;
    };

    if duration == 0 {
        finish(element, generation);
        return;
    }

    let timer = engine::set_timeout(owner, duration, move || finish(element, generation));
    PLAYBACKS.with(|map| {
        if let Some(playback) = map.borrow_mut().get_mut(&element) {
            playback.timer = Some(timer);
        }
    });
}

fn finish(element: ElementId, generation: u64) {
    PLAYBACKS.with(|map| {
        if let Some(playback) = map.borrow_mut().get_mut(&element).filter(|p| p.generation == generation) {
            playback.phase = Phase::Active;
            playback.timer = None;
        }
    });
}

// =============================================================================
// QUERIES
// =============================================================================

/// Current phase, or `None` if the element has never been animated (or is
/// gone).
pub fn phase(element: ElementId) -> Option<Phase> {
    PLAYBACKS.with(|map| map.borrow().get(&element).map(|p| p.phase))
}

/// How many times a transition has actually started on this element.
pub fn play_count(element: ElementId) -> u32 {
    PLAYBACKS.with(|map| map.borrow().get(&element).map(|p| p.plays).unwrap_or(0))
}

/// Sampled visual state at the current time.
pub fn frame(element: ElementId) -> Option<MotionState> {
    PLAYBACKS.with(|map| {
        let map = map.borrow();
        let playback = map.get(&element)?;
        let state = match playback.phase {
            Phase::Rest | Phase::Pending => *playback.variant.rest(),
            Phase::Active => *playback.variant.active(),
            Phase::Running => {
                let duration = playback.variant.duration_ms().max(1) as f32;
                let elapsed = engine::now().saturating_sub(playback.started_at) as f32;
                playback.variant.frame_at(elapsed / duration)
            }
        };
        Some(state)
    })
}

/// Name of the variant last applied to the element.
pub fn variant_name(element: ElementId) -> Option<String> {
    PLAYBACKS.with(|map| map.borrow().get(&element).map(|p| p.variant.name().to_string()))
}

/// Number of tracked elements.
pub fn tracked_count() -> usize {
    PLAYBACKS.with(|map| map.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Forget every playback (for testing).
pub fn reset_playback() {
    PLAYBACKS.with(|map| map.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_owner, detach_element, mount_element, pending_count};
    use crate::motion::{presets, Easing};

    fn setup() {
        engine::reset_registry();
        engine::reset_scheduler();
        reset_playback();
    }

    fn linear_fade(duration_ms: u64) -> Rc<VariantSpec> {
        Rc::new(
            VariantSpec::builder("linear-fade")
                .rest(MotionState::new().opacity(0.0))
                .active(MotionState::new().opacity(1.0))
                .duration_ms(duration_ms)
                .easing(Easing::Linear)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_play_lifecycle() {
        setup();
        let owner = allocate_owner();
        let element = mount_element("div", None);

        assert!(play(element, linear_fade(100), 50, owner));
        assert_eq!(phase(element), Some(Phase::Pending));
        assert_eq!(frame(element).unwrap().opacity, Some(0.0));

        engine::advance(50);
        assert_eq!(phase(element), Some(Phase::Running));
        assert_eq!(play_count(element), 1);

        engine::advance(50);
        assert_eq!(frame(element).unwrap().opacity, Some(0.5));

        engine::advance(50);
        assert_eq!(phase(element), Some(Phase::Active));
        assert_eq!(frame(element).unwrap().opacity, Some(1.0));
        assert_eq!(pending_count(), 0);
    }

    #[test]
    fn test_zero_delay_starts_now() {
        setup();
        let owner = allocate_owner();
        let element = mount_element("div", None);

        play(element, linear_fade(100), 0, owner);
        assert_eq!(phase(element), Some(Phase::Running));
        assert_eq!(play_count(element), 1);
    }

    #[test]
    fn test_replay_supersedes_pending() {
        setup();
        let owner = allocate_owner();
        let element = mount_element("div", None);

        play(element, linear_fade(100), 100, owner);
        play(element, linear_fade(100), 300, owner);

        engine::advance(150);
        assert_eq!(phase(element), Some(Phase::Pending));
        assert_eq!(play_count(element), 0);

        engine::advance(150);
        assert_eq!(play_count(element), 1);
    }

    #[test]
    fn test_detach_while_pending_is_noop() {
        setup();
        let owner = allocate_owner();
        let element = mount_element("div", None);

        play(element, linear_fade(100), 100, owner);
        detach_element(element);

        assert_eq!(pending_count(), 0);
        engine::advance(500);
        assert_eq!(phase(element), None);
        assert_eq!(tracked_count(), 0);
        assert!(!play(element, linear_fade(100), 0, owner));
    }

    #[test]
    fn test_cancel_pending_returns_to_rest() {
        setup();
        let owner = allocate_owner();
        let element = mount_element("div", None);

        play(element, linear_fade(100), 100, owner);
        cancel(element);
        assert_eq!(phase(element), Some(Phase::Rest));
        engine::advance(500);
        assert_eq!(play_count(element), 0);
    }

    #[test]
    fn test_timeline_fires_in_order() {
        setup();
        let owner = allocate_owner();
        let parent = mount_element("ul", None);
        let children: Vec<ElementId> = (0..3).map(|_| mount_element("li", Some(parent))).collect();

        let timeline = Timeline::staggered(
            parent,
            Rc::new(presets::stagger_container()),
            &children,
            Rc::new(presets::card()),
        );
        assert_eq!(play_timeline(&timeline, owner), 4);

        engine::advance(200);
        assert_eq!(play_count(children[0]), 1);
        assert_eq!(play_count(children[1]), 0);

        engine::advance(100);
        assert_eq!(play_count(children[1]), 1);
        assert_eq!(play_count(children[2]), 0);

        engine::advance(100);
        assert_eq!(play_count(children[2]), 1);
    }
}
