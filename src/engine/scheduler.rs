//! Timer Queue - the host event loop's deferred callbacks.
//!
//! Every "wait for the animation to finish" in this crate is a timer here.
//! Time is virtual: the host calls [`advance`] with the elapsed milliseconds
//! (from `requestAnimationFrame`, a test, or a demo loop) and due callbacks
//! fire in `(due time, scheduling order)` order.
//!
//! # Pattern
//!
//! - Each controller allocates an [`OwnerId`] and tags its timers with it
//! - Unmount calls [`cancel_owner`], so no timer outlives its view
//! - A [`TimerSlot`] holds at most one pending timer; replacing it cancels
//!   the previous one, which keeps late callbacks from clobbering newer state
//!
//! # Example
//!
//! ```ignore
//! use spark_landing::engine::scheduler;
//!
//! let owner = scheduler::allocate_owner();
//! scheduler::set_timeout(owner, 300, || println!("settled"));
//! scheduler::advance(300); // prints "settled"
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// IDS
// =============================================================================

/// Handle to one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Groups timers belonging to one controller so they can be cancelled
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

struct Timer {
    id: TimerId,
    owner: OwnerId,
    callback: Box<dyn FnOnce()>,
}

// =============================================================================
// QUEUE STATE
// =============================================================================

thread_local! {
    static NOW_MS: Cell<u64> = const { Cell::new(0) };
    static NEXT_TIMER: Cell<u64> = const { Cell::new(0) };
    static NEXT_OWNER: Cell<u64> = const { Cell::new(0) };

    /// Pending timers ordered by (due, id). Timer ids increase
    /// monotonically, so ties fire in scheduling order.
    static QUEUE: RefCell<BTreeMap<(u64, TimerId), Timer>> = RefCell::new(BTreeMap::new());

    /// Timer id -> due time, for O(log n) cancellation.
    static DUE_BY_ID: RefCell<HashMap<TimerId, u64>> = RefCell::new(HashMap::new());
}

/// Upper bound on callbacks fired by a single [`run_until_idle`] call.
const IDLE_FIRE_LIMIT: usize = 100_000;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Allocate a fresh owner tag.
pub fn allocate_owner() -> OwnerId {
    NEXT_OWNER.with(|next| {
        let id = next.get();
        next.set(id + 1);
        OwnerId(id)
    })
}

/// Current virtual time in milliseconds.
pub fn now() -> u64 {
    NOW_MS.with(|now| now.get())
}

/// Schedule `callback` to run `delay_ms` from now.
///
/// A zero delay still defers: the callback runs on the next [`advance`],
/// never synchronously.
pub fn set_timeout(owner: OwnerId, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
    let id = NEXT_TIMER.with(|next| {
        let id = next.get();
        next.set(id + 1);
        TimerId(id)
    });
    let due = now().saturating_add(delay_ms);

    QUEUE.with(|queue| {
        queue.borrow_mut().insert(
            (due, id),
            Timer { id, owner, callback: Box::new(callback) },
        );
    });
    DUE_BY_ID.with(|index| {
        index.borrow_mut().insert(id, due);
    });

    id
}

/// Cancel a pending timer. Returns false if it already fired or was
/// cancelled.
pub fn clear_timeout(id: TimerId) -> bool {
    let due = DUE_BY_ID.with(|index| index.borrow_mut().remove(&id));
    let Some(due) = due else { return false };

    // Drop outside the borrow: a callback's captures may own other handles
    // whose Drop touches the queue.
    let removed = QUEUE.with(|queue| queue.borrow_mut().remove(&(due, id)));
    removed.is_some()
}

/// Cancel every pending timer tagged with `owner`.
///
/// Returns how many were cancelled.
pub fn cancel_owner(owner: OwnerId) -> usize {
    let removed: Vec<Timer> = QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let keys: Vec<(u64, TimerId)> = queue
            .iter()
            .filter(|(_, timer)| timer.owner == owner)
            .map(|(key, _)| *key)
            .collect();
        keys.into_iter().filter_map(|key| queue.remove(&key)).collect()
    });

    DUE_BY_ID.with(|index| {
        let mut index = index.borrow_mut();
        for timer in &removed {
            index.remove(&timer.id);
        }
    });

    removed.len()
}

/// True while the timer is still waiting to fire.
pub fn is_pending(id: TimerId) -> bool {
    DUE_BY_ID.with(|index| index.borrow().contains_key(&id))
}

/// Total pending timers across all owners.
pub fn pending_count() -> usize {
    DUE_BY_ID.with(|index| index.borrow().len())
}

/// Pending timers for one owner.
pub fn pending_for(owner: OwnerId) -> usize {
    QUEUE.with(|queue| queue.borrow().values().filter(|timer| timer.owner == owner).count())
}

/// Move the clock forward by `ms`, firing every timer that comes due.
///
/// Callbacks may schedule further timers; those also fire if they come due
/// inside the window. Returns the number of callbacks run.
pub fn advance(ms: u64) -> usize {
    let target = now().saturating_add(ms);
    let mut fired = 0;

    while let Some((due, timer)) = pop_due(target) {
        NOW_MS.with(|now| now.set(due));
        (timer.callback)();
        fired += 1;
    }

    NOW_MS.with(|now| now.set(target));
    fired
}

/// Fire timers until the queue is empty, jumping the clock as needed.
///
/// Stops after an internal limit so a self-rescheduling callback cannot
/// spin forever.
pub fn run_until_idle() -> usize {
    let mut fired = 0;
    while fired < IDLE_FIRE_LIMIT {
        let Some((due, timer)) = pop_due(u64::MAX) else { break };
        NOW_MS.with(|now| now.set(due));
        (timer.callback)();
        fired += 1;
    }
    if fired == IDLE_FIRE_LIMIT {
        tracing::warn!(fired, "timer queue did not drain; giving up");
    }
    fired
}

fn pop_due(target: u64) -> Option<(u64, Timer)> {
    let entry = QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let key = *queue.keys().next()?;
        if key.0 > target {
            return None;
        }
        queue.remove(&key).map(|timer| (key.0, timer))
    })?;

    DUE_BY_ID.with(|index| {
        index.borrow_mut().remove(&entry.1.id);
    });
    Some(entry)
}

// =============================================================================
// TIMER SLOT
// =============================================================================

/// Holds at most one pending timer.
///
/// Scheduling into an occupied slot cancels the previous timer first.
#[derive(Debug, Default)]
pub struct TimerSlot {
    current: Cell<Option<TimerId>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback, cancelling whatever was pending.
    pub fn replace(&self, owner: OwnerId, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
        self.cancel();
        let id = set_timeout(owner, delay_ms, callback);
        self.current.set(Some(id));
        id
    }

    /// Cancel the pending timer, if any. Returns true if one was cancelled.
    pub fn cancel(&self) -> bool {
        self.current.take().map(clear_timeout).unwrap_or(false)
    }

    /// True while the held timer has not fired.
    pub fn is_pending(&self) -> bool {
        self.current.get().is_some_and(is_pending)
    }

    /// Forget the held id without cancelling (used by the callback itself).
    pub fn clear(&self) {
        self.current.set(None);
    }
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every pending timer and rewind the clock (for testing).
pub fn reset_scheduler() {
    let drained = QUEUE.with(|queue| std::mem::take(&mut *queue.borrow_mut()));
    drop(drained);
    DUE_BY_ID.with(|index| index.borrow_mut().clear());
    NOW_MS.with(|now| now.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn setup() {
        reset_scheduler();
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        setup();
        let owner = allocate_owner();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let log = log.clone();
            set_timeout(owner, delay, move || log.borrow_mut().push(label));
        }

        assert_eq!(advance(25), 3);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b"]);
        assert_eq!(now(), 25);

        advance(5);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
    }

    #[test]
    fn test_zero_delay_is_deferred() {
        setup();
        let owner = allocate_owner();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        set_timeout(owner, 0, move || fired_clone.set(true));
        assert!(!fired.get());
        advance(0);
        assert!(fired.get());
    }

    #[test]
    fn test_clear_timeout() {
        setup();
        let owner = allocate_owner();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        let id = set_timeout(owner, 100, move || fired_clone.set(true));
        assert!(is_pending(id));
        assert!(clear_timeout(id));
        assert!(!clear_timeout(id));

        advance(200);
        assert!(!fired.get());
    }

    #[test]
    fn test_cancel_owner_only_touches_owner() {
        setup();
        let a = allocate_owner();
        let b = allocate_owner();

        set_timeout(a, 10, || {});
        set_timeout(a, 20, || {});
        set_timeout(b, 10, || {});

        assert_eq!(cancel_owner(a), 2);
        assert_eq!(pending_for(a), 0);
        assert_eq!(pending_for(b), 1);
        assert_eq!(pending_count(), 1);
    }

    #[test]
    fn test_nested_scheduling_within_window() {
        setup();
        let owner = allocate_owner();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_outer = log.clone();

        set_timeout(owner, 10, move || {
            log_outer.borrow_mut().push(now());
            let log_inner = log_outer.clone();
            set_timeout(owner, 10, move || log_inner.borrow_mut().push(now()));
        });

        advance(50);
        assert_eq!(*log.borrow(), vec![10, 20]);
    }

    #[test]
    fn test_timer_slot_replaces() {
        setup();
        let owner = allocate_owner();
        let slot = TimerSlot::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = log.clone();
        slot.replace(owner, 100, move || first.borrow_mut().push("first"));
        let second = log.clone();
        slot.replace(owner, 100, move || second.borrow_mut().push("second"));

        assert_eq!(pending_count(), 1);
        advance(100);
        assert_eq!(*log.borrow(), vec!["second"]);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_run_until_idle_jumps_clock() {
        setup();
        let owner = allocate_owner();
        set_timeout(owner, 5_000, || {});
        assert_eq!(run_until_idle(), 1);
        assert_eq!(now(), 5_000);
    }
}
