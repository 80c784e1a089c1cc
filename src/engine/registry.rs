//! Element Registry - the host document model.
//!
//! Manages the lifecycle of element handles:
//! - Slot allocation with a free pool for reuse
//! - Generation counters so stale handles never alias a reused slot
//! - Parent links, released recursively
//! - Page-space bounds used by viewport detection
//! - Destroy callbacks, run exactly once on detach

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{ElementId, Rect};

// =============================================================================
// Registry State
// =============================================================================

struct ElementSlot {
    generation: u32,
    attached: bool,
    tag: &'static str,
    key: Option<String>,
    parent: Option<ElementId>,
    bounds: Rect,
}

thread_local! {
    /// One slot per index ever allocated. Detached slots keep their
    /// generation so the next tenant gets a fresh one.
    static SLOTS: RefCell<Vec<ElementSlot>> = RefCell::new(Vec::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<u32>> = RefCell::new(Vec::new());

    /// Destroy callbacks registered per element.
    static DESTROY_CALLBACKS: RefCell<HashMap<ElementId, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Mount / Detach
// =============================================================================

/// Attach a new element to the document.
///
/// # Arguments
/// * `tag` - Element kind, used for diagnostics and render output.
/// * `parent` - Optional parent; detaching the parent detaches this too.
pub fn mount_element(tag: &'static str, parent: Option<ElementId>) -> ElementId {
    let reused = FREE_INDICES.with(|free| free.borrow_mut().pop());

    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        match reused {
            Some(index) => {
                let slot = &mut slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.attached = true;
                slot.tag = tag;
                slot.key = None;
                slot.parent = parent;
                slot.bounds = Rect::default();
                ElementId { index, generation: slot.generation }
            }
            None => {
                let index = slots.len() as u32;
                slots.push(ElementSlot {
                    generation: 0,
                    attached: true,
                    tag,
                    key: None,
                    parent,
                    bounds: Rect::default(),
                });
                ElementId { index, generation: 0 }
            }
        }
    })
}

/// Attach a keyed element. Keys identify list items across re-renders.
pub fn mount_keyed(tag: &'static str, parent: Option<ElementId>, key: impl Into<String>) -> ElementId {
    let id = mount_element(tag, parent);
    with_slot_mut(id, |slot| slot.key = Some(key.into()));
    id
}

/// Detach an element and, recursively, all of its children.
///
/// Destroy callbacks run before the slot is freed, children first.
/// Detaching a stale or already-detached handle is a no-op.
pub fn detach_element(id: ElementId) {
    if !is_attached(id) {
        return;
    }

    let children: Vec<ElementId> = SLOTS.with(|slots| {
        slots
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.attached && slot.parent == Some(id))
            .map(|(index, slot)| ElementId { index: index as u32, generation: slot.generation })
            .collect()
    });

    for child in children {
        detach_element(child);
    }

    run_destroy_callbacks(id);

    let released = with_slot_mut(id, |slot| {
        slot.attached = false;
        slot.parent = None;
        slot.key = None;
    });

    if released.is_some() {
        FREE_INDICES.with(|free| free.borrow_mut().push(id.index));
        tracing::trace!(element = %id, "element detached");
    }
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when `id` is detached.
///
/// Registering against a handle that is already gone runs nothing; the
/// callback is dropped.
pub fn on_destroy(id: ElementId, callback: impl FnOnce() + 'static) {
    if !is_attached(id) {
        return;
    }
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(id)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an element.
fn run_destroy_callbacks(id: ElementId) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&id));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

fn with_slot<R>(id: ElementId, f: impl FnOnce(&ElementSlot) -> R) -> Option<R> {
    SLOTS.with(|slots| {
        let slots = slots.borrow();
        slots
            .get(id.index())
            .filter(|slot| slot.attached && slot.generation == id.generation)
            .map(f)
    })
}

fn with_slot_mut<R>(id: ElementId, f: impl FnOnce(&mut ElementSlot) -> R) -> Option<R> {
    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        slots
            .get_mut(id.index())
            .filter(|slot| slot.attached && slot.generation == id.generation)
            .map(f)
    })
}

/// True while the handle refers to a live element.
pub fn is_attached(id: ElementId) -> bool {
    with_slot(id, |_| ()).is_some()
}

pub fn tag_of(id: ElementId) -> Option<&'static str> {
    with_slot(id, |slot| slot.tag)
}

pub fn key_of(id: ElementId) -> Option<String> {
    with_slot(id, |slot| slot.key.clone()).flatten()
}

pub fn parent_of(id: ElementId) -> Option<ElementId> {
    with_slot(id, |slot| slot.parent).flatten()
}

/// Page-space bounds, or `None` for detached elements.
pub fn bounds(id: ElementId) -> Option<Rect> {
    with_slot(id, |slot| slot.bounds)
}

/// Update bounds. Returns false if the element is gone.
pub fn set_bounds(id: ElementId, bounds: Rect) -> bool {
    with_slot_mut(id, |slot| slot.bounds = bounds).is_some()
}

/// Count of currently attached elements.
pub fn attached_count() -> usize {
    SLOTS.with(|slots| slots.borrow().iter().filter(|slot| slot.attached).count())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    SLOTS.with(|slots| slots.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_mount_and_detach() {
        reset_registry();

        let a = mount_element("section", None);
        let b = mount_element("div", None);
        assert!(is_attached(a));
        assert!(is_attached(b));
        assert_eq!(attached_count(), 2);

        detach_element(a);
        assert!(!is_attached(a));
        assert!(is_attached(b));
        assert_eq!(attached_count(), 1);
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        reset_registry();

        let old = mount_element("div", None);
        detach_element(old);
        let new = mount_element("div", None);

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(!is_attached(old));
        assert!(is_attached(new));
        assert!(!set_bounds(old, Rect::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_children_detach_with_parent() {
        reset_registry();

        let parent = mount_element("ul", None);
        let child = mount_keyed("li", Some(parent), "pro-0");
        let grandchild = mount_element("span", Some(child));
        assert_eq!(key_of(child).as_deref(), Some("pro-0"));
        assert_eq!(parent_of(grandchild), Some(child));

        detach_element(parent);
        assert!(!is_attached(child));
        assert!(!is_attached(grandchild));
        assert_eq!(attached_count(), 0);
    }

    #[test]
    fn test_destroy_callback_runs_once() {
        reset_registry();

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let id = mount_element("div", None);
        on_destroy(id, move || calls_clone.set(calls_clone.get() + 1));

        detach_element(id);
        detach_element(id);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_on_destroy_for_stale_handle_is_dropped() {
        reset_registry();

        let called = Rc::new(Cell::new(false));
        let called_clone = called.clone();

        let id = mount_element("div", None);
        detach_element(id);
        on_destroy(id, move || called_clone.set(true));

        let reused = mount_element("div", None);
        detach_element(reused);
        assert!(!called.get());
    }
}
