//! Store - explicit state container.
//!
//! Wraps a spark-signals [`Signal`] so reactive consumers can track it, and
//! adds a plain listener list so controllers and renderers can subscribe
//! without relying on effect scheduling.
//!
//! # Example
//!
//! ```ignore
//! let store = Store::new(MenuState::Closed);
//! let unsubscribe = store.subscribe(|state| println!("menu: {state:?}"));
//! store.set(MenuState::Opening); // prints
//! unsubscribe();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

type Listener<T> = Rc<dyn Fn(&T)>;

/// Observable value with get/set/subscribe.
pub struct Store<T: Clone + PartialEq + 'static> {
    value: Signal<T>,
    listeners: Rc<RefCell<Vec<(u64, Listener<T>)>>>,
    next_listener: Rc<Cell<u64>>,
}

impl<T: Clone + PartialEq + 'static> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            listeners: self.listeners.clone(),
            next_listener: self.next_listener.clone(),
        }
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: signal(initial),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Rc::new(Cell::new(0)),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Replace the value. Listeners run only if it changed.
    ///
    /// Returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        if self.value.get() == value {
            return false;
        }
        self.value.set(value.clone());

        // Snapshot so a listener may subscribe/unsubscribe while we iterate.
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Apply `f` to a copy of the current value and store the result.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut value = self.get();
        f(&mut value);
        self.set(value)
    }

    /// Call `listener` after every change. Returns the unsubscribe function.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Box<dyn FnOnce()> {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));

        let listeners = Rc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// The backing signal, for reactive deriveds and effects.
    pub fn signal(&self) -> Signal<T> {
        self.value.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let store = Store::new(1);
        assert_eq!(store.get(), 1);
        assert!(store.set(2));
        assert!(!store.set(2));
        assert_eq!(store.get(), 2);
        assert_eq!(store.signal().get(), 2);
    }

    #[test]
    fn test_listeners_only_on_change() {
        let store = Store::new("a".to_string());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let unsubscribe = store.subscribe(move |value| seen_clone.borrow_mut().push(value.clone()));
        store.set("b".to_string());
        store.set("b".to_string());
        store.update(|value| value.push('c'));

        assert_eq!(*seen.borrow(), vec!["b".to_string(), "bc".to_string()]);

        unsubscribe();
        store.set("z".to_string());
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_inside_listener() {
        let store = Store::new(0);
        let slot: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let slot_clone = slot.clone();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let unsubscribe = store.subscribe(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            if let Some(unsubscribe) = slot_clone.borrow_mut().take() {
                unsubscribe();
            }
        });
        *slot.borrow_mut() = Some(unsubscribe);

        store.set(1);
        store.set(2);
        assert_eq!(calls.get(), 1);
    }
}
