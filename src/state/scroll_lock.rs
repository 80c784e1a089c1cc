//! Scroll Lock - the one piece of page-wide mutable state.
//!
//! While an overlay covers the page, background scrolling is suppressed.
//! The flag has exactly one writer at a time: whoever holds the
//! [`ScrollLockWriter`] returned by [`ScrollLockWriter::claim`]. Everyone
//! else can only read it or subscribe to it (the host subscribes to apply
//! `overflow: hidden` to the document body).
//!
//! # Pattern
//!
//! - `acquire()` / `release()` are idempotent: repeated calls never stack
//! - Dropping the writer releases the lock and frees the claim, so an
//!   unmounted owner can never leave the page locked
//!
//! # Example
//!
//! ```ignore
//! use spark_landing::state::scroll_lock::{is_scroll_locked, ScrollLockWriter};
//!
//! let writer = ScrollLockWriter::claim("navbar")?;
//! writer.acquire();
//! assert!(is_scroll_locked());
//! drop(writer);
//! assert!(!is_scroll_locked());
//! ```

use std::cell::{Cell, RefCell};

use spark_signals::Signal;

use super::store::Store;
use crate::error::{MotionError, Result};

// =============================================================================
// LOCK STATE
// =============================================================================

thread_local! {
    /// Page-wide flag. Only the claimed writer sets it.
    static SCROLL_LOCKED: Store<bool> = Store::new(false);

    /// Label of the current writer, if any.
    static WRITER: RefCell<Option<String>> = const { RefCell::new(None) };

    /// Number of times the flag has flipped (either direction).
    static TRANSITIONS: Cell<u64> = const { Cell::new(0) };
}

/// Is background scrolling currently suppressed?
pub fn is_scroll_locked() -> bool {
    SCROLL_LOCKED.with(|store| store.get())
}

/// Reactive view of the flag.
pub fn scroll_lock_signal() -> Signal<bool> {
    SCROLL_LOCKED.with(|store| store.signal())
}

/// Observe lock changes (e.g. to toggle `overflow: hidden` on the body).
pub fn on_scroll_lock_change(listener: impl Fn(bool) + 'static) -> Box<dyn FnOnce()> {
    SCROLL_LOCKED.with(|store| store.subscribe(move |locked| listener(*locked)))
}

/// How many times the flag has flipped since the last reset.
pub fn lock_transitions() -> u64 {
    TRANSITIONS.with(|count| count.get())
}

/// Label of the current writer.
pub fn current_writer() -> Option<String> {
    WRITER.with(|writer| writer.borrow().clone())
}

fn write(locked: bool) -> bool {
    let changed = SCROLL_LOCKED.with(|store| store.set(locked));
    if changed {
        TRANSITIONS.with(|count| count.set(count.get() + 1));
        tracing::debug!(locked, "scroll lock changed");
    }
    changed
}

// =============================================================================
// WRITER
// =============================================================================

/// Exclusive write access to the scroll lock.
#[derive(Debug)]
pub struct ScrollLockWriter {
    label: String,
    held: Cell<bool>,
}

impl ScrollLockWriter {
    /// Claim the writer role.
    ///
    /// Fails if another writer is alive. The claim ends when the returned
    /// writer is dropped.
    pub fn claim(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        WRITER.with(|writer| {
            let mut writer = writer.borrow_mut();
            if let Some(existing) = writer.as_ref() {
                return Err(MotionError::ScrollLockClaimed(existing.clone()));
            }
            *writer = Some(label.clone());
            Ok(())
        })?;
        Ok(Self { label, held: Cell::new(false) })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lock scrolling. Returns true only on the call that actually locked.
    pub fn acquire(&self) -> bool {
        if self.held.replace(true) {
            return false;
        }
        write(true)
    }

    /// Unlock scrolling. Returns true only on the call that actually
    /// unlocked.
    pub fn release(&self) -> bool {
        if !self.held.replace(false) {
            return false;
        }
        write(false)
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

impl Drop for ScrollLockWriter {
    fn drop(&mut self) {
        self.release();
        WRITER.with(|writer| {
            let mut writer = writer.borrow_mut();
            if writer.as_deref() == Some(self.label.as_str()) {
                *writer = None;
            }
        });
    }
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Clear the flag, the claim and the transition count (for testing).
pub fn reset_scroll_lock() {
    SCROLL_LOCKED.with(|store| store.set(false));
    WRITER.with(|writer| *writer.borrow_mut() = None);
    TRANSITIONS.with(|count| count.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn setup() {
        reset_scroll_lock();
    }

    #[test]
    fn test_acquire_release() {
        setup();
        let writer = ScrollLockWriter::claim("menu").unwrap();

        assert!(!is_scroll_locked());
        assert!(writer.acquire());
        assert!(is_scroll_locked());
        assert!(writer.release());
        assert!(!is_scroll_locked());
        assert_eq!(lock_transitions(), 2);
    }

    #[test]
    fn test_reentrant_acquire_does_not_stack() {
        setup();
        let writer = ScrollLockWriter::claim("menu").unwrap();

        assert!(writer.acquire());
        assert!(!writer.acquire());
        assert!(!writer.acquire());

        // One release is enough.
        assert!(writer.release());
        assert!(!is_scroll_locked());
        assert!(!writer.release());
        assert_eq!(lock_transitions(), 2);
    }

    #[test]
    fn test_single_writer() {
        setup();
        let first = ScrollLockWriter::claim("navbar").unwrap();
        let err = ScrollLockWriter::claim("modal").unwrap_err();
        assert!(matches!(err, MotionError::ScrollLockClaimed(label) if label == "navbar"));

        drop(first);
        assert!(ScrollLockWriter::claim("modal").is_ok());
    }

    #[test]
    fn test_drop_releases() {
        setup();
        let writer = ScrollLockWriter::claim("menu").unwrap();
        writer.acquire();
        drop(writer);

        assert!(!is_scroll_locked());
        assert_eq!(current_writer(), None);
    }

    #[test]
    fn test_change_listener() {
        setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let unsubscribe = on_scroll_lock_change(move |locked| seen_clone.borrow_mut().push(locked));

        let writer = ScrollLockWriter::claim("menu").unwrap();
        writer.acquire();
        writer.acquire();
        writer.release();

        assert_eq!(*seen.borrow(), vec![true, false]);
        unsubscribe();
    }
}
