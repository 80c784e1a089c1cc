//! Selection - single-choice state over a keyed option set.
//!
//! Drives which pricing package and which plan tab are shown. The selected
//! key is always a member of the current options: unknown keys are
//! rejected without touching state, and replacing the option set
//! revalidates the selection.
//!
//! Every change bumps a revision. Lists rendered under the selection key
//! their children on it, so a new selection restarts their stagger reveal
//! instead of diffing against the old items.
//!
//! # Example
//!
//! ```ignore
//! let packages = SelectionController::new("package", content.pricing.packages.clone())?;
//! assert_eq!(packages.selected_key(), "pro"); // the popular one
//! packages.select("enterprise")?;
//! assert_eq!(packages.current().id, "enterprise");
//! ```

use std::cell::{Cell, RefCell};

use super::store::Store;
use crate::error::{MotionError, Result};

/// Something that can be chosen.
pub trait SelectOption: Clone + 'static {
    /// Stable identity within its option set.
    fn key(&self) -> &str;

    /// Preferred initial choice (e.g. the "popular" package).
    fn is_default(&self) -> bool {
        false
    }
}

/// Single-choice controller.
pub struct SelectionController<T: SelectOption> {
    name: &'static str,
    options: RefCell<Vec<T>>,
    selected: Store<String>,
    revision: Cell<u64>,
}

impl<T: SelectOption> std::fmt::Debug for SelectionController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("name", &self.name)
            .field("selected", &self.selected_key())
            .field("options", &self.options.borrow().len())
            .field("revision", &self.revision.get())
            .finish()
    }
}

/// Default option if one is flagged, else the first.
fn initial_key<T: SelectOption>(options: &[T]) -> Option<String> {
    options
        .iter()
        .find(|option| option.is_default())
        .or_else(|| options.first())
        .map(|option| option.key().to_string())
}

impl<T: SelectOption> SelectionController<T> {
    /// Build over `options`, starting at the default (or first) one.
    pub fn new(name: &'static str, options: Vec<T>) -> Result<Self> {
        let initial = initial_key(&options).ok_or(MotionError::EmptyOptions(name))?;
        Ok(Self {
            name,
            options: RefCell::new(options),
            selected: Store::new(initial),
            revision: Cell::new(0),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn selected_key(&self) -> String {
        self.selected.get()
    }

    /// The selected option record.
    pub fn current(&self) -> T {
        let key = self.selected.get();
        let options = self.options.borrow();
        options
            .iter()
            .find(|option| option.key() == key)
            .or_else(|| options.first())
            .cloned()
            .unwrap_or_else(|| unreachable!("selection `{}` lost its options", self.name))
    }

    pub fn options(&self) -> Vec<T> {
        self.options.borrow().clone()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.get() == key
    }

    /// Number of selection changes so far.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Choose `key`. Returns whether the selection changed.
    pub fn select(&self, key: &str) -> Result<bool> {
        if !self.contains(key) {
            let available = self
                .options
                .borrow()
                .iter()
                .map(|option| option.key().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::debug!(selection = self.name, key, "rejected unknown option");
            return Err(MotionError::UnknownOption { key: key.to_string(), available });
        }
        Ok(self.set_key(key.to_string()))
    }

    /// Swap the option set. Keeps the selection if its key survives,
    /// otherwise falls back to the default (or first) option.
    pub fn replace_options(&self, options: Vec<T>) -> Result<()> {
        let fallback = initial_key(&options).ok_or(MotionError::EmptyOptions(self.name))?;
        let current = self.selected.get();
        let survives = options.iter().any(|option| option.key() == current);
        *self.options.borrow_mut() = options;

        if !survives {
            tracing::debug!(selection = self.name, from = %current, to = %fallback, "selection revalidated");
            self.set_key(fallback);
        }
        Ok(())
    }

    /// Call `listener` with the new key after every change.
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Box<dyn FnOnce()> {
        self.selected.subscribe(move |key| listener(key))
    }

    fn contains(&self, key: &str) -> bool {
        self.options.borrow().iter().any(|option| option.key() == key)
    }

    fn set_key(&self, key: String) -> bool {
        // Bump first so listeners observe the new revision.
        let previous = self.revision.get();
        if self.selected.get() == key {
            return false;
        }
        self.revision.set(previous + 1);
        self.selected.set(key);
        tracing::debug!(selection = self.name, key = %self.selected.get(), "selection changed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Plan {
        id: &'static str,
        popular: bool,
    }

    impl SelectOption for Plan {
        fn key(&self) -> &str {
            self.id
        }

        fn is_default(&self) -> bool {
            self.popular
        }
    }

    fn plans() -> Vec<Plan> {
        vec![
            Plan { id: "starter", popular: false },
            Plan { id: "pro", popular: true },
            Plan { id: "enterprise", popular: false },
        ]
    }

    #[test]
    fn test_initial_is_popular() {
        let selection = SelectionController::new("package", plans()).unwrap();
        assert_eq!(selection.selected_key(), "pro");
        assert_eq!(selection.revision(), 0);
    }

    #[test]
    fn test_initial_falls_back_to_first() {
        let options = vec![Plan { id: "a", popular: false }, Plan { id: "b", popular: false }];
        let selection = SelectionController::new("package", options).unwrap();
        assert_eq!(selection.selected_key(), "a");
    }

    #[test]
    fn test_empty_options_rejected() {
        let err = SelectionController::<Plan>::new("package", Vec::new()).unwrap_err();
        assert!(matches!(err, MotionError::EmptyOptions("package")));
    }

    #[test]
    fn test_select_and_current() {
        let selection = SelectionController::new("package", plans()).unwrap();
        assert!(selection.select("enterprise").unwrap());
        assert_eq!(selection.current().id, "enterprise");
        assert_eq!(selection.revision(), 1);

        // Same key again: no change, no revision bump.
        assert!(!selection.select("enterprise").unwrap());
        assert_eq!(selection.revision(), 1);
    }

    #[test]
    fn test_unknown_key_leaves_state() {
        let selection = SelectionController::new("package", plans()).unwrap();
        let err = selection.select("nonexistent").unwrap_err();
        assert!(matches!(err, MotionError::UnknownOption { ref key, .. } if key == "nonexistent"));
        assert_eq!(selection.selected_key(), "pro");
        assert_eq!(selection.revision(), 0);
    }

    #[test]
    fn test_replace_options_revalidates() {
        let selection = SelectionController::new("package", plans()).unwrap();
        selection.select("enterprise").unwrap();

        // Key survives: kept.
        selection.replace_options(plans()).unwrap();
        assert_eq!(selection.selected_key(), "enterprise");

        // Key gone: back to the default.
        selection
            .replace_options(vec![Plan { id: "solo", popular: false }, Plan { id: "team", popular: true }])
            .unwrap();
        assert_eq!(selection.selected_key(), "team");

        // Empty set is refused and nothing changes.
        assert!(selection.replace_options(Vec::new()).is_err());
        assert_eq!(selection.current().id, "team");
    }

    #[test]
    fn test_subscribe() {
        let selection = SelectionController::new("tab", plans()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let unsubscribe = selection.subscribe(move |key| seen_clone.borrow_mut().push(key.to_string()));

        selection.select("starter").unwrap();
        let _ = selection.select("bogus");
        selection.select("starter").unwrap();
        unsubscribe();
        selection.select("pro").unwrap();

        assert_eq!(*seen.borrow(), vec!["starter".to_string()]);
    }
}
