//! Variant Registry - named lookup of shared motion specs.
//!
//! Sections ask for variants by name at mount time. A name that is not
//! registered is a configuration error and surfaces immediately through
//! [`VariantRegistry::require`], never as a missing animation later.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::presets;
use super::variant::{VariantDefinition, VariantSpec};
use crate::error::{MotionError, Result};

/// Immutable-after-build table of variants.
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    variants: HashMap<String, Rc<VariantSpec>>,
}

impl VariantRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with every built-in preset.
    pub fn with_presets() -> Self {
        let mut registry = Self::new();
        for name in presets::preset_names() {
            if let Some(spec) = presets::get_preset(name) {
                registry.variants.insert(spec.name().to_string(), Rc::new(spec));
            }
        }
        registry
    }

    /// Built-in presets plus validated overrides from config.
    ///
    /// Overrides replace presets of the same name; new names are added.
    pub fn from_overrides(overrides: &BTreeMap<String, VariantDefinition>) -> Result<Self> {
        let mut registry = Self::with_presets();
        for (name, definition) in overrides {
            let spec = definition.clone().into_spec(name)?;
            if registry.contains(name) {
                tracing::debug!(variant = %name, "overriding built-in variant");
            }
            registry.insert(spec)?;
        }
        Ok(registry)
    }

    /// Add or replace a variant. Validates first.
    pub fn insert(&mut self, spec: VariantSpec) -> Result<Rc<VariantSpec>> {
        spec.validate()?;
        let spec = Rc::new(spec);
        self.variants.insert(spec.name().to_string(), spec.clone());
        Ok(spec)
    }

    /// Look up a variant. The returned `Rc` is shared with every other
    /// caller asking for the same name.
    pub fn get(&self, name: &str) -> Result<Rc<VariantSpec>> {
        self.variants
            .get(name)
            .cloned()
            .ok_or_else(|| MotionError::MissingVariant(name.to_string()))
    }

    /// Check that every name resolves. Reports the first missing one.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(missing) => {
                tracing::warn!(variant = %missing, "required variant is not registered");
                Err(MotionError::MissingVariant((*missing).to_string()))
            }
            None => Ok(()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Easing, MotionState};

    #[test]
    fn test_presets_registered() {
        let registry = VariantRegistry::with_presets();
        assert_eq!(registry.len(), presets::preset_names().len());
        assert!(registry.get("fade-up").is_ok());
    }

    #[test]
    fn test_lookup_shares_spec() {
        let registry = VariantRegistry::with_presets();
        let a = registry.get("card").unwrap();
        let b = registry.get("card").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_missing_variant_is_error() {
        let registry = VariantRegistry::with_presets();
        let err = registry.get("spin").unwrap_err();
        assert!(matches!(err, MotionError::MissingVariant(name) if name == "spin"));
    }

    #[test]
    fn test_require_fails_fast() {
        let registry = VariantRegistry::with_presets();
        assert!(registry.require(&["fade-up", "card"]).is_ok());

        let err = registry.require(&["fade-up", "nope", "also-nope"]).unwrap_err();
        assert!(matches!(err, MotionError::MissingVariant(name) if name == "nope"));
    }

    #[test]
    fn test_overrides_replace_presets() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "fade-up".to_string(),
            VariantDefinition {
                rest: MotionState::new().opacity(0.0),
                active: MotionState::new().opacity(1.0),
                duration_ms: 250,
                delay_ms: 0,
                easing: Easing::Linear,
                stagger_ms: None,
                child_delay_ms: None,
            },
        );

        let registry = VariantRegistry::from_overrides(&overrides).unwrap();
        assert_eq!(registry.get("fade-up").unwrap().duration_ms(), 250);
        assert_eq!(registry.len(), presets::preset_names().len());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "bad".to_string(),
            VariantDefinition {
                rest: MotionState::new(),
                active: MotionState::new().opacity(1.0),
                duration_ms: 100,
                delay_ms: 0,
                easing: Easing::Linear,
                stagger_ms: None,
                child_delay_ms: None,
            },
        );
        assert!(matches!(
            VariantRegistry::from_overrides(&overrides),
            Err(MotionError::UnmatchedActiveState { .. })
        ));
    }
}
