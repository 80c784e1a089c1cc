//! Motion variants - named rest/active state pairs.
//!
//! A [`VariantSpec`] describes how an element moves from its rest state to
//! its active state: which properties change, over how long, on which
//! curve, and how its children are staggered. Specs are immutable and
//! shared by `Rc` between every element that uses them.
//!
//! # Example
//!
//! ```ignore
//! use spark_landing::motion::{Easing, MotionState, VariantSpec};
//!
//! let fade_up = VariantSpec::builder("fade-up")
//!     .rest(MotionState::new().opacity(0.0).y(30.0))
//!     .active(MotionState::new().opacity(1.0).y(0.0))
//!     .duration_ms(600)
//!     .easing(Easing::site())
//!     .build()?;
//!
//! let halfway = fade_up.frame_at(0.5);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::easing::Easing;
use crate::error::{MotionError, Result};

// =============================================================================
// Property Keys
// =============================================================================

bitflags! {
    /// Set of animatable properties present in a [`MotionState`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertySet: u8 {
        const OPACITY = 1 << 0;
        const X = 1 << 1;
        const Y = 1 << 2;
        const SCALE = 1 << 3;
        const ROTATE = 1 << 4;
    }
}

impl PropertySet {
    /// Human-readable list, used in error messages.
    pub fn describe(&self) -> String {
        let names: Vec<&str> = [
            (PropertySet::OPACITY, "opacity"),
            (PropertySet::X, "x"),
            (PropertySet::Y, "y"),
            (PropertySet::SCALE, "scale"),
            (PropertySet::ROTATE, "rotate"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        names.join(", ")
    }
}

// =============================================================================
// MotionState
// =============================================================================

/// A partial set of visual properties.
///
/// Offsets are in pixels, rotation in degrees, opacity and scale are
/// unitless. `None` means the property is not animated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionState {
    pub opacity: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: Option<f32>,
    pub rotate: Option<f32>,
}

impl MotionState {
    pub const fn new() -> Self {
        Self { opacity: None, x: None, y: None, scale: None, rotate: None }
    }

    pub const fn opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub const fn x(mut self, value: f32) -> Self {
        self.x = Some(value);
        self
    }

    pub const fn y(mut self, value: f32) -> Self {
        self.y = Some(value);
        self
    }

    pub const fn scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    pub const fn rotate(mut self, value: f32) -> Self {
        self.rotate = Some(value);
        self
    }

    /// Which properties this state defines.
    pub fn keys(&self) -> PropertySet {
        let mut keys = PropertySet::empty();
        keys.set(PropertySet::OPACITY, self.opacity.is_some());
        keys.set(PropertySet::X, self.x.is_some());
        keys.set(PropertySet::Y, self.y.is_some());
        keys.set(PropertySet::SCALE, self.scale.is_some());
        keys.set(PropertySet::ROTATE, self.rotate.is_some());
        keys
    }

    fn values(&self) -> [Option<f32>; 5] {
        [self.opacity, self.x, self.y, self.scale, self.rotate]
    }

    fn is_finite(&self) -> bool {
        self.values().iter().flatten().all(|v| v.is_finite())
    }

    /// Interpolate toward `to` by `t` (already eased).
    ///
    /// Properties missing from `to` keep this state's value.
    pub fn lerp(&self, to: &MotionState, t: f32) -> MotionState {
        fn mix(from: Option<f32>, to: Option<f32>, t: f32) -> Option<f32> {
            match (from, to) {
                (Some(a), Some(b)) => Some(a + (b - a) * t),
                (from, _) => from,
            }
        }
        MotionState {
            opacity: mix(self.opacity, to.opacity, t),
            x: mix(self.x, to.x, t),
            y: mix(self.y, to.y, t),
            scale: mix(self.scale, to.scale, t),
            rotate: mix(self.rotate, to.rotate, t),
        }
    }
}

// =============================================================================
// VariantSpec
// =============================================================================

/// Immutable motion descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    name: String,
    rest: MotionState,
    active: MotionState,
    duration_ms: u64,
    delay_ms: u64,
    easing: Easing,
    stagger_ms: Option<u64>,
    child_delay_ms: Option<u64>,
}

impl VariantSpec {
    pub fn builder(name: impl Into<String>) -> VariantBuilder {
        VariantBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rest(&self) -> &MotionState {
        &self.rest
    }

    pub fn active(&self) -> &MotionState {
        &self.active
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Delay before this element starts, relative to its own activation.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn stagger_ms(&self) -> Option<u64> {
        self.stagger_ms
    }

    pub fn child_delay_ms(&self) -> Option<u64> {
        self.child_delay_ms
    }

    /// Visual state at linear progress `t` through the transition.
    pub fn frame_at(&self, t: f32) -> MotionState {
        self.rest.lerp(&self.active, self.easing.apply(t))
    }

    /// Delay for the child at `index` relative to parent activation.
    ///
    /// `child_delay + index * stagger`; both default to zero.
    pub fn child_offset_ms(&self, index: usize) -> u64 {
        let base = self.child_delay_ms.unwrap_or(0);
        let step = self.stagger_ms.unwrap_or(0);
        base.saturating_add(step.saturating_mul(index as u64))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder that validates on [`build`](VariantBuilder::build).
#[derive(Debug, Clone)]
pub struct VariantBuilder {
    spec: VariantSpec,
}

impl VariantBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            spec: VariantSpec {
                name: name.into(),
                rest: MotionState::new(),
                active: MotionState::new(),
                duration_ms: 0,
                delay_ms: 0,
                easing: Easing::site(),
                stagger_ms: None,
                child_delay_ms: None,
            },
        }
    }

    pub fn rest(mut self, state: MotionState) -> Self {
        self.spec.rest = state;
        self
    }

    pub fn active(mut self, state: MotionState) -> Self {
        self.spec.active = state;
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.spec.duration_ms = ms;
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.spec.delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.spec.easing = easing;
        self
    }

    pub fn stagger_ms(mut self, ms: u64) -> Self {
        self.spec.stagger_ms = Some(ms);
        self
    }

    pub fn child_delay_ms(mut self, ms: u64) -> Self {
        self.spec.child_delay_ms = Some(ms);
        self
    }

    /// Check invariants and produce the variant.
    ///
    /// Fails if the active state names a property the rest state lacks, if
    /// any value is non-finite, or if the easing curve is malformed.
    pub fn build(self) -> Result<VariantSpec> {
        self.spec.validate()?;
        Ok(self.spec)
    }

    /// Produce the variant without validation. Only for the built-in presets,
    /// which are covered by a test that validates every one of them.
    pub(super) fn finish(self) -> VariantSpec {
        self.spec
    }
}

impl VariantSpec {
    /// Check the rest/active invariant, value finiteness and the curve.
    pub fn validate(&self) -> Result<()> {
        let unmatched = self.active.keys().difference(self.rest.keys());
        if !unmatched.is_empty() {
            return Err(MotionError::UnmatchedActiveState {
                name: self.name.clone(),
                properties: unmatched.describe(),
            });
        }

        if !self.rest.is_finite() || !self.active.is_finite() {
            return Err(MotionError::InvalidTiming {
                name: self.name.clone(),
                reason: "non-finite property value".into(),
            });
        }

        if !self.easing.is_valid() {
            return Err(MotionError::InvalidTiming {
                name: self.name.clone(),
                reason: format!("invalid easing curve {:?}", self.easing),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Config form
// =============================================================================

/// Serializable variant definition, used for config overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantDefinition {
    pub rest: MotionState,
    pub active: MotionState,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "Easing::site")]
    pub easing: Easing,
    #[serde(default)]
    pub stagger_ms: Option<u64>,
    #[serde(default)]
    pub child_delay_ms: Option<u64>,
}

impl VariantDefinition {
    /// Validate into a spec under `name`.
    pub fn into_spec(self, name: &str) -> Result<VariantSpec> {
        let mut builder = VariantSpec::builder(name)
            .rest(self.rest)
            .active(self.active)
            .duration_ms(self.duration_ms)
            .delay_ms(self.delay_ms)
            .easing(self.easing);
        if let Some(ms) = self.stagger_ms {
            builder = builder.stagger_ms(ms);
        }
        if let Some(ms) = self.child_delay_ms {
            builder = builder.child_delay_ms(ms);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade_up() -> VariantSpec {
        VariantSpec::builder("fade-up")
            .rest(MotionState::new().opacity(0.0).y(30.0))
            .active(MotionState::new().opacity(1.0).y(0.0))
            .duration_ms(600)
            .easing(Easing::Linear)
            .build()
            .unwrap()
    }

    #[test]
    fn test_frame_interpolates() {
        let spec = fade_up();
        assert_eq!(spec.frame_at(0.0), *spec.rest());
        assert_eq!(spec.frame_at(1.0), *spec.active());

        let mid = spec.frame_at(0.5);
        assert_eq!(mid.opacity, Some(0.5));
        assert_eq!(mid.y, Some(15.0));
        assert_eq!(mid.x, None);
    }

    #[test]
    fn test_active_without_rest_key_rejected() {
        let err = VariantSpec::builder("broken")
            .rest(MotionState::new().opacity(0.0))
            .active(MotionState::new().opacity(1.0).scale(1.0))
            .build()
            .unwrap_err();

        match err {
            MotionError::UnmatchedActiveState { name, properties } => {
                assert_eq!(name, "broken");
                assert_eq!(properties, "scale");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rest_only_keys_hold_still() {
        let spec = VariantSpec::builder("hold")
            .rest(MotionState::new().opacity(0.0).x(-20.0))
            .active(MotionState::new().opacity(1.0))
            .easing(Easing::Linear)
            .build()
            .unwrap();
        assert_eq!(spec.frame_at(1.0).x, Some(-20.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = VariantSpec::builder("nan")
            .rest(MotionState::new().opacity(f32::NAN))
            .active(MotionState::new().opacity(1.0))
            .build();
        assert!(matches!(result, Err(MotionError::InvalidTiming { .. })));
    }

    #[test]
    fn test_child_offsets() {
        let container = VariantSpec::builder("stagger")
            .rest(MotionState::new().opacity(0.0))
            .active(MotionState::new().opacity(1.0))
            .stagger_ms(100)
            .child_delay_ms(200)
            .build()
            .unwrap();

        let offsets: Vec<u64> = (0..4).map(|i| container.child_offset_ms(i)).collect();
        assert_eq!(offsets, vec![200, 300, 400, 500]);

        // No stagger: every child starts together.
        assert_eq!(fade_up().child_offset_ms(3), 0);
    }

    #[test]
    fn test_definition_from_toml() {
        let def: VariantDefinition = toml::from_str(
            r#"
            rest = { opacity = 0.0, x = 30.0 }
            active = { opacity = 1.0, x = 0.0 }
            duration_ms = 500
            easing = "linear"
            "#,
        )
        .unwrap();

        let spec = def.into_spec("slide").unwrap();
        assert_eq!(spec.name(), "slide");
        assert_eq!(spec.duration_ms(), 500);
        assert_eq!(spec.easing(), Easing::Linear);
    }
}
