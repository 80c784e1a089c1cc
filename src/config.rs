//! Motion configuration.
//!
//! Every timing the page uses has a default matching the live site. A TOML
//! file can override any of them, and can redefine or add named variants:
//!
//! ```toml
//! [menu]
//! open_ms = 350
//!
//! [carousel]
//! step_px = 400.0
//!
//! [variants.fade-up]
//! rest = { opacity = 0.0, y = 20.0 }
//! active = { opacity = 1.0, y = 0.0 }
//! duration_ms = 500
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::motion::{VariantDefinition, VariantRegistry};
use crate::state::{CarouselSettings, MenuTimings, SCROLL_EPSILON_PX, SCROLL_SETTLE_MS, SCROLL_STEP_PX};
use crate::types::RootMargin;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub open_ms: u64,
    pub close_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        let timings = MenuTimings::default();
        Self { open_ms: timings.open_ms, close_ms: timings.close_ms }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub step_px: f64,
    pub epsilon_px: f64,
    pub settle_ms: u64,
    /// How long the strip's own smooth scroll takes to land.
    pub scroll_animation_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            step_px: SCROLL_STEP_PX,
            epsilon_px: SCROLL_EPSILON_PX,
            settle_ms: SCROLL_SETTLE_MS,
            scroll_animation_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Margin for section-level reveals (headlines, grids).
    pub section_margin: RootMargin,
    /// Margin for small inline elements (ratings, buttons).
    pub element_margin: RootMargin,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            section_margin: RootMargin::Px(-100.0),
            element_margin: RootMargin::Px(-50.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Spacing between feature bullets when a package is (re)selected.
    pub feature_stagger_ms: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { feature_stagger_ms: 50 }
    }
}

/// Everything tunable about the page's motion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub menu: MenuConfig,
    pub carousel: CarouselConfig,
    pub reveal: RevealConfig,
    pub pricing: PricingConfig,
    /// Named variant definitions replacing or extending the presets.
    pub variants: BTreeMap<String, VariantDefinition>,
}

impl MotionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded motion config from {:?}", path);
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if it is missing or
    /// malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(crate::error::MotionError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No motion config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load motion config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn menu_timings(&self) -> MenuTimings {
        MenuTimings { open_ms: self.menu.open_ms, close_ms: self.menu.close_ms }
    }

    pub fn carousel_settings(&self) -> CarouselSettings {
        CarouselSettings {
            step_px: self.carousel.step_px,
            epsilon_px: self.carousel.epsilon_px,
            settle_ms: self.carousel.settle_ms,
        }
    }

    /// Presets plus the configured overrides, all validated.
    pub fn variant_registry(&self) -> Result<VariantRegistry> {
        VariantRegistry::from_overrides(&self.variants)
    }
}
