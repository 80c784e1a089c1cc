//! # spark-landing
//!
//! Motion orchestration for a single-page studio landing site.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! observable state.
//!
//! ## Architecture
//!
//! The page is a tree of mounted elements in a thread-local registry, driven
//! by a virtual-time timer queue. Controllers own the behavior; sections
//! wire controllers to content and describe their output as [`Node`] trees.
//!
//! ```text
//! PageContent + MotionConfig → VariantRegistry → Sections → Node tree
//!                                                   │
//!            RevealController / OverlayMenu / CarouselNavigator / SelectionController
//!                                                   │
//!                                    Registry + Scheduler (engine)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Element handles, rects, viewport, root margins
//! - [`engine`] - Element registry and timer scheduler
//! - [`motion`] - Animation variants, presets, timelines
//! - [`state`] - Controllers: reveal, menu, carousel, selection, scroll lock
//! - [`content`] - Page copy loaded from JSON
//! - [`sections`] - Per-section mounting, layout and rendering
//! - [`pipeline`] - Whole-page mount and host event routing
//! - [`config`] - TOML configuration

pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod motion;
pub mod pipeline;
pub mod primitives;
pub mod sections;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::MotionConfig;
pub use content::{Icon, PageContent};
pub use error::{MotionError, Result};

pub use motion::{
    Easing, MotionState, PropertySet, Timeline, TimelineEntry, VariantDefinition, VariantRegistry,
    VariantSpec,
};

pub use pipeline::{mount_page, mount_page_with, MountHandle};

pub use primitives::{Cleanup, Node};

pub use sections::{
    FooterSection, HeroSection, NavbarSection, PricingSection, Section, SectionContext,
    TestimonialsSection, WhyUsSection, WorksSection,
};

pub use state::{
    // Reveal
    RevealController, RevealOptions, TriggerPolicy,
    // Menu
    MenuState, MenuTimings, NavigationRequest, OverlayMenu,
    // Carousel
    CarouselButtons, CarouselNavigator, CarouselSettings, CarouselViewState, ScrollStrip,
    ScrollSurface,
    // Selection
    SelectOption, SelectionController,
    // Scroll lock
    is_scroll_locked, on_scroll_lock_change, ScrollLockWriter,
    Store,
};
