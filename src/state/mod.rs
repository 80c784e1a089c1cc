//! State Module - runtime interaction state
//!
//! The controllers that own the page's behavior:
//!
//! - **Store** - observable value backed by a spark-signals `Signal`
//! - **Scroll lock** - page-wide background-scroll flag with a single writer
//! - **Animate** - per-element playback phase driven by scheduler timers
//! - **Reveal** - viewport-triggered, staggered reveal subscriptions
//! - **Menu** - overlay navigation open/close state machine
//! - **Scroll** - carousel navigator over a scrollable strip
//! - **Selection** - single-choice controllers (pricing package, plan tab)

pub mod animate;
mod menu;
mod reveal;
mod scroll;
pub mod scroll_lock;
mod selection;
mod store;

pub use menu::{MenuState, MenuTimings, NavigationRequest, OverlayMenu};
pub use reveal::{RevealController, RevealOptions, TriggerPolicy};
pub use scroll::{
    CarouselButtons, CarouselNavigator, CarouselSettings, CarouselViewState, ScrollStrip,
    ScrollSurface, SCROLL_EPSILON_PX, SCROLL_SETTLE_MS, SCROLL_STEP_PX,
};
pub use scroll_lock::{is_scroll_locked, on_scroll_lock_change, ScrollLockWriter};
pub use selection::{SelectOption, SelectionController};
pub use store::Store;
