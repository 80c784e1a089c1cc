//! Host Engine - the document and event loop the controllers run against.
//!
//! - Registry: element handles, parent links, bounds, destroy callbacks
//! - Scheduler: virtual-time timer queue with per-owner cancellation
//!
//! Both are thread-local. The whole orchestration layer is single-threaded
//! and cooperative: callbacks run on the thread that owns the page, one at
//! a time, so there are no data races, only reentrancy and stale timers.
//! Generational [`ElementId`](crate::types::ElementId)s and owner-scoped
//! timers handle those.

mod registry;
pub mod scheduler;

pub use registry::*;
pub use scheduler::{
    advance, allocate_owner, cancel_owner, clear_timeout, is_pending, now, pending_count,
    pending_for, reset_scheduler, run_until_idle, set_timeout, OwnerId, TimerId, TimerSlot,
};
