//! Primitives - building blocks shared by every section.
//!
//! - [`Node`] - render output tree handed to the host
//! - [`Cleanup`] - deferred teardown returned by subscriptions
//!
//! # Architecture
//!
//! Sections mount elements into the registry, hand them to controllers,
//! then describe their output as a [`Node`] tree on every render. Nothing
//! here owns state: a node is a snapshot.

mod node;

pub use node::Node;

/// Teardown function returned by subscriptions.
pub type Cleanup = Box<dyn FnOnce()>;
