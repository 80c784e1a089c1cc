//! Error types for the orchestration layer.
//!
//! Only configuration problems and invalid caller input are errors.
//! Timing races against detached elements are resolved as no-ops and never
//! show up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    /// A section asked for a variant that was never registered.
    #[error("unknown animation variant `{0}`")]
    MissingVariant(String),

    /// A variant animates a property that its rest state does not define.
    #[error("variant `{name}` animates {properties} without a matching rest value")]
    UnmatchedActiveState { name: String, properties: String },

    /// A variant was given a non-finite or negative timing value.
    #[error("variant `{name}` has invalid timing: {reason}")]
    InvalidTiming { name: String, reason: String },

    /// Selection was asked for a key that is not in the option set.
    #[error("unknown option `{key}` (available: {available})")]
    UnknownOption { key: String, available: String },

    /// A selection controller was built over zero options.
    #[error("selection `{0}` has no options")]
    EmptyOptions(&'static str),

    /// Somebody other than the current owner tried to claim the scroll lock.
    #[error("scroll lock already has a writer: {0}")]
    ScrollLockClaimed(String),

    #[error("malformed content: {0}")]
    Content(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MotionError>;
