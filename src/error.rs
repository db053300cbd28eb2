//! Error types for the effect engine.

use thiserror::Error;

use crate::kinds::EffectKind;

/// Requests the controller rejects without changing state
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// No effect kind goes by this name
    #[error("unknown effect kind: {0}")]
    UnknownKind(String),

    /// The host registered no sprite for the kind
    #[error("no sprite registered for effect kind {0}")]
    MissingSprite(EffectKind),
}

/// Drawing target failures. Transient: the scheduler logs and skips the frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Surface not created yet, or already destroyed
    #[error("drawing surface is not ready")]
    NotReady,

    /// Acquire or present failed on a live surface
    #[error("drawing surface lost: {0}")]
    Lost(String),
}
