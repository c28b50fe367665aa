//! Error types for editor operations.
//!
//! The interactive path (geometry updates, gestures, selection) never fails:
//! unknown ids are no-ops and out-of-range values are clamped. Errors only
//! surface at the edges, when loading configuration or document snapshots.

use thiserror::Error;

use crate::SectionId;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur outside the interactive path.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Snapshot or configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A section id string is not a valid UUID.
    #[error("Invalid section id: {0}")]
    InvalidSectionId(String),

    /// A snapshot contains the same section id twice.
    #[error("Duplicate section id in snapshot: {0}")]
    DuplicateSection(SectionId),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a gesture could not be started.
///
/// Refusal leaves any in-flight gesture untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRefused {
    /// Another gesture is already in flight.
    #[error("A gesture is already in flight on section {0}")]
    GestureInFlight(SectionId),

    /// The target section does not exist.
    #[error("Section not found: {0}")]
    SectionNotFound(SectionId),

    /// The target section is locked.
    #[error("Section is locked: {0}")]
    Locked(SectionId),

    /// The target section is hidden.
    #[error("Section is hidden: {0}")]
    Hidden(SectionId),

    /// Pointer drags currently pan the viewport.
    #[error("Pan mode is active")]
    PanModeActive,
}
