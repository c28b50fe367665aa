//! # Wireframe Core
//!
//! Canvas interaction and transformation engine for the wireframe editor.
//! Compiles to WASM for the browser canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Interaction             │
//! │  - Sections      │  - Viewport (zoom/pan)   │
//! │  - Z-order       │  - Selection             │
//! │  - Content       │  - Gesture machine       │
//! ├─────────────────────────────────────────────┤
//! │  Input dispatch  │  Change observers        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The editor is single-threaded and owns everything by value. Rendering
//! adapters feed it [`InputEvent`]s and redraw on [`Change`] notifications.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dispatch;
pub mod document;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod observer;
pub mod schema;
pub mod section;
pub mod selection;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use document::{Document, GeometryUpdate};
pub use editor::Editor;
pub use error::{EditorError, EditorResult, StartRefused};
pub use event::{
    HandleTarget, InputEvent, KeyModifiers, PointerEvent, PointerPhase, PointerTarget,
};
pub use geometry::{Axis, Bounds, Geometry, HandleDirection, Point, Size, Skew};
pub use gesture::{
    Constraints, DragOutcome, GestureKind, GestureMachine, GestureSession, GestureState,
};
pub use observer::{Change, ChangeCallback, SubscriptionId};
pub use schema::{DocumentSnapshot, SNAPSHOT_VERSION};
pub use section::{
    Component, ComponentId, ComponentKind, NewSection, Section, SectionContent, SectionId,
    SectionType,
};
pub use selection::Selection;
pub use viewport::{GridSettings, PanDrag, Viewport};

/// Wireframe core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
