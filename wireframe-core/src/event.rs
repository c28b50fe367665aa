//! Input events delivered by the rendering adapter.
//!
//! Hit-testing against handles happens in the adapter, which knows where it
//! drew them; events arrive here already tagged with the section and handle
//! under the pointer.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, HandleDirection, Point};
use crate::{GestureKind, SectionId};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer capture lost.
    Cancel,
}

/// Which part of a section the pointer went down on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandleTarget {
    /// The section body.
    #[default]
    Body,
    /// A resize handle.
    Resize {
        /// Handle position.
        direction: HandleDirection,
    },
    /// The rotation handle.
    Rotate,
    /// A skew handle.
    Skew {
        /// Skew axis.
        axis: Axis,
    },
}

impl HandleTarget {
    /// Gesture this handle starts. Shift locks aspect ratio or snaps rotation.
    #[must_use]
    pub fn gesture(self, modifiers: KeyModifiers) -> GestureKind {
        match self {
            Self::Body => GestureKind::Move,
            Self::Resize { direction } => GestureKind::Resize {
                direction,
                aspect_locked: modifiers.shift,
            },
            Self::Rotate => GestureKind::Rotate {
                snap: modifiers.shift,
            },
            Self::Skew { axis } => GestureKind::Skew { axis },
        }
    }
}

/// The section and handle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerTarget {
    /// Section hit.
    pub section: SectionId,
    /// Handle hit.
    #[serde(default)]
    pub handle: HandleTarget,
}

/// A pointer (mouse, pen or touch) event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Adapter-assigned pointer id, as in the DOM `PointerEvent.pointerId`.
    #[serde(default)]
    pub pointer_id: u32,
    /// X coordinate on screen.
    pub x: f32,
    /// Y coordinate on screen.
    pub y: f32,
    /// Mouse button ([`PointerEvent::PRIMARY_BUTTON`] = left, 1 = middle, 2 = right).
    #[serde(default)]
    pub button: u8,
    /// What the pointer is over, as hit-tested by the adapter.
    #[serde(default)]
    pub target: Option<PointerTarget>,
    /// Active modifier keys.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    /// The only button that starts gestures and pan drags.
    pub const PRIMARY_BUTTON: u8 = 0;

    /// An untargeted left-button event from pointer 0.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            pointer_id: 0,
            x,
            y,
            button: Self::PRIMARY_BUTTON,
            target: None,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Attach a hit-test result.
    #[must_use]
    pub fn on(mut self, section: SectionId, handle: HandleTarget) -> Self {
        self.target = Some(PointerTarget { section, handle });
        self
    }

    /// Set the pointer id.
    #[must_use]
    pub fn with_pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Set the button.
    #[must_use]
    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        self
    }

    /// Attach modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Pointer position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer event.
    Pointer(PointerEvent),

    /// Wheel or trackpad scroll.
    Wheel {
        /// X coordinate on screen.
        x: f32,
        /// Y coordinate on screen.
        y: f32,
        /// Horizontal scroll amount.
        #[serde(default)]
        delta_x: f32,
        /// Vertical scroll amount.
        delta_y: f32,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// Keyboard event.
    Key {
        /// Key name, as in the DOM `KeyboardEvent.key`.
        key: String,
        /// Whether the key is pressed.
        pressed: bool,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
}

impl InputEvent {
    /// Key press shortcut.
    #[must_use]
    pub fn key_down(key: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self::Key {
            key: key.into(),
            pressed: true,
            modifiers,
        }
    }

    /// Key release shortcut.
    #[must_use]
    pub fn key_up(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            pressed: false,
            modifiers: KeyModifiers::default(),
        }
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only Ctrl held.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}
