//! Change notification for views of the document.
//!
//! The rendering adapter, property editors and the JSON view each subscribe
//! once and are called after every mutation that actually changed something.

use serde::{Deserialize, Serialize};

use crate::{GestureState, SectionId};

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Change {
    /// A section was added (including duplicates).
    SectionAdded(SectionId),
    /// A section was removed.
    SectionRemoved(SectionId),
    /// Position, size, rotation or skew changed.
    GeometryChanged(SectionId),
    /// The content payload was written.
    ContentChanged(SectionId),
    /// Locked, hidden or highlighted changed.
    FlagsChanged(SectionId),
    /// Z-orders were renumbered.
    Reordered,
    /// The primary selection changed.
    SelectionChanged(Option<SectionId>),
    /// Zoom, pan, grid or pan mode changed.
    ViewportChanged,
    /// A gesture started on a section.
    GestureStarted {
        /// Target section.
        section: SectionId,
        /// Gesture state entered.
        state: GestureState,
    },
    /// The in-flight gesture ended or was aborted.
    GestureEnded {
        /// Target section.
        section: SectionId,
        /// Whether the gesture was aborted because its target vanished or got locked.
        aborted: bool,
    },
    /// A whole snapshot was loaded, or the editor was reset.
    DocumentLoaded,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with each change.
pub type ChangeCallback = Box<dyn FnMut(&Change)>;

/// The subscriber list.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, ChangeCallback)>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, change: &Change) {
        tracing::trace!("Change: {change:?}");
        for (_, callback) in &mut self.entries {
            callback(change);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
