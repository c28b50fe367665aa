//! Selection state.

use serde::{Deserialize, Serialize};

use crate::SectionId;

/// The active section and the section under an in-flight gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    active: Option<SectionId>,
    dragging: Option<SectionId>,
}

impl Selection {
    /// The primary selection.
    #[must_use]
    pub fn active_section_id(&self) -> Option<SectionId> {
        self.active
    }

    /// The section being transformed, if a gesture is in flight.
    #[must_use]
    pub fn dragging_section_id(&self) -> Option<SectionId> {
        self.dragging
    }

    /// Whether `id` is the primary selection.
    #[must_use]
    pub fn is_active(&self, id: SectionId) -> bool {
        self.active == Some(id)
    }

    /// Set or clear the primary selection. Returns `true` if it changed.
    pub(crate) fn set_active(&mut self, id: Option<SectionId>) -> bool {
        let changed = self.active != id;
        self.active = id;
        changed
    }

    pub(crate) fn set_dragging(&mut self, id: Option<SectionId>) {
        self.dragging = id;
    }
}
