//! The document model: every section on the canvas and the operations on them.
//!
//! All operations are synchronous and never fail. Operations on an unknown
//! id are no-ops that report `false`/`None`, which is how a gesture survives
//! its target disappearing underneath it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_rotation, Point, Size, Skew};
use crate::{NewSection, Section, SectionContent, SectionId};

/// A typed partial geometry write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryUpdate {
    /// Move the top-left corner.
    Position {
        /// New top-left corner.
        position: Point,
    },
    /// Change width/height, keeping the position.
    Size {
        /// New size.
        size: Size,
    },
    /// Move and resize at once.
    Bounds {
        /// New top-left corner.
        position: Point,
        /// New size.
        size: Size,
    },
    /// Set the rotation (wrapped into `[0, 360)`).
    Rotation {
        /// Rotation in degrees.
        degrees: f32,
    },
    /// Set the skew.
    Skew {
        /// Skew in degrees.
        skew: Skew,
    },
}

/// All sections of one wireframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: HashMap<SectionId, Section>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from existing sections.
    ///
    /// Duplicate ids keep the last occurrence. If z-orders collide, every
    /// section is renumbered densely in its current stacking order.
    #[must_use]
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut document = Self {
            sections: sections.into_iter().map(|s| (s.id, s)).collect(),
        };
        let mut seen = std::collections::HashSet::new();
        if !document.sections.values().all(|s| seen.insert(s.z_order)) {
            tracing::warn!("Colliding z-orders in loaded sections, renumbering");
            let order: Vec<SectionId> = document.ordered_ids();
            document.renumber(&order);
        }
        document
    }

    /// Next z-order to hand out: one above the current maximum.
    ///
    /// If the maximum is already `i32::MAX`, every section is renumbered
    /// densely first so the new one still lands on top.
    fn next_z_order(&mut self) -> i32 {
        let Some(max) = self.sections.values().map(|s| s.z_order).max() else {
            return 0;
        };
        if let Some(next) = max.checked_add(1) {
            return next;
        }
        tracing::warn!("Z-order exhausted at {max}, renumbering");
        let order = self.ordered_ids();
        self.renumber(&order);
        i32::try_from(order.len()).unwrap_or(i32::MAX)
    }

    /// Ids sorted by z-order, bottom first. Ties (only possible mid-load) break on id.
    fn ordered_ids(&self) -> Vec<SectionId> {
        let mut ids: Vec<_> = self.sections.values().map(|s| (s.z_order, s.id)).collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn renumber(&mut self, order: &[SectionId]) {
        for (z, id) in (0_i32..).zip(order) {
            if let Some(section) = self.sections.get_mut(id) {
                section.z_order = z;
            }
        }
    }

    /// Add a section on top of everything else and return its id.
    pub fn add_section(&mut self, new: NewSection) -> SectionId {
        let section = Section {
            id: SectionId::new(),
            geometry: new.geometry(),
            z_order: self.next_z_order(),
            locked: new.locked,
            hidden: new.hidden,
            highlighted: false,
            content: new.content,
        };
        let id = section.id;
        tracing::debug!("Added section {id} at z {}", section.z_order);
        self.sections.insert(id, section);
        id
    }

    /// Remove a section. Other z-orders are left as they are.
    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let removed = self.sections.remove(&id);
        if removed.is_some() {
            tracing::debug!("Removed section {id}");
        }
        removed
    }

    /// Apply a partial geometry write.
    ///
    /// Sizes are clamped to be non-negative and rotations wrapped. Returns
    /// `true` if the section exists and its geometry changed.
    pub fn update_section_geometry(&mut self, id: SectionId, update: GeometryUpdate) -> bool {
        let Some(section) = self.sections.get_mut(&id) else {
            return false;
        };
        let before = section.geometry;
        let geometry = &mut section.geometry;
        match update {
            GeometryUpdate::Position { position } => geometry.position = position,
            GeometryUpdate::Size { size } => geometry.size = size.non_negative(),
            GeometryUpdate::Bounds { position, size } => {
                geometry.position = position;
                geometry.size = size.non_negative();
            }
            GeometryUpdate::Rotation { degrees } => geometry.rotation = normalize_rotation(degrees),
            GeometryUpdate::Skew { skew } => geometry.skew = skew,
        }
        before != section.geometry
    }

    /// Move the section at `from_index` (in z-order, bottom first) to `to_index`.
    ///
    /// All sections are then renumbered `0..n`. Out-of-range indices and
    /// `from_index == to_index` are a no-op.
    pub fn reorder_sections(&mut self, from_index: usize, to_index: usize) -> bool {
        let mut order = self.ordered_ids();
        if from_index == to_index || from_index >= order.len() || to_index >= order.len() {
            return false;
        }
        let id = order.remove(from_index);
        order.insert(to_index, id);
        self.renumber(&order);
        tracing::debug!("Reordered section {id}: {from_index} -> {to_index}");
        true
    }

    /// Position of a section in the z-ordered list.
    #[must_use]
    pub fn z_index_of(&self, id: SectionId) -> Option<usize> {
        self.ordered_ids().iter().position(|&other| other == id)
    }

    /// Move a section to the top of the stack.
    pub fn bring_to_front(&mut self, id: SectionId) -> bool {
        match self.z_index_of(id) {
            Some(index) if index + 1 < self.sections.len() => {
                self.reorder_sections(index, self.sections.len() - 1)
            }
            _ => false,
        }
    }

    /// Move a section to the bottom of the stack.
    pub fn send_to_back(&mut self, id: SectionId) -> bool {
        match self.z_index_of(id) {
            Some(index) if index > 0 => self.reorder_sections(index, 0),
            _ => false,
        }
    }

    /// Copy a section onto the top of the stack, at the same position.
    pub fn duplicate_section(&mut self, id: SectionId) -> Option<SectionId> {
        if !self.contains(id) {
            return None;
        }
        let z_order = self.next_z_order();
        let source = self.sections.get(&id)?;
        let copy = Section {
            id: SectionId::new(),
            geometry: source.geometry,
            z_order,
            locked: source.locked,
            hidden: source.hidden,
            highlighted: false,
            content: source.content.duplicate(),
        };
        let copy_id = copy.id;
        tracing::debug!("Duplicated section {id} as {copy_id}");
        self.sections.insert(copy_id, copy);
        Some(copy_id)
    }

    /// Let a property editor change a section's content.
    ///
    /// Returns `true` only if the section exists and the closure changed its content.
    pub fn update_section_content<F>(&mut self, id: SectionId, f: F) -> bool
    where
        F: FnOnce(&mut SectionContent),
    {
        let Some(section) = self.sections.get_mut(&id) else {
            return false;
        };
        let before = section.content.clone();
        f(&mut section.content);
        before != section.content
    }

    /// Set the locked flag. Returns `true` if it changed.
    pub fn set_locked(&mut self, id: SectionId, locked: bool) -> bool {
        self.set_flag(id, |s| &mut s.locked, locked)
    }

    /// Set the hidden flag. Returns `true` if it changed.
    pub fn set_hidden(&mut self, id: SectionId, hidden: bool) -> bool {
        self.set_flag(id, |s| &mut s.hidden, hidden)
    }

    /// Set the highlighted flag. Returns `true` if it changed.
    pub fn set_highlighted(&mut self, id: SectionId, highlighted: bool) -> bool {
        self.set_flag(id, |s| &mut s.highlighted, highlighted)
    }

    fn set_flag(&mut self, id: SectionId, field: fn(&mut Section) -> &mut bool, value: bool) -> bool {
        let Some(section) = self.sections.get_mut(&id) else {
            return false;
        };
        let flag = field(section);
        let changed = *flag != value;
        *flag = value;
        changed
    }

    /// Get a section by id.
    #[must_use]
    pub fn get_section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    /// Whether a section exists.
    #[must_use]
    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    /// All sections sorted by z-order, bottom first.
    #[must_use]
    pub fn sections_by_z(&self) -> Vec<&Section> {
        let mut sections: Vec<_> = self.sections.values().collect();
        sections.sort_by_key(|s| (s.z_order, s.id));
        sections
    }

    /// Topmost visible section containing a canvas point.
    #[must_use]
    pub fn section_at(&self, point: Point) -> Option<SectionId> {
        self.sections
            .values()
            .filter(|s| !s.hidden && s.contains_point(point))
            .max_by_key(|s| s.z_order)
            .map(|s| s.id)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
