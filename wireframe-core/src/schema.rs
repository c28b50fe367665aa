//! Canonical JSON snapshot of a document, shared by the code view, the WASM
//! binding and the replay tool.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Document, EditorError, EditorResult, Section, Viewport};

/// Snapshot format version written by [`DocumentSnapshot::capture`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Viewport plus every section, bottom of the stack first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Format version.
    #[serde(default = "DocumentSnapshot::default_version")]
    pub version: u32,
    /// Zoom, pan and grid.
    #[serde(default)]
    pub viewport: Viewport,
    /// Sections in z-order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for DocumentSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            viewport: Viewport::default(),
            sections: Vec::new(),
        }
    }
}

impl DocumentSnapshot {
    const fn default_version() -> u32 {
        SNAPSHOT_VERSION
    }

    /// Capture a document and its viewport.
    #[must_use]
    pub fn capture(document: &Document, viewport: &Viewport) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            viewport: viewport.clone(),
            sections: document.sections_by_z().into_iter().cloned().collect(),
        }
    }

    /// Parse and validate a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or two sections share an id.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject snapshots whose section ids collide.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateSection`] naming the first repeated id.
    pub fn validate(&self) -> EditorResult<()> {
        let mut seen = HashSet::new();
        match self.sections.iter().find(|s| !seen.insert(s.id)) {
            Some(section) => Err(EditorError::DuplicateSection(section.id)),
            None => Ok(()),
        }
    }

    /// Split into a document and the stored viewport.
    ///
    /// Sizes are clamped and rotations wrapped on the way in; colliding
    /// z-orders are renumbered.
    #[must_use]
    pub fn into_parts(self) -> (Document, Viewport) {
        let sections = self.sections.into_iter().map(|mut section| {
            let geometry = &mut section.geometry;
            geometry.size = geometry.size.non_negative();
            geometry.rotation = crate::geometry::normalize_rotation(geometry.rotation);
            section
        });
        (Document::from_sections(sections), self.viewport)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{EditorConfig, NewSection, SectionType};

    #[test]
    fn test_capture_lists_sections_by_z() {
        let mut document = Document::new();
        let a = document.add_section(NewSection::new(SectionType::Hero));
        let b = document.add_section(NewSection::new(SectionType::Footer));
        document.bring_to_front(a);
        let snapshot = DocumentSnapshot::capture(&document, &Viewport::new(&EditorConfig::default()));
        let ids: Vec<_> = snapshot.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_json_round_trip_preserves_document() {
        let mut document = Document::new();
        document.add_section(
            NewSection::new(SectionType::Pricing)
                .named("Plans")
                .at(20.0, 40.0)
                .rotated(45.0),
        );
        let mut viewport = Viewport::default();
        viewport.zoom_at(2.0, crate::Point::new(10.0, 10.0));

        let json = DocumentSnapshot::capture(&document, &viewport)
            .to_json()
            .expect("serializes");
        let (restored, restored_viewport) = DocumentSnapshot::from_json(&json)
            .expect("parses")
            .into_parts();
        assert_eq!(restored, document);
        assert_eq!(restored_viewport.zoom, viewport.zoom);
        assert_eq!(restored_viewport.pan, viewport.pan);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut document = Document::new();
        document.add_section(NewSection::new(SectionType::Hero));
        let mut snapshot = DocumentSnapshot::capture(&document, &Viewport::default());
        snapshot.sections.push(snapshot.sections[0].clone());
        let json = snapshot.to_json().expect("serializes");
        assert!(matches!(
            DocumentSnapshot::from_json(&json),
            Err(EditorError::DuplicateSection(_))
        ));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let snapshot = DocumentSnapshot::from_json("{}").expect("parses");
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert!(snapshot.sections.is_empty());
        assert_eq!(snapshot.viewport.zoom, 1.0);
    }

    #[test]
    fn test_loaded_geometry_is_sanitized() {
        let mut document = Document::new();
        document.add_section(NewSection::new(SectionType::Hero));
        let mut snapshot = DocumentSnapshot::capture(&document, &Viewport::default());
        snapshot.sections[0].geometry.rotation = -90.0;
        snapshot.sections[0].geometry.size.width = -5.0;
        let (document, _) = snapshot.into_parts();
        let section = document.sections_by_z()[0];
        assert_eq!(section.geometry.rotation, 270.0);
        assert_eq!(section.geometry.size.width, 0.0);
    }
}
