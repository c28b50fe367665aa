//! WebAssembly bindings for the editor.
//!
//! Everything crosses the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::{
    DocumentSnapshot, Editor, EditorConfig, EditorError, GeometryUpdate, InputEvent, NewSection,
    SectionId, SectionType,
};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse_id(id: &str) -> Result<SectionId, String> {
    SectionId::parse(id).map_err(|e| EditorError::InvalidSectionId(e.to_string()).to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: Editor::default(),
        }
    }

    /// Create an editor from a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is malformed or invalid.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WasmEditor, String> {
        let config = EditorConfig::from_json(json).map_err(|e| e.to_string())?;
        Ok(Self {
            editor: Editor::new(config),
        })
    }

    /// Feed one input event as JSON. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event JSON is malformed.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, json: &str) -> Result<bool, String> {
        let event: InputEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.editor.handle_event(&event))
    }

    /// Current snapshot as JSON.
    #[wasm_bindgen(js_name = getSnapshotJson)]
    #[must_use]
    pub fn get_snapshot_json(&self) -> String {
        self.editor.snapshot().to_json().unwrap_or_default()
    }

    /// Replace the document from snapshot JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing or validation fails.
    #[wasm_bindgen(js_name = loadSnapshotJson)]
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<(), String> {
        let snapshot = DocumentSnapshot::from_json(json).map_err(|e| e.to_string())?;
        self.editor.load_snapshot(snapshot);
        Ok(())
    }

    /// Viewport as JSON.
    #[wasm_bindgen(js_name = getViewportJson)]
    #[must_use]
    pub fn get_viewport_json(&self) -> String {
        to_json(self.editor.viewport())
    }

    /// Selection as JSON.
    #[wasm_bindgen(js_name = getSelectionJson)]
    #[must_use]
    pub fn get_selection_json(&self) -> String {
        to_json(self.editor.selection())
    }

    /// One section as JSON, or `null` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid section id.
    #[wasm_bindgen(js_name = getSectionJson)]
    pub fn get_section_json(&self, id: &str) -> Result<String, String> {
        Ok(to_json(&self.editor.get_section(parse_id(id)?)))
    }

    /// Add a section of the given kebab-case type and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the type is unknown.
    #[wasm_bindgen(js_name = addSection)]
    pub fn add_section(&mut self, section_type: &str, x: f32, y: f32) -> Result<String, String> {
        let section_type: SectionType =
            serde_json::from_value(serde_json::Value::String(section_type.to_string()))
                .map_err(|e| e.to_string())?;
        let id = self
            .editor
            .add_section(NewSection::new(section_type).at(x, y));
        Ok(id.to_string())
    }

    /// Apply a JSON geometry update. Returns whether it changed anything.
    ///
    /// # Errors
    ///
    /// Returns an error string if the id or update is malformed.
    #[wasm_bindgen(js_name = updateSectionGeometry)]
    pub fn update_section_geometry(&mut self, id: &str, json: &str) -> Result<bool, String> {
        let id = parse_id(id)?;
        let update: GeometryUpdate = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.editor.update_section_geometry(id, update))
    }

    /// Remove a section. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid section id.
    #[wasm_bindgen(js_name = removeSection)]
    pub fn remove_section(&mut self, id: &str) -> Result<bool, String> {
        Ok(self.editor.remove_section(parse_id(id)?).is_some())
    }

    /// Move the section at `from` in the z-ordered list to `to`.
    #[wasm_bindgen(js_name = reorderSections)]
    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        self.editor.reorder_sections(from, to)
    }

    /// Current gesture state as a lowercase string.
    #[wasm_bindgen(js_name = getGestureState)]
    #[must_use]
    pub fn get_gesture_state(&self) -> String {
        to_json(&self.editor.gesture_state())
            .trim_matches('"')
            .to_string()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_json_is_valid() {
        let editor = WasmEditor::new();
        let parsed: Result<serde_json::Value, _> =
            serde_json::from_str(&editor.get_snapshot_json());
        assert!(parsed.is_ok());
    }

    #[test]
    fn add_and_move_section() {
        let mut editor = WasmEditor::new();
        let id = editor.add_section("hero", 0.0, 0.0).expect("known type");
        let changed = editor
            .update_section_geometry(&id, r#"{"kind":"position","position":{"x":40,"y":20}}"#)
            .expect("valid update");
        assert!(changed);
        assert!(editor.get_section_json(&id).expect("valid id").contains("40"));
    }

    #[test]
    fn invalid_ids_are_errors() {
        let mut editor = WasmEditor::new();
        assert!(editor.remove_section("not-a-uuid").is_err());
        assert!(editor.add_section("carousel", 0.0, 0.0).is_err());
    }

    #[test]
    fn gesture_state_string() {
        assert_eq!(WasmEditor::new().get_gesture_state(), "idle");
    }
}
